use clap::{CommandFactory, Parser, Subcommand};
use std::error::Error;
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use worktimer_core::TimerError;

mod commands;
mod output;
mod range;

use commands::Context;

#[derive(Parser)]
#[command(name = "worktimer", version, about = "Track time worked per project")]
struct Cli {
    /// Project directory (defaults to the current directory)
    #[arg(short = 'y', long, global = true, value_name = "DIR")]
    directory: Option<PathBuf>,

    /// Print machine-readable JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Timer(commands::timer::TimerAction),
    #[command(flatten)]
    Report(commands::report::ReportAction),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Generate shell completions
    Completions {
        shell: clap_complete::Shell,
    },
}

fn main() {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(EnvFilter::try_from_env("WORKTIMER_LOG").unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();
    let ctx = Context {
        directory: cli.directory,
        json: cli.json,
    };

    let result = match cli.command {
        Commands::Timer(action) => commands::timer::run(action, &ctx),
        Commands::Report(action) => commands::report::run(action, &ctx),
        Commands::Config { action } => commands::config::run(action, &ctx),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "worktimer", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}", describe(&*e));
        std::process::exit(1);
    }
}

/// User-facing message for a failed command.
fn describe(err: &(dyn Error + 'static)) -> String {
    let Some(err) = err.downcast_ref::<TimerError>() else {
        return err.to_string();
    };
    match err {
        TimerError::BadLogFile { path, reason } => format!(
            "There's something wrong with the log file {} ({reason}). Either delete it or try to fix it",
            path.display()
        ),
        TimerError::BadStatusFile { path, reason } => format!(
            "There's something wrong with the status file {} ({reason})",
            path.display()
        ),
        TimerError::TimerAlreadyRunning => "The timer is already running".into(),
        TimerError::TimerNotRunning => "The timer is not running".into(),
        TimerError::NoTaskSpecified => "You need to specify a task".into(),
        TimerError::BadTaskName(_) => "Task name contains invalid characters".into(),
        TimerError::OtherTimer { project, directory } => format!(
            "You're trying to operate on one timer when another is in operation. \
             The timer for {project} ({}) is paused. You can only use one timer at a time",
            directory.display()
        ),
        other => other.to_string(),
    }
}
