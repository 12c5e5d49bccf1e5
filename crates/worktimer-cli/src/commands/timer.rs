use chrono::Local;
use clap::Subcommand;
use serde::Serialize;
use worktimer_core::{Config, StatusRecord};

use super::Context;
use crate::output;

#[derive(Subcommand)]
pub enum TimerAction {
    /// Start timing a task in this project
    Go {
        /// Task name; several words are joined with spaces
        #[arg(required = true, num_args = 1..)]
        task: Vec<String>,
    },
    /// Stop the timer
    Stop,
    /// Pause the timer, keeping the session open to continue later
    Pause,
    /// Continue the paused or stopped session
    Continue {
        /// New task name; defaults to the previous one
        task: Vec<String>,
    },
    /// Print the timer state: FRESH, RUNNING, PAUSED or STOPPED
    Check,
    /// Show the current project and time worked in this session
    Status,
    /// Clear the shared status, e.g. one left paused by a deleted project
    Reset,
}

#[derive(Serialize)]
struct StatusView<'a> {
    #[serde(flatten)]
    record: &'a StatusRecord,
    elapsed_secs: i64,
}

pub fn run(action: TimerAction, ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let engine = ctx.engine(&config)?;

    match action {
        TimerAction::Go { task } => {
            let record = engine.start(&task.join(" "))?;
            report(ctx, &record, "Started")?;
        }
        TimerAction::Stop => {
            let record = engine.stop()?;
            report(ctx, &record, "Stopped")?;
        }
        TimerAction::Pause => {
            let record = engine.pause()?;
            report(ctx, &record, "Paused")?;
        }
        TimerAction::Continue { task } => {
            let task = task.join(" ");
            let record = engine.resume(Some(task.as_str()))?;
            report(ctx, &record, "Continued")?;
        }
        TimerAction::Check => {
            let state = engine.check()?;
            if ctx.json {
                ctx.print_json(&state)?;
            } else {
                println!("{state}");
            }
        }
        TimerAction::Reset => {
            engine.reset()?;
            if !ctx.json {
                println!("Timer status cleared");
            }
        }
        TimerAction::Status => {
            let record = engine.status()?;
            let now = Local::now();
            match (&record, ctx.json) {
                (Some(record), true) => ctx.print_json(&StatusView {
                    record,
                    elapsed_secs: record.elapsed_secs(now),
                })?,
                (None, true) => ctx.print_json(&record)?,
                (Some(record), false) => {
                    println!("{}", output::status_line(record, record.elapsed_secs(now)));
                }
                (None, false) => {}
            }
        }
    }
    Ok(())
}

fn report(ctx: &Context, record: &StatusRecord, verb: &str) -> Result<(), Box<dyn std::error::Error>> {
    if ctx.json {
        return ctx.print_json(record);
    }
    println!(
        "{verb} {} ({})",
        record.project,
        output::interval(record.elapsed_secs(Local::now()))
    );
    Ok(())
}
