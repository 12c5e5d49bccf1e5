pub mod config;
pub mod report;
pub mod timer;

use std::path::PathBuf;
use worktimer_core::{Config, LogStore, TimerEngine};

/// Options shared by every command.
pub struct Context {
    /// Project directory; the working directory unless `-y` was given.
    pub directory: Option<PathBuf>,
    pub json: bool,
}

impl Context {
    pub fn directory(&self) -> std::io::Result<PathBuf> {
        match &self.directory {
            Some(dir) => Ok(dir.clone()),
            None => std::env::current_dir(),
        }
    }

    pub fn engine(&self, config: &Config) -> Result<TimerEngine, Box<dyn std::error::Error>> {
        let directory = self.directory()?;
        tracing::debug!(dir = %directory.display(), "opening project");
        Ok(TimerEngine::from_config(&directory, config)?)
    }

    /// The project log alone, for read-only commands.
    pub fn log(&self, config: &Config) -> std::io::Result<LogStore> {
        let directory = self.directory()?.canonicalize()?;
        Ok(LogStore::discover(&directory, &config.log_file))
    }

    pub fn print_json<T: serde::Serialize>(&self, value: &T) -> Result<(), Box<dyn std::error::Error>> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }
}
