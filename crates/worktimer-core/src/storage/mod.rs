mod config;
mod lock;
mod status;

pub use config::{Config, ReportConfig};
pub use lock::TimerLock;
pub use status::{StatusRecord, StatusStore};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns `~/.config/worktimer[-dev]/` based on WORKTIMER_ENV.
///
/// Set WORKTIMER_ENV=dev to use a separate development config directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("WORKTIMER_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("worktimer-dev")
    } else {
        base_dir.join("worktimer")
    };

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::NoConfigDir(e.to_string()))?;
    Ok(dir)
}

/// Where the shared status file lives unless configured otherwise: the
/// user's home directory.
pub fn default_status_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
}
