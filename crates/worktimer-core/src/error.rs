//! Core error types for worktimer-core.
//!
//! Every error is terminal for the current invocation: the CLI maps each
//! variant to a message once and exits non-zero. Nothing here is retried.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for worktimer-core.
#[derive(Error, Debug)]
pub enum TimerError {
    /// The project log is corrupt, unreadable, or holds no history to act on.
    #[error("Bad log file {path}: {reason}")]
    BadLogFile { path: PathBuf, reason: String },

    /// The shared status file is corrupt or unreadable.
    #[error("Bad status file {path}: {reason}")]
    BadStatusFile { path: PathBuf, reason: String },

    /// A segment is already open for this project.
    #[error("The timer is already running")]
    TimerAlreadyRunning,

    /// Pause was requested with no open segment.
    #[error("The timer is not running")]
    TimerNotRunning,

    /// Start was requested with a blank task.
    #[error("No task specified")]
    NoTaskSpecified,

    /// Task name contains characters the log format cannot hold.
    #[error("Task name contains invalid characters: {0:?}")]
    BadTaskName(String),

    /// Another project holds the paused status slot.
    #[error("Timer for '{project}' ({}) is paused", directory.display())]
    OtherTimer { project: String, directory: PathBuf },

    /// Another invocation currently holds the timer lock.
    #[error("Timer state is locked by another process ({})", path.display())]
    Locked { path: PathBuf },

    /// IO errors outside log/status parsing
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl TimerError {
    pub(crate) fn bad_log(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        TimerError::BadLogFile {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn bad_status(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        TimerError::BadStatusFile {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Could not determine or create the config directory
    #[error("Cannot resolve configuration directory: {0}")]
    NoConfigDir(String),

    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Key not present in the configuration
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Result type alias for TimerError
pub type Result<T, E = TimerError> = std::result::Result<T, E>;
