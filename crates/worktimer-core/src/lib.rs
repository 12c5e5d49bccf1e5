//! # Worktimer Core Library
//!
//! Core logic for worktimer, a per-project work-time tracker. Every operation
//! is a short-lived read-decide-write over two plain text files, so the CLI
//! binary is a thin layer over this library.
//!
//! ## Architecture
//!
//! - **Journal**: append-only segment log, one per project, discovered by
//!   walking up from the working directory
//! - **Storage**: the shared status slot, its advisory lock, and TOML
//!   configuration
//! - **Timer Engine**: start/pause/resume/stop state machine with cross-project
//!   exclusivity for paused timers
//! - **Report**: daily and per-task totals over a log
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: Core timer state machine
//! - [`LogStore`]: Project segment log
//! - [`StatusStore`]: Shared current-state record
//! - [`Config`]: Application configuration management

pub mod error;
pub mod journal;
pub mod report;
pub mod storage;
pub mod timer;

pub use error::{ConfigError, Result, TimerError};
pub use journal::{LogStore, Segment};
pub use report::{DailyDetail, DailySummary, DateRange, TaskTime, TaskTotal};
pub use storage::{Config, StatusRecord, StatusStore};
pub use timer::{TimerEngine, TimerState};
