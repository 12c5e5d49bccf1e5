//! Timer engine implementation.
//!
//! The engine is a state machine persisted in two files: the project's
//! append-only segment log and the per-user status slot. Each command performs
//! one read-decide-write sequence under an exclusive lock and returns.
//!
//! ## State Transitions
//!
//! ```text
//! Fresh -> Running -> (Paused | Stopped)
//! Paused -> Running (resume) | Stopped (stop)
//! Stopped -> Running (start, new anchor)
//! Paused | Stopped -> Fresh (reset)
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let engine = TimerEngine::new(&project_dir, ".timer", status_store)?;
//! engine.start("write report")?;
//! engine.pause()?;
//! engine.resume(None)?;
//! engine.stop()?;
//! ```

use chrono::{DateTime, Local, SubsecRound};
use std::path::{Path, PathBuf};

use super::replay::recompute_work_done;
use super::state::TimerState;
use crate::error::{Result, TimerError};
use crate::journal::{LogStore, Segment};
use crate::storage::{Config, StatusRecord, StatusStore, TimerLock};

/// Core timer engine bound to one project directory.
#[derive(Debug, Clone)]
pub struct TimerEngine {
    log: LogStore,
    status: StatusStore,
    lock_path: PathBuf,
}

impl TimerEngine {
    /// Bind an engine to the project owning `dir`.
    ///
    /// The log is discovered by walking up from `dir`; `status` is the shared
    /// slot every project writes to.
    ///
    /// # Errors
    /// `TimerError::Io` if `dir` cannot be resolved to an absolute path, or if
    /// the owning directory contains a comma (the status line cannot hold it).
    pub fn new(dir: &Path, log_file: &str, status: StatusStore) -> Result<Self> {
        let dir = dir.canonicalize().map_err(|e| {
            std::io::Error::new(e.kind(), format!("{}: {e}", dir.display()))
        })?;
        let log = LogStore::discover(&dir, log_file);
        if log.directory().to_string_lossy().contains(',') {
            return Err(TimerError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!(
                    "project directory may not contain ',': {}",
                    log.directory().display()
                ),
            )));
        }

        let lock_path = lock_path_for(status.path());
        tracing::debug!(
            project = %log.project(),
            log = %log.path().display(),
            status = %status.path().display(),
            "timer engine ready"
        );
        Ok(Self {
            log,
            status,
            lock_path,
        })
    }

    /// Engine using the file names and status location from `config`.
    pub fn from_config(dir: &Path, config: &Config) -> Result<Self> {
        Self::new(dir, &config.log_file, config.status_store())
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn log(&self) -> &LogStore {
        &self.log
    }

    /// Absolute path of the project directory that owns the log.
    pub fn directory(&self) -> &Path {
        self.log.directory()
    }

    pub fn project(&self) -> String {
        self.log.project()
    }

    /// Full log history in write order.
    pub fn history(&self) -> Result<Vec<Segment>> {
        self.log.all()?.collect()
    }

    /// Current state of the shared timer. Never mutates anything.
    pub fn check(&self) -> Result<TimerState> {
        Ok(self
            .status
            .read()?
            .map(|record| record.status)
            .unwrap_or(TimerState::Fresh))
    }

    /// The shared status record, `None` while fresh.
    pub fn status(&self) -> Result<Option<StatusRecord>> {
        self.status.read()
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&self, task: &str) -> Result<StatusRecord> {
        self.start_at(task, Local::now())
    }

    /// Open a new segment under a new anchor.
    pub fn start_at(&self, task: &str, now: DateTime<Local>) -> Result<StatusRecord> {
        let task = validate_task(task)?;
        let now = now.trunc_subsecs(3);
        let _lock = self.lock()?;

        if let Some(latest) = self.log.latest()? {
            if latest.is_open() {
                return Err(TimerError::TimerAlreadyRunning);
            }
        }
        self.guard_exclusive()?;

        let segment = Segment::begin(task, now);
        self.log.append(&segment)?;
        let record = self.record(TimerState::Running, &segment, 0);
        self.status.write(&record)?;

        tracing::info!(project = %record.project, task = %segment.task, "timer started");
        Ok(record)
    }

    pub fn resume(&self, task: Option<&str>) -> Result<StatusRecord> {
        self.resume_at(task, Local::now())
    }

    /// Continue the last anchor with a new open segment.
    ///
    /// The task defaults to the previous segment's task. Work done so far is
    /// replayed from the log rather than trusted from the status file.
    pub fn resume_at(&self, task: Option<&str>, now: DateTime<Local>) -> Result<StatusRecord> {
        let task = match task.filter(|t| !t.trim().is_empty()) {
            Some(task) => Some(validate_task(task)?),
            None => None,
        };
        let now = now.trunc_subsecs(3);
        let _lock = self.lock()?;

        let history = self.history()?;
        let latest = history
            .last()
            .ok_or_else(|| TimerError::bad_log(self.log.path(), "no timer to resume"))?;
        if latest.is_open() {
            return Err(TimerError::TimerAlreadyRunning);
        }
        self.guard_exclusive()?;

        let work_done = recompute_work_done(latest.anchor, &history);
        let task = task.map_or_else(|| latest.task.clone(), str::to_string);
        let segment = Segment::resume(latest.anchor, task, now.max(latest.start));
        self.log.append(&segment)?;
        let record = self.record(TimerState::Running, &segment, work_done);
        self.status.write(&record)?;

        tracing::info!(
            project = %record.project,
            task = %segment.task,
            work_done,
            "timer resumed"
        );
        Ok(record)
    }

    pub fn pause(&self) -> Result<StatusRecord> {
        self.pause_at(Local::now())
    }

    /// Close the open segment, keeping the anchor available to resume.
    pub fn pause_at(&self, now: DateTime<Local>) -> Result<StatusRecord> {
        let now = now.trunc_subsecs(3);
        let _lock = self.lock()?;

        let history = self.history()?;
        let latest = match history.last() {
            Some(latest) if latest.is_open() => latest,
            _ => return Err(TimerError::TimerNotRunning),
        };
        self.guard_exclusive()?;

        let closed = latest.closed_at(now.max(latest.start));
        self.log.append(&closed)?;
        let record = self.record(TimerState::Paused, &closed, prior_work(&closed, &history));
        self.status.write(&record)?;

        tracing::info!(project = %record.project, task = %closed.task, "timer paused");
        Ok(record)
    }

    pub fn stop(&self) -> Result<StatusRecord> {
        self.stop_at(Local::now())
    }

    /// Close the session. Stopping a closed segment rewrites the same
    /// status without touching the log.
    pub fn stop_at(&self, now: DateTime<Local>) -> Result<StatusRecord> {
        let now = now.trunc_subsecs(3);
        let _lock = self.lock()?;

        let history = self.history()?;
        let latest = history
            .last()
            .ok_or_else(|| TimerError::bad_log(self.log.path(), "no timer to stop"))?;
        self.guard_exclusive()?;

        let closed = if latest.is_open() {
            let closed = latest.closed_at(now.max(latest.start));
            self.log.append(&closed)?;
            closed
        } else {
            tracing::debug!(project = %self.project(), "already stopped, reusing last end");
            latest.clone()
        };
        let record = self.record(TimerState::Stopped, &closed, prior_work(&closed, &history));
        self.status.write(&record)?;

        tracing::info!(project = %record.project, task = %closed.task, "timer stopped");
        Ok(record)
    }

    /// Empty the shared status slot so the next `check` reads FRESH.
    ///
    /// Refused while this project's timer is running, and while another
    /// project whose log still exists holds the paused slot. A slot left by
    /// a deleted project is always released.
    pub fn reset(&self) -> Result<()> {
        let _lock = self.lock()?;

        if matches!(self.log.latest()?, Some(ref latest) if latest.is_open()) {
            return Err(TimerError::TimerAlreadyRunning);
        }
        let Some(current) = self.status.read()? else {
            return Ok(());
        };
        let owner_alive = self
            .log
            .path()
            .file_name()
            .is_some_and(|name| current.directory.join(name).is_file());
        if owner_alive {
            self.guard_exclusive()?;
        }

        self.status.clear()?;
        tracing::info!(
            project = %current.project,
            state = %current.status,
            owner_alive,
            "status slot cleared"
        );
        Ok(())
    }

    // ── Internals ────────────────────────────────────────────────────

    fn lock(&self) -> Result<TimerLock> {
        TimerLock::acquire(&self.lock_path)
    }

    /// Refuse to act while another project holds the paused slot.
    ///
    /// Only a paused record for a different directory blocks; running or
    /// stopped records elsewhere are simply overwritten.
    fn guard_exclusive(&self) -> Result<()> {
        if let Some(current) = self.status.read()? {
            if current.status == TimerState::Paused && current.directory != self.directory() {
                tracing::warn!(
                    paused = %current.directory.display(),
                    here = %self.directory().display(),
                    "another project holds the paused timer"
                );
                return Err(TimerError::OtherTimer {
                    project: current.project,
                    directory: current.directory,
                });
            }
        }
        Ok(())
    }

    fn record(&self, status: TimerState, segment: &Segment, work_done: i64) -> StatusRecord {
        StatusRecord {
            status,
            project: self.project(),
            directory: self.directory().to_path_buf(),
            anchor: segment.anchor,
            work_done,
            start: segment.start,
            end: segment.end,
        }
    }
}

/// Work under the segment's anchor excluding the segment itself.
fn prior_work(segment: &Segment, history: &[Segment]) -> i64 {
    recompute_work_done(
        segment.anchor,
        history.iter().filter(|s| s.start != segment.start),
    )
}

fn validate_task(task: &str) -> Result<&str> {
    let task = task.trim();
    if task.is_empty() {
        return Err(TimerError::NoTaskSpecified);
    }
    if task.contains([',', '\n', '\r']) {
        return Err(TimerError::BadTaskName(task.to_string()));
    }
    Ok(task)
}

fn lock_path_for(status_path: &Path) -> PathBuf {
    let mut name = status_path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".lock");
    status_path.with_file_name(name)
}
