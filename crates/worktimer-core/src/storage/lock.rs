//! Advisory lock held across one read-decide-write sequence.

use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use crate::error::{Result, TimerError};

/// Exclusive lock on a file, released when dropped.
#[derive(Debug)]
pub struct TimerLock {
    file: File,
    path: PathBuf,
}

impl TimerLock {
    /// Take the lock without waiting.
    ///
    /// # Errors
    /// `TimerError::Locked` if another handle holds it, `TimerError::Io` if
    /// the lock file cannot be created.
    pub fn acquire(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .read(true)
            .write(true)
            .open(path)?;

        file.try_lock_exclusive().map_err(|e| {
            tracing::debug!(lock = %path.display(), error = %e, "lock busy");
            TimerError::Locked {
                path: path.to_path_buf(),
            }
        })?;
        tracing::debug!(lock = %path.display(), "lock acquired");

        Ok(Self {
            file,
            path: path.to_path_buf(),
        })
    }
}

impl Drop for TimerLock {
    fn drop(&mut self) {
        if let Err(e) = self.file.unlock() {
            tracing::warn!(lock = %self.path.display(), error = %e, "failed to release lock");
        }
    }
}
