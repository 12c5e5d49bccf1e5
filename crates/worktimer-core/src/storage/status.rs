//! The per-user status slot shared by every project.
//!
//! A single line:
//! `status,project,directory,anchor_ms,work_done_secs,start_ms,end_ms|null`.
//! The literal `null` line (or no file at all) means no timer has run.

use chrono::{DateTime, Local, TimeZone};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, TimerError};
use crate::timer::TimerState;

const NULL: &str = "null";
const FIELD_COUNT: usize = 7;

/// Current session as last written by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusRecord {
    pub status: TimerState,
    pub project: String,
    pub directory: PathBuf,
    pub anchor: DateTime<Local>,
    /// Seconds worked under `anchor` before the current segment.
    pub work_done: i64,
    pub start: DateTime<Local>,
    pub end: Option<DateTime<Local>>,
}

impl StatusRecord {
    /// Total seconds for this anchor, counting an open segment up to `now`.
    pub fn elapsed_secs(&self, now: DateTime<Local>) -> i64 {
        let until = self.end.unwrap_or(now);
        self.work_done + (until - self.start).num_seconds().max(0)
    }

    fn to_line(&self) -> String {
        let end = self
            .end
            .map(|e| e.timestamp_millis().to_string())
            .unwrap_or_else(|| NULL.to_string());
        format!(
            "{},{},{},{},{},{},{}",
            self.status,
            self.project,
            self.directory.display(),
            self.anchor.timestamp_millis(),
            self.work_done,
            self.start.timestamp_millis(),
            end
        )
    }

    fn parse(line: &str) -> std::result::Result<Option<Self>, String> {
        let line = line.trim();
        if line.is_empty() || line.eq_ignore_ascii_case(NULL) {
            return Ok(None);
        }

        let parts: Vec<&str> = line.split(',').map(str::trim).collect();
        if parts.len() != FIELD_COUNT {
            return Err(format!("expected {FIELD_COUNT} fields, found {}", parts.len()));
        }

        let end = if parts[6].eq_ignore_ascii_case(NULL) {
            None
        } else {
            Some(parse_millis(parts[6], "end")?)
        };

        Ok(Some(Self {
            status: parts[0].parse()?,
            project: parts[1].to_string(),
            directory: PathBuf::from(parts[2]),
            anchor: parse_millis(parts[3], "anchor")?,
            work_done: parts[4]
                .parse()
                .map_err(|e| format!("bad work done {:?}: {e}", parts[4]))?,
            start: parse_millis(parts[5], "start")?,
            end,
        }))
    }
}

fn parse_millis(field: &str, name: &str) -> std::result::Result<DateTime<Local>, String> {
    let ms: i64 = field
        .parse()
        .map_err(|e| format!("bad {name} {field:?}: {e}"))?;
    Local
        .timestamp_millis_opt(ms)
        .single()
        .ok_or_else(|| format!("{name} out of range: {ms}"))
}

/// Handle on the shared status file.
///
/// One instance is handed to each [`crate::TimerEngine`]; every project
/// writes to the same file, which is what makes the paused slot exclusive.
#[derive(Debug, Clone)]
pub struct StatusStore {
    path: PathBuf,
}

impl StatusStore {
    /// Status file `file_name` inside `dir`.
    pub fn new(dir: &Path, file_name: &str) -> Self {
        Self {
            path: dir.join(file_name),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current record, or `None` when no timer has ever run.
    pub fn read(&self) -> Result<Option<StatusRecord>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(TimerError::bad_status(&self.path, e.to_string())),
        };
        let line = content.lines().next().unwrap_or_default();
        StatusRecord::parse(line).map_err(|reason| TimerError::bad_status(&self.path, reason))
    }

    /// Overwrite the slot with `record`.
    pub fn write(&self, record: &StatusRecord) -> Result<()> {
        self.write_line(&record.to_line())?;
        tracing::debug!(status = %self.path.display(), state = %record.status, "status written");
        Ok(())
    }

    /// Mark the slot empty.
    pub fn clear(&self) -> Result<()> {
        self.write_line(NULL)
    }

    fn write_line(&self, line: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| TimerError::bad_status(&self.path, e.to_string()))?;
        }
        fs::write(&self.path, format!("{line}\n"))
            .map_err(|e| TimerError::bad_status(&self.path, e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn at(ms: i64) -> DateTime<Local> {
        Local.timestamp_millis_opt(ms).unwrap()
    }

    fn record(end: Option<i64>) -> StatusRecord {
        StatusRecord {
            status: TimerState::Paused,
            project: "site".into(),
            directory: PathBuf::from("/home/me/site"),
            anchor: at(1_000_000),
            work_done: 42,
            start: at(1_060_123),
            end: end.map(at),
        }
    }

    #[test]
    fn missing_file_is_fresh() {
        let dir = TempDir::new().unwrap();
        let store = StatusStore::new(dir.path(), ".timer-status");
        assert_eq!(store.read().unwrap(), None);
    }

    #[test]
    fn write_then_read() {
        let dir = TempDir::new().unwrap();
        let store = StatusStore::new(dir.path(), ".timer-status");
        for rec in [record(Some(1_120_456)), record(None)] {
            store.write(&rec).unwrap();
            assert_eq!(store.read().unwrap(), Some(rec));
        }
    }

    #[test]
    fn line_layout() {
        assert_eq!(
            record(None).to_line(),
            "PAUSED,site,/home/me/site,1000000,42,1060123,null"
        );
    }

    #[test]
    fn clear_writes_sentinel() {
        let dir = TempDir::new().unwrap();
        let store = StatusStore::new(dir.path(), ".timer-status");
        store.write(&record(None)).unwrap();
        store.clear().unwrap();
        assert_eq!(fs::read_to_string(store.path()).unwrap(), "null\n");
        assert_eq!(store.read().unwrap(), None);
    }

    #[test]
    fn malformed_records_are_rejected() {
        let dir = TempDir::new().unwrap();
        let store = StatusStore::new(dir.path(), ".timer-status");
        for bad in [
            "RUNNING,site,/x,1,2,3",
            "WALKING,site,/x,1,2,3,null",
            "RUNNING,site,/x,abc,2,3,null",
            "RUNNING,site,/x,1,2.5,3,null",
            "RUNNING,site,/x,1,2,3,soon",
        ] {
            fs::write(store.path(), bad).unwrap();
            assert!(
                matches!(store.read(), Err(TimerError::BadStatusFile { .. })),
                "accepted {bad:?}"
            );
        }
    }

    #[test]
    fn elapsed_counts_open_segment_to_now() {
        let rec = record(None);
        assert_eq!(rec.elapsed_secs(at(1_060_123 + 10_000)), 52);
        let closed = record(Some(1_060_123 + 30_000));
        assert_eq!(closed.elapsed_secs(at(9_999_999_999)), 72);
    }
}
