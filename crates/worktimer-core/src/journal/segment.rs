//! Segment type and its line codec.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Timestamp layout used in log lines, e.g. `2024-03-05 09:15:00.000 +0100`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f %z";

const NULL: &str = "null";
const FIELD_SEPARATOR: char = ',';

/// One start/end/task record in the log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    /// Groups every segment of one continuous, possibly paused, session.
    pub anchor: DateTime<Local>,
    pub start: DateTime<Local>,
    /// `None` while the segment is open.
    pub end: Option<DateTime<Local>>,
    pub task: String,
}

impl Segment {
    /// A fresh open segment that starts a new anchor.
    pub fn begin(task: impl Into<String>, now: DateTime<Local>) -> Self {
        Self {
            anchor: now,
            start: now,
            end: None,
            task: task.into(),
        }
    }

    /// A new open segment continuing an existing anchor.
    pub fn resume(anchor: DateTime<Local>, task: impl Into<String>, now: DateTime<Local>) -> Self {
        Self {
            anchor,
            start: now,
            end: None,
            task: task.into(),
        }
    }

    /// Copy of this segment with `end` populated.
    pub fn closed_at(&self, end: DateTime<Local>) -> Self {
        Self {
            end: Some(end),
            ..self.clone()
        }
    }

    pub fn is_open(&self) -> bool {
        self.end.is_none()
    }

    /// Whole seconds between start and end; `None` while open.
    pub fn duration_secs(&self) -> Option<i64> {
        self.end.map(|end| (end - self.start).num_seconds())
    }

    /// Serialise as a log line without the trailing newline.
    pub fn to_line(&self) -> String {
        let end = self
            .end
            .map(|e| e.format(TIMESTAMP_FORMAT).to_string())
            .unwrap_or_else(|| NULL.to_string());
        format!(
            "{}{sep}{}{sep}{}{sep}{}",
            self.anchor.format(TIMESTAMP_FORMAT),
            self.start.format(TIMESTAMP_FORMAT),
            end,
            self.task,
            sep = FIELD_SEPARATOR
        )
    }

    /// Parse one log line.
    ///
    /// Blank lines yield `Ok(None)`. Four fields are `anchor,start,end,task`;
    /// the older three-field `start,end,task` form is read with the anchor
    /// equal to the start. Anything else is an error carrying the reason.
    pub fn parse_line(line: &str) -> Result<Option<Self>, String> {
        if line.trim().is_empty() {
            return Ok(None);
        }

        let parts: Vec<&str> = line.split(FIELD_SEPARATOR).map(str::trim).collect();
        let (anchor, start, end, task) = match parts.as_slice() {
            [anchor, start, end, task] => {
                let start = parse_required(start, "start")?;
                (parse_required(anchor, "anchor")?, start, parse_optional(end)?, *task)
            }
            [start, end, task] => {
                let start = parse_required(start, "start")?;
                (start, start, parse_optional(end)?, *task)
            }
            other => return Err(format!("expected 4 fields, found {}", other.len())),
        };

        Ok(Some(Self {
            anchor,
            start,
            end,
            task: task.to_string(),
        }))
    }
}

/// Closed segments after resolving superseded lines.
///
/// For each `(anchor, start)` pair only the last line written counts; pairs
/// whose last line is still open are dropped. Output is ordered by anchor,
/// then start.
pub fn closed_segments<I>(segments: I) -> Vec<Segment>
where
    I: IntoIterator<Item = Segment>,
{
    let mut latest: BTreeMap<(DateTime<Local>, DateTime<Local>), Segment> = BTreeMap::new();
    for segment in segments {
        let key = (segment.anchor, segment.start);
        if let Some(previous) = latest.insert(key, segment) {
            if !previous.is_open() {
                tracing::warn!(
                    anchor = %key.0,
                    start = %key.1,
                    "closed segment superseded by a later line"
                );
            }
        }
    }
    latest.into_values().filter(|s| !s.is_open()).collect()
}

fn parse_optional(field: &str) -> Result<Option<DateTime<Local>>, String> {
    if field.is_empty() || field.eq_ignore_ascii_case(NULL) {
        return Ok(None);
    }
    DateTime::parse_from_str(field, TIMESTAMP_FORMAT)
        .map(|dt| Some(dt.with_timezone(&Local)))
        .map_err(|e| format!("bad timestamp {field:?}: {e}"))
}

fn parse_required(field: &str, name: &str) -> Result<DateTime<Local>, String> {
    parse_optional(field)?.ok_or_else(|| format!("missing {name} timestamp"))
}
