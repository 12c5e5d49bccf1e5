//! Daily and per-task totals over a project's log.
//!
//! Every view keeps only closed segments, one per `(anchor, start)` pair,
//! whose anchor falls inside the requested [`DateRange`]. Segments are
//! grouped by the local calendar day of their anchor, so a session that
//! runs past midnight is booked to the day it began.
//!
//! A log that does not exist yields empty reports.

mod range;

pub use range::DateRange;

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::error::Result;
use crate::journal::{closed_segments, LogStore, Segment};

/// Label used for segments logged without a usable task name.
pub const NO_TASK: &str = "<No Task>";

/// Seconds worked on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailySummary {
    pub date: NaiveDate,
    pub seconds: i64,
}

impl DailySummary {
    /// Hours with two decimals, truncated rather than rounded: 930 seconds
    /// is `"0.25"`.
    pub fn hours(&self) -> String {
        let hundredths = self.seconds.max(0) * 100 / 3600;
        format!("{}.{:02}", hundredths / 100, hundredths % 100)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskTime {
    pub task: String,
    pub seconds: i64,
}

/// Per-task breakdown of one day, tasks in lexical order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyDetail {
    pub date: NaiveDate,
    pub tasks: Vec<TaskTime>,
}

impl DailyDetail {
    pub fn seconds(&self) -> i64 {
        self.tasks.iter().map(|t| t.seconds).sum()
    }
}

/// Total for one task across the whole range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskTotal {
    pub task: String,
    pub seconds: i64,
}

/// Display name for a logged task. Empty, blank, and `null` names collapse
/// to [`NO_TASK`].
pub fn normalize_task(task: &str) -> String {
    let task = task.trim();
    if task.is_empty() || task.eq_ignore_ascii_case("null") {
        NO_TASK.to_string()
    } else {
        task.to_string()
    }
}

pub fn summary(log: &LogStore, range: &DateRange) -> Result<Vec<DailySummary>> {
    Ok(summary_of(read(log)?, range))
}

pub fn detail(log: &LogStore, range: &DateRange) -> Result<Vec<DailyDetail>> {
    Ok(detail_of(read(log)?, range))
}

pub fn tasks(log: &LogStore, range: &DateRange) -> Result<Vec<TaskTotal>> {
    Ok(tasks_of(read(log)?, range))
}

/// Daily totals, ascending by date.
pub fn summary_of<I>(segments: I, range: &DateRange) -> Vec<DailySummary>
where
    I: IntoIterator<Item = Segment>,
{
    let mut days: BTreeMap<NaiveDate, i64> = BTreeMap::new();
    for (segment, seconds) in worked(segments, range) {
        *days.entry(segment.anchor.date_naive()).or_default() += seconds;
    }
    days.into_iter()
        .map(|(date, seconds)| DailySummary { date, seconds })
        .collect()
}

/// Per-day, per-task totals.
pub fn detail_of<I>(segments: I, range: &DateRange) -> Vec<DailyDetail>
where
    I: IntoIterator<Item = Segment>,
{
    let mut days: BTreeMap<NaiveDate, BTreeMap<String, i64>> = BTreeMap::new();
    for (segment, seconds) in worked(segments, range) {
        *days
            .entry(segment.anchor.date_naive())
            .or_default()
            .entry(normalize_task(&segment.task))
            .or_default() += seconds;
    }
    days.into_iter()
        .map(|(date, tasks)| DailyDetail {
            date,
            tasks: tasks
                .into_iter()
                .map(|(task, seconds)| TaskTime { task, seconds })
                .collect(),
        })
        .collect()
}

/// Per-task totals across the range, sorted by task name.
pub fn tasks_of<I>(segments: I, range: &DateRange) -> Vec<TaskTotal>
where
    I: IntoIterator<Item = Segment>,
{
    let mut totals: BTreeMap<String, i64> = BTreeMap::new();
    for (segment, seconds) in worked(segments, range) {
        *totals.entry(normalize_task(&segment.task)).or_default() += seconds;
    }
    totals
        .into_iter()
        .map(|(task, seconds)| TaskTotal { task, seconds })
        .collect()
}

fn read(log: &LogStore) -> Result<Vec<Segment>> {
    log.all()?.collect()
}

/// Closed, deduplicated segments inside `range` paired with their duration.
fn worked<I>(segments: I, range: &DateRange) -> impl Iterator<Item = (Segment, i64)>
where
    I: IntoIterator<Item = Segment>,
{
    let range = *range;
    closed_segments(segments)
        .into_iter()
        .filter(move |s| range.contains(&s.anchor))
        .filter_map(|s| {
            let seconds = s.duration_secs()?.max(0);
            Some((s, seconds))
        })
}
