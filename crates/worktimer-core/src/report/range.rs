use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone};
use serde::Serialize;

/// Inclusive filter on segment anchors. Either bound may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: Option<DateTime<Local>>,
    pub end: Option<DateTime<Local>>,
}

impl DateRange {
    /// Everything in the log.
    pub fn all() -> Self {
        Self::default()
    }

    /// Whole local days: from the first instant of `first` to the last
    /// millisecond of `last`, or open-ended when `last` is `None`.
    pub fn days(first: NaiveDate, last: Option<NaiveDate>) -> Self {
        Self {
            start: first.and_hms_milli_opt(0, 0, 0, 0).map(local),
            end: last
                .and_then(|day| day.and_hms_milli_opt(23, 59, 59, 999))
                .map(local),
        }
    }

    /// `true` when the start bound lies after the end bound.
    pub fn is_reversed(&self) -> bool {
        matches!((self.start, self.end), (Some(start), Some(end)) if start > end)
    }

    pub fn contains(&self, at: &DateTime<Local>) -> bool {
        self.start.map_or(true, |start| *at >= start) && self.end.map_or(true, |end| *at <= end)
    }
}

/// Resolve a wall-clock time, taking the earlier instant when ambiguous and
/// reading it as UTC when it falls in a DST gap.
fn local(naive: NaiveDateTime) -> DateTime<Local> {
    Local
        .from_local_datetime(&naive)
        .earliest()
        .unwrap_or_else(|| Local.from_utc_datetime(&naive))
}
