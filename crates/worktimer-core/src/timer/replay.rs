use chrono::{DateTime, Local};

use crate::journal::{closed_segments, Segment};

/// Seconds already worked under `anchor`, replayed from history.
///
/// Sums `end - start` over the closed segments carrying `anchor`, counting
/// each `(anchor, start)` pair once (the last line written wins). Independent
/// of the status file, so a stale or missing status never skews totals.
pub fn recompute_work_done<'a, I>(anchor: DateTime<Local>, segments: I) -> i64
where
    I: IntoIterator<Item = &'a Segment>,
{
    closed_segments(
        segments
            .into_iter()
            .filter(|s| s.anchor == anchor)
            .cloned(),
    )
    .iter()
    .filter_map(Segment::duration_secs)
    .map(|secs| secs.max(0))
    .sum()
}
