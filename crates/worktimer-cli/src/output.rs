//! Text rendering for timer status and reports.

use colored::Colorize;
use worktimer_core::report::{DailyDetail, DailySummary, TaskTotal};
use worktimer_core::StatusRecord;

const DAY_FORMAT: &str = "%a %d %b %Y";
const TOTAL: &str = "Total";

/// `HH:MM:SS`, with hours growing past two digits as needed.
pub fn interval(seconds: i64) -> String {
    let seconds = seconds.max(0);
    format!(
        "{:02}:{:02}:{:02}",
        seconds / 3600,
        seconds % 3600 / 60,
        seconds % 60
    )
}

/// Shorten `name` to `width` characters, marking the cut with ` ...`.
pub fn truncate(name: &str, width: usize) -> String {
    if name.chars().count() <= width || width <= 4 {
        return name.to_string();
    }
    let kept: String = name.chars().take(width - 4).collect();
    format!("{kept} ...")
}

/// Truncate then right-pad to exactly `width` characters.
pub fn column(name: &str, width: usize) -> String {
    format!("{:<width$}", truncate(name, width))
}

pub fn status_line(record: &StatusRecord, elapsed: i64) -> String {
    format!(
        "{} - {} ({})",
        record.project,
        interval(elapsed),
        record.status
    )
}

pub fn summary_line(row: &DailySummary) -> String {
    format!(
        "{}:   {} ({})",
        row.date.format(DAY_FORMAT),
        interval(row.seconds).green(),
        row.hours()
    )
}

pub fn detail_lines(day: &DailyDetail, width: usize) -> Vec<String> {
    let mut lines = vec![day.date.format(DAY_FORMAT).to_string().yellow().to_string()];
    for task in &day.tasks {
        lines.push(format!(
            "    {}  {}",
            column(&task.task, width),
            interval(task.seconds)
        ));
    }
    lines.push(format!(
        "    {}  {}",
        column(TOTAL, width),
        interval(day.seconds()).green()
    ));
    lines
}

pub fn task_line(row: &TaskTotal, width: usize) -> String {
    format!(
        "{}\t{}",
        column(&row.task, width),
        interval(row.seconds).green()
    )
}
