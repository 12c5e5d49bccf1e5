use chrono::Local;
use clap::Subcommand;
use serde::Serialize;
use worktimer_core::report::{self, DailySummary};
use worktimer_core::Config;

use super::Context;
use crate::output;
use crate::range::parse_range;

#[derive(Subcommand)]
pub enum ReportAction {
    /// Time worked per day
    Summary {
        /// `<start> [<end>]` as yyyy-MM-dd, or `<month> [<year>]`
        #[arg(num_args = 0..=2, value_name = "DATE")]
        range: Vec<String>,
    },
    /// Time worked per day, broken down by task
    Detail {
        /// `<start> [<end>]` as yyyy-MM-dd, or `<month> [<year>]`
        #[arg(num_args = 0..=2, value_name = "DATE")]
        range: Vec<String>,
    },
    /// Time worked per task
    Task {
        /// `<start> [<end>]` as yyyy-MM-dd, or `<month> [<year>]`
        #[arg(num_args = 0..=2, value_name = "DATE")]
        range: Vec<String>,
    },
}

#[derive(Serialize)]
struct SummaryRow<'a> {
    #[serde(flatten)]
    row: &'a DailySummary,
    hours: String,
}

pub fn run(action: ReportAction, ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    if !config.report.color {
        colored::control::set_override(false);
    }
    let log = ctx.log(&config)?;
    let width = config.report.task_width;
    let today = Local::now().date_naive();

    match action {
        ReportAction::Summary { range } => {
            let rows = report::summary(&log, &parse_range(&range, today)?)?;
            if ctx.json {
                let rows: Vec<_> = rows
                    .iter()
                    .map(|row| SummaryRow { row, hours: row.hours() })
                    .collect();
                return ctx.print_json(&rows);
            }
            for row in &rows {
                println!("{}", output::summary_line(row));
            }
        }
        ReportAction::Detail { range } => {
            let days = report::detail(&log, &parse_range(&range, today)?)?;
            if ctx.json {
                return ctx.print_json(&days);
            }
            for day in &days {
                for line in output::detail_lines(day, width) {
                    println!("{line}");
                }
            }
        }
        ReportAction::Task { range } => {
            let totals = report::tasks(&log, &parse_range(&range, today)?)?;
            if ctx.json {
                return ctx.print_json(&totals);
            }
            for row in &totals {
                println!("{}", output::task_line(row, width));
            }
        }
    }
    Ok(())
}
