//! Report date arguments.
//!
//! Accepted forms:
//! - nothing: the whole log
//! - `<yyyy-MM-dd>`: that day onward
//! - `<yyyy-MM-dd> <yyyy-MM-dd>`: both days inclusive
//! - `<month> [<year>]`: the whole month, current year by default

use chrono::{Datelike, Month, NaiveDate};
use worktimer_core::DateRange;

const DATE_FORMAT: &str = "%Y-%m-%d";
const BAD_FORMAT: &str = "Start/End dates must be in yyyy-MM-dd format or as <month> <year>";
const REVERSED: &str = "Start/End dates are wrong way round";

pub fn parse_range(args: &[String], today: NaiveDate) -> Result<DateRange, String> {
    let Some(first) = args.first() else {
        return Ok(DateRange::all());
    };

    if let Ok(month) = first.parse::<Month>() {
        let year = match args.get(1) {
            Some(year) => year.parse::<i32>().map_err(|_| BAD_FORMAT.to_string())?,
            None => today.year(),
        };
        let (first_day, last_day) = month_bounds(year, month).ok_or(BAD_FORMAT)?;
        return Ok(DateRange::days(first_day, Some(last_day)));
    }

    let start = parse_date(first)?;
    let end = args.get(1).map(|arg| parse_date(arg)).transpose()?;
    let range = DateRange::days(start, end);
    if range.is_reversed() {
        return Err(REVERSED.to_string());
    }
    Ok(range)
}

fn parse_date(arg: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(arg, DATE_FORMAT).map_err(|_| BAD_FORMAT.to_string())
}

fn month_bounds(year: i32, month: Month) -> Option<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::from_ymd_opt(year, month.number_from_month(), 1)?;
    let next = match month {
        Month::December => NaiveDate::from_ymd_opt(year + 1, 1, 1)?,
        _ => NaiveDate::from_ymd_opt(year, month.succ().number_from_month(), 1)?,
    };
    Some((first, next.pred_opt()?))
}
