pub mod config;
pub mod heatmap;
pub mod level;
pub mod reward;
pub mod roll;
pub mod shadows;
pub mod streak;

use chrono::NaiveDate;
use questlog_core::calendar::{parse_calendar_date, today_local};

/// `--today` if given, otherwise the local calendar date.
pub(crate) fn resolve_today(today: Option<&str>) -> Result<NaiveDate, Box<dyn std::error::Error>> {
    match today {
        Some(raw) => Ok(parse_calendar_date(raw)?),
        None => Ok(today_local()),
    }
}

pub(crate) fn print_json<T: serde::Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
