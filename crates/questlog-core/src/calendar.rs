//! Instant and calendar-date handling at the library boundary.
//!
//! Calendar bucketing is deliberately naive: an instant belongs to the
//! calendar date it falls on in the machine's local timezone, and no other
//! timezone conversion happens anywhere in the crate.

use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};

use crate::error::ValidationError;

/// Wire format for calendar dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Parse an ISO 8601 instant.
///
/// Accepted forms, mirroring what a platform date parser does by default:
/// - RFC 3339 with an offset (`2024-01-01T08:00:00Z`, `...+09:00`)
/// - a date-time without offset, read as local time
/// - a bare `YYYY-MM-DD`, read as UTC midnight
pub fn parse_instant(field: &str, value: &str) -> Result<DateTime<Utc>, ValidationError> {
    let trimmed = value.trim();
    let invalid = || ValidationError::InvalidTimestamp {
        field: field.to_string(),
        value: value.to_string(),
    };

    if trimmed.is_empty() {
        return Err(invalid());
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            // Nonexistent local times (DST gaps) are not valid instants.
            return Local
                .from_local_datetime(&naive)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc))
                .ok_or_else(invalid);
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, DATE_FORMAT) {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(Utc.from_utc_datetime(&midnight));
        }
    }

    Err(invalid())
}

/// Parse a `YYYY-MM-DD` calendar date.
pub fn parse_calendar_date(value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|_| ValidationError::InvalidDate(value.to_string()))
}

/// Format a calendar date for the wire.
pub fn format_calendar_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Calendar date an instant falls on in the local timezone.
pub fn local_date(instant: DateTime<Utc>) -> NaiveDate {
    instant.with_timezone(&Local).date_naive()
}

/// Today's local calendar date.
pub fn today_local() -> NaiveDate {
    Local::now().date_naive()
}

/// The Sunday on or before `date`.
///
/// Dates in the first partial week of the supported calendar map to
/// `NaiveDate::MIN`.
pub fn week_start_sunday(date: NaiveDate) -> NaiveDate {
    date.checked_sub_signed(Duration::days(i64::from(date.weekday().num_days_from_sunday())))
        .unwrap_or(NaiveDate::MIN)
}
