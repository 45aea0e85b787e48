//! Date parsing utilities
//!
//! Parses the `--since`/`--until` bounds of a query time range. Supports ISO
//! 8601 dates and datetimes plus relative expressions anchored at the current
//! local time.

use chrono::{DateTime, Local, NaiveDate, TimeDelta, TimeZone, Utc};
use std::time::SystemTime;
use thiserror::Error;

/// Errors produced while parsing a date expression
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DateParseError {
    #[error("Invalid date format: '{input}'. Expected ISO 8601 (YYYY-MM-DD or RFC 3339), past relative (e.g. 'yesterday', '1 week ago'), or future relative (e.g. 'in 2 days', '3 hours from now')")]
    Unrecognized { input: String },
    #[error("Invalid number in relative date: '{value}'")]
    InvalidCount { value: String },
    #[error("Unknown time unit: '{unit}'")]
    UnknownUnit { unit: String },
    #[error("Date out of range: '{input}'")]
    OutOfRange { input: String },
}

/// Direction of a relative expression from now
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Past,
    Future,
}

/// Parse a date expression into a SystemTime
///
/// Supports:
/// - ISO 8601: "2024-01-15", "2024-01-15T10:30:00Z"
/// - Keywords: "now", "today", "yesterday", "tomorrow"
/// - Past: "1 week ago", "3days ago"
/// - Future: "in 2 days", "3 hours from now"
pub fn parse_date(input: &str) -> Result<SystemTime, DateParseError> {
    let trimmed = input.trim();

    if let Some(time) = parse_iso_date(trimmed) {
        return Ok(time);
    }

    match parse_relative_date(trimmed)? {
        Some(time) => Ok(time),
        None => Err(DateParseError::Unrecognized {
            input: input.to_string(),
        }),
    }
}

fn parse_iso_date(input: &str) -> Option<SystemTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.with_timezone(&Utc).into());
    }

    if let Ok(dt) = input.parse::<DateTime<Utc>>() {
        return Some(dt.into());
    }

    let date = NaiveDate::parse_from_str(input, "%Y-%m-%d").ok()?;
    let midnight = date.and_hms_opt(0, 0, 0)?;
    Utc.from_local_datetime(&midnight)
        .single()
        .map(SystemTime::from)
}

/// Returns `Ok(None)` when the input is not shaped like a relative date at all
fn parse_relative_date(input: &str) -> Result<Option<SystemTime>, DateParseError> {
    let lower = input.to_lowercase();
    let now = Local::now();

    match lower.as_str() {
        "now" | "today" => return Ok(Some(SystemTime::now())),
        "yesterday" => return shift(now, TimeDelta::days(1), Direction::Past, input).map(Some),
        "tomorrow" => return shift(now, TimeDelta::days(1), Direction::Future, input).map(Some),
        _ => {}
    }

    let parts: Vec<&str> = lower.split_whitespace().collect();
    let (count, unit, direction) = match parts.as_slice() {
        // "3 days ago"
        [count, unit, "ago"] => (*count, *unit, Direction::Past),
        // "3days ago"
        [combined, "ago"] => {
            let split = combined
                .find(|c: char| c.is_alphabetic())
                .unwrap_or(combined.len());
            (&combined[..split], &combined[split..], Direction::Past)
        }
        // "in 3 days"
        ["in", count, unit] => (*count, *unit, Direction::Future),
        // "3 days from now"
        [count, unit, "from", "now"] => (*count, *unit, Direction::Future),
        _ => return Ok(None),
    };

    let count: i64 = count.parse().map_err(|_| DateParseError::InvalidCount {
        value: count.to_string(),
    })?;
    let offset = parse_time_unit(unit, count)?.ok_or_else(|| out_of_range(input))?;

    shift(now, offset, direction, input).map(Some)
}

fn shift(
    now: DateTime<Local>,
    offset: TimeDelta,
    direction: Direction,
    input: &str,
) -> Result<SystemTime, DateParseError> {
    let shifted = match direction {
        Direction::Past => now.checked_sub_signed(offset),
        Direction::Future => now.checked_add_signed(offset),
    };
    shifted
        .map(|time| time.with_timezone(&Utc).into())
        .ok_or_else(|| out_of_range(input))
}

fn out_of_range(input: &str) -> DateParseError {
    DateParseError::OutOfRange {
        input: input.to_string(),
    }
}

/// Returns `Ok(None)` when the offset does not fit in a `TimeDelta`
fn parse_time_unit(unit: &str, count: i64) -> Result<Option<TimeDelta>, DateParseError> {
    let delta = match unit {
        "second" | "seconds" | "sec" | "secs" | "s" => TimeDelta::try_seconds(count),
        "minute" | "minutes" | "min" | "mins" | "m" => TimeDelta::try_minutes(count),
        "hour" | "hours" | "hr" | "hrs" | "h" => TimeDelta::try_hours(count),
        "day" | "days" | "d" => TimeDelta::try_days(count),
        "week" | "weeks" | "w" => TimeDelta::try_weeks(count),
        // Approximate
        "month" | "months" => count.checked_mul(30).and_then(TimeDelta::try_days),
        "year" | "years" | "y" => count.checked_mul(365).and_then(TimeDelta::try_days),
        _ => {
            return Err(DateParseError::UnknownUnit {
                unit: unit.to_string(),
            })
        }
    };
    Ok(delta)
}
