//! Shared utility functions: durations, enter dates, home directory

use crate::error::{Error, Result};
use chrono::{Days, NaiveDate};
use std::path::PathBuf;
use std::time::Duration;

/// Wire format of the `enterDate` field
pub const ENTER_DATE_FORMAT: &str = "%Y%m%d";

/// Parse a human duration such as `500ms`, `1s`, `2m`, `1h` or `1m30s`.
///
/// A bare integer is read as seconds.
pub fn parse_duration(input: &str) -> Result<Duration> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(Error::invalid_duration(input));
    }

    if let Ok(secs) = trimmed.parse::<u64>() {
        return Ok(Duration::from_secs(secs));
    }

    let mut total = Duration::ZERO;
    let mut rest = trimmed;
    while !rest.is_empty() {
        let digits = rest.len() - rest.trim_start_matches(|c: char| c.is_ascii_digit()).len();
        if digits == 0 {
            return Err(Error::invalid_duration(input));
        }
        let (number, tail) = rest.split_at(digits);
        let value: u64 = number.parse().map_err(|_| Error::invalid_duration(input))?;

        let unit_len = tail
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(tail.len());
        let (unit, remainder) = tail.split_at(unit_len);
        let component = match unit {
            "ms" => Duration::from_millis(value),
            "s" => Duration::from_secs(value),
            "m" => Duration::from_secs(value.saturating_mul(60)),
            "h" => Duration::from_secs(value.saturating_mul(3600)),
            _ => return Err(Error::invalid_duration(input)),
        };
        total = total.saturating_add(component);
        rest = remainder;
    }

    Ok(total)
}

/// Format a duration in the same notation [`parse_duration`] accepts
pub fn format_duration(duration: Duration) -> String {
    let millis = duration.as_millis();
    if millis == 0 {
        return "0s".to_string();
    }
    if millis % 1000 != 0 {
        return format!("{}ms", millis);
    }

    let mut secs = duration.as_secs();
    let mut out = String::new();
    for (unit, size) in [("h", 3600), ("m", 60)] {
        if secs >= size {
            out.push_str(&format!("{}{}", secs / size, unit));
            secs %= size;
        }
    }
    if secs > 0 {
        out.push_str(&format!("{}s", secs));
    }
    out
}

/// The enter date `offset_days` after `today`, formatted as `YYYYMMDD`
pub fn enter_date_from_offset(today: NaiveDate, offset_days: u32) -> Result<String> {
    let date = today
        .checked_add_days(Days::new(u64::from(offset_days)))
        .ok_or_else(|| {
            Error::invalid_config(format!("date offset {} is out of range", offset_days))
        })?;
    Ok(date.format(ENTER_DATE_FORMAT).to_string())
}

/// Validate an explicit `YYYYMMDD` enter date and return it normalised
pub fn parse_enter_date(value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.len() != 8 {
        return Err(Error::invalid_date(value));
    }
    let date = NaiveDate::parse_from_str(trimmed, ENTER_DATE_FORMAT)
        .map_err(|_| Error::invalid_date(value))?;
    Ok(date.format(ENTER_DATE_FORMAT).to_string())
}

/// Get the user's home directory
///
/// Prefers the HOME environment variable over dirs::home_dir() so container
/// setups that remap HOME are respected.
pub fn get_home_dir() -> Result<PathBuf> {
    if let Ok(home) = std::env::var("HOME") {
        return Ok(PathBuf::from(home));
    }

    dirs::home_dir().ok_or_else(|| Error::invalid_config("Could not determine home directory"))
}
