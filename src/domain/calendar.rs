//! `YYYYMMDD` → day number conversion.
//!
//! Day numbers are Julian Day Numbers on the proleptic Gregorian calendar.
//! Only differences between two day numbers are meaningful to callers.

use crate::domain::error::BarstatError;

/// Convert an 8-digit `YYYYMMDD` string into a Julian Day Number.
///
/// Rejects strings that are not exactly eight ASCII digits, and month/day
/// fields outside 1-12 / 1-31. Day-of-month is not checked against the
/// month length; full calendar validation belongs to the loader.
pub fn day_number(date: &str) -> Result<i64, BarstatError> {
    let malformed = |reason: &str| BarstatError::MalformedInput {
        input: date.to_string(),
        reason: reason.to_string(),
    };

    if date.len() != 8 {
        return Err(malformed("expected date in YYYYMMDD format"));
    }
    if !date.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed("date must contain only decimal digits"));
    }

    let field = |range: std::ops::Range<usize>| -> i64 {
        date.as_bytes()[range]
            .iter()
            .fold(0, |acc, b| acc * 10 + i64::from(b - b'0'))
    };
    let year = field(0..4);
    let month = field(4..6);
    let day = field(6..8);

    if !(1..=12).contains(&month) {
        return Err(malformed("month must be in 1..=12"));
    }
    if !(1..=31).contains(&day) {
        return Err(malformed("day must be in 1..=31"));
    }

    Ok(julian_day_number(year, month, day))
}

/// Gregorian JDN; integer divisions stay non-negative for year >= 0.
fn julian_day_number(year: i64, month: i64, day: i64) -> i64 {
    let a = (14 - month) / 12;
    let y = year + 4800 - a;
    let m = month + 12 * a - 3;

    day + (153 * m + 2) / 5 + 365 * y + y / 4 - y / 100 + y / 400 - 32045
}
