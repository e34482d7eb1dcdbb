//! Unix timestamp ↔ proleptic Gregorian calendar conversion.
//!
//! All arithmetic is exact integer Julian Day Number math, so the full
//! catalog date range — including BCE years, which appear as negative
//! timestamps — round-trips without drift. No time zone or leap-second
//! handling: catalog timestamps are TD-scale seconds and the calendar
//! output is the matching civil date.

use crate::constants::{SECONDS_PER_DAY, UNIX_EPOCH_JDN};
use crate::errors::DateError;
use std::fmt;

/// A broken-out civil date and time-of-day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarTime {
    /// Proleptic Gregorian year; may be zero or negative (BCE).
    pub year: i64,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl fmt::Display for CalendarTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }
}

/// Proleptic Gregorian Julian Day Number. Valid for any year, including BCE.
pub fn julian_day_number(year: i64, month: u8, day: u8) -> i64 {
    let a = (14 - month as i64) / 12;
    let y = year + 4800 - a;
    let m = month as i64 + 12 * a - 3;
    day as i64 + (153 * m + 2) / 5 + 365 * y + y.div_euclid(4) - y.div_euclid(100)
        + y.div_euclid(400)
        - 32045
}

/// Midnight Unix timestamp for a proleptic Gregorian date.
pub fn calendar_to_unix(year: i64, month: u8, day: u8) -> i64 {
    (julian_day_number(year, month, day) - UNIX_EPOCH_JDN) * SECONDS_PER_DAY
}

/// Breaks a Unix timestamp into a civil date and time-of-day.
pub fn unix_to_calendar(timestamp: i64) -> CalendarTime {
    let days = timestamp.div_euclid(SECONDS_PER_DAY);
    let rem = timestamp.rem_euclid(SECONDS_PER_DAY);

    let hour = (rem / 3600) as u8;
    let minute = ((rem % 3600) / 60) as u8;
    let second = (rem % 60) as u8;

    // Richards' JDN-to-Gregorian algorithm, integer throughout.
    let jd = days + UNIX_EPOCH_JDN;
    let a = jd + 32044;
    let b = (4 * a + 3).div_euclid(146097);
    let c = a - (b * 146097).div_euclid(4);
    let d = (4 * c + 3).div_euclid(1461);
    let e = c - (1461 * d).div_euclid(4);
    let m = (5 * e + 2).div_euclid(153);

    let day = e - (153 * m + 2).div_euclid(5) + 1;
    let month = m + 3 - 12 * (m / 10);
    let year = b * 100 + d - 4800 + m / 10;

    CalendarTime {
        year,
        month: month as u8,
        day: day as u8,
        hour,
        minute,
        second,
    }
}

/// Parses `YYYY-MM-DD` into a midnight Unix timestamp.
///
/// A leading minus sign on the year is accepted for BCE dates.
pub fn parse_date(input: &str) -> Result<i64, DateError> {
    let (year_str, rest) = match input.strip_prefix('-') {
        Some(rest) => {
            let (y, r) = rest.split_once('-').ok_or_else(|| DateError::format(input))?;
            (format!("-{y}"), r)
        }
        None => {
            let (y, r) = input
                .split_once('-')
                .ok_or_else(|| DateError::format(input))?;
            (y.to_string(), r)
        }
    };
    let (month_str, day_str) = rest.split_once('-').ok_or_else(|| DateError::format(input))?;

    let year: i64 = year_str.parse().map_err(|_| DateError::format(input))?;
    let month: u8 = month_str.parse().map_err(|_| DateError::format(input))?;
    let day: u8 = day_str.parse().map_err(|_| DateError::format(input))?;

    if !(1..=12).contains(&month) {
        return Err(DateError::out_of_range(input, "month out of range"));
    }
    if !(1..=31).contains(&day) {
        return Err(DateError::out_of_range(input, "day out of range"));
    }

    Ok(calendar_to_unix(year, month, day))
}
