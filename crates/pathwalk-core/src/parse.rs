//! Parsers for option values: date-times, integers and sizes.

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};

use crate::entry::Timestamp;
use crate::error::WalkError;

/// Accepted date-time layouts, tried in order.
const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M:%S";

/// Size suffixes, longest first so `KB` wins over `B`.
const SIZE_UNITS: &[(&str, i64)] = &[
    ("TB", 1 << 40),
    ("GB", 1 << 30),
    ("MB", 1 << 20),
    ("KB", 1 << 10),
    ("T", 1 << 40),
    ("G", 1 << 30),
    ("M", 1 << 20),
    ("K", 1 << 10),
    ("B", 1),
];

/// Parse a local date-time into seconds since the Unix epoch.
///
/// Accepts `%Y-%m-%d %H:%M:%S`, `%Y-%m-%d` (midnight) or `%H:%M:%S` (today),
/// in that order. When a local time is ambiguous the earlier instant wins.
pub fn parse_datetime(value: &str) -> Result<Timestamp, WalkError> {
    let invalid = || WalkError::InvalidDateTime {
        value: value.to_string(),
    };

    let naive = parse_naive(value.trim(), Local::now().date_naive()).ok_or_else(invalid)?;
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.timestamp())
        .ok_or_else(invalid)
}

fn parse_naive(value: &str, today: NaiveDate) -> Option<NaiveDateTime> {
    if let Ok(date_time) = NaiveDateTime::parse_from_str(value, DATE_TIME_FORMAT) {
        return Some(date_time);
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, DATE_FORMAT) {
        return date.and_hms_opt(0, 0, 0);
    }
    NaiveTime::parse_from_str(value, TIME_FORMAT)
        .ok()
        .map(|time| today.and_time(time))
}

/// Parse an integer the way `strtoll` does with base 0.
///
/// An optional sign is followed by a `0x` prefix for hexadecimal, a leading
/// `0` for octal, or plain decimal digits. Unlike `strtoll`, trailing garbage
/// is an error rather than silently ignored.
pub fn parse_integer(value: &str) -> Result<i64, WalkError> {
    let trimmed = value.trim_start();
    let (negative, unsigned) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let (radix, digits) = if let Some(hex) = unsigned
        .strip_prefix("0x")
        .or_else(|| unsigned.strip_prefix("0X"))
    {
        (16, hex)
    } else if unsigned.len() > 1 && unsigned.starts_with('0') {
        (8, &unsigned[1..])
    } else {
        (10, unsigned)
    };

    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return Err(WalkError::invalid_number(value, "not an integer"));
    }

    let magnitude = u64::from_str_radix(digits, radix)
        .map_err(|_| WalkError::invalid_number(value, "out of range"))?;
    let signed = if negative {
        -i128::from(magnitude)
    } else {
        i128::from(magnitude)
    };
    i64::try_from(signed).map_err(|_| WalkError::invalid_number(value, "out of range"))
}

/// Parse a byte count: an integer in any base with an optional binary unit.
///
/// `"4096"`, `"0x1000"`, `"4K"` and `"4kb"` all yield 4096.
pub fn parse_size(value: &str) -> Result<i64, WalkError> {
    if let Ok(bytes) = parse_integer(value) {
        return Ok(bytes);
    }

    let trimmed = value.trim();
    let upper = trimmed.to_ascii_uppercase();
    for &(suffix, multiplier) in SIZE_UNITS {
        if let Some(number) = upper.strip_suffix(suffix) {
            let count = parse_integer(&trimmed[..number.len()])?;
            return count
                .checked_mul(multiplier)
                .ok_or_else(|| WalkError::invalid_number(value, "out of range"));
        }
    }

    Err(WalkError::invalid_number(value, "not a size"))
}
