use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde_json::Value;

use crate::error::{AppError, Result};

/// Largest magnitude (milliseconds) a feed timestamp may have: ±100,000,000 days.
const MAX_ABS_MILLIS: f64 = 8.64e15;

/// Zone-less layouts, read as UTC. `%.f` also matches when no fraction is present.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Layouts carrying a numeric offset. `%z` takes `+0900` as well as `+09:00`.
const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M:%S%.f %z",
    "%Y-%m-%d %H:%M:%S%.f %z",
    // Date.prototype.toString(), zone name stripped: "Sat Jan 02 2021 03:04:00 GMT+0000"
    "%a %b %d %Y %H:%M:%S GMT%z",
];

/// Convert a feed timestamp into whole epoch seconds, flooring any fraction.
///
/// Numbers (and purely numeric strings) are epoch milliseconds. Strings may
/// be RFC 3339, RFC 2822, a date-time with a `+0900` style offset,
/// `Date.toString()` output, a zone-less date-time or a bare `YYYY-MM-DD`.
pub fn normalize_timestamp(raw: &Value) -> Result<i64> {
    match raw {
        Value::Number(n) => {
            let millis = n
                .as_f64()
                .ok_or_else(|| AppError::Timestamp(format!("{n} is not representable")))?;
            millis_to_secs(millis)
        }
        Value::String(s) => parse_timestamp_str(s),
        other => Err(AppError::Timestamp(format!("unsupported value {other}"))),
    }
}

fn millis_to_secs(millis: f64) -> Result<i64> {
    if !millis.is_finite() || millis.abs() > MAX_ABS_MILLIS {
        return Err(AppError::Timestamp(format!("{millis} ms is out of range")));
    }
    Ok((millis / 1000.0).floor() as i64)
}

fn parse_timestamp_str(s: &str) -> Result<i64> {
    let s = s.trim();

    if let Ok(millis) = s.parse::<f64>() {
        return millis_to_secs(millis);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.timestamp());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Ok(dt.timestamp());
    }
    let without_zone_name = strip_zone_name(s);
    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(without_zone_name, fmt) {
            return Ok(dt.timestamp());
        }
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt.and_utc().timestamp());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        if let Some(dt) = date.and_hms_opt(0, 0, 0) {
            return Ok(dt.and_utc().timestamp());
        }
    }

    Err(AppError::Timestamp(format!("unrecognised date/time {s:?}")))
}

/// Drop a trailing "(Coordinated Universal Time)" style zone name.
fn strip_zone_name(s: &str) -> &str {
    match s.rfind(" (") {
        Some(idx) if s.ends_with(')') => s[..idx].trim_end(),
        _ => s,
    }
}

/// `DD:HH:MM` in UTC, every field zero-padded to two digits.
pub fn format_utc_clock(ts: i64) -> String {
    match Utc.timestamp_opt(ts, 0).single() {
        Some(dt) => dt.format("%d:%H:%M").to_string(),
        None => "--:--:--".to_string(),
    }
}
