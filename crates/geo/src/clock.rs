//! Human-readable timestamps.

use chrono::{DateTime, TimeZone};

const MINUTE_MS: i64 = 60 * 1000;
const HOUR_MS: i64 = 60 * MINUTE_MS;
const DAY_MS: i64 = 24 * HOUR_MS;

/// Relative age of `t` as seen at `now`.
///
/// Buckets are floor divisions of the elapsed milliseconds. Timestamps in
/// the future read as "Just now".
pub fn format_relative_time<A, B>(t: &DateTime<A>, now: &DateTime<B>) -> String
where
    A: TimeZone,
    B: TimeZone,
{
    let elapsed_ms = now.timestamp_millis() - t.timestamp_millis();

    if elapsed_ms < MINUTE_MS {
        "Just now".to_string()
    } else if elapsed_ms < HOUR_MS {
        format!("{}m ago", elapsed_ms / MINUTE_MS)
    } else if elapsed_ms < DAY_MS {
        format!("{}h ago", elapsed_ms / HOUR_MS)
    } else {
        format!("{}d ago", elapsed_ms / DAY_MS)
    }
}

/// Long form date, e.g. "Monday, January 15, 2024 at 03:04 PM".
pub fn format_full_date<Tz>(t: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    t.format("%A, %B %-d, %Y at %I:%M %p").to_string()
}
