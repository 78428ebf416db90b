//! Duration and date-key formatting helpers.

use chrono::{DateTime, Datelike, TimeZone, Utc};

/// Formats a second count as `"Xh Ym"`.
///
/// `3600 -> "1h 0m"`, `5400 -> "1h 30m"`, `1800 -> "0h 30m"`. Negative
/// inputs are clamped to zero.
#[must_use]
pub fn format_hm(seconds: i64) -> String {
    let seconds = seconds.max(0);
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    format!("{hours}h {minutes}m")
}

/// Formats a second count with second precision, dropping leading zero units.
///
/// `3661 -> "1h 1m 1s"`, `302 -> "5m 2s"`, `42 -> "42s"`.
#[must_use]
pub fn format_hms(seconds: i64) -> String {
    let seconds = seconds.max(0);
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    if hours > 0 {
        format!("{hours}h {minutes}m {secs}s")
    } else if minutes > 0 {
        format!("{minutes}m {secs}s")
    } else {
        format!("{secs}s")
    }
}

/// Calendar-date grouping key (`YYYY-MM-DD`) of an instant in `tz`.
pub fn date_key<Tz: TimeZone>(instant: DateTime<Utc>, tz: &Tz) -> String {
    let local = instant.with_timezone(tz);
    format!(
        "{:04}-{:02}-{:02}",
        local.year(),
        local.month(),
        local.day()
    )
}

/// `(year, month)` of an instant in `tz`, for monthly bucketing.
pub fn year_month<Tz: TimeZone>(instant: DateTime<Utc>, tz: &Tz) -> (i32, u32) {
    let local = instant.with_timezone(tz);
    (local.year(), local.month())
}
