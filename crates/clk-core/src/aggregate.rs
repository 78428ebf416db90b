//! Read-only aggregation over the entry log.
//!
//! Every function here is a pure function of `(entries, current_session,
//! now, tz)`. Nothing is cached; totals are recomputed on each call, so there
//! is no invalidation to manage. All functions are generic over the timezone
//! used for calendar bucketing: tests pass `Utc`, the CLI passes `Local`.

use std::collections::HashMap;

use chrono::{DateTime, TimeZone, Utc};

use crate::entry::TimeEntry;
use crate::format::{date_key, year_month};
use crate::state::TrackerData;

/// Summed tracked time for one calendar month. Derived, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthlyStatistic {
    pub year: i32,
    pub month: u32,
    pub total_seconds: i64,
}

impl MonthlyStatistic {
    /// Builds a statistic, clamping the total to zero or more.
    #[must_use]
    pub const fn new(year: i32, month: u32, total_seconds: i64) -> Self {
        Self {
            year,
            month,
            total_seconds: if total_seconds < 0 { 0 } else { total_seconds },
        }
    }

    /// Stable `YYYY-MM` key, usable for sorting and display.
    #[must_use]
    pub fn key(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }

    /// Total as fractional hours, for chart-style output.
    #[must_use]
    #[allow(clippy::cast_precision_loss, reason = "display only")]
    pub fn total_hours(&self) -> f64 {
        self.total_seconds as f64 / 3600.0
    }
}

/// Seconds tracked on `now`'s calendar date.
///
/// Sums completed entries whose clock-in falls on that date, plus the open
/// session's elapsed time when the session also started on that date. A
/// session opened before midnight contributes nothing to today: attribution
/// follows the clock-in date and is never split across midnight.
pub fn today_duration<Tz: TimeZone>(data: &TrackerData, now: DateTime<Utc>, tz: &Tz) -> i64 {
    let today = date_key(now, tz);
    let completed: i64 = data
        .entries
        .iter()
        .filter(|entry| entry.date_key_in(tz) == today)
        .map(TimeEntry::duration_seconds)
        .sum();

    let open = data
        .current_session
        .filter(|session| session.date_key_in(tz) == today)
        .map_or(0, |session| session.elapsed_seconds(now));

    completed + open
}

/// Seconds tracked in `now`'s calendar month, open session included when it
/// started in that month.
pub fn this_month_duration<Tz: TimeZone>(data: &TrackerData, now: DateTime<Utc>, tz: &Tz) -> i64 {
    let current = year_month(now, tz);
    let completed: i64 = data
        .entries
        .iter()
        .filter(|entry| year_month(entry.clock_in(), tz) == current)
        .map(TimeEntry::duration_seconds)
        .sum();

    let open = data
        .current_session
        .filter(|session| year_month(session.clock_in, tz) == current)
        .map_or(0, |session| session.elapsed_seconds(now));

    completed + open
}

/// Seconds tracked in the month before `now`'s. The open session is never
/// counted here; it belongs to the current month by definition.
pub fn last_month_duration<Tz: TimeZone>(data: &TrackerData, now: DateTime<Utc>, tz: &Tz) -> i64 {
    let previous = prev_month(year_month(now, tz));
    data.entries
        .iter()
        .filter(|entry| year_month(entry.clock_in(), tz) == previous)
        .map(TimeEntry::duration_seconds)
        .sum()
}

/// Monthly totals for the `month_count` consecutive months ending at `now`'s,
/// oldest first.
///
/// Works in two phases: all entries are bucketed by `(year, month)` first,
/// then exactly `month_count` months are emitted from that map. Months with
/// no activity appear with an explicit zero total rather than being absent.
pub fn monthly_statistics<Tz: TimeZone>(
    data: &TrackerData,
    month_count: usize,
    now: DateTime<Utc>,
    tz: &Tz,
) -> Vec<MonthlyStatistic> {
    let mut totals: HashMap<(i32, u32), i64> = HashMap::new();
    for entry in &data.entries {
        *totals.entry(year_month(entry.clock_in(), tz)).or_insert(0) +=
            entry.duration_seconds();
    }

    let mut months = Vec::with_capacity(month_count);
    let mut cursor = year_month(now, tz);
    for _ in 0..month_count {
        months.push(cursor);
        cursor = prev_month(cursor);
    }
    months.reverse();

    months
        .into_iter()
        .map(|(year, month)| {
            MonthlyStatistic::new(year, month, totals.get(&(year, month)).copied().unwrap_or(0))
        })
        .collect()
}

/// Entries grouped by calendar date for history display.
///
/// Groups are ordered date-descending and entries within a group are ordered
/// clock-in-descending, so the most recent work always comes first.
pub fn entries_by_date<'a, Tz: TimeZone>(
    entries: &'a [TimeEntry],
    tz: &Tz,
) -> Vec<(String, Vec<&'a TimeEntry>)> {
    let mut groups: HashMap<String, Vec<&TimeEntry>> = HashMap::new();
    for entry in entries {
        groups.entry(entry.date_key_in(tz)).or_default().push(entry);
    }

    let mut grouped: Vec<_> = groups.into_iter().collect();
    grouped.sort_by(|a, b| b.0.cmp(&a.0));
    for (_, group) in &mut grouped {
        group.sort_by_key(|entry| std::cmp::Reverse(entry.clock_in()));
    }
    grouped
}

const fn prev_month((year, month): (i32, u32)) -> (i32, u32) {
    if month == 1 { (year - 1, 12) } else { (year, month - 1) }
}
