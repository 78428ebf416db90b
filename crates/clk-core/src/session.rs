//! The in-progress tracking session.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// An open, unterminated clock-in.
///
/// At most one exists at a time, held by [`crate::TrackerData`]. It carries
/// only its start instant; the clock-out instant appears when the session is
/// converted into a [`crate::TimeEntry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentSession {
    pub clock_in: DateTime<Utc>,
}

impl CurrentSession {
    #[must_use]
    pub const fn new(clock_in: DateTime<Utc>) -> Self {
        Self { clock_in }
    }

    /// Seconds elapsed since clock-in, clamped to zero if the wall clock
    /// reads earlier than the session start.
    #[must_use]
    pub fn elapsed_seconds(&self, now: DateTime<Utc>) -> i64 {
        (now - self.clock_in).num_seconds().max(0)
    }

    /// Calendar-date grouping key (`YYYY-MM-DD`) of the clock-in in `tz`.
    pub fn date_key_in<Tz: TimeZone>(&self, tz: &Tz) -> String {
        crate::format::date_key(self.clock_in, tz)
    }
}
