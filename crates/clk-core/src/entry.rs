//! Completed clock-in/clock-out intervals.

use std::fmt;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Validation errors for time entries.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EntryError {
    /// Clock-out must be strictly after clock-in.
    #[error("clock out ({clock_out}) must be after clock in ({clock_in})")]
    InvalidInterval {
        clock_in: DateTime<Utc>,
        clock_out: DateTime<Utc>,
    },
}

/// Unique identifier of a [`TimeEntry`].
///
/// Generated once at entry creation and never changed afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(Uuid);

impl EntryId {
    /// Generates a fresh random identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for EntryId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// A completed clock-in/clock-out interval.
///
/// The interval invariant (`clock_out > clock_in`, strictly) is enforced at
/// construction and on every update, so a stored entry can never represent a
/// zero-length or negative interval. `id` and `created_at` are set once and
/// never change; `modified_at` records the most recent edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeEntry {
    id: EntryId,
    clock_in: DateTime<Utc>,
    clock_out: DateTime<Utc>,
    created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    modified_at: Option<DateTime<Utc>>,
}

impl TimeEntry {
    /// Creates a new entry after validating the interval.
    ///
    /// Fails with [`EntryError::InvalidInterval`] when `clock_out <= clock_in`.
    pub fn new(clock_in: DateTime<Utc>, clock_out: DateTime<Utc>) -> Result<Self, EntryError> {
        Self::new_at(clock_in, clock_out, Utc::now())
    }

    /// Like [`Self::new`] but with an explicit creation instant.
    pub fn new_at(
        clock_in: DateTime<Utc>,
        clock_out: DateTime<Utc>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, EntryError> {
        if clock_out <= clock_in {
            return Err(EntryError::InvalidInterval {
                clock_in,
                clock_out,
            });
        }
        Ok(Self {
            id: EntryId::generate(),
            clock_in,
            clock_out,
            created_at,
            modified_at: None,
        })
    }

    /// Replaces the interval after validation, stamping `modified_at`.
    ///
    /// The identifier and `created_at` are untouched. On failure the entry is
    /// left exactly as it was.
    pub fn update(
        &mut self,
        clock_in: DateTime<Utc>,
        clock_out: DateTime<Utc>,
    ) -> Result<(), EntryError> {
        self.update_at(clock_in, clock_out, Utc::now())
    }

    /// Like [`Self::update`] but with an explicit modification instant.
    pub fn update_at(
        &mut self,
        clock_in: DateTime<Utc>,
        clock_out: DateTime<Utc>,
        modified_at: DateTime<Utc>,
    ) -> Result<(), EntryError> {
        if clock_out <= clock_in {
            return Err(EntryError::InvalidInterval {
                clock_in,
                clock_out,
            });
        }
        self.clock_in = clock_in;
        self.clock_out = clock_out;
        self.modified_at = Some(modified_at);
        Ok(())
    }

    #[must_use]
    pub const fn id(&self) -> EntryId {
        self.id
    }

    #[must_use]
    pub const fn clock_in(&self) -> DateTime<Utc> {
        self.clock_in
    }

    #[must_use]
    pub const fn clock_out(&self) -> DateTime<Utc> {
        self.clock_out
    }

    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub const fn modified_at(&self) -> Option<DateTime<Utc>> {
        self.modified_at
    }

    /// Interval length in whole seconds, truncated toward zero.
    ///
    /// Never negative: the interval invariant guarantees a positive span.
    #[must_use]
    pub fn duration_seconds(&self) -> i64 {
        (self.clock_out - self.clock_in).num_seconds()
    }

    /// Calendar-date grouping key (`YYYY-MM-DD`) of `clock_in` in `tz`.
    pub fn date_key_in<Tz: TimeZone>(&self, tz: &Tz) -> String {
        crate::format::date_key(self.clock_in, tz)
    }
}
