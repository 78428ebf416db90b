//! The persisted tracker state.

use serde::{Deserialize, Serialize};

use crate::entry::{EntryId, TimeEntry};
use crate::session::CurrentSession;

/// Current on-disk schema version.
pub const SCHEMA_VERSION: u32 = 1;

/// Everything the tracker persists: at most one open session plus the log of
/// completed entries.
///
/// Entry order in `entries` carries no meaning; consumers re-sort by clock-in
/// for display and aggregation. Entry identifiers are unique across the log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackerData {
    /// Schema version marker for forward compatibility. Currently only its
    /// presence matters.
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_session: Option<CurrentSession>,
    #[serde(default)]
    pub entries: Vec<TimeEntry>,
}

const fn default_version() -> u32 {
    SCHEMA_VERSION
}

impl Default for TrackerData {
    fn default() -> Self {
        Self {
            version: SCHEMA_VERSION,
            current_session: None,
            entries: Vec::new(),
        }
    }
}

impl TrackerData {
    /// True while an open session exists.
    #[must_use]
    pub const fn is_tracking(&self) -> bool {
        self.current_session.is_some()
    }

    /// Position of the entry with the given id, if present.
    #[must_use]
    pub fn entry_index(&self, id: EntryId) -> Option<usize> {
        self.entries.iter().position(|entry| entry.id() == id)
    }
}
