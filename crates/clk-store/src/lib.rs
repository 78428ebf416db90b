//! Storage layer for the clk time tracker.
//!
//! Persists the full [`TrackerData`] document as a single pretty-printed JSON
//! file. Writes go through a temp file in the destination directory followed
//! by an atomic rename, so a crash mid-save never leaves a truncated or
//! half-written document behind.
//!
//! # File format
//!
//! ```json
//! {
//!   "version": 1,
//!   "currentSession": { "clockIn": "2026-01-18T09:00:00.000Z" },
//!   "entries": [
//!     {
//!       "id": "0b8f7c2e-3f4a-4d6b-9a1c-2e5f8d7a6b4c",
//!       "clockIn": "2026-01-18T09:00:00.000Z",
//!       "clockOut": "2026-01-18T17:00:00.000Z",
//!       "createdAt": "2026-01-18T17:00:00.000Z",
//!       "modifiedAt": null
//!     }
//!   ]
//! }
//! ```
//!
//! Timestamps are RFC 3339 with fractional seconds. A missing file is not an
//! error; it loads as the empty default document.

use std::io::Write as _;
use std::path::{Path, PathBuf};

use thiserror::Error;

use clk_core::TrackerData;

/// Persistence errors.
///
/// None of these are fatal to the application: callers record the failure and
/// keep their in-memory state, which the next successful save supersedes.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The state could not be serialized to JSON.
    #[error("failed to encode tracker data: {0}")]
    Encode(#[source] serde_json::Error),

    /// The file could not be written or renamed into place.
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file exists but could not be parsed.
    #[error("failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The file exists but could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Handle to the tracker's backing JSON file.
pub struct Store {
    path: PathBuf,
}

impl Store {
    /// Creates a store backed by the given file path. The file itself is only
    /// touched on [`Self::load`] and [`Self::save`].
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file, for display.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the persisted document.
    ///
    /// A missing file yields the empty default document. A file that exists
    /// but fails to parse yields [`StoreError::Decode`]; the caller decides
    /// whether to fall back to the default.
    pub fn load(&self) -> Result<TrackerData, StoreError> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "no data file, starting empty");
            return Ok(TrackerData::default());
        }

        let raw = std::fs::read_to_string(&self.path).map_err(|source| StoreError::Read {
            path: self.path.clone(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| StoreError::Decode {
            path: self.path.clone(),
            source,
        })
    }

    /// Persists the document atomically.
    ///
    /// Serializes first, then writes to a temp file beside the destination
    /// and renames it over the old file. The parent directory is created if
    /// it does not exist yet.
    pub fn save(&self, data: &TrackerData) -> Result<(), StoreError> {
        let json = serde_json::to_vec_pretty(data).map_err(StoreError::Encode)?;

        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(dir).map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })?;

        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })?;
        tmp.write_all(&json).map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })?;
        tmp.persist(&self.path).map_err(|error| StoreError::Write {
            path: self.path.clone(),
            source: error.error,
        })?;

        tracing::debug!(
            path = %self.path.display(),
            entries = data.entries.len(),
            tracking = data.is_tracking(),
            "saved tracker data"
        );
        Ok(())
    }
}
