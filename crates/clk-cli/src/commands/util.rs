//! Shared helpers for command implementations.

use std::fmt;

use anyhow::{Context, Result, bail};
use chrono::{DateTime, LocalResult, NaiveDateTime, TimeZone, Utc};

use clk_core::{EntryId, TrackerData};

/// Parses a user-supplied instant.
///
/// Accepts RFC 3339 (`2026-01-18T09:00:00Z`) or a local-time
/// `YYYY-MM-DD HH:MM`.
pub fn parse_instant(input: &str) -> Result<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(input) {
        return Ok(parsed.with_timezone(&Utc));
    }

    let naive = NaiveDateTime::parse_from_str(input, "%Y-%m-%d %H:%M").with_context(|| {
        format!("could not parse '{input}' as RFC 3339 or 'YYYY-MM-DD HH:MM'")
    })?;
    match chrono::Local.from_local_datetime(&naive) {
        LocalResult::Single(instant) | LocalResult::Ambiguous(instant, _) => {
            Ok(instant.with_timezone(&Utc))
        }
        LocalResult::None => bail!("'{input}' does not exist in the local timezone"),
    }
}

/// Resolves a user-supplied entry id, accepting a full UUID or a unique
/// prefix of one.
pub fn resolve_entry_id(data: &TrackerData, input: &str) -> Result<EntryId> {
    if let Ok(id) = input.parse::<EntryId>() {
        return Ok(id);
    }

    let matches: Vec<EntryId> = data
        .entries
        .iter()
        .map(clk_core::TimeEntry::id)
        .filter(|id| id.to_string().starts_with(input))
        .collect();

    match matches.as_slice() {
        [id] => Ok(*id),
        [] => bail!("no entry matches '{input}'"),
        _ => bail!("'{input}' is ambiguous, matches {} entries", matches.len()),
    }
}

/// `HH:MM` of an instant in the display timezone.
pub fn hhmm<Tz>(instant: DateTime<Utc>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    instant.with_timezone(tz).format("%H:%M").to_string()
}
