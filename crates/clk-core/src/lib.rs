//! Core domain logic for the clk time tracker.
//!
//! This crate contains the fundamental types and logic for:
//! - Time entries: validated clock-in/clock-out intervals
//! - The current session: the single optional open interval
//! - Aggregation: today/month totals and per-day grouping, derived on demand
//! - Formatting: human-readable durations and date keys
//!
//! Everything here is pure and I/O-free; persistence and the session
//! lifecycle live in `clk-store` and `clk-engine`.

pub mod aggregate;
pub mod entry;
pub mod format;
pub mod session;
pub mod state;

pub use aggregate::{
    MonthlyStatistic, entries_by_date, last_month_duration, monthly_statistics,
    this_month_duration, today_duration,
};
pub use entry::{EntryError, EntryId, TimeEntry};
pub use format::{format_hm, format_hms};
pub use session::CurrentSession;
pub use state::{SCHEMA_VERSION, TrackerData};
