//! Session lifecycle engine for the clk time tracker.
//!
//! This crate contains the stateful heart of the tracker:
//! - [`Tracker`]: the Idle ⇄ Tracking state machine, entry editing, crash
//!   recovery and sleep handling, with synchronous persistence
//! - [`ReminderScheduler`]: the single-timer long-session reminder
//! - [`Notifier`]: the outbound notification contract, implemented by the
//!   binary (desktop notifications) or tests (recording/null)

pub mod notify;
pub mod reminder;
pub mod settings;
pub mod tracker;

pub use notify::{Notification, Notifier, NullNotifier};
pub use reminder::{ReminderConfig, ReminderScheduler};
pub use settings::Settings;
pub use tracker::{Tracker, TrackerError};
