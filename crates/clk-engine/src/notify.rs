//! Notification collaborator contract.
//!
//! The engine emits notification requests but never owns their delivery. All
//! calls are best-effort fire-and-forget: implementations swallow their own
//! failures and the engine never inspects an outcome.

use chrono::{DateTime, Utc};

/// A notification request emitted by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// A session has been running past the reminder threshold.
    Reminder,
    /// An open session from a previous run was found on startup.
    IncompleteSession,
    /// A session just started.
    ClockIn { at: DateTime<Utc> },
    /// A session just ended.
    ClockOut { duration_seconds: i64 },
}

/// Delivery side of the notification contract, implemented outside the core.
pub trait Notifier: Send + Sync {
    /// Asks the platform for notification permission. Idempotent; a no-op on
    /// platforms without a permission model.
    fn request_permission(&self);

    /// Delivers one notification, best-effort.
    fn notify(&self, notification: Notification);
}

/// Notifier that drops everything. Useful for tests and headless commands.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn request_permission(&self) {}

    fn notify(&self, _notification: Notification) {}
}
