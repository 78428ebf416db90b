//! Runtime settings consumed by the engine.

use std::time::Duration;

/// Behavior switches for the engine. Owned by the configuration layer and
/// handed in at construction; the engine only reads them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Whether long-session reminders fire at all.
    pub reminder_enabled: bool,
    /// How long a session may run before the first reminder.
    pub reminder_threshold: Duration,
    /// Re-fire interval after the first reminder. `None` means fire once.
    pub reminder_repeat: Option<Duration>,
    /// Clock out automatically when the system goes to sleep.
    pub stop_on_sleep: bool,
    /// Emit clock-in/clock-out notifications.
    pub clock_event_notification_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            reminder_enabled: true,
            reminder_threshold: Duration::from_secs(60 * 60),
            reminder_repeat: None,
            stop_on_sleep: true,
            clock_event_notification_enabled: true,
        }
    }
}
