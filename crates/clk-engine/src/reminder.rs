//! Long-session reminder scheduling.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::notify::{Notification, Notifier};
use crate::settings::Settings;

/// What to arm the scheduler with, snapshotted from [`Settings`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderConfig {
    pub enabled: bool,
    pub threshold: Duration,
    pub repeat: Option<Duration>,
}

impl From<&Settings> for ReminderConfig {
    fn from(settings: &Settings) -> Self {
        Self {
            enabled: settings.reminder_enabled,
            threshold: settings.reminder_threshold,
            repeat: settings.reminder_repeat,
        }
    }
}

/// Single-timer reminder scheduler.
///
/// Either one timer task is pending or the scheduler is idle; there is never
/// more than one. The timer task only talks to the notifier, never back into
/// engine state, so firing needs no synchronization with mutations.
///
/// Arming requires a running tokio runtime. Outside one (the short-lived CLI
/// commands), `start` degrades to a logged no-op, which matches the contract:
/// reminders are inherently a resident-process feature.
pub struct ReminderScheduler {
    notifier: Arc<dyn Notifier>,
    pending: Option<JoinHandle<()>>,
}

impl ReminderScheduler {
    #[must_use]
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self {
            notifier,
            pending: None,
        }
    }

    /// Arms a one-shot timer for the configured threshold.
    ///
    /// No-op when reminders are disabled. A previously pending timer is
    /// cancelled first, so repeated starts never stack. On fire the task
    /// emits [`Notification::Reminder`], then re-arms itself for the repeat
    /// interval if one is configured.
    pub fn start(&mut self, config: &ReminderConfig) {
        self.stop();
        if !config.enabled {
            return;
        }

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::debug!("no async runtime, reminder timer not armed");
            return;
        };

        let notifier = Arc::clone(&self.notifier);
        let threshold = config.threshold;
        let repeat = config.repeat;
        tracing::debug!(?threshold, ?repeat, "arming reminder timer");

        self.pending = Some(runtime.spawn(async move {
            tokio::time::sleep(threshold).await;
            notifier.notify(Notification::Reminder);

            if let Some(interval) = repeat {
                loop {
                    tokio::time::sleep(interval).await;
                    notifier.notify(Notification::Reminder);
                }
            }
        }));
    }

    /// Cancels any pending timer. Idempotent and safe to call while idle.
    pub fn stop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
            tracing::debug!("reminder timer cancelled");
        }
    }

    /// True while a timer is armed (including between repeat fires).
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for ReminderScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}
