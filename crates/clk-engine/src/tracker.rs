//! The session lifecycle engine.
//!
//! A two-state machine, Idle ⇄ Tracking, plus a recovery sub-protocol for
//! sessions left open by a previous run. [`Tracker`] owns the canonical
//! in-memory copy of the persisted state for the process lifetime and is its
//! only mutator; every mutating operation persists synchronously before
//! returning. Other components get read-only views or derived values.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;

use clk_core::{CurrentSession, EntryError, EntryId, TimeEntry, TrackerData};
use clk_store::{Store, StoreError};

use crate::notify::{Notification, Notifier};
use crate::reminder::{ReminderConfig, ReminderScheduler};
use crate::settings::Settings;

/// Errors surfaced by lifecycle operations.
///
/// Both variants are recoverable. An interval error leaves state exactly as
/// it was; a store error means the in-memory mutation took effect but did not
/// reach disk yet.
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error(transparent)]
    InvalidInterval(#[from] EntryError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// The session lifecycle engine.
pub struct Tracker {
    data: TrackerData,
    store: Store,
    notifier: Arc<dyn Notifier>,
    scheduler: ReminderScheduler,
    settings: Settings,
    last_error: Option<String>,
}

impl Tracker {
    /// Loads persisted state and constructs the engine around it.
    ///
    /// A corrupt data file is surfaced through [`Self::last_error`] and the
    /// engine starts from the empty default so the application stays usable.
    /// If the loaded state carries an open session, an incomplete-session
    /// notification goes out and the engine stays in the Tracking state until
    /// the caller resolves it via [`Self::complete_incomplete_session`] or
    /// [`Self::discard_incomplete_session`].
    pub fn open(store: Store, notifier: Arc<dyn Notifier>, settings: Settings) -> Self {
        let (data, last_error) = match store.load() {
            Ok(data) => (data, None),
            Err(error) => {
                tracing::warn!(%error, "could not load tracker data, starting empty");
                (TrackerData::default(), Some(error.to_string()))
            }
        };

        let scheduler = ReminderScheduler::new(Arc::clone(&notifier));
        let tracker = Self {
            data,
            store,
            notifier,
            scheduler,
            settings,
            last_error,
        };

        if tracker.data.is_tracking() {
            tracing::info!("found incomplete session from previous run");
            tracker.notifier.notify(Notification::IncompleteSession);
        }
        tracker
    }

    // ── Queries ──────────────────────────────────────────────────────

    #[must_use]
    pub const fn is_tracking(&self) -> bool {
        self.data.is_tracking()
    }

    /// An open session loaded from disk counts as incomplete until resolved
    /// or clocked out; within one run this is the same as tracking.
    #[must_use]
    pub const fn has_incomplete_session(&self) -> bool {
        self.data.is_tracking()
    }

    /// Elapsed seconds of the open session, zero when idle.
    #[must_use]
    pub fn current_session_duration(&self, now: DateTime<Utc>) -> i64 {
        self.data
            .current_session
            .map_or(0, |session| session.elapsed_seconds(now))
    }

    /// Read-only view of the canonical state.
    #[must_use]
    pub const fn data(&self) -> &TrackerData {
        &self.data
    }

    /// Human-readable description of the most recent persistence or load
    /// failure, cleared by the next successful save.
    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    #[must_use]
    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    // ── Session lifecycle ────────────────────────────────────────────

    /// Starts a session at `now`.
    ///
    /// A no-op while already tracking: the engine never overwrites an open
    /// session's clock-in. Callers are expected to check [`Self::is_tracking`]
    /// first.
    pub fn clock_in_at(&mut self, now: DateTime<Utc>) -> Result<(), TrackerError> {
        if self.data.is_tracking() {
            tracing::debug!("clock in ignored, session already open");
            return Ok(());
        }

        self.notifier.request_permission();
        self.data.current_session = Some(CurrentSession::new(now));
        let persisted = self.persist();

        self.scheduler.start(&ReminderConfig::from(&self.settings));
        if self.settings.clock_event_notification_enabled {
            self.notifier.notify(Notification::ClockIn { at: now });
        }
        tracing::info!(%now, "clocked in");
        persisted
    }

    /// Ends the open session at `now`, appending a completed entry.
    ///
    /// No-op when idle. When the wall clock reads at or before the session's
    /// clock-in (clock skew), the session is kept open and the interval error
    /// is returned; the caller may retry once the clock is sane.
    pub fn clock_out_at(&mut self, now: DateTime<Utc>) -> Result<(), TrackerError> {
        let Some(session) = self.data.current_session else {
            tracing::debug!("clock out ignored, no open session");
            return Ok(());
        };

        let entry = TimeEntry::new(session.clock_in, now)?;
        let duration_seconds = entry.duration_seconds();
        self.data.entries.push(entry);
        self.data.current_session = None;
        let persisted = self.persist();

        self.scheduler.stop();
        if self.settings.clock_event_notification_enabled {
            self.notifier.notify(Notification::ClockOut { duration_seconds });
        }
        tracing::info!(duration_seconds, "clocked out");
        persisted
    }

    /// Clock out when tracking, clock in otherwise.
    pub fn toggle_at(&mut self, now: DateTime<Utc>) -> Result<(), TrackerError> {
        if self.data.is_tracking() {
            self.clock_out_at(now)
        } else {
            self.clock_in_at(now)
        }
    }

    pub fn clock_in(&mut self) -> Result<(), TrackerError> {
        self.clock_in_at(Utc::now())
    }

    pub fn clock_out(&mut self) -> Result<(), TrackerError> {
        self.clock_out_at(Utc::now())
    }

    pub fn toggle(&mut self) -> Result<(), TrackerError> {
        self.toggle_at(Utc::now())
    }

    // ── Entry editing ────────────────────────────────────────────────

    /// Adds a manual historical entry, independent of session state.
    ///
    /// Returns the new entry's id. On a validation failure nothing changes.
    pub fn add_entry(
        &mut self,
        clock_in: DateTime<Utc>,
        clock_out: DateTime<Utc>,
    ) -> Result<EntryId, TrackerError> {
        let entry = TimeEntry::new(clock_in, clock_out)?;
        let id = entry.id();
        self.data.entries.push(entry);
        self.persist()?;
        Ok(id)
    }

    /// Rewrites an existing entry's interval.
    ///
    /// Silently does nothing when the id is unknown. A validation failure
    /// leaves the stored entry untouched and is returned to the caller.
    pub fn update_entry(
        &mut self,
        id: EntryId,
        clock_in: DateTime<Utc>,
        clock_out: DateTime<Utc>,
    ) -> Result<(), TrackerError> {
        let Some(index) = self.data.entry_index(id) else {
            tracing::debug!(%id, "update ignored, no such entry");
            return Ok(());
        };

        self.data.entries[index].update(clock_in, clock_out)?;
        self.persist()
    }

    /// Removes the entry with the given id. Always succeeds; deleting an
    /// unknown id is a no-op that still persists.
    pub fn delete_entry(&mut self, id: EntryId) -> Result<(), TrackerError> {
        self.data.entries.retain(|entry| entry.id() != id);
        self.persist()
    }

    /// Removes every entry whose id is in the set.
    pub fn delete_entries(&mut self, ids: &HashSet<EntryId>) -> Result<(), TrackerError> {
        self.data.entries.retain(|entry| !ids.contains(&entry.id()));
        self.persist()
    }

    // ── Crash recovery ───────────────────────────────────────────────

    /// Completes a recovered session with a caller-supplied clock-out.
    ///
    /// Same validation, append and clear as a normal clock-out. No-op when
    /// there is no session to complete.
    pub fn complete_incomplete_session(
        &mut self,
        clock_out: DateTime<Utc>,
    ) -> Result<(), TrackerError> {
        let Some(session) = self.data.current_session else {
            return Ok(());
        };

        let entry = TimeEntry::new(session.clock_in, clock_out)?;
        self.data.entries.push(entry);
        self.data.current_session = None;
        let persisted = self.persist();
        self.scheduler.stop();
        tracing::info!("incomplete session completed");
        persisted
    }

    /// Drops a recovered session without creating an entry. Idempotent; a
    /// second call finds nothing to discard and changes nothing.
    pub fn discard_incomplete_session(&mut self) -> Result<(), TrackerError> {
        if self.data.current_session.is_none() {
            return Ok(());
        }

        self.data.current_session = None;
        let persisted = self.persist();
        self.scheduler.stop();
        tracing::info!("incomplete session discarded");
        persisted
    }

    // ── External signals ─────────────────────────────────────────────

    /// Reacts to an impending system sleep: behaves exactly like a clock-out
    /// at `now` when `stop_on_sleep` is enabled, otherwise does nothing.
    /// This is the only externally triggered transition out of Tracking.
    pub fn handle_sleep_at(&mut self, now: DateTime<Utc>) -> Result<(), TrackerError> {
        if !self.settings.stop_on_sleep || !self.data.is_tracking() {
            return Ok(());
        }
        tracing::info!("system sleep, clocking out");
        self.clock_out_at(now)
    }

    pub fn handle_sleep(&mut self) -> Result<(), TrackerError> {
        self.handle_sleep_at(Utc::now())
    }

    /// Arms the reminder scheduler for an already-open session.
    ///
    /// Used by resident callers that attach to a session started by an
    /// earlier process invocation; clock-in arms the scheduler itself.
    pub fn arm_reminders(&mut self) {
        if self.data.is_tracking() {
            self.scheduler.start(&ReminderConfig::from(&self.settings));
        }
    }

    /// Disarms the reminder scheduler without touching session state.
    pub fn disarm_reminders(&mut self) {
        self.scheduler.stop();
    }

    // ── Persistence ──────────────────────────────────────────────────

    /// Writes the canonical state to disk.
    ///
    /// A failure is recorded in `last_error` and returned, but the in-memory
    /// mutation stands; the next successful save supersedes the divergence.
    fn persist(&mut self) -> Result<(), TrackerError> {
        match self.store.save(&self.data) {
            Ok(()) => {
                self.last_error = None;
                Ok(())
            }
            Err(error) => {
                tracing::warn!(%error, "persist failed, in-memory state retained");
                self.last_error = Some(error.to_string());
                Err(error.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use crate::notify::NullNotifier;

    use super::*;

    #[derive(Default)]
    struct RecordingNotifier {
        permission_requests: Mutex<u32>,
        notifications: Mutex<Vec<Notification>>,
    }

    impl RecordingNotifier {
        fn sent(&self) -> Vec<Notification> {
            self.notifications.lock().unwrap().clone()
        }
    }

    impl Notifier for RecordingNotifier {
        fn request_permission(&self) {
            *self.permission_requests.lock().unwrap() += 1;
        }

        fn notify(&self, notification: Notification) {
            self.notifications.lock().unwrap().push(notification);
        }
    }

    struct Fixture {
        tracker: Tracker,
        notifier: Arc<RecordingNotifier>,
        _temp: tempfile::TempDir,
    }

    fn fixture() -> Fixture {
        fixture_with(Settings::default())
    }

    fn fixture_with(settings: Settings) -> Fixture {
        let temp = tempfile::tempdir().unwrap();
        let store = Store::new(temp.path().join("data.json"));
        let notifier = Arc::new(RecordingNotifier::default());
        let tracker = Tracker::open(store, Arc::clone(&notifier) as Arc<dyn Notifier>, settings);
        Fixture {
            tracker,
            notifier,
            _temp: temp,
        }
    }

    fn ts(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    #[test]
    fn clock_in_then_out_appends_one_entry() {
        let mut f = fixture();
        let before = Utc::now();

        f.tracker.clock_in().unwrap();
        assert!(f.tracker.is_tracking());

        f.tracker.clock_out().unwrap();
        let after = Utc::now();

        assert!(!f.tracker.is_tracking());
        assert_eq!(f.tracker.data().entries.len(), 1);
        let entry = &f.tracker.data().entries[0];
        assert!(entry.clock_in() >= before && entry.clock_out() <= after);
    }

    #[test]
    fn double_clock_in_keeps_original_session() {
        let mut f = fixture();
        let first = ts("2026-01-18T09:00:00Z");

        f.tracker.clock_in_at(first).unwrap();
        f.tracker.clock_in_at(ts("2026-01-18T10:00:00Z")).unwrap();

        let session = f.tracker.data().current_session.unwrap();
        assert_eq!(session.clock_in, first);
    }

    #[test]
    fn clock_out_while_idle_is_a_noop() {
        let mut f = fixture();
        f.tracker.clock_out().unwrap();
        assert!(f.tracker.data().entries.is_empty());
    }

    #[test]
    fn clock_out_with_skewed_clock_keeps_session() {
        let mut f = fixture();
        f.tracker.clock_in_at(ts("2026-01-18T09:00:00Z")).unwrap();

        let result = f.tracker.clock_out_at(ts("2026-01-18T08:00:00Z"));

        assert!(matches!(result, Err(TrackerError::InvalidInterval(_))));
        assert!(f.tracker.is_tracking());
        assert!(f.tracker.data().entries.is_empty());

        // Once the clock is sane again the session closes normally.
        f.tracker.clock_out_at(ts("2026-01-18T11:00:00Z")).unwrap();
        assert!(!f.tracker.is_tracking());
        assert_eq!(f.tracker.data().entries.len(), 1);
    }

    #[test]
    fn toggle_flips_between_states() {
        let mut f = fixture();
        f.tracker.toggle_at(ts("2026-01-18T09:00:00Z")).unwrap();
        assert!(f.tracker.is_tracking());
        f.tracker.toggle_at(ts("2026-01-18T10:00:00Z")).unwrap();
        assert!(!f.tracker.is_tracking());
        assert_eq!(f.tracker.data().entries.len(), 1);
    }

    #[test]
    fn clock_in_requests_permission_and_notifies() {
        let mut f = fixture();
        let now = ts("2026-01-18T09:00:00Z");
        f.tracker.clock_in_at(now).unwrap();

        assert_eq!(*f.notifier.permission_requests.lock().unwrap(), 1);
        assert_eq!(f.notifier.sent(), vec![Notification::ClockIn { at: now }]);
    }

    #[test]
    fn clock_out_notification_carries_duration() {
        let mut f = fixture();
        f.tracker.clock_in_at(ts("2026-01-18T09:00:00Z")).unwrap();
        f.tracker.clock_out_at(ts("2026-01-18T11:00:00Z")).unwrap();

        assert!(
            f.notifier
                .sent()
                .contains(&Notification::ClockOut { duration_seconds: 7200 })
        );
    }

    #[test]
    fn clock_event_notifications_can_be_disabled() {
        let mut f = fixture_with(Settings {
            clock_event_notification_enabled: false,
            ..Settings::default()
        });
        f.tracker.clock_in_at(ts("2026-01-18T09:00:00Z")).unwrap();
        f.tracker.clock_out_at(ts("2026-01-18T11:00:00Z")).unwrap();

        assert!(f.notifier.sent().is_empty());
    }

    #[test]
    fn add_entry_is_independent_of_session_state() {
        let mut f = fixture();
        f.tracker.clock_in_at(ts("2026-01-18T09:00:00Z")).unwrap();

        let id = f
            .tracker
            .add_entry(ts("2026-01-17T09:00:00Z"), ts("2026-01-17T17:00:00Z"))
            .unwrap();

        assert!(f.tracker.is_tracking());
        assert_eq!(f.tracker.data().entry_index(id), Some(0));
    }

    #[test]
    fn add_entry_rejects_invalid_interval() {
        let mut f = fixture();
        let result = f
            .tracker
            .add_entry(ts("2026-01-17T17:00:00Z"), ts("2026-01-17T09:00:00Z"));

        assert!(matches!(result, Err(TrackerError::InvalidInterval(_))));
        assert!(f.tracker.data().entries.is_empty());
    }

    #[test]
    fn update_entry_unknown_id_is_silent() {
        let mut f = fixture();
        f.tracker
            .add_entry(ts("2026-01-17T09:00:00Z"), ts("2026-01-17T17:00:00Z"))
            .unwrap();

        f.tracker
            .update_entry(
                EntryId::generate(),
                ts("2026-01-17T10:00:00Z"),
                ts("2026-01-17T11:00:00Z"),
            )
            .unwrap();

        assert_eq!(f.tracker.data().entries[0].duration_seconds(), 28_800);
    }

    #[test]
    fn update_entry_validation_failure_leaves_entry() {
        let mut f = fixture();
        let id = f
            .tracker
            .add_entry(ts("2026-01-17T09:00:00Z"), ts("2026-01-17T17:00:00Z"))
            .unwrap();

        let result = f.tracker.update_entry(
            id,
            ts("2026-01-17T12:00:00Z"),
            ts("2026-01-17T12:00:00Z"),
        );

        assert!(result.is_err());
        assert_eq!(f.tracker.data().entries[0].clock_in(), ts("2026-01-17T09:00:00Z"));
        assert!(f.tracker.data().entries[0].modified_at().is_none());
    }

    #[test]
    fn update_entry_success_persists_new_interval() {
        let mut f = fixture();
        let id = f
            .tracker
            .add_entry(ts("2026-01-17T09:00:00Z"), ts("2026-01-17T17:00:00Z"))
            .unwrap();

        f.tracker
            .update_entry(id, ts("2026-01-17T10:00:00Z"), ts("2026-01-17T12:00:00Z"))
            .unwrap();

        let entry = &f.tracker.data().entries[0];
        assert_eq!(entry.duration_seconds(), 7200);
        assert!(entry.modified_at().is_some());
    }

    #[test]
    fn delete_unknown_id_leaves_log_unchanged() {
        let mut f = fixture();
        f.tracker
            .add_entry(ts("2026-01-17T09:00:00Z"), ts("2026-01-17T17:00:00Z"))
            .unwrap();

        f.tracker.delete_entry(EntryId::generate()).unwrap();
        assert_eq!(f.tracker.data().entries.len(), 1);
    }

    #[test]
    fn delete_entries_removes_matching_set() {
        let mut f = fixture();
        let a = f
            .tracker
            .add_entry(ts("2026-01-15T09:00:00Z"), ts("2026-01-15T10:00:00Z"))
            .unwrap();
        let b = f
            .tracker
            .add_entry(ts("2026-01-16T09:00:00Z"), ts("2026-01-16T10:00:00Z"))
            .unwrap();
        let c = f
            .tracker
            .add_entry(ts("2026-01-17T09:00:00Z"), ts("2026-01-17T10:00:00Z"))
            .unwrap();

        f.tracker
            .delete_entries(&HashSet::from([a, c, EntryId::generate()]))
            .unwrap();

        assert_eq!(f.tracker.data().entries.len(), 1);
        assert_eq!(f.tracker.data().entries[0].id(), b);
    }

    #[test]
    fn reopening_store_surfaces_incomplete_session() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("data.json");

        {
            let mut tracker = Tracker::open(
                Store::new(&path),
                Arc::new(NullNotifier),
                Settings::default(),
            );
            tracker.clock_in_at(ts("2026-01-18T09:00:00Z")).unwrap();
            // Process "crashes" here: no clock-out.
        }

        let notifier = Arc::new(RecordingNotifier::default());
        let tracker = Tracker::open(
            Store::new(&path),
            Arc::clone(&notifier) as Arc<dyn Notifier>,
            Settings::default(),
        );

        assert!(tracker.has_incomplete_session());
        assert!(tracker.is_tracking());
        assert_eq!(notifier.sent(), vec![Notification::IncompleteSession]);
        // Duration keeps counting from the original clock-in.
        assert_eq!(
            tracker.current_session_duration(ts("2026-01-18T11:00:00Z")),
            7200
        );
    }

    #[test]
    fn complete_incomplete_session_appends_entry() {
        let mut f = fixture();
        f.tracker.clock_in_at(ts("2026-01-18T09:00:00Z")).unwrap();

        f.tracker
            .complete_incomplete_session(ts("2026-01-18T17:00:00Z"))
            .unwrap();

        assert!(!f.tracker.is_tracking());
        assert_eq!(f.tracker.data().entries.len(), 1);
        assert_eq!(f.tracker.data().entries[0].duration_seconds(), 28_800);
    }

    #[test]
    fn complete_incomplete_session_validates_interval() {
        let mut f = fixture();
        f.tracker.clock_in_at(ts("2026-01-18T09:00:00Z")).unwrap();

        let result = f
            .tracker
            .complete_incomplete_session(ts("2026-01-18T08:00:00Z"));

        assert!(matches!(result, Err(TrackerError::InvalidInterval(_))));
        assert!(f.tracker.is_tracking());
    }

    #[test]
    fn discard_incomplete_session_is_idempotent() {
        let mut f = fixture();
        f.tracker.clock_in_at(ts("2026-01-18T09:00:00Z")).unwrap();

        f.tracker.discard_incomplete_session().unwrap();
        assert!(!f.tracker.is_tracking());
        assert!(f.tracker.data().entries.is_empty());

        // Second call finds nothing and changes nothing.
        f.tracker.discard_incomplete_session().unwrap();
        assert!(!f.tracker.is_tracking());
    }

    #[test]
    fn sleep_signal_clocks_out_when_enabled() {
        let mut f = fixture();
        f.tracker.clock_in_at(ts("2026-01-18T09:00:00Z")).unwrap();

        f.tracker.handle_sleep_at(ts("2026-01-18T12:00:00Z")).unwrap();

        assert!(!f.tracker.is_tracking());
        assert_eq!(f.tracker.data().entries[0].duration_seconds(), 10_800);
    }

    #[test]
    fn sleep_signal_ignored_when_disabled() {
        let mut f = fixture_with(Settings {
            stop_on_sleep: false,
            ..Settings::default()
        });
        f.tracker.clock_in_at(ts("2026-01-18T09:00:00Z")).unwrap();

        f.tracker.handle_sleep_at(ts("2026-01-18T12:00:00Z")).unwrap();
        assert!(f.tracker.is_tracking());
    }

    #[test]
    fn persist_failure_keeps_in_memory_state() {
        let temp = tempfile::tempdir().unwrap();
        // Parent "directory" is a regular file, so saves cannot succeed.
        let blocker = temp.path().join("blocker");
        std::fs::write(&blocker, b"").unwrap();
        let store = Store::new(blocker.join("data.json"));

        let mut tracker = Tracker::open(store, Arc::new(NullNotifier), Settings::default());
        let result = tracker.clock_in_at(ts("2026-01-18T09:00:00Z"));

        assert!(matches!(result, Err(TrackerError::Store(_))));
        assert!(tracker.is_tracking());
        assert!(tracker.last_error().is_some());
    }

    #[test]
    fn successful_save_clears_last_error() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("data.json");
        std::fs::write(&path, "{corrupt").unwrap();

        let mut tracker = Tracker::open(
            Store::new(&path),
            Arc::new(NullNotifier),
            Settings::default(),
        );
        assert!(tracker.last_error().is_some());
        assert_eq!(tracker.data(), &TrackerData::default());

        tracker.clock_in_at(ts("2026-01-18T09:00:00Z")).unwrap();
        assert!(tracker.last_error().is_none());
    }

    #[test]
    fn state_survives_restart_roundtrip() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("data.json");

        {
            let mut tracker = Tracker::open(
                Store::new(&path),
                Arc::new(NullNotifier),
                Settings::default(),
            );
            tracker.clock_in_at(ts("2026-01-18T09:00:00Z")).unwrap();
            tracker.clock_out_at(ts("2026-01-18T17:00:00Z")).unwrap();
        }

        let tracker = Tracker::open(
            Store::new(&path),
            Arc::new(NullNotifier),
            Settings::default(),
        );
        assert_eq!(tracker.data().entries.len(), 1);
        assert_eq!(tracker.data().entries[0].duration_seconds(), 28_800);
        assert!(!tracker.is_tracking());
    }
}
