//! Timeline synchronization engine.
//!
//! Reconciles the per-user timeline against a newly-set current date:
//! detects missed entries, shifts every incomplete entry forward by one
//! uniform delta anchored to the earliest incomplete entry, resets the
//! streak, and invalidates the cached today-session value.
//!
//! Completed entries never move. Repeated identical calls are idempotent:
//! once the earliest incomplete entry sits on the target date the computed
//! shift is zero and the engine no-ops.

use crate::cache::{SessionCache, TODAY_SESSION_KEY};
use crate::notify::MissedWorkoutNotifier;
use crate::{DatedExerciseEntry, TimelineRepository};
use chrono::{Datelike, Duration, NaiveDate};
use std::sync::{Arc, Mutex};

/// Outcome of one sync run. Failures are reported, not thrown: a false
/// `success` means the store may be partially written and a retry is safe.
#[derive(Clone, Debug)]
pub struct SyncReport {
    pub success: bool,
    pub shifted: bool,
    pub message: String,
    pub new_date: Option<NaiveDate>,
}

impl SyncReport {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            shifted: false,
            message: message.into(),
            new_date: None,
        }
    }

    fn no_op(message: impl Into<String>) -> Self {
        Self {
            success: true,
            shifted: false,
            message: message.into(),
            new_date: None,
        }
    }
}

/// Start of the week (Sunday) containing `date`
pub fn start_of_week(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_sunday()))
}

/// The rolling-schedule reconciler for one user
pub struct SyncEngine {
    repo: TimelineRepository,
    notifier: Arc<dyn MissedWorkoutNotifier>,
    cache: Arc<SessionCache>,
    // Serializes sync runs for this user; the read-shift-write sequence is
    // not safe to interleave
    guard: Mutex<()>,
}

impl SyncEngine {
    pub fn new(
        repo: TimelineRepository,
        notifier: Arc<dyn MissedWorkoutNotifier>,
        cache: Arc<SessionCache>,
    ) -> Self {
        Self {
            repo,
            notifier,
            cache,
            guard: Mutex::new(()),
        }
    }

    pub fn repo(&self) -> &TimelineRepository {
        &self.repo
    }

    /// Reconcile the timeline with `target_date`.
    ///
    /// `origin_date` is the previously visible current date; it is recorded
    /// for diagnostics only. The shift itself is anchored to the earliest
    /// incomplete entry, not to the origin.
    pub fn sync(&self, target_date: NaiveDate, origin_date: NaiveDate) -> SyncReport {
        let _serialized = match self.guard.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        tracing::debug!(
            "Sync requested: {} -> {} for user '{}'",
            origin_date,
            target_date,
            self.repo.user_id()
        );

        if self.repo.user_id().is_empty() {
            return SyncReport::failure("Not authenticated");
        }

        match self.repo.timeline_exists() {
            Ok(true) => {}
            Ok(false) => return SyncReport::failure("No timeline found"),
            Err(e) => {
                tracing::error!("Failed to check timeline: {}", e);
                return SyncReport::failure("Error loading timeline");
            }
        }

        let entries = match self.repo.load_entries() {
            Ok(entries) => entries,
            Err(e) => {
                tracing::error!("Failed to load timeline entries: {}", e);
                return SyncReport::failure("Error loading timeline");
            }
        };

        // One filtered sequence drives both the missed check and the shift,
        // so the two can never drift apart
        let mut incomplete: Vec<DatedExerciseEntry> = entries
            .into_iter()
            .filter(|e| !e.completion_status.is_complete())
            .collect();
        incomplete.sort_by_key(|e| e.date);

        let Some(anchor) = incomplete.first() else {
            return SyncReport::no_op("No incomplete entries to shift");
        };

        let days_to_shift = (target_date - anchor.date).num_days();
        if days_to_shift <= 0 {
            tracing::debug!(
                "Earliest incomplete entry on {} is not behind {}; nothing to do",
                anchor.date,
                target_date
            );
            return SyncReport::no_op("Schedule already aligned");
        }

        // Missed means strictly past due relative to the new current date
        let missed: Vec<&DatedExerciseEntry> = incomplete
            .iter()
            .filter(|e| e.date < target_date)
            .collect();
        if let Some(first_missed) = missed.first() {
            if let Err(e) = self.notifier.notify_missed(first_missed.date, missed.len()) {
                tracing::warn!("Missed-workout notification failed: {}", e);
            }
            if let Err(e) = self.repo.reset_streak(start_of_week(target_date)) {
                tracing::warn!("Streak reset failed: {}", e);
            }
        }

        for entry in &incomplete {
            let mut moved = entry.clone();
            moved.date = entry.date + Duration::days(days_to_shift);
            if let Err(e) = self.repo.write_entry(&moved) {
                // Best-effort batch: entries already written stay written.
                // A retry recomputes the shift from current state.
                tracing::error!("Failed to update entry {}: {}", entry.id, e);
                return SyncReport::failure("Error updating exercises");
            }
        }

        self.cache.invalidate(TODAY_SESSION_KEY);

        tracing::info!(
            "Shifted {} incomplete entries forward {} days to realign with {}",
            incomplete.len(),
            days_to_shift,
            target_date
        );

        SyncReport {
            success: true,
            shifted: true,
            message: format!(
                "Shifted {} entries by {} days",
                incomplete.len(),
                days_to_shift
            ),
            new_date: Some(target_date),
        }
    }
}
