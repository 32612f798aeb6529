//! Process-wide current-date state and the sync trigger.
//!
//! Every screen reads "today" from here; the only write path is
//! `set_current_date`, which runs the sync engine and the refresh broadcast.
//! Date advancement is never blocked by a sync failure.

use crate::refresh::RefreshBus;
use crate::sync::SyncEngine;
use chrono::NaiveDate;
use std::sync::{Arc, RwLock};

pub struct DateContext {
    current: RwLock<NaiveDate>,
    engine: Arc<SyncEngine>,
    refresh: Arc<RefreshBus>,
}

impl DateContext {
    /// Create a context starting at `initial` (normally `today()`)
    pub fn new(initial: NaiveDate, engine: Arc<SyncEngine>, refresh: Arc<RefreshBus>) -> Self {
        Self {
            current: RwLock::new(initial),
            engine,
            refresh,
        }
    }

    /// The real-world current calendar day
    pub fn today() -> NaiveDate {
        chrono::Local::now().date_naive()
    }

    pub fn current_date(&self) -> NaiveDate {
        match self.current.read() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    /// Move the visible current date to `new_date`.
    ///
    /// Runs a timeline sync against the new date first; a failed sync is
    /// logged but the date still updates. Finishes by broadcasting a
    /// session refetch so listeners re-read against the new date.
    pub fn set_current_date(&self, new_date: NaiveDate) {
        let old_date = self.current_date();

        let report = self.engine.sync(new_date, old_date);
        if !report.success {
            tracing::warn!(
                "Timeline sync for date change {} -> {} failed: {}",
                old_date,
                new_date,
                report.message
            );
        } else if report.shifted {
            tracing::info!("Timeline realigned with {}", new_date);
        }

        match self.current.write() {
            Ok(mut guard) => *guard = new_date,
            Err(poisoned) => *poisoned.into_inner() = new_date,
        }

        self.refresh.trigger_refetch();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        CompletionStatus, DatedExerciseEntry, EntryInstructions, LogNotifier, MemoryStore,
        SessionCache, TimelineRepository,
    };
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn context_with_store(store: Arc<MemoryStore>) -> (DateContext, Arc<RefreshBus>) {
        let cache = Arc::new(SessionCache::new());
        let refresh = Arc::new(RefreshBus::new(cache.clone()));
        let repo = TimelineRepository::new(store, "u1");
        let engine = Arc::new(SyncEngine::new(repo, Arc::new(LogNotifier), cache));
        let ctx = DateContext::new(date("2024-01-01"), engine, refresh.clone());
        (ctx, refresh)
    }

    #[test]
    fn test_date_updates_even_when_sync_fails() {
        // No timeline exists, so every sync reports failure
        let (ctx, _refresh) = context_with_store(Arc::new(MemoryStore::new()));

        ctx.set_current_date(date("2024-01-05"));
        assert_eq!(ctx.current_date(), date("2024-01-05"));
    }

    #[test]
    fn test_refetch_broadcast_fires_after_date_change() {
        let (ctx, refresh) = context_with_store(Arc::new(MemoryStore::new()));
        let count = Arc::new(AtomicUsize::new(0));

        let counter = count.clone();
        refresh.subscribe(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        ctx.set_current_date(date("2024-01-05"));
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_date_change_drives_timeline_shift() {
        let store = Arc::new(MemoryStore::new());
        let (ctx, _refresh) = context_with_store(store.clone());

        let repo = TimelineRepository::new(store, "u1");
        repo.ensure_timeline().unwrap();
        repo.insert_entry(&DatedExerciseEntry {
            id: "e1".into(),
            date: date("2024-01-01"),
            exercise_name: "Push-up".into(),
            instructions: EntryInstructions {
                sets: 3,
                reps: "8-12".into(),
            },
            completion_status: CompletionStatus::Incomplete,
            workout_title: "Push Day".into(),
        })
        .unwrap();

        ctx.set_current_date(date("2024-01-06"));

        let entries = repo.load_entries().unwrap();
        assert_eq!(entries[0].date, date("2024-01-06"));
        assert_eq!(ctx.current_date(), date("2024-01-06"));
    }
}
