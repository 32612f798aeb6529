//! Missed-workout notification seam.
//!
//! Delivery is handled by the host platform and is out of scope here; the
//! engine only needs a best-effort call it can fire and forget.

use crate::Result;
use chrono::NaiveDate;

/// Collaborator invoked when the sync engine detects missed workouts
pub trait MissedWorkoutNotifier: Send + Sync {
    /// Notify about missed workouts; `first_missed` is the earliest missed
    /// date and `missed_count` how many entries were past due.
    fn notify_missed(&self, first_missed: NaiveDate, missed_count: usize) -> Result<()>;
}

/// Notifier that records the event in the log
#[derive(Default)]
pub struct LogNotifier;

impl MissedWorkoutNotifier for LogNotifier {
    fn notify_missed(&self, first_missed: NaiveDate, missed_count: usize) -> Result<()> {
        tracing::info!(
            "Missed workout notification: {} session(s) overdue since {}",
            missed_count,
            first_missed
        );
        Ok(())
    }
}
