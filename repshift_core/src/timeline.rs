//! Typed access to one user's timeline, sessions, and streak documents.
//!
//! Collection layout:
//! - `users/{uid}`: per-user marker document, created when a plan is persisted
//! - `users/{uid}/workoutDates`: the timeline subcollection, one document per
//!   dated exercise entry
//! - `workoutSessions`: one document per (user, session id)
//! - `streaks/{uid}`: the user's streak counter

use crate::store::{from_document, to_document, DocumentStore, Filter};
use crate::{DatedExerciseEntry, Error, Result, StreakState, WorkoutSession};
use chrono::NaiveDate;
use serde_json::json;
use std::sync::Arc;

pub const USERS_COLLECTION: &str = "users";
pub const TIMELINE_SUBCOLLECTION: &str = "workoutDates";
pub const SESSIONS_COLLECTION: &str = "workoutSessions";
pub const STREAKS_COLLECTION: &str = "streaks";

/// Stable session id derived from a split day-key (e.g. "Day_1_push")
pub fn session_id_for_day_key(day_key: &str) -> String {
    day_key.trim().to_lowercase().replace(' ', "_")
}

/// Store-facing repository scoped to a single user
pub struct TimelineRepository {
    store: Arc<dyn DocumentStore>,
    user_id: String,
}

impl TimelineRepository {
    pub fn new(store: Arc<dyn DocumentStore>, user_id: impl Into<String>) -> Self {
        Self {
            store,
            user_id: user_id.into(),
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    /// Whether the per-user timeline document exists
    pub fn timeline_exists(&self) -> Result<bool> {
        Ok(self
            .store
            .get_document(USERS_COLLECTION, &self.user_id)?
            .is_some())
    }

    /// Create the per-user marker document if missing
    pub fn ensure_timeline(&self) -> Result<()> {
        self.store.set_document(
            USERS_COLLECTION,
            &self.user_id,
            json!({ "user_id": self.user_id, "timeline_created": true }),
            true,
        )
    }

    /// Load all dated entries for the user (unordered).
    ///
    /// Malformed documents are logged and skipped so one bad record cannot
    /// take the whole timeline down.
    pub fn load_entries(&self) -> Result<Vec<DatedExerciseEntry>> {
        let docs = self.store.list_subcollection(
            USERS_COLLECTION,
            &self.user_id,
            TIMELINE_SUBCOLLECTION,
        )?;

        let mut entries = Vec::with_capacity(docs.len());
        for doc in docs {
            match from_document::<DatedExerciseEntry>(doc) {
                Ok(entry) => entries.push(entry),
                Err(e) => {
                    tracing::warn!("Skipping malformed timeline entry: {}", e);
                }
            }
        }
        Ok(entries)
    }

    /// Insert a new dated entry
    pub fn insert_entry(&self, entry: &DatedExerciseEntry) -> Result<()> {
        let path = crate::store::subcollection_path(
            USERS_COLLECTION,
            &self.user_id,
            TIMELINE_SUBCOLLECTION,
        );
        self.store
            .set_document(&path, &entry.id, to_document(entry)?, false)
    }

    /// Overwrite an existing dated entry at the same id
    pub fn write_entry(&self, entry: &DatedExerciseEntry) -> Result<()> {
        let path = crate::store::subcollection_path(
            USERS_COLLECTION,
            &self.user_id,
            TIMELINE_SUBCOLLECTION,
        );
        self.store
            .update_document(&path, &entry.id, to_document(entry)?)
    }

    /// Update-if-exists, else insert, matched by (user, session id).
    /// Returns true when an existing session was updated in place.
    pub fn upsert_session(&self, session: &WorkoutSession) -> Result<bool> {
        if session.user_id != self.user_id {
            return Err(Error::Store(format!(
                "session user '{}' does not match repository user '{}'",
                session.user_id, self.user_id
            )));
        }

        let doc_id = format!("{}_{}", self.user_id, session.session_id);
        let doc = to_document(session)?;

        let existing = self.store.get_document(SESSIONS_COLLECTION, &doc_id)?;
        if existing.is_some() {
            self.store
                .update_document(SESSIONS_COLLECTION, &doc_id, doc)?;
            tracing::debug!("Updated session {}", doc_id);
            Ok(true)
        } else {
            self.store
                .set_document(SESSIONS_COLLECTION, &doc_id, doc, false)?;
            tracing::debug!("Inserted session {}", doc_id);
            Ok(false)
        }
    }

    /// Load all of the user's workout sessions
    pub fn load_sessions(&self) -> Result<Vec<WorkoutSession>> {
        let docs = self.store.query_collection(
            SESSIONS_COLLECTION,
            &[Filter::eq("user_id", self.user_id.clone())],
        )?;

        let mut sessions = Vec::with_capacity(docs.len());
        for doc in docs {
            match from_document::<WorkoutSession>(doc) {
                Ok(session) => sessions.push(session),
                Err(e) => {
                    tracing::warn!("Skipping malformed session document: {}", e);
                }
            }
        }
        Ok(sessions)
    }

    /// Load the user's streak state; default when absent
    pub fn load_streak(&self) -> Result<StreakState> {
        match self.store.get_document(STREAKS_COLLECTION, &self.user_id)? {
            Some(doc) => from_document(doc),
            None => Ok(StreakState::default()),
        }
    }

    /// Reset the streak counter, recording the start of the week of the reset
    pub fn reset_streak(&self, week_start: NaiveDate) -> Result<()> {
        let state = StreakState {
            count: 0,
            reset_date: Some(week_start),
        };
        self.store.set_document(
            STREAKS_COLLECTION,
            &self.user_id,
            to_document(&state)?,
            false,
        )?;
        tracing::info!("Streak reset for {} (week of {})", self.user_id, week_start);
        Ok(())
    }
}
