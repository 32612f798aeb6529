#![forbid(unsafe_code)]

//! Core domain model and business logic for the Repshift rolling-schedule system.
//!
//! This crate provides:
//! - Domain types (preferences, exercises, sessions, timeline entries)
//! - Exercise catalog management
//! - Workout plan generation
//! - Document store abstraction (memory and file backends)
//! - Timeline synchronization (date shift, missed detection, streak reset)
//! - Date context, session cache, and refresh broadcast

pub mod types;
pub mod error;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod store;
pub mod timeline;
pub mod cache;
pub mod refresh;
pub mod notify;
pub mod planner;
pub mod sync;
pub mod clock;
pub mod export;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use catalog::{build_default_catalog, get_default_catalog, load_catalog, ExerciseCatalog};
pub use config::Config;
pub use store::{DocumentStore, FileStore, Filter, MemoryStore};
pub use timeline::TimelineRepository;
pub use cache::{SessionCache, TODAY_SESSION_KEY};
pub use refresh::{RefreshBus, SubscriptionId};
pub use notify::{LogNotifier, MissedWorkoutNotifier};
pub use planner::{generate_plan, persist_plan, DaySchedule, GeneratedPlan, PlanPolicy};
pub use sync::{SyncEngine, SyncReport};
pub use clock::DateContext;
pub use export::export_timeline_csv;
