//! Core domain types for the Repshift rolling-schedule system.
//!
//! This module defines the fundamental types used throughout the system:
//! - User preferences captured at onboarding
//! - Exercise records sourced from the catalog
//! - Workout sessions and dated timeline entries
//! - Streak state

use chrono::{DateTime, NaiveDate, Utc, Weekday};
use serde::{Deserialize, Serialize};

// ============================================================================
// Onboarding Types
// ============================================================================

/// Training goal selected during onboarding
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Goal {
    WeightLoss,
    MuscleGain,
    Strength,
    Endurance,
    Flexibility,
}

impl Goal {
    /// Human-readable name as it appears in plan titles
    pub fn display_name(&self) -> &'static str {
        match self {
            Goal::WeightLoss => "Weight Loss",
            Goal::MuscleGain => "Muscle Gain",
            Goal::Strength => "Strength",
            Goal::Endurance => "Endurance",
            Goal::Flexibility => "Flexibility",
        }
    }

    /// Parse a user-supplied goal string (accepts spaces or underscores)
    pub fn parse(s: &str) -> Option<Goal> {
        match s.to_lowercase().replace([' ', '-'], "_").as_str() {
            "weight_loss" => Some(Goal::WeightLoss),
            "muscle_gain" => Some(Goal::MuscleGain),
            "strength" => Some(Goal::Strength),
            "endurance" => Some(Goal::Endurance),
            "flexibility" => Some(Goal::Flexibility),
            _ => None,
        }
    }
}

/// Self-reported experience level
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceLevel {
    Beginner,
    Intermediate,
    Expert,
}

impl ExperienceLevel {
    /// Whether an exercise at `level` is acceptable for this user.
    ///
    /// Expert accepts everything, Intermediate accepts intermediate and
    /// beginner, Beginner accepts only beginner. Unknown level strings are
    /// rejected.
    pub fn accepts(&self, level: &str) -> bool {
        match level.to_lowercase().as_str() {
            "beginner" => true,
            "intermediate" => {
                matches!(self, ExperienceLevel::Intermediate | ExperienceLevel::Expert)
            }
            "expert" => matches!(self, ExperienceLevel::Expert),
            _ => false,
        }
    }

    /// Whether `level` is the user's exact level
    pub fn is_exact(&self, level: &str) -> bool {
        level.to_lowercase() == self.as_str()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExperienceLevel::Beginner => "beginner",
            ExperienceLevel::Intermediate => "intermediate",
            ExperienceLevel::Expert => "expert",
        }
    }

    pub fn parse(s: &str) -> Option<ExperienceLevel> {
        match s.to_lowercase().as_str() {
            "beginner" => Some(ExperienceLevel::Beginner),
            "intermediate" => Some(ExperienceLevel::Intermediate),
            "expert" => Some(ExperienceLevel::Expert),
            _ => None,
        }
    }
}

/// Preferences captured during onboarding; read-only input to plan generation
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UserPreferences {
    pub goal: Goal,
    pub level: ExperienceLevel,
    pub days_per_week: u8,
    pub equipment: Vec<String>,
}

// ============================================================================
// Exercise Catalog Types
// ============================================================================

/// A single exercise record from the catalog. Immutable, sourced externally.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExerciseRecord {
    pub id: String,
    pub name: String,
    pub primary_muscles: Vec<String>,
    pub secondary_muscles: Vec<String>,
    pub equipment: String,
    pub category: String,
    pub level: String,
    pub instructions: String,
}

// ============================================================================
// Schedule Types
// ============================================================================

/// Day of week as stored on workout sessions
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DayOfWeek {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl DayOfWeek {
    pub fn to_weekday(self) -> Weekday {
        match self {
            DayOfWeek::Sunday => Weekday::Sun,
            DayOfWeek::Monday => Weekday::Mon,
            DayOfWeek::Tuesday => Weekday::Tue,
            DayOfWeek::Wednesday => Weekday::Wed,
            DayOfWeek::Thursday => Weekday::Thu,
            DayOfWeek::Friday => Weekday::Fri,
            DayOfWeek::Saturday => Weekday::Sat,
        }
    }

    pub fn from_weekday(weekday: Weekday) -> Self {
        match weekday {
            Weekday::Sun => DayOfWeek::Sunday,
            Weekday::Mon => DayOfWeek::Monday,
            Weekday::Tue => DayOfWeek::Tuesday,
            Weekday::Wed => DayOfWeek::Wednesday,
            Weekday::Thu => DayOfWeek::Thursday,
            Weekday::Fri => DayOfWeek::Friday,
            Weekday::Sat => DayOfWeek::Saturday,
        }
    }
}

/// One scheduled split day persisted per (user, session id)
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorkoutSession {
    pub user_id: String,
    pub session_id: String,
    pub session_name: String,
    pub exercise_ids: Vec<String>,
    pub exercise_names: Vec<String>,
    pub workout_plan_id: String,
    pub day_of_week: DayOfWeek,
    pub dates: Vec<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Timeline Types
// ============================================================================

/// Completion status of a dated timeline entry
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CompletionStatus {
    Incomplete,
    Complete,
}

impl CompletionStatus {
    pub fn is_complete(&self) -> bool {
        matches!(self, CompletionStatus::Complete)
    }
}

/// Per-set prescription carried on a timeline entry
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct EntryInstructions {
    pub sets: u32,
    pub reps: String,
}

/// One exercise assignment on one calendar day of the user's timeline.
///
/// Mutated by plan generation (creation), user completion actions, and the
/// sync engine (date shift). The date is a local calendar day with no time
/// component.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DatedExerciseEntry {
    pub id: String,
    pub date: NaiveDate,
    pub exercise_name: String,
    pub instructions: EntryInstructions,
    pub completion_status: CompletionStatus,
    pub workout_title: String,
}

// ============================================================================
// Streak Type
// ============================================================================

/// Per-user streak counter. Reset to 0 by the sync engine when a workout is
/// missed, with `reset_date` marking the start of the week of the reset.
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct StreakState {
    pub count: u32,
    pub reset_date: Option<NaiveDate>,
}
