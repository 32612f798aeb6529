//! Workout plan generation.
//!
//! Consumes user preferences and the exercise catalog and produces a dated
//! multi-day split: goal-driven category filtering, a level-priority cascade,
//! per-muscle sampling with a daily cap, weekday assignment, and the calendar
//! dates for the plan's duration. Persisting a plan upserts one session per
//! split day and writes the dated timeline entries.

use crate::timeline::session_id_for_day_key;
use crate::{
    CompletionStatus, Config, DatedExerciseEntry, DayOfWeek, EntryInstructions, Error,
    ExerciseCatalog, ExerciseRecord, Goal, Result, TimelineRepository, UserPreferences,
    WorkoutSession,
};
use chrono::{Datelike, Duration, NaiveDate, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;
use uuid::Uuid;

/// Policy knobs for plan generation
#[derive(Clone, Debug)]
pub struct PlanPolicy {
    pub max_exercises_per_day: usize,
    pub fallback_duration_weeks: u32,
}

impl Default for PlanPolicy {
    fn default() -> Self {
        Self {
            max_exercises_per_day: 6,
            fallback_duration_weeks: 4,
        }
    }
}

impl PlanPolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_exercises_per_day: config.plan.max_exercises_per_day,
            fallback_duration_weeks: config.plan.fallback_duration_weeks,
        }
    }
}

/// Per-set prescription for a goal
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RepScheme {
    Range { min: u32, max: u32 },
    Hold { seconds: u32 },
}

impl RepScheme {
    pub fn display(&self) -> String {
        match self {
            RepScheme::Range { min, max } => format!("{}-{}", min, max),
            RepScheme::Hold { seconds } => format!("{}s hold", seconds),
        }
    }
}

/// Training parameters derived from the goal
#[derive(Clone, Debug)]
pub struct TrainingParams {
    pub sets: u32,
    pub scheme: RepScheme,
    pub rest_seconds: u32,
}

/// One generated split day with its exercises and calendar dates
#[derive(Clone, Debug)]
pub struct DaySchedule {
    pub day_key: String,
    pub title: String,
    pub day_of_week: DayOfWeek,
    pub muscles: Vec<String>,
    pub exercises: Vec<ExerciseRecord>,
    pub dates: Vec<NaiveDate>,
}

/// A complete generated plan, ready to persist
#[derive(Clone, Debug)]
pub struct GeneratedPlan {
    pub plan_id: String,
    pub plan_name: String,
    pub duration_weeks: u32,
    pub params: TrainingParams,
    pub days: Vec<DaySchedule>,
    pub warnings: Vec<String>,
}

struct SplitDay {
    key: &'static str,
    title: &'static str,
    muscles: &'static [&'static str],
}

/// Exercise categories allowed for each goal
fn allowed_categories(goal: Goal) -> &'static [&'static str] {
    match goal {
        Goal::WeightLoss => &["cardio", "plyometrics", "strength"],
        Goal::MuscleGain => &["strength", "powerlifting", "strongman"],
        Goal::Strength => &["strength", "powerlifting"],
        Goal::Endurance => &["cardio", "plyometrics"],
        Goal::Flexibility => &["stretching"],
    }
}

/// Per-set training parameters for each goal.
/// Flexibility uses a timed hold instead of a rep range.
fn training_params(goal: Goal) -> TrainingParams {
    match goal {
        Goal::WeightLoss => TrainingParams {
            sets: 3,
            scheme: RepScheme::Range { min: 12, max: 15 },
            rest_seconds: 45,
        },
        Goal::MuscleGain => TrainingParams {
            sets: 4,
            scheme: RepScheme::Range { min: 8, max: 12 },
            rest_seconds: 90,
        },
        Goal::Strength => TrainingParams {
            sets: 5,
            scheme: RepScheme::Range { min: 3, max: 5 },
            rest_seconds: 180,
        },
        Goal::Endurance => TrainingParams {
            sets: 3,
            scheme: RepScheme::Range { min: 15, max: 20 },
            rest_seconds: 30,
        },
        Goal::Flexibility => TrainingParams {
            sets: 3,
            scheme: RepScheme::Hold { seconds: 30 },
            rest_seconds: 15,
        },
    }
}

fn split_for_days(days_per_week: u8) -> Result<&'static [SplitDay]> {
    const THREE_DAY: &[SplitDay] = &[
        SplitDay {
            key: "Day_1_push",
            title: "Push Day",
            muscles: &["chest", "shoulders", "triceps"],
        },
        SplitDay {
            key: "Day_2_pull",
            title: "Pull Day",
            muscles: &["back", "biceps"],
        },
        SplitDay {
            key: "Day_3_legs",
            title: "Leg Day",
            muscles: &["quadriceps", "hamstrings", "glutes", "calves"],
        },
    ];
    const FOUR_DAY: &[SplitDay] = &[
        SplitDay {
            key: "Day_1_upper_push",
            title: "Upper Push",
            muscles: &["chest", "shoulders", "triceps"],
        },
        SplitDay {
            key: "Day_2_lower",
            title: "Lower Body",
            muscles: &["quadriceps", "hamstrings", "glutes"],
        },
        SplitDay {
            key: "Day_3_upper_pull",
            title: "Upper Pull",
            muscles: &["back", "biceps", "forearms"],
        },
        SplitDay {
            key: "Day_4_lower_core",
            title: "Lower & Core",
            muscles: &["quadriceps", "glutes", "calves", "abdominals"],
        },
    ];
    const FIVE_DAY: &[SplitDay] = &[
        SplitDay {
            key: "Day_1_chest",
            title: "Chest Day",
            muscles: &["chest", "triceps"],
        },
        SplitDay {
            key: "Day_2_back",
            title: "Back Day",
            muscles: &["back", "biceps"],
        },
        SplitDay {
            key: "Day_3_shoulders",
            title: "Shoulder Day",
            muscles: &["shoulders", "abdominals"],
        },
        SplitDay {
            key: "Day_4_legs",
            title: "Leg Day",
            muscles: &["quadriceps", "hamstrings", "glutes"],
        },
        SplitDay {
            key: "Day_5_arms_core",
            title: "Arms & Core",
            muscles: &["biceps", "triceps", "abdominals", "calves"],
        },
    ];

    match days_per_week {
        3 => Ok(THREE_DAY),
        4 => Ok(FOUR_DAY),
        5 => Ok(FIVE_DAY),
        other => Err(Error::UnsupportedSchedule(other)),
    }
}

/// Fixed weekday for each day index of a split
fn weekday_table(days_per_week: u8) -> Result<&'static [DayOfWeek]> {
    match days_per_week {
        3 => Ok(&[DayOfWeek::Monday, DayOfWeek::Wednesday, DayOfWeek::Friday]),
        4 => Ok(&[
            DayOfWeek::Monday,
            DayOfWeek::Tuesday,
            DayOfWeek::Thursday,
            DayOfWeek::Friday,
        ]),
        5 => Ok(&[
            DayOfWeek::Monday,
            DayOfWeek::Tuesday,
            DayOfWeek::Wednesday,
            DayOfWeek::Thursday,
            DayOfWeek::Friday,
        ]),
        other => Err(Error::UnsupportedSchedule(other)),
    }
}

/// Program length by (goal, level). Unmapped pairs fall back to the
/// configured default; see DESIGN.md.
fn duration_weeks(goal: Goal, level: crate::ExperienceLevel) -> Option<u32> {
    use crate::ExperienceLevel::*;
    match (goal, level) {
        (Goal::MuscleGain, Beginner) => Some(8),
        (Goal::MuscleGain, Intermediate) => Some(10),
        (Goal::MuscleGain, Expert) => Some(12),
        (Goal::Strength, Beginner) => Some(8),
        (Goal::Strength, Intermediate) => Some(12),
        (Goal::Strength, Expert) => Some(16),
        (Goal::WeightLoss, Beginner) => Some(6),
        (Goal::WeightLoss, Intermediate) => Some(8),
        (Goal::WeightLoss, Expert) => Some(10),
        (Goal::Endurance, Beginner) => Some(6),
        (Goal::Endurance, Intermediate) => Some(8),
        (Goal::Flexibility, Beginner) => Some(4),
        _ => None,
    }
}

/// Plan title, e.g. "2 Month Muscle Gain Program"
fn plan_name(goal: Goal, weeks: u32) -> String {
    let months = (f64::from(weeks) / 4.0).round().max(1.0) as u32;
    format!("{} Month {} Program", months, goal.display_name())
}

/// Filter the catalog by level cascade, equipment, and goal categories,
/// then sort the user's exact level first (stable otherwise).
fn filter_exercises(catalog: &ExerciseCatalog, prefs: &UserPreferences) -> Vec<ExerciseRecord> {
    let allowed = allowed_categories(prefs.goal);
    let equipment: HashSet<String> = prefs
        .equipment
        .iter()
        .map(|e| e.to_lowercase())
        .collect();

    let mut filtered: Vec<ExerciseRecord> = catalog
        .exercises
        .iter()
        .filter(|e| {
            if !prefs.level.accepts(&e.level) {
                return false;
            }
            let eq = e.equipment.to_lowercase();
            if eq != "none" && eq != "body only" && !equipment.contains(&eq) {
                return false;
            }
            allowed.iter().any(|c| e.category.eq_ignore_ascii_case(c))
        })
        .cloned()
        .collect();

    filtered.sort_by_key(|e| usize::from(!prefs.level.is_exact(&e.level)));
    filtered
}

/// Pick one day's exercises: per muscle, primary matches before secondary,
/// capped per muscle and per day, deduplicated by id across the day.
fn select_day_exercises<R: Rng>(
    filtered: &[ExerciseRecord],
    muscles: &[&str],
    max_per_day: usize,
    rng: &mut R,
) -> Vec<ExerciseRecord> {
    let muscle_count = muscles.len().max(1);
    let per_muscle_cap = (max_per_day + muscle_count - 1) / muscle_count;

    let mut chosen: Vec<ExerciseRecord> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for muscle in muscles {
        let mut primary: Vec<&ExerciseRecord> = filtered
            .iter()
            .filter(|e| e.primary_muscles.iter().any(|m| m.eq_ignore_ascii_case(muscle)))
            .collect();
        let primary_ids: HashSet<&str> = primary.iter().map(|e| e.id.as_str()).collect();
        let mut secondary: Vec<&ExerciseRecord> = filtered
            .iter()
            .filter(|e| {
                !primary_ids.contains(e.id.as_str())
                    && e.secondary_muscles.iter().any(|m| m.eq_ignore_ascii_case(muscle))
            })
            .collect();

        primary.shuffle(rng);
        secondary.shuffle(rng);

        let mut taken = 0;
        for candidate in primary.into_iter().chain(secondary) {
            if taken >= per_muscle_cap {
                break;
            }
            if seen.contains(candidate.id.as_str()) {
                continue;
            }
            seen.insert(candidate.id.clone());
            chosen.push(candidate.clone());
            taken += 1;
        }
    }

    if chosen.len() > max_per_day {
        chosen.shuffle(rng);
        chosen.truncate(max_per_day);
    }
    chosen
}

fn first_weekday_on_or_after(start: NaiveDate, weekday: chrono::Weekday) -> NaiveDate {
    let mut date = start;
    while date.weekday() != weekday {
        date += Duration::days(1);
    }
    date
}

/// Generate a plan from preferences and the exercise catalog.
///
/// The RNG drives exercise sampling; seed it for deterministic output.
pub fn generate_plan<R: Rng>(
    prefs: &UserPreferences,
    start_date: NaiveDate,
    catalog: &ExerciseCatalog,
    policy: &PlanPolicy,
    rng: &mut R,
) -> Result<GeneratedPlan> {
    let split = split_for_days(prefs.days_per_week)?;
    let weekdays = weekday_table(prefs.days_per_week)?;

    let filtered = filter_exercises(catalog, prefs);
    if filtered.is_empty() {
        return Err(Error::NoMatchingExercises);
    }

    let weeks = duration_weeks(prefs.goal, prefs.level).unwrap_or_else(|| {
        tracing::debug!(
            "No duration mapping for {:?}/{:?}, using fallback of {} weeks",
            prefs.goal,
            prefs.level,
            policy.fallback_duration_weeks
        );
        policy.fallback_duration_weeks
    });
    let name = plan_name(prefs.goal, weeks);
    let params = training_params(prefs.goal);

    let mut days = Vec::with_capacity(split.len());
    let mut warnings = Vec::new();

    for (idx, split_day) in split.iter().take(prefs.days_per_week as usize).enumerate() {
        let exercises =
            select_day_exercises(&filtered, split_day.muscles, policy.max_exercises_per_day, rng);

        if exercises.is_empty() {
            warnings.push(format!(
                "No exercises matched for {}; the day will be empty",
                split_day.title
            ));
        } else if exercises.len() < 3 {
            warnings.push(format!(
                "Only {} exercise(s) matched for {}",
                exercises.len(),
                split_day.title
            ));
        }

        let day_of_week = weekdays[idx];
        let first = first_weekday_on_or_after(start_date, day_of_week.to_weekday());
        let dates: Vec<NaiveDate> = (0..weeks)
            .map(|week| first + Duration::days(7 * i64::from(week)))
            .collect();

        days.push(DaySchedule {
            day_key: split_day.key.to_string(),
            title: split_day.title.to_string(),
            day_of_week,
            muscles: split_day.muscles.iter().map(|m| (*m).to_string()).collect(),
            exercises,
            dates,
        });
    }

    let total: usize = days.iter().map(|d| d.exercises.len()).sum();
    if total < prefs.days_per_week as usize * 3 {
        warnings.push(format!(
            "Plan has only {} exercises across {} days; consider adding equipment",
            total, prefs.days_per_week
        ));
    }

    tracing::info!(
        "Generated '{}': {} days, {} weeks, {} exercises",
        name,
        days.len(),
        weeks,
        total
    );

    Ok(GeneratedPlan {
        plan_id: Uuid::new_v4().to_string(),
        plan_name: name,
        duration_weeks: weeks,
        params,
        days,
        warnings,
    })
}

/// Persist a generated plan: upsert one session per split day and write the
/// dated timeline entries, each starting incomplete.
pub fn persist_plan(plan: &GeneratedPlan, repo: &TimelineRepository) -> Result<()> {
    if repo.user_id().is_empty() {
        return Err(Error::NotAuthenticated);
    }

    repo.ensure_timeline()?;
    let reps = plan.params.scheme.display();
    let mut entry_count = 0usize;

    for day in &plan.days {
        let session = WorkoutSession {
            user_id: repo.user_id().to_string(),
            session_id: session_id_for_day_key(&day.day_key),
            session_name: day.title.clone(),
            exercise_ids: day.exercises.iter().map(|e| e.id.clone()).collect(),
            exercise_names: day.exercises.iter().map(|e| e.name.clone()).collect(),
            workout_plan_id: plan.plan_id.clone(),
            day_of_week: day.day_of_week,
            dates: day.dates.clone(),
            created_at: Utc::now(),
        };
        repo.upsert_session(&session)?;

        for date in &day.dates {
            for exercise in &day.exercises {
                let entry = DatedExerciseEntry {
                    id: Uuid::new_v4().to_string(),
                    date: *date,
                    exercise_name: exercise.name.clone(),
                    instructions: EntryInstructions {
                        sets: plan.params.sets,
                        reps: reps.clone(),
                    },
                    completion_status: CompletionStatus::Incomplete,
                    workout_title: day.title.clone(),
                };
                repo.insert_entry(&entry)?;
                entry_count += 1;
            }
        }
    }

    tracing::info!(
        "Persisted plan '{}' for {}: {} sessions, {} timeline entries",
        plan.plan_name,
        repo.user_id(),
        plan.days.len(),
        entry_count
    );
    Ok(())
}
