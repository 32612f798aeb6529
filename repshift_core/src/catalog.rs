//! Exercise catalog: built-in default records and external JSON loading.
//!
//! The catalog is a read-only input to plan generation. The built-in set
//! covers every goal's categories across beginner/intermediate/expert levels
//! and common home equipment; `load_catalog` reads the external catalog
//! client's JSON dump when one is available.

use crate::types::ExerciseRecord;
use crate::Result;
use once_cell::sync::Lazy;
use std::path::Path;

/// Cached default catalog - built once and reused across all operations
static DEFAULT_CATALOG: Lazy<ExerciseCatalog> = Lazy::new(build_default_catalog);

/// Get a reference to the cached default catalog
pub fn get_default_catalog() -> &'static ExerciseCatalog {
    &DEFAULT_CATALOG
}

/// The complete set of exercise records available to the plan generator
#[derive(Clone, Debug, Default)]
pub struct ExerciseCatalog {
    pub exercises: Vec<ExerciseRecord>,
}

fn exercise(
    id: &str,
    name: &str,
    primary: &[&str],
    secondary: &[&str],
    equipment: &str,
    category: &str,
    level: &str,
    instructions: &str,
) -> ExerciseRecord {
    ExerciseRecord {
        id: id.into(),
        name: name.into(),
        primary_muscles: primary.iter().map(|m| (*m).into()).collect(),
        secondary_muscles: secondary.iter().map(|m| (*m).into()).collect(),
        equipment: equipment.into(),
        category: category.into(),
        level: level.into(),
        instructions: instructions.into(),
    }
}

/// Builds the default catalog of built-in exercise records
pub fn build_default_catalog() -> ExerciseCatalog {
    let exercises = vec![
        // ====================================================================
        // Strength
        // ====================================================================
        exercise(
            "pushup",
            "Push-up",
            &["chest"],
            &["triceps", "shoulders"],
            "body only",
            "strength",
            "beginner",
            "Lower your chest to the floor and press back up, keeping a straight line from head to heels.",
        ),
        exercise(
            "db_bench_press",
            "Dumbbell Bench Press",
            &["chest"],
            &["triceps", "shoulders"],
            "dumbbell",
            "strength",
            "beginner",
            "Press the dumbbells from chest level to full extension, then lower under control.",
        ),
        exercise(
            "db_fly",
            "Dumbbell Fly",
            &["chest"],
            &["shoulders"],
            "dumbbell",
            "strength",
            "intermediate",
            "With a slight elbow bend, open the arms wide and squeeze the dumbbells back together over the chest.",
        ),
        exercise(
            "db_shoulder_press",
            "Dumbbell Shoulder Press",
            &["shoulders"],
            &["triceps"],
            "dumbbell",
            "strength",
            "beginner",
            "Press the dumbbells overhead from shoulder height without arching the lower back.",
        ),
        exercise(
            "db_lateral_raise",
            "Dumbbell Lateral Raise",
            &["shoulders"],
            &[],
            "dumbbell",
            "strength",
            "beginner",
            "Raise the dumbbells out to the sides to shoulder height with a soft elbow bend.",
        ),
        exercise(
            "db_triceps_extension",
            "Overhead Triceps Extension",
            &["triceps"],
            &["shoulders"],
            "dumbbell",
            "strength",
            "beginner",
            "Hold one dumbbell overhead with both hands and bend the elbows to lower it behind the head.",
        ),
        exercise(
            "bench_dip",
            "Bench Dip",
            &["triceps"],
            &["chest", "shoulders"],
            "body only",
            "strength",
            "beginner",
            "With hands on a bench behind you, lower the hips by bending the elbows, then press back up.",
        ),
        exercise(
            "db_row",
            "One-Arm Dumbbell Row",
            &["back"],
            &["biceps", "forearms"],
            "dumbbell",
            "strength",
            "beginner",
            "Brace one hand on a bench and row the dumbbell to your hip, leading with the elbow.",
        ),
        exercise(
            "superman",
            "Superman",
            &["back"],
            &["glutes"],
            "body only",
            "strength",
            "beginner",
            "Lying face down, lift arms and legs off the floor and hold briefly.",
        ),
        exercise(
            "db_pullover",
            "Dumbbell Pullover",
            &["back"],
            &["chest"],
            "dumbbell",
            "strength",
            "intermediate",
            "Lying on a bench, lower one dumbbell in an arc behind your head and pull it back over the chest.",
        ),
        exercise(
            "db_curl",
            "Dumbbell Curl",
            &["biceps"],
            &["forearms"],
            "dumbbell",
            "strength",
            "beginner",
            "Curl the dumbbells to shoulder height without swinging the torso.",
        ),
        exercise(
            "hammer_curl",
            "Hammer Curl",
            &["biceps"],
            &["forearms"],
            "dumbbell",
            "strength",
            "beginner",
            "Curl with a neutral grip, palms facing each other throughout.",
        ),
        exercise(
            "goblet_squat",
            "Goblet Squat",
            &["quadriceps"],
            &["glutes", "hamstrings"],
            "dumbbell",
            "strength",
            "beginner",
            "Hold a dumbbell at your chest and squat until the elbows touch the knees.",
        ),
        exercise(
            "bw_squat",
            "Bodyweight Squat",
            &["quadriceps"],
            &["glutes"],
            "body only",
            "strength",
            "beginner",
            "Squat to parallel with arms extended forward for balance.",
        ),
        exercise(
            "db_lunge",
            "Dumbbell Lunge",
            &["quadriceps"],
            &["glutes", "hamstrings"],
            "dumbbell",
            "strength",
            "beginner",
            "Step forward and lower the back knee toward the floor, then drive back to standing.",
        ),
        exercise(
            "db_rdl",
            "Dumbbell Romanian Deadlift",
            &["hamstrings"],
            &["glutes", "back"],
            "dumbbell",
            "strength",
            "intermediate",
            "Hinge at the hips with a flat back, lowering the dumbbells along the thighs.",
        ),
        exercise(
            "glute_bridge",
            "Glute Bridge",
            &["glutes"],
            &["hamstrings"],
            "body only",
            "strength",
            "beginner",
            "Lying on your back, drive through the heels to lift the hips until the body forms a straight line.",
        ),
        exercise(
            "db_calf_raise",
            "Dumbbell Calf Raise",
            &["calves"],
            &[],
            "dumbbell",
            "strength",
            "beginner",
            "Holding dumbbells at your sides, rise onto the balls of your feet and lower slowly.",
        ),
        exercise(
            "plank",
            "Plank",
            &["abdominals"],
            &["shoulders"],
            "body only",
            "strength",
            "beginner",
            "Hold a straight line from head to heels on forearms and toes.",
        ),
        exercise(
            "crunch",
            "Crunch",
            &["abdominals"],
            &[],
            "body only",
            "strength",
            "beginner",
            "Curl the shoulders off the floor, keeping the lower back down.",
        ),
        // ====================================================================
        // Powerlifting
        // ====================================================================
        exercise(
            "bb_bench_press",
            "Barbell Bench Press",
            &["chest"],
            &["triceps", "shoulders"],
            "barbell",
            "powerlifting",
            "intermediate",
            "Lower the bar to the chest with the feet planted and press to lockout.",
        ),
        exercise(
            "bb_back_squat",
            "Barbell Back Squat",
            &["quadriceps"],
            &["glutes", "hamstrings"],
            "barbell",
            "powerlifting",
            "intermediate",
            "With the bar on your upper back, squat below parallel and stand back up.",
        ),
        exercise(
            "bb_deadlift",
            "Barbell Deadlift",
            &["hamstrings"],
            &["back", "glutes", "forearms"],
            "barbell",
            "powerlifting",
            "expert",
            "Hinge down to the bar with a neutral spine and stand up by driving the hips forward.",
        ),
        // ====================================================================
        // Strongman
        // ====================================================================
        exercise(
            "farmers_walk",
            "Farmer's Walk",
            &["forearms"],
            &["shoulders", "abdominals"],
            "dumbbell",
            "strongman",
            "beginner",
            "Carry heavy dumbbells at your sides for distance, staying tall.",
        ),
        exercise(
            "db_clean_press",
            "Dumbbell Clean and Press",
            &["shoulders"],
            &["quadriceps", "glutes"],
            "dumbbell",
            "strongman",
            "intermediate",
            "Clean the dumbbells to the shoulders in one motion, then press overhead.",
        ),
        // ====================================================================
        // Cardio
        // ====================================================================
        exercise(
            "jumping_jack",
            "Jumping Jack",
            &["quadriceps"],
            &["calves", "shoulders"],
            "body only",
            "cardio",
            "beginner",
            "Jump the feet wide while raising the arms overhead, then return.",
        ),
        exercise(
            "high_knees",
            "High Knees",
            &["quadriceps"],
            &["calves", "abdominals"],
            "body only",
            "cardio",
            "beginner",
            "Run in place, driving the knees to hip height.",
        ),
        exercise(
            "mountain_climber",
            "Mountain Climber",
            &["abdominals"],
            &["shoulders", "quadriceps"],
            "body only",
            "cardio",
            "beginner",
            "From a push-up position, drive the knees toward the chest alternately at pace.",
        ),
        exercise(
            "burpee",
            "Burpee",
            &["chest"],
            &["quadriceps", "abdominals"],
            "body only",
            "cardio",
            "intermediate",
            "Drop to a push-up, return to standing, and jump with arms overhead.",
        ),
        // ====================================================================
        // Plyometrics
        // ====================================================================
        exercise(
            "jump_squat",
            "Jump Squat",
            &["quadriceps"],
            &["glutes", "calves"],
            "body only",
            "plyometrics",
            "beginner",
            "Squat down and explode upward into a jump, landing softly.",
        ),
        exercise(
            "box_jump",
            "Box Jump",
            &["quadriceps"],
            &["glutes", "calves"],
            "other",
            "plyometrics",
            "intermediate",
            "Jump onto a stable box, stand fully, and step back down.",
        ),
        // ====================================================================
        // Stretching
        // ====================================================================
        exercise(
            "hamstring_stretch",
            "Standing Hamstring Stretch",
            &["hamstrings"],
            &[],
            "body only",
            "stretching",
            "beginner",
            "With one heel forward and leg straight, hinge at the hips until a stretch is felt.",
        ),
        exercise(
            "quad_stretch",
            "Standing Quad Stretch",
            &["quadriceps"],
            &[],
            "body only",
            "stretching",
            "beginner",
            "Pull one foot toward the glutes, keeping the knees together.",
        ),
        exercise(
            "childs_pose",
            "Child's Pose",
            &["back"],
            &["shoulders"],
            "body only",
            "stretching",
            "beginner",
            "Sit back on the heels with arms extended forward, letting the chest sink.",
        ),
        exercise(
            "doorway_chest_stretch",
            "Doorway Chest Stretch",
            &["chest"],
            &["shoulders"],
            "body only",
            "stretching",
            "beginner",
            "With a forearm on the door frame, step forward until the chest opens.",
        ),
        exercise(
            "cobra_stretch",
            "Cobra Stretch",
            &["abdominals"],
            &["back"],
            "body only",
            "stretching",
            "beginner",
            "From lying face down, press the chest up while keeping the hips on the floor.",
        ),
        exercise(
            "cross_body_shoulder_stretch",
            "Cross-Body Shoulder Stretch",
            &["shoulders"],
            &[],
            "body only",
            "stretching",
            "beginner",
            "Pull one arm across the chest with the opposite hand.",
        ),
    ];

    ExerciseCatalog { exercises }
}

/// Load a catalog from an external JSON dump (an array of exercise records).
///
/// Malformed records are logged and skipped; an unreadable or unparsable
/// file is an error.
pub fn load_catalog(path: &Path) -> Result<ExerciseCatalog> {
    let contents = std::fs::read_to_string(path)?;
    let raw: Vec<serde_json::Value> = serde_json::from_str(&contents)?;

    let mut exercises = Vec::with_capacity(raw.len());
    for value in raw {
        match serde_json::from_value::<ExerciseRecord>(value) {
            Ok(record) => exercises.push(record),
            Err(e) => {
                tracing::warn!("Skipping malformed exercise record: {}", e);
            }
        }
    }

    tracing::info!("Loaded {} exercises from {:?}", exercises.len(), path);
    Ok(ExerciseCatalog { exercises })
}

impl ExerciseCatalog {
    /// Validate the catalog for consistency and completeness
    ///
    /// Returns a list of validation errors, or empty Vec if valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let mut seen_ids = std::collections::HashSet::new();

        for record in &self.exercises {
            if record.id.is_empty() {
                errors.push(format!("Exercise '{}' has empty ID", record.name));
            }
            if !seen_ids.insert(record.id.clone()) {
                errors.push(format!("Duplicate exercise ID '{}'", record.id));
            }
            if record.name.is_empty() {
                errors.push(format!("Exercise '{}' has empty name", record.id));
            }
            if record.primary_muscles.is_empty() {
                errors.push(format!("Exercise '{}' has no primary muscles", record.id));
            }
            if record.category.is_empty() {
                errors.push(format!("Exercise '{}' has empty category", record.id));
            }
            if record.level.is_empty() {
                errors.push(format!("Exercise '{}' has empty level", record.id));
            }
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_validates() {
        let catalog = build_default_catalog();
        let errors = catalog.validate();
        assert!(
            errors.is_empty(),
            "Default catalog has validation errors: {:?}",
            errors
        );
    }

    #[test]
    fn test_default_catalog_covers_all_goal_categories() {
        let catalog = build_default_catalog();
        for category in [
            "strength",
            "powerlifting",
            "strongman",
            "cardio",
            "plyometrics",
            "stretching",
        ] {
            assert!(
                catalog.exercises.iter().any(|e| e.category == category),
                "Catalog has no '{}' exercises",
                category
            );
        }
    }

    #[test]
    fn test_default_catalog_has_beginner_dumbbell_coverage() {
        // Beginner + dumbbell-only users must be able to fill a full split
        let catalog = build_default_catalog();
        for muscle in [
            "chest",
            "shoulders",
            "triceps",
            "back",
            "biceps",
            "quadriceps",
            "hamstrings",
            "glutes",
        ] {
            let covered = catalog.exercises.iter().any(|e| {
                e.level == "beginner"
                    && (e.equipment == "body only" || e.equipment == "dumbbell")
                    && (e.primary_muscles.iter().any(|m| m == muscle)
                        || e.secondary_muscles.iter().any(|m| m == muscle))
            });
            assert!(covered, "No beginner dumbbell/bodyweight exercise for {}", muscle);
        }
    }

    #[test]
    fn test_load_catalog_skips_malformed_records() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("exercises.json");

        let json = r#"[
            {
                "id": "pushup",
                "name": "Push-up",
                "primary_muscles": ["chest"],
                "secondary_muscles": ["triceps"],
                "equipment": "body only",
                "category": "strength",
                "level": "beginner",
                "instructions": "Press up."
            },
            { "id": "broken" }
        ]"#;
        std::fs::write(&path, json).unwrap();

        let catalog = load_catalog(&path).unwrap();
        assert_eq!(catalog.exercises.len(), 1);
        assert_eq!(catalog.exercises[0].id, "pushup");
    }

    #[test]
    fn test_load_catalog_missing_file_is_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        assert!(load_catalog(&temp_dir.path().join("missing.json")).is_err());
    }

    #[test]
    fn test_validate_flags_duplicates() {
        let mut catalog = build_default_catalog();
        let duplicate = catalog.exercises[0].clone();
        catalog.exercises.push(duplicate);
        let errors = catalog.validate();
        assert!(errors.iter().any(|e| e.contains("Duplicate")));
    }
}
