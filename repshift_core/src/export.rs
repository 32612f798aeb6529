//! Timeline CSV export.
//!
//! Writes the user's dated entries to a CSV file for backup or inspection.

use crate::{DatedExerciseEntry, Result};
use csv::WriterBuilder;
use std::path::Path;

/// Export entries to CSV, oldest first. Returns the number of rows written.
pub fn export_timeline_csv(entries: &[DatedExerciseEntry], path: &Path) -> Result<usize> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut sorted: Vec<&DatedExerciseEntry> = entries.iter().collect();
    sorted.sort_by_key(|e| (e.date, e.exercise_name.clone()));

    let mut writer = WriterBuilder::new().has_headers(true).from_path(path)?;
    writer.write_record(["date", "workout", "exercise", "sets", "reps", "status"])?;

    for entry in &sorted {
        let status = if entry.completion_status.is_complete() {
            "complete"
        } else {
            "incomplete"
        };
        writer.write_record([
            entry.date.to_string().as_str(),
            entry.workout_title.as_str(),
            entry.exercise_name.as_str(),
            entry.instructions.sets.to_string().as_str(),
            entry.instructions.reps.as_str(),
            status,
        ])?;
    }

    writer.flush()?;
    tracing::info!("Exported {} timeline rows to {:?}", sorted.len(), path);
    Ok(sorted.len())
}
