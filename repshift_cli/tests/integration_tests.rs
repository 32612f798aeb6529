//! Integration tests for repshift_cli.
//!
//! These drive the real binary against a temp data directory:
//! - plan generation writes sessions and a timeline
//! - set-date shifts incomplete entries forward
//! - completed entries stay in place
//! - export produces a CSV

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn cli() -> Command {
    Command::cargo_bin("repshift").expect("Failed to find repshift binary")
}

fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Generate the standard test plan: 3-day beginner muscle gain starting
/// Monday 2024-06-03, with a fixed seed for reproducible selection.
fn seed_plan(data_dir: &std::path::Path) {
    cli()
        .arg("plan")
        .arg("--data-dir")
        .arg(data_dir)
        .arg("--goal")
        .arg("muscle_gain")
        .arg("--level")
        .arg("beginner")
        .arg("--days")
        .arg("3")
        .arg("--equipment")
        .arg("dumbbell")
        .arg("--start")
        .arg("2024-06-03")
        .arg("--seed")
        .arg("7")
        .assert()
        .success();
}

#[test]
fn test_plan_prints_program_name() {
    let temp_dir = setup_test_dir();

    cli()
        .arg("plan")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .arg("--goal")
        .arg("muscle_gain")
        .arg("--level")
        .arg("beginner")
        .arg("--days")
        .arg("3")
        .arg("--equipment")
        .arg("dumbbell")
        .arg("--start")
        .arg("2024-06-03")
        .arg("--seed")
        .arg("7")
        .assert()
        .success()
        .stdout(predicate::str::contains("2 Month Muscle Gain Program"))
        .stdout(predicate::str::contains("8 weeks"));
}

#[test]
fn test_plan_creates_timeline_entries() {
    let temp_dir = setup_test_dir();
    seed_plan(temp_dir.path());

    cli()
        .arg("timeline")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("2024-06-03"))
        .stdout(predicate::str::contains("Push Day"))
        .stdout(predicate::str::contains("Pull Day"))
        .stdout(predicate::str::contains("Leg Day"));
}

#[test]
fn test_set_date_shifts_incomplete_entries_forward() {
    let temp_dir = setup_test_dir();
    seed_plan(temp_dir.path());

    cli()
        .arg("set-date")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .arg("2024-06-10")
        .assert()
        .success()
        .stdout(predicate::str::contains("2024-06-10"));

    // Everything was incomplete, so the whole timeline moved 7 days forward
    cli()
        .arg("timeline")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("2024-06-10"))
        .stdout(predicate::str::contains("2024-06-03").not());
}

#[test]
fn test_completed_entries_stay_in_place() {
    let temp_dir = setup_test_dir();
    seed_plan(temp_dir.path());

    cli()
        .arg("complete")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .arg("2024-06-03")
        .assert()
        .success()
        .stdout(predicate::str::contains("complete"));

    cli()
        .arg("set-date")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .arg("2024-06-10")
        .assert()
        .success();

    // The completed Monday session keeps its date; the rest shifted
    cli()
        .arg("timeline")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("2024-06-03"))
        .stdout(predicate::str::contains("2024-06-10"));
}

#[test]
fn test_set_date_then_today_shows_session() {
    let temp_dir = setup_test_dir();
    seed_plan(temp_dir.path());

    cli()
        .arg("set-date")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .arg("2024-06-03")
        .assert()
        .success();

    cli()
        .arg("today")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Push Day"));
}

#[test]
fn test_sync_without_plan_reports_no_timeline() {
    let temp_dir = setup_test_dir();

    cli()
        .arg("set-date")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .arg("2024-06-03")
        .assert()
        .success();

    cli()
        .arg("sync")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No timeline found"));
}

#[test]
fn test_repeated_sync_is_idempotent() {
    let temp_dir = setup_test_dir();
    seed_plan(temp_dir.path());

    cli()
        .arg("set-date")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .arg("2024-06-12")
        .assert()
        .success();

    // The first explicit sync after the shift is already aligned, and so is
    // every one after it
    for _ in 0..2 {
        cli()
            .arg("sync")
            .arg("--data-dir")
            .arg(temp_dir.path())
            .assert()
            .success()
            .stdout(predicate::str::contains("aligned"));
    }
}

#[test]
fn test_export_writes_csv() {
    let temp_dir = setup_test_dir();
    seed_plan(temp_dir.path());

    let csv_path = temp_dir.path().join("timeline.csv");
    cli()
        .arg("export")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .arg(&csv_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported"));

    let contents = std::fs::read_to_string(&csv_path).expect("Failed to read CSV");
    let mut lines = contents.lines();
    assert_eq!(
        lines.next(),
        Some("date,workout,exercise,sets,reps,status")
    );
    assert!(lines.next().is_some(), "CSV has no data rows");
}

#[test]
fn test_unknown_goal_is_rejected() {
    let temp_dir = setup_test_dir();

    cli()
        .arg("plan")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .arg("--goal")
        .arg("cardio_blast")
        .arg("--level")
        .arg("beginner")
        .arg("--days")
        .arg("3")
        .assert()
        .failure();
}

#[test]
fn test_unsupported_days_is_rejected() {
    let temp_dir = setup_test_dir();

    cli()
        .arg("plan")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .arg("--goal")
        .arg("muscle_gain")
        .arg("--level")
        .arg("beginner")
        .arg("--days")
        .arg("6")
        .arg("--equipment")
        .arg("dumbbell")
        .assert()
        .failure();
}
