//! Malformed-data tests for the progress binary.
//!
//! These tests verify the system handles:
//! - Missing record files (treated as empty)
//! - Malformed record files (fatal, file left untouched)
//! - Files written by older versions of the tracker

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const HEADER: &str =
    "Date,Breakfast,Snack,Lunch,Dinner,Shake,Water,Exercise,Calories,Protein,Weight\n";

fn cli(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("progress"));
    cmd.arg("--data-dir")
        .arg(dir)
        .arg("--config")
        .arg(dir.join("config.toml"));
    cmd
}

fn setup_test_dir() -> TempDir {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    fs::write(dir.path().join("config.toml"), "").expect("Failed to write config");
    dir
}

#[test]
fn test_missing_data_dir_is_created_on_log() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().join("nested").join("data");

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("progress"));
    cmd.arg("--data-dir")
        .arg(&data_dir)
        .arg("--config")
        .arg(temp_dir.path().join("config.toml"))
        .args(["log", "--date", "2024-03-01", "--calories", "2000"])
        .assert()
        .success();

    assert!(data_dir.join("progress.csv").exists());
}

#[test]
fn test_wrong_columns_is_fatal() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    let csv_path = data_dir.join("progress.csv");

    let original = "Date,Calories\n2024-03-01,2000\n";
    fs::write(&csv_path, original).unwrap();

    cli(data_dir)
        .arg("dashboard")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Expected columns"));

    // Logging must not overwrite the malformed file
    cli(data_dir)
        .args(["log", "--date", "2024-03-02", "--calories", "1800"])
        .assert()
        .failure();

    assert_eq!(fs::read_to_string(&csv_path).unwrap(), original);
}

#[test]
fn test_unparseable_date_is_fatal() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    fs::write(
        data_dir.join("progress.csv"),
        format!(
            "{}not-a-date,true,true,true,true,true,true,true,2000,100,90\n",
            HEADER
        ),
    )
    .unwrap();

    cli(data_dir)
        .arg("dashboard")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid date"));
}

#[test]
fn test_unparseable_boolean_is_fatal() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    fs::write(
        data_dir.join("progress.csv"),
        format!("{}2024-03-01,yes,true,true,true,true,true,true,2000,100,90\n", HEADER),
    )
    .unwrap();

    cli(data_dir)
        .arg("dashboard")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid boolean"));
}

#[test]
fn test_truncated_row_is_fatal() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    // Simulates a crash in the middle of a write
    fs::write(
        data_dir.join("progress.csv"),
        format!(
            "{}2024-03-01,true,true,true,true,true,true,true,2000,100,90\n2024-03-02,true,fa",
            HEADER
        ),
    )
    .unwrap();

    cli(data_dir).arg("dashboard").assert().failure();
}

#[test]
fn test_legacy_file_is_readable_and_rewritten() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    let csv_path = data_dir.join("progress.csv");

    // Capitalized booleans, integer numbers, timestamped dates, empty weight
    fs::write(
        &csv_path,
        format!(
            "{}2024-03-01 00:00:00,True,True,True,True,False,True,False,1800,150,96.0\n\
             2024-03-02,False,False,True,True,False,False,True,2200,90,\n",
            HEADER
        ),
    )
    .unwrap();

    cli(data_dir)
        .args(["dashboard", "--calories", "1800"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Full meals: 1/2 days"))
        .stdout(predicate::str::contains("Exercise done: 1/2 days"));

    log_and_check(data_dir);

    let csv = fs::read_to_string(&csv_path).unwrap();
    assert!(csv.contains("2024-03-01,true,true,true,true,false,true,false,1800.0,150.0,96.0"));
    assert!(csv.contains("2024-03-02,false,false,true,true,false,false,true,2200.0,90.0,0.0"));
    assert!(csv.contains("2024-03-03,"));
}

fn log_and_check(data_dir: &Path) {
    cli(data_dir)
        .args(["log", "--date", "2024-03-03", "--calories", "1900"])
        .assert()
        .success()
        .stdout(predicate::str::contains("3 days tracked"));
}

#[test]
fn test_invalid_config_is_fatal() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    fs::write(data_dir.join("config.toml"), "[profile\nage = ").unwrap();

    cli(data_dir)
        .arg("dashboard")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Toml"));
}
