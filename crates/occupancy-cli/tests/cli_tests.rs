//! Integration tests for the `occupancy` CLI binary.
//!
//! These tests use `assert_cmd` and `predicates` to exercise the segments,
//! conflicts and suggest subcommands through the actual binary, including
//! stdin input, config files, and error handling.

// `Command::cargo_bin` was deprecated in assert_cmd 2.1.2 in favor of
// `cargo::cargo_bin_cmd!`. Allow it until we migrate.
#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;

/// Helper: path to the week.json fixture.
fn week_json_path() -> &'static str {
    concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/week.json")
}

/// Helper: run the binary with `args` and parse its stdout as JSON.
fn run_json(args: &[&str]) -> Value {
    let output = Command::cargo_bin("occupancy")
        .unwrap()
        .args(args)
        .output()
        .expect("binary must run");
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout must be JSON")
}

fn classes(day: &Value) -> Vec<String> {
    day["segments"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["classification"].as_str().unwrap().to_string())
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Segments subcommand
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn segments_classify_current_task_and_overlap() {
    let days = run_json(&[
        "segments",
        "-i",
        week_json_path(),
        "--date",
        "2026-03-16",
        "--current-task",
        "t1",
    ]);

    let days = days.as_array().unwrap();
    assert_eq!(days.len(), 1);
    assert_eq!(days[0]["date"], "2026-03-16");
    assert_eq!(
        classes(&days[0]),
        vec![
            "free",
            "current_task",
            "external_event",
            "overlap",
            "own_event",
            "free",
            "own_event",
            "free",
        ]
    );

    let overlap = &days[0]["segments"][3];
    assert_eq!(overlap["interval"]["start"], "2026-03-16T10:30:00Z");
    assert_eq!(overlap["interval"]["end"], "2026-03-16T11:00:00Z");
    assert_eq!(overlap["is_occupied"], true);
}

#[test]
fn segments_same_category_without_current_task() {
    let days = run_json(&[
        "segments",
        "-i",
        week_json_path(),
        "--date",
        "2026-03-16",
        "--current-category",
        "work",
    ]);

    let segments = classes(&days[0]);
    assert_eq!(segments[1], "same_category");
    assert_eq!(segments[4], "same_category");
}

#[test]
fn segments_multiple_days() {
    let days = run_json(&[
        "segments",
        "-i",
        week_json_path(),
        "--date",
        "2026-03-16",
        "--days",
        "3",
    ]);

    let days = days.as_array().unwrap();
    assert_eq!(days.len(), 3);
    assert_eq!(classes(&days[1]), vec!["external_event", "free"]);
    assert_eq!(classes(&days[2]), vec!["free"]);
}

#[test]
fn segments_read_from_stdin() {
    let input = r#"{"events":[{"id":"e","starts_at":"2026-03-16T09:00:00Z","ends_at":"2026-03-16T10:00:00Z","is_external":true}]}"#;

    Command::cargo_bin("occupancy")
        .unwrap()
        .args(["segments", "--date", "2026-03-16"])
        .write_stdin(input)
        .assert()
        .success()
        .stdout(predicate::str::contains("external_event"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Conflicts subcommand
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn conflicts_report_overlap_intervals() {
    let report = run_json(&[
        "conflicts",
        "-i",
        week_json_path(),
        "--start",
        "2026-03-16T09:30:00",
        "--end",
        "2026-03-16T10:30:00Z",
    ]);

    let conflicts = report["conflicts"].as_array().unwrap();
    assert_eq!(conflicts.len(), 2);
    assert_eq!(conflicts[0]["commitment"]["source"]["kind"], "task");
    assert_eq!(conflicts[0]["commitment"]["source"]["task_id"], "t1");
    assert_eq!(conflicts[0]["overlap"]["start"], "2026-03-16T09:30:00Z");
    assert_eq!(conflicts[0]["overlap"]["end"], "2026-03-16T10:00:00Z");
    assert_eq!(conflicts[1]["commitment"]["source"]["kind"], "event");
    assert_eq!(conflicts[1]["commitment"]["source"]["event_id"], "e1");
}

#[test]
fn conflicts_exclude_edited_task() {
    let report = run_json(&[
        "conflicts",
        "-i",
        week_json_path(),
        "--start",
        "2026-03-16T09:30:00",
        "--end",
        "2026-03-16T10:30:00",
        "--exclude-task",
        "t1",
    ]);

    let conflicts = report["conflicts"].as_array().unwrap();
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0]["commitment"]["source"]["event_id"], "e1");
}

#[test]
fn conflicts_adjacent_candidate_is_clear() {
    let report = run_json(&[
        "conflicts",
        "-i",
        week_json_path(),
        "--start",
        "2026-03-16T11:30:00",
        "--end",
        "2026-03-16T14:00:00",
    ]);

    assert!(report["conflicts"].as_array().unwrap().is_empty());
}

#[test]
fn conflicts_reject_inverted_candidate() {
    Command::cargo_bin("occupancy")
        .unwrap()
        .args([
            "conflicts",
            "-i",
            week_json_path(),
            "--start",
            "2026-03-16T12:00:00",
            "--end",
            "2026-03-16T11:00:00",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid candidate interval"));
}

#[test]
fn config_file_changes_default_task_duration() {
    let config_path = "/tmp/occupancy-test-config.toml";
    std::fs::write(config_path, "default_task_minutes = 30\n").unwrap();

    // With 30-minute defaults, t2 ends at 11:00 and no longer reaches 11:00-11:30.
    let report = run_json(&[
        "--config",
        config_path,
        "conflicts",
        "-i",
        week_json_path(),
        "--start",
        "2026-03-16T11:00:00",
        "--end",
        "2026-03-16T11:30:00",
    ]);
    assert!(report["conflicts"].as_array().unwrap().is_empty());

    let _ = std::fs::remove_file(config_path);
}

// ─────────────────────────────────────────────────────────────────────────────
// Suggest subcommand
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn suggest_within_window_with_limit() {
    let result = run_json(&[
        "suggest",
        "-i",
        week_json_path(),
        "--duration",
        "120",
        "--from",
        "2026-03-16",
        "--days",
        "2",
        "--window",
        "8-22",
        "--limit",
        "1",
    ]);

    let suggestions = result["suggestions"].as_array().unwrap();
    assert_eq!(suggestions.len(), 1);
    assert_eq!(suggestions[0]["interval"]["start"], "2026-03-16T11:30:00Z");
    assert_eq!(suggestions[0]["interval"]["end"], "2026-03-16T13:30:00Z");
    assert_eq!(suggestions[0]["duration_minutes"], 120);
    assert_eq!(result["daily"].as_array().unwrap().len(), 2);
}

#[test]
fn suggest_duration_too_large_keeps_daily_free_time() {
    let result = run_json(&[
        "suggest",
        "-i",
        week_json_path(),
        "--duration",
        "90",
        "--from",
        "2026-03-17",
        "--days",
        "1",
    ]);

    assert!(result["suggestions"].as_array().unwrap().is_empty());
    assert_eq!(result["daily"][0]["has_free_time"], true);
    assert_eq!(result["daily"][0]["total_free_hours"], 1.0);
}

#[test]
fn suggest_huge_duration_returns_no_suggestions() {
    let result = run_json(&[
        "suggest",
        "-i",
        week_json_path(),
        "--duration",
        "9223372036854775807",
        "--from",
        "2026-03-16",
        "--days",
        "2",
    ]);

    assert!(result["suggestions"].as_array().unwrap().is_empty());
    assert_eq!(result["daily"].as_array().unwrap().len(), 2);
}

#[test]
fn suggest_rejects_bad_window() {
    Command::cargo_bin("occupancy")
        .unwrap()
        .args([
            "suggest",
            "-i",
            week_json_path(),
            "--duration",
            "30",
            "--window",
            "22-8",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid activity window"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Error handling
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn missing_input_file_fails() {
    Command::cargo_bin("occupancy")
        .unwrap()
        .args(["segments", "-i", "/nonexistent/week.json", "--date", "2026-03-16"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read file"));
}

#[test]
fn malformed_json_fails() {
    Command::cargo_bin("occupancy")
        .unwrap()
        .args(["segments", "--date", "2026-03-16"])
        .write_stdin("not json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse input JSON"));
}
