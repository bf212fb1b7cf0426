//! Basic CLI E2E tests.
//!
//! Tests invoke the built binary against a throwaway data directory and
//! verify the JSON it prints.

use std::path::Path;
use std::process::Command;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(home: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_streakguard-cli"))
        .env("STREAKGUARD_HOME", home)
        .env_remove("RUST_LOG")
        .args(args)
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn run_json(home: &Path, args: &[&str]) -> serde_json::Value {
    let (stdout, stderr, code) = run_cli(home, args);
    assert_eq!(code, 0, "CLI command failed: {args:?}\n{stderr}");
    serde_json::from_str(&stdout).expect("Failed to parse JSON output")
}

#[test]
fn test_status_on_fresh_home() {
    let home = tempfile::tempdir().unwrap();
    let status = run_json(home.path(), &["status"]);
    assert_eq!(status["currentStreak"], 0);
    assert_eq!(status["inventory"]["freeFreezeAvailable"], true);
    assert_eq!(status["repairAvailable"], false);
}

#[test]
fn test_show_up_then_covered_gap() {
    let home = tempfile::tempdir().unwrap();
    let h = home.path();

    run_json(h, &["show-up", "--now", "2026-01-01T09:00:00+00:00"]);
    run_json(h, &["show-up", "--now", "2026-01-02T09:00:00+00:00"]);

    let out = run_json(h, &["evaluate", "--now", "2026-01-04T09:00:00+00:00"]);
    assert_eq!(out["status"], "covered");
    assert_eq!(out["used_free"], 1);
    assert_eq!(out["broke"], false);
    assert_eq!(out["event"]["type"], "freeze_used");

    // Idempotent for the rest of the day.
    let again = run_json(h, &["evaluate", "--now", "2026-01-04T21:00:00+00:00"]);
    assert_eq!(again["status"], "already_evaluated");
    assert_eq!(again["covered_days"], 0);

    let status = run_json(h, &["status", "--now", "2026-01-04T21:00:00+00:00"]);
    assert_eq!(status["lastStreakDateKey"], "2026-01-03");
    assert_eq!(status["currentStreak"], 2);
}

#[test]
fn test_show_up_after_one_missed_day_keeps_streak() {
    let home = tempfile::tempdir().unwrap();
    let h = home.path();

    run_json(h, &["show-up", "--now", "2026-01-05T09:00:00+00:00"]);
    // Jan 6 missed: the free freeze covers it before Jan 7 is counted.
    let out = run_json(h, &["show-up", "--now", "2026-01-07T09:00:00+00:00"]);
    assert_eq!(out["counted"], true);
    assert_eq!(out["current_streak"], 2);
    assert_eq!(out["current_covered_streak"], 3);
    assert_eq!(out["inventory"]["freeFreezeAvailable"], false);
    assert_eq!(out["inventory"]["lastEvent"]["type"], "freeze_used");

    let status = run_json(h, &["status", "--now", "2026-01-07T10:00:00+00:00"]);
    assert_eq!(status["lastStreakDateKey"], "2026-01-07");
    assert_eq!(status["inventory"]["lastEvaluatedThroughDateKey"], "2026-01-06");
}

#[test]
fn test_break_and_refused_repair() {
    let home = tempfile::tempdir().unwrap();
    let h = home.path();

    run_json(h, &["show-up", "--now", "2026-01-01T09:00:00+00:00"]);
    let out = run_json(h, &["evaluate", "--now", "2026-01-05T09:00:00+00:00"]);
    assert_eq!(out["broke"], true);
    assert_eq!(out["break_state"]["brokenAtDateKey"], "2026-01-03");

    let status = run_json(h, &["status", "--now", "2026-01-05T10:00:00+00:00"]);
    assert_eq!(status["repairAvailable"], true);

    let (_, stderr, code) = run_cli(h, &["repair", "--now", "2026-01-05T10:00:00+00:00"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("shields"), "unexpected stderr: {stderr}");
}

#[test]
fn test_pro_toggle_and_config() {
    let home = tempfile::tempdir().unwrap();
    let h = home.path();

    let (stdout, _, code) = run_cli(h, &["pro", "on"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("pro: on"));
    assert_eq!(run_json(h, &["status"])["isPro"], true);

    let (stdout, _, code) = run_cli(h, &["config", "get", "protection.max_shields"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "3");

    let (_, _, code) = run_cli(h, &["config", "set", "protection.max_shields", "5"]);
    assert_eq!(code, 0);
    let listed = run_json(h, &["config", "list"]);
    assert_eq!(listed["protection"]["max_shields"], 5);

    let (_, _, code) = run_cli(h, &["config", "set", "protection.repair_shield_cost", "0"]);
    assert_ne!(code, 0);

    let (stdout, _, code) = run_cli(h, &["config", "keys"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("protection.max_shields = 5"), "unexpected keys: {stdout}");
    assert!(stdout.contains("protection.repair_window_hours = 48"));

    let (_, stderr, code) = run_cli(h, &["config", "get", "protection.nope"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("Unknown configuration key"), "unexpected stderr: {stderr}");
}

#[test]
fn test_bad_now_is_rejected() {
    let home = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(home.path(), &["evaluate", "--now", "yesterday"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("RFC 3339"));
}
