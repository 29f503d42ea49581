//! Basic CLI E2E tests.
//!
//! Each test runs the `hydrate` binary against its own temporary data
//! directory and checks the printed output.

mod common;

use common::{assert_contains, parse_json, run_cli, run_cli_failure, run_cli_success};
use serde_json::Value;

#[test]
fn test_first_run_prints_welcome_once() {
    let home = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(home.path(), &["status"]);
    assert_eq!(code, 0);
    assert_contains(&stderr, "Welcome to hydrate");

    let (_, stderr, _) = run_cli(home.path(), &["status"]);
    assert!(!stderr.contains("Welcome"));
}

#[test]
fn test_status_json_defaults() {
    let home = tempfile::tempdir().unwrap();
    let stdout = run_cli_success(home.path(), &["status", "--json"]);
    let state: Value = parse_json(&stdout);
    assert_eq!(state["daily_count"], 0);
    assert_eq!(state["daily_goal"], 8);
    assert_eq!(state["remaining_seconds"], 1800);
    assert_eq!(state["is_running"], false);
    assert_eq!(state["sound_type"], "alarm-1");
}

#[test]
fn test_start_pause_resume_stop() {
    let home = tempfile::tempdir().unwrap();

    let state: Value = parse_json(&run_cli_success(home.path(), &["start", "--minutes", "45"]));
    assert_eq!(state["is_running"], true);
    assert_eq!(state["total_seconds"], 2700);

    let state: Value = parse_json(&run_cli_success(home.path(), &["pause"]));
    assert_eq!(state["is_paused"], true);

    let state: Value = parse_json(&run_cli_success(home.path(), &["start"]));
    assert_eq!(state["is_paused"], false);
    assert_eq!(state["total_seconds"], 2700, "start resumes a paused timer");

    let state: Value = parse_json(&run_cli_success(home.path(), &["stop"]));
    assert_eq!(state["is_running"], false);

    let state: Value = parse_json(&run_cli_success(home.path(), &["reset"]));
    assert_eq!(state["remaining_seconds"], 1800);
}

#[test]
fn test_drink_counts_toward_goal() {
    let home = tempfile::tempdir().unwrap();
    run_cli_success(home.path(), &["config", "set", "daily_goal", "2"]);

    let out = run_cli_success(home.path(), &["drink"]);
    assert_contains(&out, "Water logged: 1/2");

    let out = run_cli_success(home.path(), &["drink"]);
    assert_contains(&out, "Daily goal reached! (2/2)");

    let state: Value = parse_json(&run_cli_success(home.path(), &["status", "--json"]));
    assert_eq!(state["daily_count"], 2);
    assert_eq!(state["is_running"], true);
}

#[test]
fn test_caffeine_recommends_water() {
    let home = tempfile::tempdir().unwrap();
    run_cli_success(home.path(), &["caffeine"]);
    let out = run_cli_success(home.path(), &["caffeine"]);
    assert_contains(&out, "Today: 2 cup(s)");
    assert_contains(&out, "Recommended: 4 extra glasses");

    let stats: Value = parse_json(&run_cli_success(home.path(), &["stats", "--json"]));
    assert_eq!(stats["caffeine_count"], 2);
    assert_eq!(stats["recommended_water"], 4);
}

#[test]
fn test_reset_day_keeps_totals() {
    let home = tempfile::tempdir().unwrap();
    run_cli_success(home.path(), &["drink"]);
    run_cli_success(home.path(), &["drink"]);
    run_cli_success(home.path(), &["reset-day"]);

    let state: Value = parse_json(&run_cli_success(home.path(), &["status", "--json"]));
    assert_eq!(state["daily_count"], 0);
    let stats: Value = parse_json(&run_cli_success(home.path(), &["stats", "--json"]));
    assert_eq!(stats["total_glasses"], 2);
}

#[test]
fn test_achievements_json_lists_catalog() {
    let home = tempfile::tempdir().unwrap();
    let list: Value = parse_json(&run_cli_success(home.path(), &["achievements", "--json"]));
    let list = list.as_array().expect("array");
    assert_eq!(list.len(), 14);
    assert_eq!(list[0]["id"], "streak_3");
}

#[test]
fn test_history_empty() {
    let home = tempfile::tempdir().unwrap();
    let out = run_cli_success(home.path(), &["history"]);
    assert_contains(&out, "no history yet");
}

#[test]
fn test_config_get_set_list_reset() {
    let home = tempfile::tempdir().unwrap();
    assert_eq!(run_cli_success(home.path(), &["config", "get", "interval_minutes"]).trim(), "30");

    run_cli_success(home.path(), &["config", "set", "sound_type", "bell"]);
    assert_eq!(run_cli_success(home.path(), &["config", "get", "sound_type"]).trim(), "bell");

    let all: Value = parse_json(&run_cli_success(home.path(), &["config", "list"]));
    assert_eq!(all["sound_type"], "bell");
    assert_eq!(all["inactivity_alerts"], false);

    run_cli_success(home.path(), &["config", "reset"]);
    assert_eq!(run_cli_success(home.path(), &["config", "get", "sound_type"]).trim(), "alarm-1");
}

#[test]
fn test_config_rejects_bad_values() {
    let home = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli_failure(home.path(), &["config", "set", "daily_goal", "50"]);
    assert_eq!(code, 1);
    assert_contains(&stderr, "error:");

    run_cli_failure(home.path(), &["config", "set", "sound_type", "kazoo"]);
    run_cli_failure(home.path(), &["config", "get", "no_such_key"]);
    assert_eq!(run_cli_success(home.path(), &["config", "get", "daily_goal"]).trim(), "8");
}
