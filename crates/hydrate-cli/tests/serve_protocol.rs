//! E2E tests for `hydrate serve`: JSON intents in, JSON messages out.

mod common;

use common::{run_cli_success, run_serve};
use serde_json::Value;

fn messages(lines: &[String]) -> Vec<Value> {
    lines
        .iter()
        .map(|l| serde_json::from_str(l).expect("each line is JSON"))
        .collect()
}

#[test]
fn test_serve_sends_initial_update_and_exits_on_eof() {
    let home = tempfile::tempdir().unwrap();
    let out = messages(&run_serve(home.path(), ""));
    assert_eq!(out.len(), 1);
    assert_eq!(out[0]["type"], "update");
    assert_eq!(out[0]["is_running"], false);
}

#[test]
fn test_serve_log_water_emits_events_then_update() {
    let home = tempfile::tempdir().unwrap();
    let out = messages(&run_serve(home.path(), "{\"type\":\"log_water\"}\n"));

    let types: Vec<&str> = out.iter().map(|m| m["type"].as_str().unwrap()).collect();
    assert_eq!(types.first(), Some(&"update"));
    assert_eq!(types.last(), Some(&"update"));

    let count_changed = out
        .iter()
        .find(|m| m["type"] == "event" && m["event"]["type"] == "daily_count_changed")
        .expect("count event");
    assert_eq!(count_changed["event"]["daily_count"], 1);
    assert_eq!(out.last().unwrap()["daily_count"], 1);
}

#[test]
fn test_serve_reports_bad_input_and_keeps_going() {
    let home = tempfile::tempdir().unwrap();
    let input = "not json\n{\"type\":\"change_goal\",\"daily_goal\":0}\n{\"type\":\"request_stats\"}\n";
    let out = messages(&run_serve(home.path(), input));

    assert_eq!(out[1]["type"], "error");
    assert_eq!(out[2]["type"], "error");
    assert_eq!(out[3]["type"], "stats");
    assert_eq!(out[3]["achievements_total"], 14);
}

#[test]
fn test_serve_settings_persist_to_config() {
    let home = tempfile::tempdir().unwrap();
    let input = "{\"type\":\"change_goal\",\"daily_goal\":12}\n{\"type\":\"change_sound_type\",\"sound_type\":\"droplet\"}\n";
    let out = messages(&run_serve(home.path(), input));
    assert!(out.iter().any(|m| m["type"] == "goal_updated" && m["daily_goal"] == 12));

    assert_eq!(run_cli_success(home.path(), &["config", "get", "daily_goal"]).trim(), "12");
    assert_eq!(run_cli_success(home.path(), &["config", "get", "sound_type"]).trim(), "droplet");
}

#[test]
fn test_serve_snooze_answer_starts_five_minutes() {
    let home = tempfile::tempdir().unwrap();
    let input = "{\"type\":\"reminder_response\",\"response\":\"snooze\"}\n";
    let out = messages(&run_serve(home.path(), input));
    let last = out.last().unwrap();
    assert_eq!(last["type"], "update");
    assert_eq!(last["is_running"], true);
    assert_eq!(last["total_seconds"], 300);
}
