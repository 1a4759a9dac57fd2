//! Basic CLI E2E tests.
//!
//! Tests invoke the built binary with HOME pointed at a temp directory so
//! config commands never touch the real balance file.

use std::path::Path;
use std::process::Command;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli_in(home: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_questlog-cli"))
        .args(args)
        .env("HOME", home)
        .env_remove("QUESTLOG_ENV")
        .env_remove("QUESTLOG_LOG")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn run_cli(args: &[&str]) -> (String, String, i32) {
    let home = tempfile::tempdir().unwrap();
    run_cli_in(home.path(), args)
}

fn parse_json(stdout: &str) -> serde_json::Value {
    serde_json::from_str(stdout).expect("Failed to parse JSON output")
}

#[test]
fn test_reward() {
    let (stdout, _, code) = run_cli(&[
        "reward",
        "--start",
        "2024-01-01T08:00:00Z",
        "--end",
        "2024-01-01T09:00:00Z",
    ]);
    assert_eq!(code, 0, "reward failed");
    let json = parse_json(&stdout);
    assert_eq!(json["xp"], 300);
    assert_eq!(json["gold"], 60);
    assert_eq!(json["durationMinutes"], 60);
}

#[test]
fn test_reward_invalid_timestamp() {
    let (_, stderr, code) = run_cli(&["reward", "--start", "soon", "--end", "2024-01-01T09:00:00Z"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"));
}

#[test]
fn test_level() {
    let (stdout, _, code) = run_cli(&["level", "2780"]);
    assert_eq!(code, 0, "level failed");
    let json = parse_json(&stdout);
    assert_eq!(json["level"], 6);
    assert_eq!(json["rank"], "E-Rank");
    assert_eq!(json["colorTier"], "gray");
    assert_eq!(json["boost"], 2.0);
}

#[test]
fn test_level_rejects_negative_xp() {
    let (_, stderr, code) = run_cli(&["level", "-5"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("non-negative"));
}

#[test]
fn test_streak() {
    let (stdout, _, code) = run_cli(&[
        "streak",
        "--dates",
        "2024-06-01,2024-06-03,2024-06-04,2024-06-05",
        "--today",
        "2024-06-05",
    ]);
    assert_eq!(code, 0, "streak failed");
    let json = parse_json(&stdout);
    assert_eq!(json["current"], 3);
    assert_eq!(json["longest"], 3);
    assert_eq!(json["activeDays"], 4);
}

#[test]
fn test_heatmap_json_and_ascii() {
    let (stdout, _, code) = run_cli(&[
        "heatmap",
        "--dates",
        "2024-06-04,2024-06-05",
        "--weeks",
        "1",
        "--today",
        "2024-06-05",
    ]);
    assert_eq!(code, 0, "heatmap failed");
    let json = parse_json(&stdout);
    assert_eq!(json["weeks"].as_array().map(|w| w.len()), Some(2));
    assert_eq!(json["totalActiveDays"], 2);
    assert_eq!(json["currentStreak"], 2);

    let (stdout, _, code) = run_cli(&["heatmap", "--weeks", "4", "--today", "2024-06-05", "--ascii"]);
    assert_eq!(code, 0, "heatmap --ascii failed");
    assert_eq!(stdout.lines().count(), 7);
}

#[test]
fn test_heatmap_huge_weeks_is_clamped() {
    let (stdout, stderr, code) = run_cli(&[
        "heatmap",
        "--weeks",
        "4000000000",
        "--today",
        "2024-05-18",
        "--ascii",
    ]);
    assert_eq!(code, 0, "heatmap with huge --weeks failed: {stderr}");
    let rows: Vec<&str> = stdout.lines().collect();
    assert_eq!(rows.len(), 7);
    // "Sun " label plus one column per week
    assert_eq!(rows[0].chars().count(), 4 + 520);
}

#[test]
fn test_heatmap_bad_date() {
    let (_, stderr, code) = run_cli(&["heatmap", "--dates", "2024-02-30", "--weeks", "1"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"));
}

#[test]
fn test_roll_with_seed() {
    let (stdout, _, code) = run_cli(&[
        "roll",
        "--name",
        "Stretch",
        "--category",
        "fitness",
        "--dates",
        "2024-06-04,2024-06-05",
        "--today",
        "2024-06-05",
        "--now",
        "2024-06-05T12:00:00Z",
        "--seed",
        "7",
    ]);
    assert_eq!(code, 0, "roll failed");
    let json = parse_json(&stdout);
    assert!(json.get("event").is_some());
    assert!(json.get("quest").is_some());
}

#[test]
fn test_roll_rejects_future_dates() {
    let (_, stderr, code) = run_cli(&[
        "roll",
        "--name",
        "Stretch",
        "--dates",
        "2024-06-06",
        "--today",
        "2024-06-05",
    ]);
    assert_eq!(code, 1);
    assert!(stderr.contains("future"));
}

#[test]
fn test_shadows() {
    let (stdout, _, code) = run_cli(&["shadows", "--streak", "fitness=7", "--streak", "study=3", "--unlocked"]);
    assert_eq!(code, 0, "shadows failed");
    let json = parse_json(&stdout);
    let ids: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|c| c["id"].as_str())
        .collect();
    assert_eq!(ids, vec!["vanguard"]);

    let (stdout, _, code) = run_cli(&["shadows"]);
    assert_eq!(code, 0);
    assert_eq!(parse_json(&stdout).as_array().map(|a| a.len()), Some(5));
}

#[test]
fn test_config_set_get_reset() {
    let home = tempfile::tempdir().unwrap();

    let (stdout, _, code) = run_cli_in(home.path(), &["config", "get", "linker.xp_seed"]);
    assert_eq!(code, 0, "config get failed");
    assert_eq!(stdout.trim(), "150.0");

    let (_, _, code) = run_cli_in(home.path(), &["config", "set", "linker.xp_seed", "200"]);
    assert_eq!(code, 0, "config set failed");
    assert!(home.path().join(".config/questlog/balance.toml").exists());

    let (stdout, _, _) = run_cli_in(home.path(), &["config", "get", "linker.xp_seed"]);
    assert_eq!(stdout.trim(), "200.0");

    let (stdout, _, code) = run_cli_in(home.path(), &["config", "list"]);
    assert_eq!(code, 0);
    assert_eq!(parse_json(&stdout)["linker"]["xp_seed"], 200.0);

    let (_, _, code) = run_cli_in(home.path(), &["config", "reset"]);
    assert_eq!(code, 0);
    let (stdout, _, _) = run_cli_in(home.path(), &["config", "get", "linker.xp_seed"]);
    assert_eq!(stdout.trim(), "150.0");
}

#[test]
fn test_config_rejects_unknown_key() {
    let (_, stderr, code) = run_cli(&["config", "set", "linker.bogus", "1"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"));

    let (_, _, code) = run_cli(&["config", "get", "linker.bogus"]);
    assert_eq!(code, 1);
}
