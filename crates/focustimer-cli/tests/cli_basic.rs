//! Basic CLI E2E tests.
//!
//! Each test runs the built binary with HOME pointed at a fresh temporary
//! directory, so the database and config.toml start empty unless a test
//! seeds the session log itself.

use std::io::{BufRead, BufReader};
use std::path::Path;
use std::process::{Command, Stdio};
use std::time::Duration;

use chrono::Utc;
use focustimer_core::{Database, FocusCategory, FocusSession, SessionLog};

/// Run a CLI command against the given home directory and return output.
fn run_cli(home: &Path, args: &[&str]) -> (i32, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_focustimer"))
        .args(args)
        .env("HOME", home)
        .env_remove("FOCUSTIMER_ENV")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (code, stdout, stderr)
}

fn run_json(home: &Path, args: &[&str]) -> serde_json::Value {
    let (code, stdout, stderr) = run_cli(home, args);
    assert_eq!(code, 0, "{args:?} failed: {stderr}");
    serde_json::from_str(&stdout).expect("Failed to parse JSON output")
}

/// Write a session log into the database the binary will open under `home`.
fn seed_sessions(home: &Path, sessions: Vec<FocusSession>) {
    let dir = home.join(".config").join("focustimer");
    std::fs::create_dir_all(&dir).unwrap();
    let db = Database::open_at(&dir.join("focustimer.db")).unwrap();
    SessionLog::from_sessions(sessions).save(&db).unwrap();
}

fn seeded_home() -> tempfile::TempDir {
    let home = tempfile::tempdir().unwrap();
    let now = Utc::now();
    seed_sessions(
        home.path(),
        vec![
            FocusSession::at(now - chrono::Duration::days(30), 50, FocusCategory::Work, true)
                .unwrap(),
            FocusSession::at(now, 25, FocusCategory::Study, true).unwrap(),
            FocusSession::at(now, 10, FocusCategory::Meditation, false).unwrap(),
        ],
    );
    home
}

#[test]
fn test_help() {
    let home = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(home.path(), &["--help"]);
    assert_eq!(code, 0);
    for command in ["timer", "history", "stats", "achievements", "complication", "config"] {
        assert!(stdout.contains(command), "help is missing {command}");
    }
}

#[test]
fn test_fresh_history_is_empty() {
    let home = tempfile::tempdir().unwrap();
    let sessions = run_json(home.path(), &["history", "list", "--json"]);
    assert_eq!(sessions, serde_json::json!([]));

    let (code, stdout, _) = run_cli(home.path(), &["history", "list"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("No sessions recorded."));
}

#[test]
fn test_history_clear_reports_event() {
    let home = tempfile::tempdir().unwrap();
    let event = run_json(home.path(), &["history", "clear"]);
    assert_eq!(event["type"], "HistoryCleared");
    assert_eq!(event["removed"], 0);
}

#[test]
fn test_stats_json_on_empty_store() {
    let home = tempfile::tempdir().unwrap();
    let stats = run_json(home.path(), &["stats", "--days", "30", "--json"]);
    assert_eq!(stats["sessions"], 0);
    assert_eq!(stats["total_minutes"], 0);
    assert_eq!(stats["window_days"], 30);
    assert_eq!(stats["current_streak_days"], 0);
    let by_category = stats["by_category"].as_object().unwrap();
    assert_eq!(by_category.len(), 3);
    assert_eq!(by_category["Meditation"], 0);
}

#[test]
fn test_achievements_all_locked() {
    let home = tempfile::tempdir().unwrap();
    let badges = run_json(home.path(), &["achievements", "--json"]);
    let badges = badges.as_array().unwrap();
    let ids: Vec<_> = badges.iter().map(|b| b["id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec!["streak_3", "streak_7", "minutes_100", "minutes_500"]);
    assert!(badges.iter().all(|b| b["unlocked"] == false));
}

#[test]
fn test_complication_has_seven_days() {
    let home = tempfile::tempdir().unwrap();
    let snapshot = run_json(home.path(), &["complication"]);
    assert_eq!(snapshot["minutesToday"], 0);
    assert_eq!(snapshot["history"].as_array().unwrap().len(), 7);
}

#[test]
fn test_settings_set_and_get() {
    let home = tempfile::tempdir().unwrap();
    let (_, stdout, _) = run_cli(home.path(), &["config", "get", "defaultMinutes"]);
    assert_eq!(stdout.trim(), "5");

    let (code, _, _) = run_cli(home.path(), &["config", "set", "defaultMinutes", "25"]);
    assert_eq!(code, 0);
    let (_, stdout, _) = run_cli(home.path(), &["config", "get", "defaultMinutes"]);
    assert_eq!(stdout.trim(), "25");

    // Out-of-range values are clamped to the configured bounds.
    run_cli(home.path(), &["config", "set", "defaultMinutes", "500"]);
    let (_, stdout, _) = run_cli(home.path(), &["config", "get", "defaultMinutes"]);
    assert_eq!(stdout.trim(), "60");

    run_cli(home.path(), &["config", "set", "theme", "dark"]);
    let (_, stdout, _) = run_cli(home.path(), &["config", "get", "theme"]);
    assert_eq!(stdout.trim(), "Dark");
}

#[test]
fn test_config_file_keys() {
    let home = tempfile::tempdir().unwrap();
    let (_, stdout, _) = run_cli(home.path(), &["config", "get", "timer.max_minutes"]);
    assert_eq!(stdout.trim(), "60");

    let (code, _, _) = run_cli(home.path(), &["config", "set", "timer.max_minutes", "90"]);
    assert_eq!(code, 0);
    let (_, stdout, _) = run_cli(home.path(), &["config", "get", "timer.max_minutes"]);
    assert_eq!(stdout.trim(), "90");

    let shown = run_json(home.path(), &["config", "show"]);
    assert_eq!(shown["config"]["timer"]["max_minutes"], 90);
    assert_eq!(shown["settings"]["defaultMinutes"], 5);

    run_cli(home.path(), &["config", "reset"]);
    let (_, stdout, _) = run_cli(home.path(), &["config", "get", "timer.max_minutes"]);
    assert_eq!(stdout.trim(), "60");
}

#[test]
fn test_invalid_input_exits_with_error() {
    let home = tempfile::tempdir().unwrap();

    let (code, _, stderr) = run_cli(home.path(), &["config", "get", "no.such.key"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"));

    let (code, _, stderr) = run_cli(home.path(), &["config", "set", "theme", "purple"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"));

    let (code, _, _) = run_cli(home.path(), &["config", "set", "timer.min_minutes", "0"]);
    assert_eq!(code, 1);

    let (code, _, _) = run_cli(home.path(), &["timer", "run", "--category", "napping"]);
    assert_ne!(code, 0);
}

#[test]
fn test_seeded_history_list() {
    let home = seeded_home();
    let sessions = run_json(home.path(), &["history", "list", "--json"]);
    let sessions = sessions.as_array().unwrap();
    assert_eq!(sessions.len(), 3);
    // Newest first; the month-old session comes last.
    assert_eq!(sessions[2]["minutes"], 50);
    assert_eq!(sessions[2]["category"], "Work");

    let study = run_json(
        home.path(),
        &["history", "list", "--category", "study", "--json"],
    );
    assert_eq!(study.as_array().unwrap().len(), 1);
    assert_eq!(study[0]["completed"], true);

    let (code, stdout, _) = run_cli(home.path(), &["history", "list", "--limit", "1"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.lines().count(), 1);
}

#[test]
fn test_seeded_stats_and_complication() {
    let home = seeded_home();
    let stats = run_json(home.path(), &["stats", "--json"]);
    assert_eq!(stats["sessions"], 3);
    assert_eq!(stats["completed_sessions"], 2);
    assert_eq!(stats["total_minutes"], 85);
    assert_eq!(stats["minutes_today"], 35);
    assert_eq!(stats["by_category"]["Work"], 0);
    assert_eq!(stats["by_category"]["Study"], 25);
    assert_eq!(stats["by_category"]["Meditation"], 10);

    let snapshot = run_json(home.path(), &["complication"]);
    assert_eq!(snapshot["minutesToday"], 35);
    assert_eq!(snapshot["history"][6]["minutes"], 35);

    let cleared = run_json(home.path(), &["history", "clear"]);
    assert_eq!(cleared["removed"], 3);
    let stats = run_json(home.path(), &["stats", "--json"]);
    assert_eq!(stats["total_minutes"], 0);
}

#[test]
fn test_stats_with_huge_window() {
    let home = seeded_home();
    for days in ["100000000", "4294967295"] {
        let stats = run_json(home.path(), &["stats", "--days", days, "--json"]);
        assert_eq!(stats["by_category"]["Work"], 50);
        assert_eq!(stats["by_category"]["Study"], 25);
    }
}

#[test]
fn test_timer_run_records_completed_session() {
    let home = tempfile::tempdir().unwrap();
    let (code, stdout, stderr) = run_cli(
        home.path(),
        &["timer", "run", "--minutes", "1", "--category", "meditation", "--json"],
    );
    assert_eq!(code, 0, "timer run failed: {stderr}");

    let types: Vec<String> = stdout
        .lines()
        .map(|line| {
            let event: serde_json::Value = serde_json::from_str(line).unwrap();
            event["type"].as_str().unwrap().to_string()
        })
        .collect();
    assert_eq!(types, vec!["TimerStarted", "TimerFinished", "SessionRecorded"]);

    let sessions = run_json(home.path(), &["history", "list", "--json"]);
    assert_eq!(sessions.as_array().unwrap().len(), 1);
    assert_eq!(sessions[0]["minutes"], 1);
    assert_eq!(sessions[0]["category"], "Meditation");
    assert_eq!(sessions[0]["completed"], true);

    let stats = run_json(home.path(), &["stats", "--json"]);
    assert_eq!(stats["current_streak_days"], 1);
}

#[cfg(unix)]
#[test]
fn test_timer_run_interrupted_records_nothing() {
    let home = tempfile::tempdir().unwrap();
    let mut child = Command::new(env!("CARGO_BIN_EXE_focustimer"))
        .args(["timer", "run", "--minutes", "5", "--json"])
        .env("HOME", home.path())
        .env_remove("FOCUSTIMER_ENV")
        .env_remove("RUST_LOG")
        .stdout(Stdio::piped())
        .spawn()
        .expect("Failed to spawn CLI");

    let mut stdout = BufReader::new(child.stdout.take().unwrap());
    let mut line = String::new();
    stdout.read_line(&mut line).unwrap();
    let started: serde_json::Value = serde_json::from_str(&line).unwrap();
    assert_eq!(started["type"], "TimerStarted");

    // Give the countdown loop time to install its Ctrl-C handler.
    std::thread::sleep(Duration::from_millis(500));
    let status = Command::new("kill")
        .args(["-INT", &child.id().to_string()])
        .status()
        .unwrap();
    assert!(status.success());

    line.clear();
    stdout.read_line(&mut line).unwrap();
    let stopped: serde_json::Value = serde_json::from_str(&line).unwrap();
    assert_eq!(stopped["type"], "SessionAbandoned");
    assert!(stopped["recorded"].is_null());
    assert_eq!(child.wait().unwrap().code(), Some(0));

    let sessions = run_json(home.path(), &["history", "list", "--json"]);
    assert_eq!(sessions, serde_json::json!([]));
}
