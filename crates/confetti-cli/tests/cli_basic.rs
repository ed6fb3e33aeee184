//! Basic CLI E2E tests.
//!
//! Tests invoke the built binary against a temporary config directory and
//! verify outputs.

use std::path::Path;
use std::process::Command;

use tempfile::TempDir;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(dir: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_confetti"))
        .arg("--config-dir")
        .arg(dir)
        .args(args)
        .env_remove("CONFETTI_LOG")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

/// Point the data layer into the temp dir so tests never touch $HOME.
fn setup() -> TempDir {
    let dir = TempDir::new().unwrap();
    let layer = dir.path().join("layer");
    let (_, stderr, code) = run_cli(
        dir.path(),
        &["config", "set", "sync.data_layer_dir", layer.to_str().unwrap()],
    );
    assert_eq!(code, 0, "config set failed: {stderr}");
    let (_, stderr, code) = run_cli(dir.path(), &["config", "set", "sync.poll_interval_ms", "20"]);
    assert_eq!(code, 0, "config set failed: {stderr}");
    dir
}

const SESSIONS: &str = r#"[
  {"id": "A", "title": "Opening", "type": "talk",
   "start_time": "2023-01-02T09:00:00", "end_time": "2023-01-02T09:30:00",
   "speakers": [{"id": "s1", "name": "Ann"}], "room": {"name": "Main Hall"}},
  {"id": "B", "title": "Coffee", "type": "break",
   "start_time": "2023-01-02T09:00:00", "end_time": "2023-01-02T09:30:00"},
  {"id": "C", "title": "Wear it's at", "type": "talk",
   "start_time": "2023-01-02T10:30:00", "end_time": "2023-01-02T11:00:00",
   "room": {"name": "Room 2"}}
]"#;

#[test]
fn test_config_get_and_set() {
    let dir = setup();
    let (stdout, _, code) = run_cli(dir.path(), &["config", "get", "sync.poll_interval_ms"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "20");

    let (_, stderr, code) = run_cli(dir.path(), &["config", "get", "sync.nope"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("unknown key"));
}

#[test]
fn test_config_reset_repairs_invalid_file() {
    let dir = setup();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[sync]\npoll_interval_ms = 0\n").unwrap();

    let (_, stderr, code) = run_cli(dir.path(), &["config", "list"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("must be greater than zero"));

    let (stdout, stderr, code) = run_cli(dir.path(), &["config", "reset"]);
    assert_eq!(code, 0, "config reset failed: {stderr}");
    assert!(stdout.contains("config reset to defaults"));

    let (stdout, _, code) = run_cli(dir.path(), &["config", "get", "sync.poll_interval_ms"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "500");
}

#[test]
fn test_config_list_is_json() {
    let dir = setup();
    let (stdout, _, code) = run_cli(dir.path(), &["config", "list"]);
    assert_eq!(code, 0);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed["display"]["time_pattern"], "%-H:%M");
}

#[test]
fn test_sessions_group_text() {
    let dir = setup();
    let file = dir.path().join("sessions.json");
    std::fs::write(&file, SESSIONS).unwrap();

    let (stdout, stderr, code) = run_cli(dir.path(), &["sessions", "group", file.to_str().unwrap()]);
    assert_eq!(code, 0, "sessions group failed: {stderr}");
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(
        lines,
        [
            "Monday 9:00",
            "  Opening",
            "    Ann / Main Hall",
            "  Coffee [break]",
            "10:30",
            "  Wear it's at",
            "    Room 2",
        ]
    );
}

#[test]
fn test_sessions_group_json() {
    let dir = setup();
    let file = dir.path().join("sessions.json");
    std::fs::write(&file, SESSIONS).unwrap();

    let (stdout, _, code) = run_cli(
        dir.path(),
        &["sessions", "group", file.to_str().unwrap(), "--json"],
    );
    assert_eq!(code, 0);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let sections = parsed.as_array().unwrap();
    assert_eq!(sections.len(), 2);
    assert_eq!(sections[0]["label"], "Monday 9:00");
    assert_eq!(sections[0]["sessions"].as_array().unwrap().len(), 2);
    assert_eq!(sections[1]["label"], "10:30");
}

#[test]
fn test_sync_watch_without_phone_fails() {
    let dir = setup();
    let (_, stderr, code) = run_cli(dir.path(), &["sync", "watch", "--once", "--timeout-ms", "200"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("no paired phone"));
}

#[test]
fn test_sync_publish_then_watch() {
    let dir = setup();
    let (_, _, code) = run_cli(dir.path(), &["config", "set", "wear.theme.primary", "#FF112233"]);
    assert_eq!(code, 0);

    let (stdout, stderr, code) = run_cli(dir.path(), &["sync", "publish"]);
    assert_eq!(code, 0, "publish failed: {stderr}");
    assert!(stdout.contains("published settings from confetti-"));

    let (stdout, stderr, code) =
        run_cli(dir.path(), &["sync", "watch", "--once", "--timeout-ms", "2000"]);
    assert_eq!(code, 0, "watch failed: {stderr}");
    let parsed: serde_json::Value = serde_json::from_str(stdout.trim()).unwrap();
    assert_eq!(parsed["theme"]["primary"], "#FF112233");
}

#[test]
fn test_sync_node_id_is_stable() {
    let dir = setup();
    let (first, _, code) = run_cli(dir.path(), &["sync", "node-id"]);
    assert_eq!(code, 0);
    let (second, _, _) = run_cli(dir.path(), &["sync", "node-id"]);
    assert_eq!(first, second);
    assert!(first.starts_with("confetti-"));
}
