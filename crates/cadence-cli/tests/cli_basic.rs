//! Basic CLI E2E tests.
//!
//! Each test runs the built binary against its own temporary data directory.

use std::path::Path;
use std::process::Command;

/// Run a CLI command and return (exit code, stdout, stderr).
fn run_cli(data_dir: &Path, args: &[&str]) -> (i32, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_cadence"))
        .args(args)
        .env("CADENCE_DATA_DIR", data_dir)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (code, stdout, stderr)
}

fn record_work_mornings(data_dir: &Path, count: u32) {
    for day in 1..=count {
        let at = format!("2025-01-{day:02}T09:15:00+00:00");
        let output = run_cli(data_dir, &["record", "work", "--at", &at, "--focus", "0.9"]);
        assert_eq!(output.0, 0, "record failed: {}", output.2);
    }
}

#[test]
fn test_record_and_status_json() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_cli(dir.path(), &["record", "work", "--at", "2025-01-02T09:00:00+00:00"]);
    assert_eq!(output.0, 0, "record failed: {}", output.2);
    assert!(output.1.contains("Recorded #1"));

    let output = run_cli(dir.path(), &["status", "--json"]);
    assert_eq!(output.0, 0);
    let parsed: serde_json::Value = serde_json::from_str(&output.1).unwrap();
    assert_eq!(parsed["completions"], 1);
    assert_eq!(parsed["is_learning"], true);
}

#[test]
fn test_unknown_category_fails() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_cli(dir.path(), &["record", "gardening"]);
    assert_eq!(output.0, 1);
    assert!(output.2.starts_with("error:"));
}

#[test]
fn test_future_timestamp_fails() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_cli(dir.path(), &["record", "work", "--at", "2999-01-01T09:00:00+00:00"]);
    assert_eq!(output.0, 1);

    let output = run_cli(dir.path(), &["status", "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&output.1).unwrap();
    assert_eq!(parsed["completions"], 0);
}

#[test]
fn test_suggest_while_learning_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    record_work_mornings(dir.path(), 2);

    let output = run_cli(dir.path(), &["suggest", "--task", "Report:work", "--json"]);
    assert_eq!(output.0, 0, "suggest failed: {}", output.2);
    let parsed: serde_json::Value = serde_json::from_str(&output.1).unwrap();
    assert_eq!(parsed.as_array().map(Vec::len), Some(0));

    let output = run_cli(dir.path(), &["hours", "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&output.1).unwrap();
    assert_eq!(parsed["state"], "learning");
}

#[test]
fn test_suggest_after_learning() {
    let dir = tempfile::tempdir().unwrap();
    record_work_mornings(dir.path(), 14);

    let output = run_cli(dir.path(), &["suggest", "--task", "Report:work", "--json"]);
    assert_eq!(output.0, 0, "suggest failed: {}", output.2);
    let parsed: serde_json::Value = serde_json::from_str(&output.1).unwrap();
    let first = &parsed[0];
    assert_eq!(first["task_title"], "Report");
    assert_eq!(first["suggested_time"], "09:00:00");
    assert_eq!(first["confidence"], "high");
}

#[test]
fn test_config_get_and_set() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_cli(dir.path(), &["config", "get", "learning.threshold"]);
    assert_eq!(output.0, 0);
    assert_eq!(output.1.trim(), "14");

    let output = run_cli(dir.path(), &["config", "set", "learning.threshold", "3"]);
    assert_eq!(output.0, 0, "config set failed: {}", output.2);
    let output = run_cli(dir.path(), &["config", "get", "learning.threshold"]);
    assert_eq!(output.1.trim(), "3");

    let output = run_cli(dir.path(), &["config", "get", "no.such.key"]);
    assert_eq!(output.0, 1);
}

#[test]
fn test_export_reset_import() {
    let dir = tempfile::tempdir().unwrap();
    record_work_mornings(dir.path(), 3);
    let export = dir.path().join("export.json");
    let export = export.to_str().unwrap();

    assert_eq!(run_cli(dir.path(), &["data", "export", export]).0, 0);
    assert_eq!(run_cli(dir.path(), &["data", "reset"]).0, 1, "reset needs --yes");
    assert_eq!(run_cli(dir.path(), &["data", "reset", "--yes"]).0, 0);

    let output = run_cli(dir.path(), &["status", "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&output.1).unwrap();
    assert_eq!(parsed["completions"], 0);

    assert_eq!(run_cli(dir.path(), &["data", "import", export]).0, 0);
    let output = run_cli(dir.path(), &["status", "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&output.1).unwrap();
    assert_eq!(parsed["completions"], 3);
}
