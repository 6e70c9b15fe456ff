use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{Value, json};
use tempfile::tempdir;

fn chainlink() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_chainlink"));
    cmd.env("NO_COLOR", "1");
    cmd
}

#[test]
fn check_reports_without_writing() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("board.json"),
        json!({
            "projectList": { "A": { "order": 0 }, "B": { "order": 1 } },
            "taskList": {
                "t1": { "status": "open", "project": "A", "order": 0 },
                "t2": { "status": "open", "project": "B", "order": 1 },
                "t3": { "status": "open", "project": "A", "order": 2 }
            }
        })
        .to_string(),
    )
    .unwrap();

    let output = chainlink()
        .current_dir(dir.path())
        .args(["check", "board.json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let summary: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(summary["output"], Value::Null);
    assert_eq!(summary["projects"], 2);
    assert_eq!(summary["task_runs"], 3);
    assert_eq!(summary["longest_run"], 1);

    let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(entries.len(), 1);
}

#[test]
fn check_pretty_summary() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("board.json"),
        r#"{"projectList": {}, "taskList": {}}"#,
    )
    .unwrap();

    chainlink()
        .current_dir(dir.path())
        .args(["--pretty", "check", "board.json"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("checked board.json"))
        .stdout(predicate::str::contains("tasks: 0 in 0 runs (longest 0)"));
}

#[test]
fn check_surfaces_invalid_json() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("board.json"), "{ not json").unwrap();

    chainlink()
        .current_dir(dir.path())
        .args(["check", "board.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("schema_error"))
        .stderr(predicate::str::contains("invalid JSON"));
}

#[test]
fn check_reports_missing_input_as_io_error() {
    let dir = tempdir().unwrap();

    chainlink()
        .current_dir(dir.path())
        .args(["--format", "minimal", "check", "absent.json"])
        .assert()
        .failure()
        .stderr(predicate::str::starts_with("error: io error"));
}
