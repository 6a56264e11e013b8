use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn snapfox(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("snapfox").unwrap();
    cmd.env("SNAPFOX_HOME", home)
        .env_remove("SNAPFOX_CONFIG")
        .env("RUST_LOG", "warn")
        .arg("--config")
        .arg(home.join("config.json"));
    cmd
}

fn read_config(home: &Path) -> serde_json::Value {
    serde_json::from_str(&fs::read_to_string(home.join("config.json")).unwrap()).unwrap()
}

#[test]
fn add_then_list() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("photos");
    fs::create_dir_all(&source).unwrap();

    snapfox(temp.path())
        .args(["job", "add", "Holiday Photos", "--source"])
        .arg(&source)
        .arg("--dest")
        .arg(temp.path().join("backups"))
        .args(["--interval", "12", "--keep", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created job: Holiday Photos"));

    snapfox(temp.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Holiday Photos"))
        .stdout(predicate::str::contains("due now"));

    let config = read_config(temp.path());
    assert_eq!(config["schema_version"], 2);
    assert_eq!(config["jobs"][0]["id"], "1");
    assert_eq!(config["jobs"][0]["interval_hours"], 12);
    assert_eq!(config["jobs"][0]["max_snapshots"], 3);
    assert!(!temp.path().join("config.json.lock").exists());
}

#[test]
fn empty_list_without_config_file() {
    let temp = TempDir::new().unwrap();

    snapfox(temp.path())
        .args(["job", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No backup jobs defined yet."));
}

#[test]
fn missing_source_does_not_fail_the_batch() {
    let temp = TempDir::new().unwrap();

    snapfox(temp.path())
        .args(["job", "add", "gone", "--source"])
        .arg(temp.path().join("missing"))
        .arg("--dest")
        .arg(temp.path().join("backups"))
        .assert()
        .success();

    snapfox(temp.path())
        .arg("run-all")
        .assert()
        .success()
        .stdout(predicate::str::contains("FAILED"))
        .stdout(predicate::str::contains("0 completed, 1 failed, 0 skipped"));

    let config = read_config(temp.path());
    assert!(config["jobs"][0].get("last_run").is_none());
}

#[cfg(unix)]
#[test]
fn run_due_records_last_run() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("docs");
    fs::create_dir_all(&source).unwrap();

    fs::write(
        temp.path().join("config.json"),
        serde_json::json!({
            "schema_version": 2,
            "settings": { "sync_program": "true", "sync_extra_args": [] },
            "jobs": [{
                "id": "1",
                "name": "Docs",
                "source": source,
                "destination": temp.path().join("backups"),
                "interval_hours": 24,
                "max_snapshots": 10
            }]
        })
        .to_string(),
    )
    .unwrap();

    snapfox(temp.path())
        .arg("run-due")
        .assert()
        .success()
        .stdout(predicate::str::contains("1 completed, 0 failed, 0 skipped"));

    let config = read_config(temp.path());
    assert!(config["jobs"][0]["last_run"].is_string());

    let snapshots: Vec<String> = fs::read_dir(temp.path().join("backups"))
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(snapshots.len(), 1);
    assert!(snapshots[0].starts_with("docs-"));

    // Just ran, so not due again
    snapfox(temp.path())
        .arg("run-due")
        .assert()
        .success()
        .stdout(predicate::str::contains("not due"));
}

#[test]
fn corrupt_config_exits_non_zero_and_is_kept() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.json");
    fs::write(&path, "{ this is not json").unwrap();

    snapfox(temp.path())
        .arg("run-all")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration error"));

    assert_eq!(fs::read_to_string(&path).unwrap(), "{ this is not json");
}

#[test]
fn deleting_unknown_job_fails() {
    let temp = TempDir::new().unwrap();

    snapfox(temp.path())
        .args(["job", "delete", "42"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Job not found: 42"));
}

#[test]
fn legacy_config_is_migrated_on_save() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("config.json"),
        r#"{
  "jobs": [
    {"id": 1, "name": "Old", "source": "/nonexistent/old", "destination": "/nonexistent/dst",
     "interval_hours": 24, "keep_last": 5, "last_run": null}
  ]
}"#,
    )
    .unwrap();

    snapfox(temp.path())
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("stored as version 1"));

    snapfox(temp.path())
        .args(["job", "edit", "1", "--name", "Renamed"])
        .assert()
        .success();

    let config = read_config(temp.path());
    assert_eq!(config["schema_version"], 2);
    assert_eq!(config["jobs"][0]["id"], "1");
    assert_eq!(config["jobs"][0]["name"], "Renamed");
    assert_eq!(config["jobs"][0]["max_snapshots"], 5);
    assert!(config["jobs"][0].get("keep_last").is_none());
}

#[test]
fn held_lock_refuses_second_writer() {
    let temp = TempDir::new().unwrap();
    // Our own PID is certainly alive
    fs::write(
        temp.path().join("config.json.lock"),
        format!("{}\n", std::process::id()),
    )
    .unwrap();

    snapfox(temp.path())
        .arg("run-all")
        .assert()
        .failure()
        .stderr(predicate::str::contains("locked"));

    // Read-only commands do not take the lock
    snapfox(temp.path()).arg("list").assert().success();
}

#[test]
fn menu_exits_on_closed_input() {
    let temp = TempDir::new().unwrap();

    snapfox(temp.path())
        .write_stdin("1\n7\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Snapfox Backup Manager"))
        .stdout(predicate::str::contains("Bye."));
}
