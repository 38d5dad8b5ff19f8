//! Binary-level checks: argument parsing and the default output layout.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

#[test]
fn rejects_unknown_format_before_writing() {
    let dir = TempDir::new().unwrap();
    Command::cargo_bin("logsim")
        .unwrap()
        .current_dir(dir.path())
        .args(["--format", "xml"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("xml"));
    assert!(!dir.path().join("output_logs").exists());
}

#[test]
fn csv_run_writes_all_services() {
    let dir = TempDir::new().unwrap();
    Command::cargo_bin("logsim")
        .unwrap()
        .current_dir(dir.path())
        .env("LOG_LEVEL", "error")
        .args(["--format", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[+] Generated 100 logs for auth"))
        .stdout(predicate::str::contains("[+] Generated 100 logs for billing"))
        .stdout(predicate::str::contains("[+] Generated 100 logs for inventory"));

    for service in ["auth", "billing", "inventory"] {
        assert!(dir.path().join("output_logs").join(service).is_dir());
    }
}

#[test]
fn version_comes_from_manifest() {
    Command::cargo_bin("logsim")
        .unwrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn defaults_to_json() {
    let dir = TempDir::new().unwrap();
    Command::cargo_bin("logsim")
        .unwrap()
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains(".json"));
}
