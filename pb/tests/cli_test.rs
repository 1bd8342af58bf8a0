//! CLI smoke tests
//!
//! These exercise the binary surface only: argument parsing, session
//! persistence, and the not-signed-in short-circuit. No network is reached.

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Write a config that points the session file into the temp dir
fn write_config(dir: &TempDir) -> std::path::PathBuf {
    let config_path = dir.path().join("planboard.yml");
    let session_path = dir.path().join("session.json");
    fs::write(
        &config_path,
        format!("session:\n  file: {}\n", session_path.display()),
    )
    .unwrap();
    config_path
}

#[test]
fn test_help_lists_subcommands() {
    Command::cargo_bin("pb")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("login"))
        .stdout(predicate::str::contains("review"))
        .stdout(predicate::str::contains("tui"));
}

#[test]
fn test_whoami_without_session() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir);

    Command::cargo_bin("pb")
        .unwrap()
        .args(["--config", config.to_str().unwrap(), "whoami"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Not signed in"));
}

#[test]
fn test_login_then_whoami() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir);

    Command::cargo_bin("pb")
        .unwrap()
        .args([
            "--config",
            config.to_str().unwrap(),
            "login",
            "--token",
            "tok-1",
            "--role",
            "trainer",
            "--user-id",
            "u-1",
            "--name",
            "Ada",
            "--email",
            "ada@example.com",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Signed in as"));

    Command::cargo_bin("pb")
        .unwrap()
        .args(["--config", config.to_str().unwrap(), "whoami"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Ada"))
        .stdout(predicate::str::contains("trainer"));
}

#[test]
fn test_logout_removes_session() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir);

    Command::cargo_bin("pb")
        .unwrap()
        .args([
            "--config",
            config.to_str().unwrap(),
            "login",
            "--token",
            "tok-1",
            "--role",
            "trainee",
            "--user-id",
            "u-2",
            "--name",
            "Lin",
            "--email",
            "lin@example.com",
        ])
        .assert()
        .success();

    Command::cargo_bin("pb")
        .unwrap()
        .args(["--config", config.to_str().unwrap(), "logout"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Signed out"));

    Command::cargo_bin("pb")
        .unwrap()
        .args(["--config", config.to_str().unwrap(), "whoami"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Not signed in"));
}

#[test]
fn test_plans_without_session_short_circuits() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir);

    // No session: resolves immediately, no fetch attempted
    Command::cargo_bin("pb")
        .unwrap()
        .args(["--config", config.to_str().unwrap(), "plans"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Not signed in"));
}

#[test]
fn test_unknown_output_format_rejected() {
    Command::cargo_bin("pb")
        .unwrap()
        .args(["plans", "--format", "yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown format"));
}

#[test]
fn test_invalid_role_rejected() {
    Command::cargo_bin("pb")
        .unwrap()
        .args([
            "login", "--token", "t", "--role", "intern", "--user-id", "u", "--name", "N", "--email", "e@x.y",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown role"));
}
