//! Integration tests for the `commander` binary.
//!
//! Every test points the CLI at a closed local port and a throwaway session
//! file, so nothing here needs a running backend.

use std::fs;
use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::PredicateBooleanExt;
use tempfile::{TempDir, tempdir};

const UNREACHABLE_API: &str = "http://127.0.0.1:9";

fn commander(dir: &TempDir) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("commander");
    cmd.current_dir(dir.path())
        .env("COMMANDER_SESSION_FILE", dir.path().join("session.json"))
        .env_remove("COMMANDER_API_URL")
        .env_remove("COMMANDER_CONFIG")
        .env_remove("RUST_LOG")
        .args(["--api-url", UNREACHABLE_API])
        .timeout(std::time::Duration::from_secs(20));
    cmd
}

fn write_session(path: &Path, token: &str) {
    fs::write(path, format!(r#"{{"token": "{token}"}}"#)).unwrap();
}

#[test]
fn test_help_lists_commands() {
    let mut cmd = cargo_bin_cmd!("commander");
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicates::str::contains("check-route"))
        .stdout(predicates::str::contains("login"))
        .stdout(predicates::str::contains("preferences"))
        .stdout(predicates::str::contains("--api-url"));
}

#[test]
fn test_setup_route_allowed_without_backend() {
    let dir = tempdir().unwrap();
    commander(&dir)
        .args(["check-route", "/setup"])
        .assert()
        .success()
        .stdout(predicates::str::contains("/setup (Setup): allow"));
}

#[test]
fn test_protected_route_redirects_to_login_when_backend_unreachable() {
    // An unreachable backend counts as set up, so the session rules decide.
    let dir = tempdir().unwrap();
    commander(&dir)
        .args(["check-route", "/inventory"])
        .assert()
        .success()
        .stdout(predicates::str::contains("/inventory (Inventory): redirect to /login"));
}

#[test]
fn test_login_page_allowed_for_signed_out_user() {
    let dir = tempdir().unwrap();
    commander(&dir)
        .args(["check-route", "/login?redirect=/inventory"])
        .assert()
        .success()
        .stdout(predicates::str::contains("(Login): allow"));
}

#[test]
fn test_whoami_requires_login() {
    let dir = tempdir().unwrap();
    commander(&dir)
        .arg("whoami")
        .assert()
        .failure()
        .stderr(predicates::str::contains("not signed in"));
}

#[test]
fn test_logout_without_session() {
    let dir = tempdir().unwrap();
    commander(&dir)
        .arg("logout")
        .assert()
        .success()
        .stdout(predicates::str::contains("No session stored"));
}

#[test]
fn test_logout_removes_stored_token() {
    let dir = tempdir().unwrap();
    let session_file = dir.path().join("session.json");
    write_session(&session_file, "stale-token");

    commander(&dir)
        .arg("logout")
        .assert()
        .success()
        .stdout(predicates::str::contains("Signed out"));

    assert!(!session_file.exists());
}

#[test]
fn test_status_reports_unreachable_backend() {
    let dir = tempdir().unwrap();
    commander(&dir)
        .arg("status")
        .assert()
        .failure()
        .stdout(predicates::str::contains("session: signed out"))
        .stderr(predicates::str::contains("failed to fetch setup status"));
}

#[test]
fn test_whoami_with_unreachable_backend_clears_session() {
    let dir = tempdir().unwrap();
    let session_file = dir.path().join("session.json");
    write_session(&session_file, "some-token");

    commander(&dir)
        .arg("whoami")
        .assert()
        .failure()
        .stderr(
            predicates::str::contains("failed to load profile")
                .and(predicates::str::contains("backend unreachable")),
        );

    assert!(!session_file.exists());
}

#[test]
fn test_preferences_rejects_unknown_theme() {
    let dir = tempdir().unwrap();
    commander(&dir)
        .args(["preferences", "--theme", "neon"])
        .assert()
        .failure()
        .stderr(predicates::str::contains("unknown theme 'neon'"));
}

#[test]
fn test_preferences_rejects_invalid_dark_mode() {
    let dir = tempdir().unwrap();
    commander(&dir)
        .args(["preferences", "--dark-mode", "dim"])
        .assert()
        .failure()
        .stderr(predicates::str::contains("invalid value"));
}

#[test]
fn test_config_generates_yaml_file() {
    let dir = tempdir().unwrap();
    commander(&dir)
        .arg("config")
        .assert()
        .success()
        .stdout(predicates::str::contains("commander.yaml"));

    let contents = fs::read_to_string(dir.path().join("commander.yaml")).unwrap();
    assert!(contents.contains("api_base_url"));
    assert!(contents.contains("request_timeout_secs: 30"));
}

#[test]
fn test_config_rejects_unknown_format() {
    let dir = tempdir().unwrap();
    commander(&dir)
        .args(["config", "--format", "toml"])
        .assert()
        .failure()
        .stderr(predicates::str::contains("Unsupported format 'toml'"));
}

#[test]
fn test_completion_for_bash() {
    let dir = tempdir().unwrap();
    commander(&dir)
        .args(["completion", "--shell", "bash"])
        .assert()
        .success()
        .stdout(predicates::str::contains("commander"));
}

#[test]
fn test_invalid_api_url_is_rejected() {
    let mut cmd = cargo_bin_cmd!("commander");
    cmd.args(["--api-url", "not a url", "status"]);

    cmd.assert()
        .failure()
        .stderr(predicates::str::contains("invalid value"));
}
