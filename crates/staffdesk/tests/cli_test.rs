//! Integration tests for the `staffdesk` CLI binary.
//!
//! Argument parsing, config handling and the offline queue run against a
//! throwaway home directory; backend reads go to a wiremock server.
#![allow(clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a command for the `staffdesk` binary with env isolation.
///
/// Config and data directories live under `home`, and every
/// `STAFFDESK_*` variable the CLI reads is cleared.
fn staffdesk_cmd(home: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("staffdesk");
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join("config"))
        .env("XDG_DATA_HOME", home.join("data"))
        .env_remove("STAFFDESK_PROFILE")
        .env_remove("STAFFDESK_URL")
        .env_remove("STAFFDESK_TOKEN")
        .env_remove("STAFFDESK_OUTPUT")
        .env_remove("STAFFDESK_LOG_FILE")
        .env_remove("RUST_LOG");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

/// Write a profile whose token comes from an env var, so the keyring is
/// never consulted.
fn write_profile(home: &Path, base_url: &str) {
    let dir = home.join("config").join("staffdesk");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(
        dir.join("config.toml"),
        format!(
            "default_profile = \"work\"\n\n\
             [profiles.work]\n\
             base_url = \"{base_url}\"\n\
             token_env = \"STAFFDESK_TEST_TOKEN\"\n"
        ),
    )
    .unwrap();
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let home = TempDir::new().unwrap();
    let output = staffdesk_cmd(home.path()).output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    let home = TempDir::new().unwrap();
    staffdesk_cmd(home.path()).arg("--help").assert().success().stdout(
        predicate::str::contains("HR companion")
            .and(predicate::str::contains("leave"))
            .and(predicate::str::contains("tasks"))
            .and(predicate::str::contains("queue")),
    );
}

#[test]
fn test_version_flag() {
    let home = TempDir::new().unwrap();
    staffdesk_cmd(home.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("staffdesk"));
}

#[test]
fn test_completions_bash() {
    let home = TempDir::new().unwrap();
    staffdesk_cmd(home.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_invalid_subcommand() {
    let home = TempDir::new().unwrap();
    staffdesk_cmd(home.path())
        .arg("payroll")
        .assert()
        .failure()
        .code(2);
}

#[test]
fn test_list_flags_conflict() {
    let home = TempDir::new().unwrap();
    staffdesk_cmd(home.path())
        .args(["tasks", "list", "--all", "--pages", "3"])
        .assert()
        .failure()
        .code(2);
}

// ── Configuration ───────────────────────────────────────────────────

#[test]
fn test_missing_config_is_reported() {
    let home = TempDir::new().unwrap();
    let output = staffdesk_cmd(home.path())
        .args(["tasks", "list"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    let text = combined_output(&output);
    assert!(
        text.contains("No backend configured"),
        "Expected no-config error:\n{text}"
    );
}

#[test]
fn test_unknown_profile_is_reported() {
    let home = TempDir::new().unwrap();
    write_profile(home.path(), "https://hr.example.com");
    staffdesk_cmd(home.path())
        .args(["--profile", "home", "tasks", "list"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Profile 'home' not found"));
}

#[test]
fn test_config_path_points_into_config_home() {
    let home = TempDir::new().unwrap();
    staffdesk_cmd(home.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_config_set_then_show() {
    let home = TempDir::new().unwrap();
    staffdesk_cmd(home.path())
        .args(["config", "set", "base_url", "https://hr.example.com"])
        .assert()
        .success();
    staffdesk_cmd(home.path())
        .args(["config", "set", "page_size", "50"])
        .assert()
        .success();

    staffdesk_cmd(home.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("base_url = \"https://hr.example.com\"")
                .and(predicate::str::contains("page_size = 50")),
        );
    staffdesk_cmd(home.path())
        .args(["config", "profiles"])
        .assert()
        .success()
        .stdout(predicate::str::contains("default *"));
}

#[test]
fn test_config_set_rejects_unknown_key() {
    let home = TempDir::new().unwrap();
    staffdesk_cmd(home.path())
        .args(["config", "set", "colour", "red"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("unknown config key"));
}

// ── Backend reads ───────────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_tasks_list_json_from_backend() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/tasks"))
        .and(query_param("page", "1"))
        .and(header("authorization", "Bearer tok-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                { "id": 1, "title": "Submit expense report", "status": "todo",
                  "priority": "high", "dueDate": "2024-06-30" },
                { "id": 2, "title": "Review onboarding doc", "status": "done" }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    write_profile(home.path(), &server.uri());
    let mut cmd = staffdesk_cmd(home.path());
    cmd.env("STAFFDESK_TEST_TOKEN", "tok-123")
        .args(["tasks", "list", "-o", "json"]);

    let output = tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap();
    assert!(output.status.success(), "{}", combined_output(&output));

    let tasks: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let titles: Vec<_> = tasks
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["title"].as_str().unwrap().to_owned())
        .collect();
    assert_eq!(titles, ["Submit expense report", "Review onboarding doc"]);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_missing_record_exits_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/tasks/99"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    write_profile(home.path(), &server.uri());
    let mut cmd = staffdesk_cmd(home.path());
    cmd.env("STAFFDESK_TEST_TOKEN", "tok-123")
        .args(["tasks", "show", "99"]);

    let output = tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap();
    assert_eq!(output.status.code(), Some(4), "{}", combined_output(&output));
}

// ── Offline queue ───────────────────────────────────────────────────

#[test]
fn test_offline_write_is_queued_and_listed() {
    let home = TempDir::new().unwrap();
    write_profile(home.path(), "http://127.0.0.1:9");

    staffdesk_cmd(home.path())
        .env("STAFFDESK_TEST_TOKEN", "tok-123")
        .args([
            "--offline", "leave", "request", "--type", "annual", "--from", "2024-07-01", "--to",
            "2024-07-03",
        ])
        .assert()
        .success()
        .stderr(predicate::str::contains("Queued leave request"));

    let output = staffdesk_cmd(home.path())
        .env("STAFFDESK_TEST_TOKEN", "tok-123")
        .args(["--offline", "queue", "status", "-o", "json"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", combined_output(&output));

    let pending: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let pending = pending.as_array().unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0]["kind"], "create_leave_request");
    assert_eq!(pending[0]["payload"]["startDate"], "2024-07-01");
}

#[test]
fn test_offline_drain_halts_with_queue_exit_code() {
    let home = TempDir::new().unwrap();
    write_profile(home.path(), "http://127.0.0.1:9");

    staffdesk_cmd(home.path())
        .env("STAFFDESK_TEST_TOKEN", "tok-123")
        .args(["--offline", "attendance", "check-in"])
        .assert()
        .success();

    staffdesk_cmd(home.path())
        .env("STAFFDESK_TEST_TOKEN", "tok-123")
        .args(["--offline", "queue", "drain"])
        .assert()
        .failure()
        .code(9)
        .stderr(predicate::str::contains("1 still pending"));
}

#[test]
fn test_inverted_leave_range_is_rejected() {
    let home = TempDir::new().unwrap();
    write_profile(home.path(), "http://127.0.0.1:9");

    staffdesk_cmd(home.path())
        .env("STAFFDESK_TEST_TOKEN", "tok-123")
        .args([
            "--offline", "leave", "request", "--type", "annual", "--from", "2024-07-03", "--to",
            "2024-07-01",
        ])
        .assert()
        .failure()
        .code(2);
}
