//! End-to-end tests for the `julesync` binary.

mod common;

use std::path::Path;

use assert_cmd::assert::OutputAssertExt;
use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// A command isolated from the caller's environment, with its store in `dir`
/// and a config path that does not exist.
fn julesync(dir: &TempDir) -> Command {
    julesync_with_config(dir, &dir.path().join("missing.yaml"))
}

fn julesync_with_config(dir: &TempDir, config: &Path) -> Command {
    let mut cmd = Command::cargo_bin("julesync").unwrap();
    for var in [
        "JULESYNC_API_KEY",
        "JULESYNC_API_BASE_URL",
        "JULESYNC_PAGE_SIZE",
        "JULESYNC_TIMEOUT_SECONDS",
        "JULESYNC_POLL_INTERVAL_MS",
        "JULESYNC_TERMINAL_STATES",
        "JULESYNC_STORE_PATH",
        "JULESYNC_LOG_JSON",
        "RUST_LOG",
    ] {
        cmd.env_remove(var);
    }
    cmd.env("NO_COLOR", "1")
        .arg("--config")
        .arg(config)
        .arg("--store-path")
        .arg(dir.path().join("store"));
    cmd
}

#[test]
fn test_help_lists_commands() {
    let mut cmd = Command::cargo_bin("julesync").unwrap();
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("sessions"))
        .stdout(predicate::str::contains("watch"))
        .stdout(predicate::str::contains("recent"));
}

#[test]
fn test_recent_items_persist_between_runs() {
    let dir = TempDir::new().unwrap();

    julesync(&dir)
        .args(["recent", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No recent items."));

    for repo in ["sources/github/acme/widgets", "sources/github/acme/gadgets"] {
        julesync(&dir)
            .args(["recent", "add", repo])
            .assert()
            .success();
    }

    julesync(&dir)
        .args(["recent", "list"])
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"(?s)1\. acme/gadgets.*2\. acme/widgets").unwrap());
}

#[test]
fn test_invalid_config_is_rejected() {
    let dir = TempDir::new().unwrap();
    let (_config_dir, config_path) = common::temp_config_file("api:\n  page_size: 0\n");

    julesync_with_config(&dir, &config_path)
        .args(["recent", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("page_size"));
}

#[test]
fn test_auth_status_with_env_key() {
    let dir = TempDir::new().unwrap();

    julesync(&dir)
        .env("JULESYNC_API_KEY", "from-env")
        .args(["auth", "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Authenticated"));
}

#[test]
fn test_branch_requires_source() {
    let dir = TempDir::new().unwrap();

    julesync(&dir)
        .args(["sessions", "create", "--prompt", "do things", "--branch", "main"])
        .assert()
        .failure();
}

#[tokio::test(flavor = "multi_thread")]
async fn test_sessions_list_against_mock_server() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1alpha/sessions"))
        .and(header("X-Goog-Api-Key", "cli-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "sessions": [{
                "name": "sessions/77",
                "id": "77",
                "title": "Bump the toolchain",
                "state": "IN_PROGRESS"
            }]
        })))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut cmd = julesync(&dir);
    cmd.env("JULESYNC_API_KEY", "cli-key")
        .env("JULESYNC_API_BASE_URL", server.uri())
        .args(["sessions", "list"]);

    let output = tokio::task::spawn_blocking(move || cmd.output())
        .await
        .unwrap()
        .unwrap();
    output
        .assert()
        .success()
        .stdout(predicate::str::contains("Bump the toolchain"))
        .stdout(predicate::str::contains("IN_PROGRESS"));
}
