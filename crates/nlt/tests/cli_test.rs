//! Integration tests for the `nlt` CLI binary.
//!
//! Argument parsing and help output run without a server; API-backed
//! commands run against a wiremock vendor stand-in.
#![allow(clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

const NO_CONFIG: &str = "/tmp/nlt-cli-test-nonexistent/config.toml";

/// Build a [`Command`] for the `nlt` binary with env isolation.
///
/// Clears all `NLT_*` env vars and points the config file at a
/// nonexistent path so tests never touch the user's real configuration.
fn nlt_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("nlt");
    cmd.env("HOME", "/tmp/nlt-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/nlt-cli-test-nonexistent")
        .env("NLT_CONFIG", NO_CONFIG)
        .env_remove("NLT_PROFILE")
        .env_remove("NLT_BASE_URL")
        .env_remove("NLT_EMAIL")
        .env_remove("NLT_PASSWORD")
        .env_remove("NLT_OUTPUT")
        .env_remove("NLT_TIMEOUT")
        .env_remove("RUST_LOG");
    cmd
}

/// `nlt_cmd()` pointed at `server` with flag-only credentials.
fn nlt_against(server: &MockServer) -> assert_cmd::Command {
    let mut cmd = nlt_cmd();
    cmd.env("NLT_PASSWORD", "hunter2")
        .args(["--base-url", &server.uri(), "--email", "ops@example.com"]);
    cmd
}

/// Run a prepared command off the async runtime so the mock server keeps serving.
async fn run(mut cmd: assert_cmd::Command) -> std::process::Output {
    tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap()
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

async fn mock_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "tok-123",
            "token_type": "bearer",
            "user_type": 1
        })))
        .mount(&server)
        .await;
    server
}

async fn mount_tags(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/tags"))
        .and(header("Authorization", "Bearer tok-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 1, "name": "greenhouse", "client_id": 3 }
        ])))
        .mount(server)
        .await;
}

fn write_file(dir: &Path, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = nlt_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    nlt_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("LoRaWAN")
            .and(predicate::str::contains("devices"))
            .and(predicate::str::contains("connections"))
            .and(predicate::str::contains("downlink")),
    );
}

#[test]
fn test_version_flag() {
    nlt_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("nlt"));
}

#[test]
fn test_invalid_output_format_rejected() {
    nlt_cmd()
        .args(["-o", "xml", "tags", "list"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("xml"));
}

#[test]
fn test_downlink_port_range_checked() {
    nlt_cmd()
        .args(["downlink", "send", "70b3d57ed0000001", "--payload", "01", "--port", "0"])
        .assert()
        .code(2);
}

// ── Configuration errors ────────────────────────────────────────────

#[test]
fn test_missing_profile_reported() {
    nlt_cmd()
        .args(["tags", "list"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Profile 'default' not found"));
}

#[test]
fn test_missing_password_is_auth_error() {
    nlt_cmd()
        .args(["--email", "ops@example.com", "tags", "list"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("No credentials"));
}

// ── API-backed commands ─────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_tags_list_json() {
    let server = mock_server().await;
    mount_tags(&server).await;

    let mut cmd = nlt_against(&server);
    cmd.args(["tags", "list"]);
    let output = run(cmd).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    let tags: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(tags[0]["name"], "greenhouse");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_tags_list_yaml() {
    let server = mock_server().await;
    mount_tags(&server).await;

    let mut cmd = nlt_against(&server);
    cmd.args(["-o", "yaml", "tags", "list"]);
    let output = run(cmd).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    assert!(String::from_utf8_lossy(&output.stdout).contains("name: greenhouse"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_profile_from_config_file() {
    let server = mock_server().await;
    mount_tags(&server).await;

    let dir = tempfile::tempdir().unwrap();
    let config = write_file(
        dir.path(),
        "config.toml",
        &format!(
            "[profiles.lab]\nbase_url = \"{}\"\nemail = \"ops@example.com\"\npassword = \"hunter2\"\n",
            server.uri()
        ),
    );

    let mut cmd = nlt_cmd();
    cmd.env("NLT_CONFIG", &config).args(["-p", "lab", "tags", "list"]);
    let output = run(cmd).await;

    assert!(output.status.success(), "{}", combined_output(&output));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_login_hides_token_unless_asked() {
    let server = mock_server().await;

    let mut cmd = nlt_against(&server);
    cmd.args(["login"]);
    let output = run(cmd).await;
    assert!(output.status.success(), "{}", combined_output(&output));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("ops@example.com"));
    assert!(!stdout.contains("tok-123"));

    let mut cmd = nlt_against(&server);
    cmd.args(["login", "--show-token"]);
    let output = run(cmd).await;
    assert!(String::from_utf8_lossy(&output.stdout).contains("tok-123"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_bad_credentials_exit_code() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({ "detail": "bad creds" })))
        .mount(&server)
        .await;

    let mut cmd = nlt_against(&server);
    cmd.args(["tags", "list"]);
    let output = run(cmd).await;

    assert_eq!(output.status.code(), Some(3));
    assert!(combined_output(&output).contains("bad creds"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_device_not_found_exit_code() {
    let server = mock_server().await;
    Mock::given(method("GET"))
        .and(path("/devices/70b3d57ed0000009"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "detail": "Not Found" })))
        .mount(&server)
        .await;

    let mut cmd = nlt_against(&server);
    cmd.args(["devices", "get", "70b3d57ed0000009"]);
    let output = run(cmd).await;

    assert_eq!(output.status.code(), Some(4));
    assert!(combined_output(&output).contains("device '70b3d57ed0000009' not found"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_device_create_from_file() {
    let server = mock_server().await;
    Mock::given(method("POST"))
        .and(path("/devices/create-device"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 31, "dev_eui": "70b3d57ed0000001", "activation": "OTAA", "dev_class": "A"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let file = write_file(
        dir.path(),
        "device.json",
        &json!({
            "tags": [], "activation": "OTAA", "adr": { "mode": "on" },
            "app_eui": "70b3d57ed0000000", "app_key": "000102030405060708090a0b0c0d0e0f",
            "band": "LA915-928A", "counters_size": 4, "dev_class": "A", "encryption": "NS",
            "rx1": { "delay": 1 }, "strict_counter": false, "device_type": "sensor",
            "contract_id": 7, "dev_eui": "70b3d57ed0000001",
            "block_downlink": false, "block_uplink": false
        })
        .to_string(),
    );

    let mut cmd = nlt_against(&server);
    cmd.args(["-o", "json-compact", "devices", "create", "--file"])
        .arg(&file);
    let output = run(cmd).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    assert!(String::from_utf8_lossy(&output.stdout).contains(r#""id":31"#));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_unreachable_server_exit_code() {
    let uri = {
        let server = MockServer::start().await;
        server.uri()
    };

    let mut cmd = nlt_cmd();
    cmd.env("NLT_PASSWORD", "hunter2")
        .args(["--base-url", &uri, "--email", "ops@example.com", "tags", "list"]);
    let output = run(cmd).await;

    let code = output.status.code();
    assert!(
        code == Some(7) || code == Some(8),
        "expected connection or timeout exit code, got {code:?}\n{}",
        combined_output(&output)
    );
}
