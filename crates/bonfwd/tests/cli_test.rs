//! Integration tests for the `bonfwd` CLI binary.
//!
//! Argument handling and fatal paths run without a network; full runs go
//! against a wiremock dashboard.
#![allow(clippy::unwrap_used)]

use std::path::{Path, PathBuf};
use std::process::Output;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const KEY_VAR: &str = "MERAKI_DASHBOARD_API_KEY";

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `bonfwd` binary with env isolation.
///
/// Clears the API key and all `BONFWD_*` env vars, points config directories
/// at a nonexistent path and runs inside `workdir` so no stray `.env` is read.
fn bonfwd_cmd(workdir: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("bonfwd");
    cmd.current_dir(workdir)
        .env("HOME", "/tmp/bonfwd-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/bonfwd-cli-test-nonexistent")
        .env_remove(KEY_VAR)
        .env_remove("BONFWD_FILE")
        .env_remove("BONFWD_ORG")
        .env_remove("BONFWD_BASE_URL")
        .env_remove("BONFWD_CONFIG")
        .env_remove("RUST_LOG")
        .arg("--color")
        .arg("never");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

fn write_csv(dir: &TempDir, body: &str) -> PathBuf {
    let path = dir.path().join("rules.csv");
    std::fs::write(&path, body).unwrap();
    path
}

const VALID_CSV: &str = "\
Network Name,SSID Name,Description,VLAN,Services
Network 01,Wifi01,Printers,10,Printers
Network 01,Wifi01,Printers and AirPlay,20,\"airplay, Printers\"
Network 01,Wifi02,Scanners,30,Scanners
Network 02,Guest,Guests,40,AirPlay
Network 99,Wifi01,Nowhere,50,SSH
";

/// Run the prepared command off the async runtime so the mock server keeps serving.
async fn run(mut cmd: assert_cmd::Command) -> Output {
    tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap()
}

async fn mount_directory(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/v1/organizations"))
        .and(header("authorization", "Bearer test-key"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{ "id": "100", "name": "Campus" }])),
        )
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/organizations/100/networks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "L_1", "name": "Network 01", "productTypes": ["wireless"] },
            { "id": "L_2", "name": "Network 02", "productTypes": ["switch", "wireless"] }
        ])))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/networks/L_1/wireless/ssids"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "number": 0, "name": "Wifi01", "enabled": true },
            { "number": 1, "name": "Wifi02", "enabled": true }
        ])))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/networks/L_2/wireless/ssids"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "number": 3, "name": "Guest", "enabled": true }
        ])))
        .mount(server)
        .await;
}

fn applied() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "enabled": true, "rules": [] }))
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_help_flag() {
    let dir = TempDir::new().unwrap();
    bonfwd_cmd(dir.path()).arg("--help").assert().success().stdout(
        predicate::str::contains("Bonjour forwarding")
            .and(predicate::str::contains("--file"))
            .and(predicate::str::contains("--dry-run")),
    );
}

#[test]
fn test_version_flag() {
    let dir = TempDir::new().unwrap();
    bonfwd_cmd(dir.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("bonfwd"));
}

#[test]
fn test_invalid_color_value() {
    let dir = TempDir::new().unwrap();
    let output = bonfwd_cmd(dir.path())
        .args(["--color", "sometimes"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
}

// ── Fatal paths ─────────────────────────────────────────────────────

#[test]
fn test_missing_api_key_exits_with_auth_code() {
    let dir = TempDir::new().unwrap();
    let csv = write_csv(&dir, VALID_CSV);
    let output = bonfwd_cmd(dir.path())
        .arg("--file")
        .arg(&csv)
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(3));
    let text = combined_output(&output);
    assert!(text.contains(KEY_VAR), "Expected variable name in output:\n{text}");
}

#[test]
fn test_api_key_from_dotenv_file() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join(".env"), format!("{KEY_VAR}=from-dotenv\n")).unwrap();
    let csv = write_csv(&dir, "Network Name,SSID Name,Description,VLAN\n");

    // Getting past credentials to the CSV header check proves the key was found.
    let output = bonfwd_cmd(dir.path())
        .arg("--file")
        .arg(&csv)
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(text.contains("missing column 'Services'"), "{text}");
}

#[test]
fn test_malformed_vlan_aborts_before_any_remote_call() {
    let dir = TempDir::new().unwrap();
    let csv = write_csv(
        &dir,
        "Network Name,SSID Name,Description,VLAN,Services\n\
         Network 01,Wifi01,Printers,10,Printers\n\
         Network 01,Wifi02,Scanners,ten,Scanners\n",
    );

    // Port 1 is never listening: a remote call would surface as exit 7.
    let output = bonfwd_cmd(dir.path())
        .env(KEY_VAR, "test-key")
        .args(["--base-url", "http://127.0.0.1:1/api/v1", "--yes", "--file"])
        .arg(&csv)
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(text.contains("line 3"), "Expected offending line in output:\n{text}");
}

#[test]
fn test_missing_file_when_not_interactive_is_usage_error() {
    let dir = TempDir::new().unwrap();
    let output = bonfwd_cmd(dir.path())
        .env(KEY_VAR, "test-key")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("--file"));
}

#[test]
fn test_nonexistent_file_is_usage_error() {
    let dir = TempDir::new().unwrap();
    let output = bonfwd_cmd(dir.path())
        .env(KEY_VAR, "test-key")
        .args(["--file", "does-not-exist.csv"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("does-not-exist.csv"));
}

#[test]
fn test_unreachable_dashboard_is_connection_error() {
    let dir = TempDir::new().unwrap();
    let csv = write_csv(&dir, VALID_CSV);
    let output = bonfwd_cmd(dir.path())
        .env(KEY_VAR, "test-key")
        .args(["--base-url", "http://127.0.0.1:1/api/v1", "--yes", "--file"])
        .arg(&csv)
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(7));
}

#[test]
fn test_invalid_base_url_is_usage_error() {
    let dir = TempDir::new().unwrap();
    let csv = write_csv(&dir, VALID_CSV);
    let output = bonfwd_cmd(dir.path())
        .env(KEY_VAR, "test-key")
        .args(["--base-url", "ftp://dashboard.example", "--file"])
        .arg(&csv)
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("dashboard.base_url"));
}

// ── Runs against a mock dashboard ───────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_full_run_reports_each_row_and_group() {
    let server = MockServer::start().await;
    mount_directory(&server).await;

    Mock::given(method("PUT"))
        .and(path("/api/v1/networks/L_1/wireless/ssids/0/bonjourForwarding"))
        .and(body_json(json!({
            "enabled": true,
            "rules": [{
                "description": "Printers and AirPlay",
                "vlanId": "20",
                "services": ["Printers", "AirPlay"]
            }]
        })))
        .respond_with(applied())
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/v1/networks/L_1/wireless/ssids/1/bonjourForwarding"))
        .respond_with(applied())
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/v1/networks/L_2/wireless/ssids/3/bonjourForwarding"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "errors": ["Invalid VLAN"] })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let csv = write_csv(&dir, VALID_CSV);
    let mut cmd = bonfwd_cmd(dir.path());
    cmd.env(KEY_VAR, "test-key")
        .args(["--base-url", &format!("{}/api/v1", server.uri()), "--yes", "--file"])
        .arg(&csv);
    let output = run(cmd).await;

    assert_eq!(output.status.code(), Some(1), "{}", combined_output(&output));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(
        lines,
        [
            "line 6: Network 99/Wifi01: FAILED: network 'Network 99' not found in organization",
            "Network 01/Wifi01 (lines 2, 3): OK",
            "Network 01/Wifi02 (line 4): OK",
            "Network 02/Guest (line 5): FAILED: Dashboard API error (HTTP 400): Invalid VLAN",
        ]
    );
    assert!(String::from_utf8_lossy(&output.stderr).contains("2 succeeded, 2 failed"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_all_groups_succeeding_exits_zero() {
    let server = MockServer::start().await;
    mount_directory(&server).await;
    Mock::given(method("PUT"))
        .respond_with(applied())
        .expect(2)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let csv = write_csv(
        &dir,
        "Network Name,SSID Name,Description,VLAN,Services\n\
         Network 01,Wifi01,Printers,10,Printers\n\
         Network 02,Guest,Guests,40,AirPlay\n",
    );
    let mut cmd = bonfwd_cmd(dir.path());
    cmd.env(KEY_VAR, "test-key")
        .env("BONFWD_ORG", "Campus")
        .args(["--base-url", &format!("{}/api/v1", server.uri()), "-y", "-f"])
        .arg(&csv);
    let output = run(cmd).await;

    assert_eq!(output.status.code(), Some(0), "{}", combined_output(&output));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_dry_run_sends_no_updates() {
    let server = MockServer::start().await;
    mount_directory(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/v1/networks/L_1/wireless/ssids/0/bonjourForwarding"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "enabled": true,
            "rules": [{ "description": "Old", "vlanId": 5, "services": ["SSH"] }]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .respond_with(applied())
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let csv = write_csv(
        &dir,
        "Network Name,SSID Name,Description,VLAN,Services\n\
         Network 01,Wifi01,Printers,10,printers\n",
    );
    let mut cmd = bonfwd_cmd(dir.path());
    cmd.env(KEY_VAR, "test-key")
        .args(["--base-url", &format!("{}/api/v1", server.uri()), "--dry-run", "--file"])
        .arg(&csv);
    let output = run(cmd).await;

    assert_eq!(output.status.code(), Some(0), "{}", combined_output(&output));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("enabled, 1 rule(s)"), "{stdout}");
    assert!(stdout.contains("Printers"), "{stdout}");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_updates_require_yes_when_not_interactive() {
    let server = MockServer::start().await;
    mount_directory(&server).await;
    Mock::given(method("PUT"))
        .respond_with(applied())
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let csv = write_csv(&dir, VALID_CSV);
    let mut cmd = bonfwd_cmd(dir.path());
    cmd.env(KEY_VAR, "test-key")
        .args(["--base-url", &format!("{}/api/v1", server.uri()), "--file"])
        .arg(&csv);
    let output = run(cmd).await;

    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("--yes"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_unknown_organization_lists_choices() {
    let server = MockServer::start().await;
    mount_directory(&server).await;

    let dir = TempDir::new().unwrap();
    let csv = write_csv(&dir, VALID_CSV);
    let mut cmd = bonfwd_cmd(dir.path());
    cmd.env(KEY_VAR, "test-key")
        .args(["--base-url", &format!("{}/api/v1", server.uri()), "--org", "Lab", "--file"])
        .arg(&csv);
    let output = run(cmd).await;

    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(text.contains("Campus"), "{text}");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_rejected_key_exits_with_auth_code() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/organizations"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "errors": ["Invalid API key"] })),
        )
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let csv = write_csv(&dir, VALID_CSV);
    let mut cmd = bonfwd_cmd(dir.path());
    cmd.env(KEY_VAR, "bad-key")
        .args(["--base-url", &format!("{}/api/v1", server.uri()), "--file"])
        .arg(&csv);
    let output = run(cmd).await;

    assert_eq!(output.status.code(), Some(3));
}
