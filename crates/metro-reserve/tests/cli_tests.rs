//! Integration tests for the metro-reserve binary
//!
//! Runs the built binary with a scratch HOME and a clean environment, against
//! a wiremock server where the network is involved.

use std::path::Path;
use std::process::Output;

use serde_json::{json, Value};
use tempfile::TempDir;
use tokio::process::Command;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const RESERVATION_PATH: &str = "/Appointment/CreateAppointment";

fn metro_reserve(home: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_metro-reserve"));
    cmd.env_clear().env("HOME", home).env("NO_COLOR", "1");
    cmd
}

async fn run(home: &Path, args: &[&str]) -> Output {
    metro_reserve(home).args(args).output().await.unwrap()
}

async fn reply_with(server: &MockServer, body: Value) {
    Mock::given(method("POST"))
        .and(path(RESERVATION_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

fn endpoint(server: &MockServer) -> String {
    format!("{}{}", server.uri(), RESERVATION_PATH)
}

#[tokio::test]
async fn test_version_json() {
    let home = TempDir::new().unwrap();
    let output = run(home.path(), &["version", "--json"]).await;

    assert!(output.status.success());
    let info: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(info["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_book_without_token_is_config_error() {
    let home = TempDir::new().unwrap();
    let output = run(home.path(), &["book", "-r", "1"]).await;

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Missing credential"), "stderr: {}", stderr);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_book_with_unsendable_token_fails_before_any_attempt() {
    let home = TempDir::new().unwrap();
    let server = MockServer::start().await;
    reply_with(&server, json!({"appointmentId": "", "stationEntrance": ""})).await;

    let output = run(
        home.path(),
        &["book", "-t", "abc\u{1}def", "--endpoint", &endpoint(&server), "-r", "3"],
    )
    .await;

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid credential"), "stderr: {}", stderr);
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_explicit_config_is_error() {
    let home = TempDir::new().unwrap();
    let output = run(home.path(), &["config", "show", "-c", "/nonexistent/metro.yaml"]).await;

    assert_eq!(output.status.code(), Some(1));
}

#[tokio::test]
async fn test_config_init_then_show() {
    let home = TempDir::new().unwrap();

    let output = run(home.path(), &["config", "init"]).await;
    assert!(output.status.success());
    assert!(home.path().join(".metro-reserve/config.yaml").exists());

    let output = run(home.path(), &["config", "show", "--json"]).await;
    assert!(output.status.success());
    let config: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(config["retry"]["max-attempts"], 15);
    assert_eq!(config["reservation"]["station"], "沙河站");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_book_success_json() {
    let home = TempDir::new().unwrap();
    let server = MockServer::start().await;
    reply_with(
        &server,
        json!({"balance": 1, "appointmentId": "A123", "stationEntrance": "Gate2"}),
    )
    .await;

    let output = run(
        home.path(),
        &["book", "-t", "tok", "--endpoint", &endpoint(&server), "--date", "20250102", "--json"],
    )
    .await;

    assert!(output.status.success());
    let report: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["booked"], true);
    assert_eq!(report["attempts"], 1);
    assert_eq!(report["response"]["appointmentId"], "A123");

    let requests = server.received_requests().await.unwrap();
    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["enterDate"], "20250102");
    assert_eq!(body["stationName"], "沙河站");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_book_exhaustion_exit_codes() {
    let home = TempDir::new().unwrap();
    let server = MockServer::start().await;
    reply_with(&server, json!({"appointmentId": "", "stationEntrance": ""})).await;
    let endpoint = endpoint(&server);
    let base = ["book", "-t", "tok", "--endpoint", endpoint.as_str(), "-r", "2", "-s", "10ms"];

    let output = run(home.path(), &base).await;
    assert_eq!(output.status.code(), Some(0));

    let mut strict = base.to_vec();
    strict.extend(["--strict", "--json"]);
    let output = run(home.path(), &strict).await;
    assert_eq!(output.status.code(), Some(2));

    let report: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["booked"], false);
    assert_eq!(report["attempts"], 2);
    assert_eq!(report["stop_reason"], "max-attempts-reached");
    assert_eq!(server.received_requests().await.unwrap().len(), 4);
}
