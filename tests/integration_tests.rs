//! End-to-end tests of the swagger-watch binary.
//!
//! Each test serves Swagger documents from a local mock server and runs the
//! binary against a temporary snapshot directory.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const DOCUMENT_PATH: &str = "/v2/swagger.json";

fn swagger_watch() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("swagger-watch"))
}

fn fixture(name: &str) -> String {
    fs::read_to_string(Path::new("tests/fixtures").join(name)).unwrap()
}

fn host_of(server: &MockServer) -> String {
    server.address().to_string()
}

fn write_config(dir: &Path, host: &str, webhook: &str) -> std::path::PathBuf {
    let config = dir.join("config.yaml");
    fs::write(
        &config,
        format!(
            "name: petstore\npath: {}\nhttps: false\nhosts:\n  - \"{}\"\nslack-webhook: \"{}\"\nslack-channel: \"#api-changes\"\n",
            DOCUMENT_PATH, host, webhook
        ),
    )
    .unwrap();
    config
}

async fn serve_document(server: &MockServer, body: String) {
    Mock::given(method("GET"))
        .and(path(DOCUMENT_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

#[test]
fn test_missing_config_exit_2() {
    let dir = TempDir::new().unwrap();
    swagger_watch()
        .arg("--config")
        .arg(dir.path().join("absent.yaml"))
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Failed to load config"));
}

#[test]
fn test_missing_webhook_exit_2() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("config.yaml");
    fs::write(&config, "name: p\nhosts: [api.example.com]\n").unwrap();

    swagger_watch()
        .arg("-c")
        .arg(&config)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("slack-webhook must be set"));
}

#[test]
fn test_help() {
    swagger_watch()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--dry-run"))
        .stdout(predicate::str::contains("--snapshot-dir"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_first_run_stores_baseline() {
    let server = MockServer::start().await;
    serve_document(&server, fixture("petstore_v1.json")).await;

    let dir = TempDir::new().unwrap();
    let host = host_of(&server);
    let config = write_config(dir.path(), &host, "http://unused.invalid/hook");
    let snapshots = dir.path().join("snapshots");
    let args = (config, snapshots.clone());

    tokio::task::spawn_blocking(move || {
        swagger_watch()
            .arg("-c")
            .arg(&args.0)
            .arg("-d")
            .arg(&args.1)
            .arg("--dry-run")
            .assert()
            .code(0)
            .stdout(predicate::str::is_empty());
    })
    .await
    .unwrap();

    let stored = fs::read_to_string(snapshots.join(&host).join("1.json")).unwrap();
    assert_eq!(stored, fixture("petstore_v1.json"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_dry_run_prints_report() {
    let server = MockServer::start().await;
    serve_document(&server, fixture("petstore_v2.json")).await;

    let dir = TempDir::new().unwrap();
    let host = host_of(&server);
    let config = write_config(dir.path(), &host, "http://unused.invalid/hook");
    let snapshots = dir.path().join("snapshots");
    fs::create_dir_all(snapshots.join(&host)).unwrap();
    fs::write(snapshots.join(&host).join("1.json"), fixture("petstore_v1.json")).unwrap();

    let expected_summary = format!("JSON objects are not equal. Differences: {}", host);
    let args = (config, snapshots.clone());

    tokio::task::spawn_blocking(move || {
        swagger_watch()
            .arg("-c")
            .arg(&args.0)
            .arg("-d")
            .arg(&args.1)
            .arg("--dry-run")
            .assert()
            .code(0)
            .stdout(predicate::str::contains(expected_summary))
            .stdout(predicate::str::contains(
                "Addition maxLength Changed Value: 64 [definitions Pet properties name] Changed Endpoints:",
            ))
            .stdout(predicate::str::contains("*#/pet/post*"))
            .stdout(predicate::str::contains("*#/info/version*"));
    })
    .await
    .unwrap();

    assert!(snapshots.join(&host).join("2.json").exists());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_json_format() {
    let server = MockServer::start().await;
    serve_document(&server, fixture("petstore_v1.json")).await;

    let dir = TempDir::new().unwrap();
    let host = host_of(&server);
    let config = write_config(dir.path(), &host, "http://unused.invalid/hook");
    let snapshots = dir.path().join("snapshots");
    fs::create_dir_all(snapshots.join(&host)).unwrap();
    fs::write(snapshots.join(&host).join("1.json"), fixture("petstore_v1.json")).unwrap();

    let output = tokio::task::spawn_blocking(move || {
        swagger_watch()
            .args(["--dry-run", "--format", "json", "-c"])
            .arg(&config)
            .arg("-d")
            .arg(&snapshots)
            .output()
            .unwrap()
    })
    .await
    .unwrap();

    assert_eq!(output.status.code(), Some(0));
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["equal"], true);
    assert_eq!(value["host"], host);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_report_is_posted_to_webhook() {
    let server = MockServer::start().await;
    serve_document(&server, fixture("petstore_v2.json")).await;
    Mock::given(method("POST"))
        .and(path("/hook"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let host = host_of(&server);
    let config = write_config(dir.path(), &host, &format!("{}/hook", server.uri()));
    let snapshots = dir.path().join("snapshots");
    fs::create_dir_all(snapshots.join(&host)).unwrap();
    fs::write(snapshots.join(&host).join("1.json"), fixture("petstore_v1.json")).unwrap();

    tokio::task::spawn_blocking(move || {
        swagger_watch()
            .arg("-c")
            .arg(&config)
            .arg("-d")
            .arg(&snapshots)
            .assert()
            .code(0)
            .stdout(predicate::str::is_empty());
    })
    .await
    .unwrap();

    let requests = server.received_requests().await.unwrap();
    let posted = requests
        .iter()
        .find(|r| r.method.as_str() == "POST")
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&posted.body).unwrap();
    assert_eq!(body["channel"], "#api-changes");
    assert!(body["text"]
        .as_str()
        .unwrap()
        .contains("*#/pet/put*"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_failed_host_exit_1() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let host = host_of(&server);
    let config = write_config(dir.path(), &host, "http://unused.invalid/hook");
    let snapshots = dir.path().join("snapshots");
    let check = snapshots.join(&host);

    tokio::task::spawn_blocking(move || {
        swagger_watch()
            .arg("-c")
            .arg(&config)
            .arg("-d")
            .arg(&snapshots)
            .arg("--dry-run")
            .assert()
            .code(1)
            .stderr(predicate::str::contains("HTTP 500"));
    })
    .await
    .unwrap();

    assert!(!check.exists());
}
