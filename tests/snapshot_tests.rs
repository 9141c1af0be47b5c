use std::fs;
use swagger_watch::snapshot::{fetch_and_store, host_dir, http_client, store_snapshot};
use swagger_watch::{FetchError, WatchError};
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const DOCUMENT: &str = r#"{"swagger": "2.0", "paths": {}}"#;

#[tokio::test(flavor = "multi_thread")]
async fn test_fetch_and_store_next_snapshot() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/swagger.json"))
        .and(header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(DOCUMENT))
        .expect(1)
        .mount(&server)
        .await;

    let root = TempDir::new().unwrap();
    let dir = host_dir(root.path(), "api.example.com");
    store_snapshot(&dir, 4, b"{}").unwrap();
    let url = format!("{}/v2/swagger.json", server.uri());

    let pair = tokio::task::spawn_blocking(move || {
        let client = http_client().unwrap();
        fetch_and_store(&client, &url, &dir, 4)
    })
    .await
    .unwrap()
    .unwrap();

    assert_eq!(pair.number, 5);
    assert!(pair.has_previous());
    assert!(pair.previous.ends_with("api.example.com/4.json"));
    assert!(pair.latest.ends_with("api.example.com/5.json"));
    assert_eq!(fs::read_to_string(&pair.latest).unwrap(), DOCUMENT);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_first_snapshot_has_no_previous() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(DOCUMENT))
        .mount(&server)
        .await;

    let root = TempDir::new().unwrap();
    let dir = host_dir(root.path(), "api.example.com");
    let url = server.uri();

    let pair = tokio::task::spawn_blocking(move || {
        let client = http_client().unwrap();
        fetch_and_store(&client, &url, &dir, 0)
    })
    .await
    .unwrap()
    .unwrap();

    assert_eq!(pair.number, 1);
    assert!(!pair.has_previous());
    assert!(pair.latest.exists());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_error_status_writes_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let root = TempDir::new().unwrap();
    let dir = host_dir(root.path(), "api.example.com");
    let url = format!("{}/v2/swagger.json", server.uri());
    let check_dir = dir.clone();

    let err = tokio::task::spawn_blocking(move || {
        let client = http_client().unwrap();
        fetch_and_store(&client, &url, &dir, 0)
    })
    .await
    .unwrap()
    .unwrap_err();

    assert!(matches!(
        err,
        WatchError::Fetch(FetchError::Status { status: 500, .. })
    ));
    assert!(!check_dir.exists());
}
