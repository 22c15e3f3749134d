#![allow(clippy::unwrap_used)]
// Integration tests for the record loader using wiremock.

use std::time::Duration;

use serde_json::json;
use url::Url;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ftthmap_core::{CoreError, DataSource, DataStore, FilterState, LoadOptions, load_records, project};

// ── Helpers ─────────────────────────────────────────────────────────

fn records_body() -> serde_json::Value {
    json!([
        {
            "streetName": "Abay Ave", "house": "10", "subHouse": null,
            "fullAddress": "Almaty, Abay Ave 10", "gisFullName": null,
            "latitude": "43.2389", "longitude": "76.8897",
            "isAvailable": 1, "provider": "telecom"
        },
        {
            "streetName": "Abay Ave", "house": "10",
            "latitude": "43.2389", "longitude": "76.8897",
            "isAvailable": 1, "provider": "beeline"
        },
        {
            "streetName": "Dostyk St", "house": 5,
            "latitude": "", "longitude": "76.95",
            "isAvailable": 0, "provider": "telecom"
        },
        {
            "streetName": "Dostyk St", "house": "7",
            "latitude": "abc", "longitude": "76.95",
            "isAvailable": 0, "provider": "beeline"
        }
    ])
}

async fn serve(template: ResponseTemplate) -> (MockServer, DataSource) {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/addresses.json"))
        .respond_with(template)
        .mount(&server)
        .await;
    let base = Url::parse(&format!("{}/", server.uri())).unwrap();
    let source = DataSource::parse("addresses.json", Some(&base)).unwrap();
    (server, source)
}

// ── Success path ────────────────────────────────────────────────────

#[tokio::test]
async fn test_load_and_aggregate_remote_records() {
    let (_server, source) = serve(ResponseTemplate::new(200).set_body_json(records_body())).await;

    let records = load_records(&source, &LoadOptions::default()).await.unwrap();
    assert_eq!(records.len(), 4);

    let store = DataStore::new();
    let dataset = store.load(&records);
    assert_eq!(dataset.summary.records, 4);
    assert_eq!(dataset.summary.skipped, 1);
    assert_eq!(dataset.summary.total, 2);
    assert_eq!(dataset.summary.multi_provider, 1);
    assert_eq!(dataset.providers, ["beeline", "telecom"]);

    let projection = project(&dataset.entities, &FilterState::default());
    assert_eq!(projection.visible_count(), 1);
}

#[tokio::test]
async fn test_sends_json_accept_header() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data.json"))
        .and(header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(records_body()))
        .expect(1)
        .mount(&server)
        .await;

    let source = DataSource::parse(&format!("{}/data.json", server.uri()), None).unwrap();
    load_records(&source, &LoadOptions::default()).await.unwrap();
}

#[tokio::test]
async fn test_load_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("addresses.json");
    std::fs::write(&file, records_body().to_string()).unwrap();

    let source = DataSource::parse(file.to_str().unwrap(), None).unwrap();
    let records = load_records(&source, &LoadOptions::default()).await.unwrap();
    assert_eq!(records.len(), 4);
}

// ── Failure path ────────────────────────────────────────────────────

#[tokio::test]
async fn test_non_success_status() {
    let (_server, source) = serve(ResponseTemplate::new(404)).await;
    let result = load_records(&source, &LoadOptions::default()).await;
    assert!(
        matches!(result, Err(CoreError::HttpStatus { status: 404, .. })),
        "expected HttpStatus error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_empty_array_is_an_error() {
    let (_server, source) = serve(ResponseTemplate::new(200).set_body_json(json!([]))).await;
    let result = load_records(&source, &LoadOptions::default()).await;
    assert!(
        matches!(result, Err(CoreError::EmptyDataset { .. })),
        "expected EmptyDataset error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_malformed_body() {
    let (_server, source) =
        serve(ResponseTemplate::new(200).set_body_string("<html>not json</html>")).await;
    let result = load_records(&source, &LoadOptions::default()).await;
    assert!(
        matches!(result, Err(CoreError::Decode { .. })),
        "expected Decode error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_timeout_when_configured() {
    let (_server, source) = serve(
        ResponseTemplate::new(200)
            .set_body_json(records_body())
            .set_delay(Duration::from_millis(500)),
    )
    .await;

    let options = LoadOptions {
        timeout: Some(Duration::from_millis(50)),
        ..LoadOptions::default()
    };
    let result = load_records(&source, &options).await;
    assert!(
        matches!(result, Err(CoreError::Timeout { .. })),
        "expected Timeout error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let source = DataSource::File(dir.path().join("nope.json"));
    let result = load_records(&source, &LoadOptions::default()).await;
    assert!(matches!(result, Err(CoreError::Read { .. })));
}

#[tokio::test]
async fn test_failed_load_leaves_store_empty() {
    let (_server, source) = serve(ResponseTemplate::new(500)).await;
    let store = DataStore::new();

    if let Ok(records) = load_records(&source, &LoadOptions::default()).await {
        store.load(&records);
    }

    let snap = store.snapshot();
    assert!(!snap.is_loaded());
    assert_eq!(snap.summary.total, 0);
    assert!(project(&snap.entities, &FilterState::default()).is_empty());
}
