//! Integration tests for `OverpassClient` using wiremock HTTP mocks.

use covscan_core::{CategorySelection, LatLon};
use covscan_overpass::{build_query, OverpassClient, OverpassError};
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ROME: LatLon = LatLon {
    lat: 41.9,
    lon: 12.5,
};

fn test_client(server: &MockServer) -> OverpassClient {
    OverpassClient::with_base_url(
        &format!("{}/api/interpreter", server.uri()),
        5,
        "covscan-test/0.1",
    )
    .expect("client construction should not fail")
    .with_retries(0, 0)
}

fn lodging_only() -> CategorySelection {
    CategorySelection {
        lodging: true,
        ..Default::default()
    }
}

#[tokio::test]
async fn search_parses_elements_into_businesses() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "version": 0.6,
        "elements": [
            {
                "type": "node",
                "id": 101,
                "lat": 41.901,
                "lon": 12.501,
                "tags": {
                    "name": "Hotel Roma",
                    "tourism": "hotel",
                    "addr:street": "Via Roma",
                    "addr:housenumber": "1",
                    "addr:postcode": "00100",
                    "addr:city": "Roma"
                }
            },
            {
                "type": "node",
                "id": 102,
                "lat": 41.902,
                "lon": 12.502,
                "tags": { "name": "Ostello Centrale", "tourism": "hostel" }
            }
        ]
    });

    Mock::given(method("POST"))
        .and(path("/api/interpreter"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("data="))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let clauses = build_query(lodging_only(), ROME, 1000.0);
    let businesses = client.search(&clauses).await.expect("search should succeed");

    assert_eq!(businesses.len(), 2);
    assert_eq!(businesses[0].id, 101);
    assert_eq!(businesses[0].address(), "Via Roma 1, 00100 Roma");
    assert_eq!(businesses[1].name(), "Ostello Centrale");
}

#[tokio::test]
async fn search_sends_url_encoded_overpass_ql() {
    let server = MockServer::start().await;

    // `[out:json]` url-encodes to `%5Bout%3Ajson%5D`.
    Mock::given(method("POST"))
        .and(path("/api/interpreter"))
        .and(body_string_contains("data=%5Bout%3Ajson%5D"))
        .and(body_string_contains("guest_house"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"elements": []})))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let clauses = build_query(lodging_only(), ROME, 1000.0);
    let businesses = client.search(&clauses).await.expect("search should succeed");
    assert!(businesses.is_empty());
}

#[tokio::test]
async fn missing_elements_defaults_to_empty() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"version": 0.6})))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let clauses = build_query(lodging_only(), ROME, 1000.0);
    let businesses = client.search(&clauses).await.expect("search should succeed");
    assert!(businesses.is_empty());
}

#[tokio::test]
async fn non_success_status_is_query_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_string("parse error: line 1"))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let clauses = build_query(lodging_only(), ROME, 1000.0);
    let err = client.search(&clauses).await.unwrap_err();

    match err {
        OverpassError::Query { status, body } => {
            assert_eq!(status, 400);
            assert!(body.contains("parse error"));
        }
        other => panic!("expected Query error, got: {other:?}"),
    }
}

#[tokio::test]
async fn gateway_timeout_is_retried() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(504))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "elements": [{ "type": "node", "id": 5, "lat": 41.9, "lon": 12.5 }]
        })))
        .mount(&server)
        .await;

    let client = test_client(&server).with_retries(1, 0);
    let clauses = build_query(lodging_only(), ROME, 1000.0);
    let businesses = client.search(&clauses).await.expect("retry should succeed");
    assert_eq!(businesses.len(), 1);
}

#[tokio::test]
async fn malformed_body_is_deserialize_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>busy</html>"))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let clauses = build_query(lodging_only(), ROME, 1000.0);
    let err = client.search(&clauses).await.unwrap_err();
    assert!(matches!(err, OverpassError::Deserialize { .. }));
}
