//! Integration tests for the EPGStation adapter against a wiremock server

use std::time::Duration;

use epgwatch_adapters::epgstation::EpgStationAdapter;
use epgwatch_adapters::{AdapterError, MetricFamily};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn json(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.to_owned(), "application/json")
}

async fn mount(server: &MockServer, api_path: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(api_path))
        .respond_with(json(body))
        .mount(server)
        .await;
}

/// Mounts the canned responses of a small recorder with some activity.
async fn populated_server() -> MockServer {
    let server = MockServer::start().await;

    mount(&server, "/api/streams/info", "[{},{}]").await;
    mount(&server, "/api/reserves", r#"{"reserves":[],"total":3}"#).await;
    mount(&server, "/api/reserves/skips", r#"{"total":1}"#).await;
    mount(&server, "/api/reserves/overlaps", r#"{"total":1}"#).await;
    mount(&server, "/api/reserves/conflicts", r#"{"total":1}"#).await;
    mount(&server, "/api/encode", r#"{"queue":[{}],"encoding":{"id":"x1"}}"#).await;

    Mock::given(method("GET"))
        .and(path("/api/rules"))
        .and(query_param("limit", "1"))
        .and(query_param("offset", "0"))
        .respond_with(json(r#"{"rules":[{"id":1}],"total":12}"#))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/recorded"))
        .and(query_param("recording", "true"))
        .respond_with(json(r#"{"recorded":[],"total":2}"#))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/recorded"))
        .and(query_param("recording", "false"))
        .respond_with(json(r#"{"recorded":[],"total":345}"#))
        .mount(&server)
        .await;

    server
}

fn adapter_for(server: &MockServer) -> EpgStationAdapter {
    EpgStationAdapter::builder()
        .target(server.address().to_string())
        .build()
        .expect("Failed to build adapter")
}

#[tokio::test]
async fn test_collect_end_to_end() {
    let server = populated_server().await;
    let adapter = adapter_for(&server);

    let result = adapter.collect().await.expect("collection failed");

    assert!(result.is_complete());
    assert_eq!(result.len(), 9);
    assert_eq!(result.get("stream"), Some(2.0));
    assert_eq!(result.get("schedule"), Some(3.0));
    assert_eq!(result.get("skip"), Some(1.0));
    assert_eq!(result.get("overlap"), Some(1.0));
    assert_eq!(result.get("duplicate"), Some(1.0));
    assert_eq!(result.get("rule"), Some(12.0));
    assert_eq!(result.get("recording"), Some(2.0));
    assert_eq!(result.get("recorded"), Some(345.0));
    assert_eq!(result.get("queue"), Some(2.0));
}

#[tokio::test]
async fn test_collect_issues_one_request_per_family() {
    let server = populated_server().await;
    let adapter = adapter_for(&server);

    adapter.collect().await.expect("collection failed");

    let requests = server.received_requests().await.expect("recording enabled");
    assert_eq!(requests.len(), MetricFamily::ALL.len());
    assert!(requests.iter().all(|r| r.url.path().starts_with("/api/")));
}

#[tokio::test]
async fn test_collect_is_idempotent() {
    let server = populated_server().await;
    let adapter = adapter_for(&server);

    let first = adapter.collect().await.expect("first run failed");
    let second = adapter.collect().await.expect("second run failed");

    assert_eq!(first.values, second.values);
}

#[tokio::test]
async fn test_non_success_status_is_still_decoded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/reserves/skips"))
        .respond_with(ResponseTemplate::new(500).set_body_string(r#"{"total":4}"#))
        .mount(&server)
        .await;

    let adapter = adapter_for(&server);
    let value = adapter.fetch(MetricFamily::Skip).await.expect("fetch failed");

    assert_eq!(value, 4.0);
}

#[tokio::test]
async fn test_unexpected_bodies_report_zero() {
    let server = MockServer::start().await;
    mount(&server, "/api/streams/info", r#"{"error":"not ready"}"#).await;
    mount(&server, "/api/encode", "{}").await;
    // Everything else falls through to wiremock's empty 404.

    let adapter = adapter_for(&server);
    let result = adapter.collect().await.expect("collection failed");

    assert!(result.is_complete());
    assert!(result.iter().all(|(_, v)| *v == 0.0));
}

#[tokio::test]
async fn test_connection_refused_is_an_error() {
    // Grab a free port, then close it so nothing is listening.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let adapter = EpgStationAdapter::builder()
        .target(addr.to_string())
        .build()
        .unwrap();

    let err = adapter.collect().await.unwrap_err();
    assert!(matches!(err, AdapterError::Connection(_)), "got {err:?}");
}

#[tokio::test]
async fn test_single_failing_family_aborts_collection() {
    let server = populated_server().await;
    Mock::given(method("GET"))
        .and(path("/api/encode"))
        .respond_with(json("{}").set_delay(Duration::from_secs(5)))
        .with_priority(1)
        .mount(&server)
        .await;

    let adapter = EpgStationAdapter::builder()
        .target(server.address().to_string())
        .timeout(Duration::from_millis(200))
        .build()
        .unwrap();

    let err = adapter.collect().await.unwrap_err();
    assert!(matches!(err, AdapterError::Timeout), "got {err:?}");
}
