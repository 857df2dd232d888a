//! Tests for the HTTP client module

use super::*;
use crate::error::Error;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fast_retry(max_attempts: u32) -> RetryPolicy {
    RetryPolicy {
        max_attempts,
        initial_backoff: Duration::from_millis(5),
        multiplier: 2.0,
        max_backoff: Duration::from_millis(20),
    }
}

fn client_for(server: &MockServer, retry: RetryPolicy) -> HttpClient {
    let config = HttpClientConfig::builder()
        .base_url(server.uri())
        .bearer_token("test-token")
        .retry(retry)
        .build();
    HttpClient::with_config(config).unwrap()
}

#[test]
fn test_http_client_config_default() {
    let config = HttpClientConfig::default();
    assert_eq!(config.connect_timeout, Duration::from_secs(5));
    assert_eq!(config.read_timeout, Duration::from_secs(30));
    assert_eq!(config.write_timeout, Duration::from_secs(30));
    assert_eq!(config.request_timeout(), Duration::from_secs(65));
    assert_eq!(config.retry, RetryPolicy::default());
    assert!(config.base_url.is_none());
}

#[test]
fn test_http_client_config_builder() {
    let config = HttpClientConfig::builder()
        .base_url("https://api.example.com")
        .timeouts(
            Duration::from_secs(1),
            Duration::from_secs(2),
            Duration::from_secs(3),
        )
        .retry(RetryPolicy::none())
        .bearer_token("secret")
        .user_agent("test-agent/1.0")
        .build();

    assert_eq!(config.base_url, Some("https://api.example.com".to_string()));
    assert_eq!(config.read_timeout, Duration::from_secs(2));
    assert_eq!(config.retry.max_attempts, 1);
    assert_eq!(
        config.default_headers.get("authorization"),
        Some(&"Bearer secret".to_string())
    );
    assert_eq!(config.user_agent, "test-agent/1.0");
}

#[test]
fn test_default_backoff_schedule() {
    let policy = RetryPolicy::default();
    assert_eq!(policy.delay_for(1), Duration::from_millis(1000));
    assert_eq!(policy.delay_for(2), Duration::from_millis(2000));
    assert_eq!(policy.delay_for(3), Duration::from_millis(4000));
    assert_eq!(policy.delay_for(4), Duration::from_millis(5000));
    assert_eq!(policy.delay_for(30), Duration::from_millis(5000));
}

#[test]
fn test_invalid_default_header_is_config_error() {
    let config = HttpClientConfig::builder().header("bad header", "x").build();
    let err = HttpClient::with_config(config).unwrap_err();
    assert!(matches!(err, Error::InvalidConfigValue { .. }));
}

#[tokio::test]
async fn test_get_sends_bearer_and_query() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/contacts"))
        .and(query_param("page", "2"))
        .and(header("Authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, RetryPolicy::none());
    let response = client
        .get("/api/v1/contacts", &[("page", "2".to_string())])
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_get_non_2xx_is_status_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_string("missing"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, RetryPolicy::none());
    let err = client.get("/nowhere", &[]).await.unwrap_err();

    match err {
        Error::HttpStatus { status, body } => {
            assert_eq!(status, 404);
            assert_eq!(body, "missing");
        }
        other => panic!("Expected HttpStatus, got {other:?}"),
    }
}

#[tokio::test]
async fn test_get_connection_refused_is_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let uri = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let config = HttpClientConfig::builder()
        .base_url(uri)
        .retry(RetryPolicy::none())
        .build();
    let client = HttpClient::with_config(config).unwrap();

    let err = client.get("/api/v1/contacts", &[]).await.unwrap_err();
    assert!(matches!(err, Error::Http(_)));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_retry_succeeds_on_third_attempt() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/flaky"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(2)
        .expect(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/flaky"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = &client_for(&mock_server, fast_retry(3));
    let body: serde_json::Value = client
        .retry("flaky", move |_| async move {
            let response = client.get("/api/flaky", &[]).await?;
            Ok(response.json().await?)
        })
        .await
        .unwrap();

    assert_eq!(body["ok"], true);
}

#[tokio::test]
async fn test_retry_exhausted_makes_no_fourth_attempt() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/down"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&mock_server)
        .await;

    let client = &client_for(&mock_server, fast_retry(3));
    let err = client
        .retry("down", move |_| async move { client.get("/api/down", &[]).await })
        .await
        .unwrap_err();

    assert!(matches!(err, Error::HttpStatus { status: 503, .. }));
}

#[tokio::test]
async fn test_retry_passes_attempt_number() {
    let mock_server = MockServer::start().await;
    let client = client_for(&mock_server, fast_retry(3));
    let seen = AtomicU32::new(0);

    let result: crate::error::Result<u32> = client
        .retry("counting", |attempt| {
            seen.store(attempt, Ordering::SeqCst);
            async move {
                if attempt < 3 {
                    Err(Error::decode("not yet"))
                } else {
                    Ok(attempt)
                }
            }
        })
        .await;

    assert_eq!(result.unwrap(), 3);
    assert_eq!(seen.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_retry_stops_on_non_retryable_error() {
    let mock_server = MockServer::start().await;
    let client = client_for(&mock_server, fast_retry(3));
    let calls = AtomicU32::new(0);

    let result: crate::error::Result<()> = client
        .retry("config", |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(Error::config("broken")) }
        })
        .await;

    assert!(matches!(result, Err(Error::Config { .. })));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}
