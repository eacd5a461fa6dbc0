use std::time::Duration;

use carbon_tracker::advisor::{GeminiClient, TipProvider};
use carbon_tracker::{AdvisoryError, Config, TransportFailure};
use httpmock::prelude::*;
use serde_json::json;

const ENDPOINT: &str = "/v1beta/models/gemini-1.5-flash:generateContent";

fn client_for(server: &MockServer, timeout: Duration) -> GeminiClient {
    let config = Config {
        api_key: Some("test-key".into()),
        api_base_url: server.base_url(),
        http_timeout: timeout,
        ..Config::default()
    };
    GeminiClient::try_new(&config).expect("client builds")
}

#[tokio::test]
async fn returns_text_from_first_candidate() {
    let server = MockServer::start_async().await;

    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path(ENDPOINT)
                .query_param("key", "test-key")
                .json_body(json!({
                    "contents": [{"role": "user", "parts": [{"text": "reduce please"}]}]
                }));
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({
                    "candidates": [{
                        "content": {"parts": [{"text": "- Cycle to work\n- Eat less beef"}]}
                    }]
                }));
        })
        .await;

    let text = client_for(&server, Duration::from_secs(2))
        .generate("reduce please")
        .await
        .expect("tips");

    mock.assert_async().await;
    assert_eq!(text, "- Cycle to work\n- Eat less beef");
}

#[tokio::test]
async fn missing_text_path_is_content_not_found() {
    let server = MockServer::start_async().await;

    let _mock = server
        .mock_async(|when, then| {
            when.method(POST).path(ENDPOINT);
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({"candidates": [{"finishReason": "SAFETY"}]}));
        })
        .await;

    let error = client_for(&server, Duration::from_secs(2))
        .generate("anything")
        .await
        .expect_err("no content");

    assert!(matches!(error, AdvisoryError::ContentNotFound));
    assert!(error.is_format_error());
}

#[tokio::test]
async fn server_errors_are_transport_failures() {
    let server = MockServer::start_async().await;

    let _mock = server
        .mock_async(|when, then| {
            when.method(POST).path(ENDPOINT);
            then.status(500).body("internal");
        })
        .await;

    let error = client_for(&server, Duration::from_secs(2))
        .generate("anything")
        .await
        .expect_err("500");

    assert_eq!(error.transport_failure(), Some(TransportFailure::Status(500)));
    assert!(!error.is_format_error());
}

#[tokio::test]
async fn non_json_body_is_decode_failure() {
    let server = MockServer::start_async().await;

    let _mock = server
        .mock_async(|when, then| {
            when.method(POST).path(ENDPOINT);
            then.status(200).body("<html>oops</html>");
        })
        .await;

    let error = client_for(&server, Duration::from_secs(2))
        .generate("anything")
        .await
        .expect_err("not json");

    assert_eq!(error.transport_failure(), Some(TransportFailure::Decode));
}

#[tokio::test]
async fn slow_server_times_out() {
    let server = MockServer::start_async().await;

    let _mock = server
        .mock_async(|when, then| {
            when.method(POST).path(ENDPOINT);
            then.status(200)
                .delay(Duration::from_millis(500))
                .header("content-type", "application/json")
                .json_body(json!({
                    "candidates": [{"content": {"parts": [{"text": "late"}]}}]
                }));
        })
        .await;

    let error = client_for(&server, Duration::from_millis(100))
        .generate("anything")
        .await
        .expect_err("timeout");

    assert_eq!(error.transport_failure(), Some(TransportFailure::Timeout));
}

#[tokio::test]
async fn unreachable_host_is_transport_failure() {
    let config = Config {
        api_key: Some("test-key".into()),
        // nothing listens on port 9 locally
        api_base_url: "http://127.0.0.1:9".into(),
        http_timeout: Duration::from_secs(2),
        ..Config::default()
    };
    let error = GeminiClient::try_new(&config)
        .expect("client builds")
        .generate("anything")
        .await
        .expect_err("connection refused");

    assert!(matches!(error, AdvisoryError::Transport { .. }));
}
