//! Classification through the Anthropic provider against a mock Messages API.

#![allow(clippy::unwrap_used)] // Tests can unwrap

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use helpdesk::{Config, Resources, build_app};
use helpdesk_core::FALLBACK_WARNING;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::time::Duration;
use tower::ServiceExt;
use wiremock::matchers::{body_partial_json, header as header_eq, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer, timeout_ms: u64) -> Config {
    let vars: HashMap<&str, String> = HashMap::from([
        ("ANTHROPIC_API_KEY", "sk-test".to_string()),
        ("ANTHROPIC_API_URL", format!("{}/v1", server.uri())),
        ("CLASSIFIER_MODEL", "test-model".to_string()),
        ("CLASSIFIER_TIMEOUT_MS", timeout_ms.to_string()),
    ]);
    Config::from_lookup(|key| vars.get(key).cloned())
}

fn reply(text: &str) -> Value {
    json!({
        "id": "msg_01",
        "type": "message",
        "model": "test-model",
        "role": "assistant",
        "content": [{"type": "text", "text": text}],
        "stop_reason": "end_turn",
        "usage": {"input_tokens": 40, "output_tokens": 12}
    })
}

async fn classify(config: &Config, description: &str) -> (StatusCode, Value) {
    let resources = Resources::from_config(config).await.unwrap();
    let app = build_app(resources.into_state(), &[]);

    let request = Request::builder()
        .method("POST")
        .uri("/api/tickets/classify")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({"description": description}).to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_provider_labels_returned_without_warning() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(header_eq("x-api-key", "sk-test"))
        .and(body_partial_json(json!({"model": "test-model", "max_tokens": 256})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(reply(r#"{"category": "account", "priority": "high"}"#)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let (status, body) = classify(&config_for(&server, 2_000), "I cannot sign in to the portal").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"suggested_category": "account", "suggested_priority": "high"})
    );
}

#[tokio::test]
async fn test_api_error_falls_back() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(529).set_body_json(json!({
            "type": "error",
            "error": {"type": "overloaded_error", "message": "Overloaded"}
        })))
        .mount(&server)
        .await;

    let (status, body) = classify(&config_for(&server, 2_000), "Found a bug in the export").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["suggested_category"], "technical");
    assert_eq!(body["suggested_priority"], "high");
    assert_eq!(body["warning"], FALLBACK_WARNING);
}

#[tokio::test]
async fn test_slow_provider_falls_back_within_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(reply(r#"{"category": "general", "priority": "low"}"#))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let started = std::time::Instant::now();
    let (status, body) = classify(&config_for(&server, 200), "Payment page hangs").await;

    assert!(started.elapsed() < Duration::from_secs(4));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["suggested_category"], "billing");
    assert_eq!(body["suggested_priority"], "medium");
    assert_eq!(body["warning"], FALLBACK_WARNING);
}

#[tokio::test]
async fn test_empty_reply_falls_back() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "msg_02",
            "type": "message",
            "model": "test-model",
            "role": "assistant",
            "content": [],
            "stop_reason": "max_tokens",
            "usage": {"input_tokens": 40, "output_tokens": 0}
        })))
        .mount(&server)
        .await;

    let (status, body) = classify(&config_for(&server, 2_000), "General question").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["suggested_category"], "general");
    assert_eq!(body["suggested_priority"], "low");
    assert_eq!(body["warning"], FALLBACK_WARNING);
}
