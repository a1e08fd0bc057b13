//! HTTP gateway tests against a mock provider
//!
//! Verifies the minimal wire contract: request shaping, auth headers,
//! response text extraction, and status-to-error mapping.

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use counsel_core::catalog::ModelId;
use counsel_core::config::{ApiKey, CounselConfig};
use counsel_core::providers::{Gateway, HttpGateway, ProviderError};

fn config_for(server: &MockServer) -> CounselConfig {
    CounselConfig {
        openai_api_key: Some(ApiKey::new("sk-test")),
        gemini_api_key: Some(ApiKey::new("g-test")),
        openai_base_url: server.uri(),
        google_base_url: server.uri(),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_openai_invocation_returns_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({"model": "gpt-5-mini"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": "second opinion text"}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = HttpGateway::new(&config_for(&server)).unwrap();
    let text = gateway
        .invoke(ModelId::Gpt5Mini, "prompt", Some("system"))
        .await
        .unwrap();
    assert_eq!(text, "second opinion text");
}

#[tokio::test]
async fn test_openai_system_prompt_is_first_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(json!({
            "messages": [
                {"role": "system", "content": "be thorough"},
                {"role": "user", "content": "prompt"}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": "ok"}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = HttpGateway::new(&config_for(&server)).unwrap();
    gateway
        .invoke(ModelId::Gpt5, "prompt", Some("be thorough"))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_gemini_invocation_joins_candidate_parts() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-2.5-flash:generateContent"))
        .and(header("x-goog-api-key", "g-test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{"content": {"parts": [{"text": "first "}, {"text": "second"}]}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = HttpGateway::new(&config_for(&server)).unwrap();
    let text = gateway
        .invoke(ModelId::GeminiFlash, "prompt", None)
        .await
        .unwrap();
    assert_eq!(text, "first second");
}

#[tokio::test]
async fn test_unauthorized_maps_to_authentication_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": {"message": "invalid api key"}
        })))
        .mount(&server)
        .await;

    let gateway = HttpGateway::new(&config_for(&server)).unwrap();
    let err = gateway
        .invoke(ModelId::Gpt5Nano, "prompt", None)
        .await
        .unwrap_err();

    match err {
        ProviderError::Authentication(message) => assert_eq!(message, "invalid api key"),
        other => panic!("expected Authentication, got {:?}", other),
    }
}

#[tokio::test]
async fn test_rate_limit_maps_to_rate_limit_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-2.5-pro:generateContent"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "error": {"message": "quota exceeded"}
        })))
        .mount(&server)
        .await;

    let gateway = HttpGateway::new(&config_for(&server)).unwrap();
    let err = gateway
        .invoke(ModelId::GeminiPro, "prompt", None)
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::RateLimit(_)));
}

#[tokio::test]
async fn test_server_error_maps_to_upstream() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .mount(&server)
        .await;

    let gateway = HttpGateway::new(&config_for(&server)).unwrap();
    let err = gateway
        .invoke(ModelId::Gpt5, "prompt", None)
        .await
        .unwrap_err();

    match err {
        ProviderError::Upstream { status, .. } => assert_eq!(status, 503),
        other => panic!("expected Upstream, got {:?}", other),
    }
}

#[tokio::test]
async fn test_empty_choices_is_a_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
        .mount(&server)
        .await;

    let gateway = HttpGateway::new(&config_for(&server)).unwrap();
    let err = gateway
        .invoke(ModelId::Gpt5Mini, "prompt", None)
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::Parse(_)));
}

#[tokio::test]
async fn test_missing_key_fails_without_a_request() {
    let server = MockServer::start().await;
    let config = CounselConfig {
        gemini_api_key: Some(ApiKey::new("g-test")),
        openai_base_url: server.uri(),
        google_base_url: server.uri(),
        ..Default::default()
    };

    let gateway = HttpGateway::new(&config).unwrap();
    let err = gateway
        .invoke(ModelId::Gpt5Mini, "prompt", None)
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::Authentication(_)));

    // No mock was mounted; had a request been sent it would have failed
    // differently, but the guard should trip before any I/O.
    assert!(server.received_requests().await.unwrap().is_empty());
}
