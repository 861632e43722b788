//! Integration tests for OpenAiJudgeClient.
//!
//! Uses wiremock for HTTP mocking. Covers request shape, auth, status mapping
//! (429/5xx), missing content and retry through RetryingJudge.

use std::sync::Arc;
use std::time::Duration;

use prefjudge_core::providers::openai::OpenAiJudgeClient;
use prefjudge_core::{
    JudgeClient, JudgeConfig, JudgmentResult, PipelineError, RetryPolicy, RetryingJudge,
};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn completion(content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }]
    })
}

fn create_test_client(mock_server: &MockServer) -> OpenAiJudgeClient {
    let config = JudgeConfig::default()
        .with_base_url(format!("{}/v1", mock_server.uri()))
        .with_model("judge-model")
        .with_api_key("test-key");
    OpenAiJudgeClient::new(config).expect("failed to create client")
}

#[tokio::test]
async fn test_judge_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_partial_json(json!({
            "model": "judge-model",
            "messages": [{"role": "user", "content": "score these"}]
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion("summary1: [[8]], summary2: [[2]]")),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let reply = client.judge("score these").await.expect("judge failed");
    assert_eq!(reply, "summary1: [[8]], summary2: [[2]]");
}

#[tokio::test]
async fn test_judge_rate_limited() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "7"))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let err = client.judge("p").await.unwrap_err();
    match err {
        PipelineError::JudgeRateLimited { retry_after } => {
            assert_eq!(retry_after, Some(Duration::from_secs(7)));
        }
        other => panic!("expected JudgeRateLimited, got {other:?}"),
    }
    assert!(client.judge("p").await.unwrap_err().is_retryable());
}

#[tokio::test]
async fn test_judge_server_error_is_unavailable() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let err = client.judge("p").await.unwrap_err();
    match err {
        PipelineError::JudgeUnavailable { message } => {
            assert!(message.contains("503"), "{message}");
            assert!(message.contains("overloaded"), "{message}");
        }
        other => panic!("expected JudgeUnavailable, got {other:?}"),
    }
}

#[tokio::test]
async fn test_judge_missing_content() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let err = client.judge("p").await.unwrap_err();
    assert!(matches!(err, PipelineError::JudgeUnavailable { .. }));
}

#[tokio::test]
async fn test_no_auth_header_without_key() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("[[1]] [[2]]")))
        .mount(&mock_server)
        .await;

    let config = JudgeConfig::default()
        .with_base_url(mock_server.uri())
        .with_model("local");
    let client = OpenAiJudgeClient::new(config).expect("failed to create client");
    client.judge("p").await.expect("judge failed");

    let requests = mock_server.received_requests().await.expect("recording on");
    assert_eq!(requests.len(), 1);
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_timeout_surfaces_as_unavailable() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion("[[1]] [[2]]"))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;

    let mut config = JudgeConfig::default()
        .with_base_url(mock_server.uri())
        .with_model("slow");
    config.timeout_secs = Some(1);
    let client = OpenAiJudgeClient::new(config).expect("failed to create client");
    let err = client.judge("p").await.unwrap_err();
    assert!(matches!(err, PipelineError::JudgeUnavailable { .. }));
}

#[tokio::test]
async fn test_retrying_judge_recovers_after_malformed_reply() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(completion("I think the first is better.")),
        )
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("[7] [3]")))
        .mount(&mock_server)
        .await;

    let judge = RetryingJudge::new(
        Arc::new(create_test_client(&mock_server)),
        RetryPolicy::new(3, Duration::ZERO),
    );
    let result = judge.judge_with_retry("p").await;
    assert_eq!(result, Some(JudgmentResult::new(7, 3)));

    let requests = mock_server.received_requests().await.expect("recording on");
    assert_eq!(requests.len(), 2);
}
