//! Integration tests for the text-generation HTTP client
//!
//! Test coverage:
//! - Generate and embedding requests against a mock server
//! - Status code classification
//! - Malformed success bodies
//! - Full completion round trip through the service

mod common;

use mockito::{Matcher, Server};
use std::sync::Arc;
use textgen_bridge::domain::models::{GenerationConfig, PromptProfile};
use textgen_bridge::domain::ports::{GenerateRequest, TextGenError, TextGenerator};
use textgen_bridge::infrastructure::textgen::{TextGenClient, TextGenClientConfig};
use textgen_bridge::services::CompletionService;

fn client_for(server: &Server) -> TextGenClient {
    TextGenClient::new(TextGenClientConfig {
        base_url: server.url(),
        timeout_secs: 5,
    })
    .expect("Failed to create client")
}

fn request(prompt: &str) -> GenerateRequest {
    GenerateRequest {
        prompt: prompt.to_string(),
        temperature: 0.5,
        max_tokens: 20,
    }
}

#[tokio::test]
async fn test_generate_success() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/v1/generate")
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(serde_json::json!({
            "prompt": "Hello",
            "temperature": 0.5,
            "max_tokens": 20
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"results": [{"text": " world"}]}"#)
        .create_async()
        .await;

    let client = client_for(&server);
    let text = client.generate(&request("Hello")).await.unwrap();

    assert_eq!(text, " world");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_generate_non_json_body_is_empty_completion() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/v1/generate")
        .with_status(200)
        .with_body("<html>not an api</html>")
        .create_async()
        .await;

    let client = client_for(&server);
    assert_eq!(client.generate(&request("Hello")).await.unwrap(), "");
}

#[tokio::test]
async fn test_generate_missing_results() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/v1/generate")
        .with_status(200)
        .with_body(r#"{"results": []}"#)
        .create_async()
        .await;

    let client = client_for(&server);
    let err = client.generate(&request("Hello")).await.unwrap_err();
    assert!(matches!(err, TextGenError::UnexpectedResponse(_)));
}

#[tokio::test]
async fn test_generate_error_statuses() {
    let mut server = Server::new_async().await;
    let _bad = server
        .mock("POST", "/api/v1/generate")
        .match_body(Matcher::PartialJson(serde_json::json!({"prompt": "bad"})))
        .with_status(400)
        .with_body("prompt too long")
        .create_async()
        .await;
    let _boom = server
        .mock("POST", "/api/v1/generate")
        .match_body(Matcher::PartialJson(serde_json::json!({"prompt": "boom"})))
        .with_status(500)
        .with_body("model crashed")
        .create_async()
        .await;

    let client = client_for(&server);

    match client.generate(&request("bad")).await.unwrap_err() {
        TextGenError::InvalidRequest { status, body } => {
            assert_eq!(status, 400);
            assert_eq!(body, "prompt too long");
        }
        other => panic!("Expected InvalidRequest, got {other:?}"),
    }

    let err = client.generate(&request("boom")).await.unwrap_err();
    assert!(matches!(err, TextGenError::ServerError { status: 500, .. }));
}

#[tokio::test]
async fn test_network_error() {
    let client = TextGenClient::new(TextGenClientConfig {
        base_url: "http://127.0.0.1:1".to_string(),
        timeout_secs: 2,
    })
    .unwrap();

    let err = client.generate(&request("Hello")).await.unwrap_err();
    assert!(matches!(err, TextGenError::Network(_)));
    assert_eq!(err.status(), None);
}

#[tokio::test]
async fn test_embed_success() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/v1/get-embeddings")
        .match_body(Matcher::Json(serde_json::json!({"text": "cats"})))
        .with_status(200)
        .with_body(r#"{"results": [{"embeddings": [0.25, -0.5, 1.0]}]}"#)
        .create_async()
        .await;

    let client = client_for(&server);
    let embedding = client.embed("cats").await.unwrap();

    assert_eq!(embedding, vec![0.25, -0.5, 1.0]);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_completion_round_trip() {
    let mut server = Server::new_async().await;
    let reply = serde_json::json!({
        "results": [{
            "text": "{\"plan_summary\":\"ok\",\"command_name\":\"search\",\"args\":[{\"name\":\"q\",\"value\":\"cats\"}]}"
        }]
    });
    let mock = server
        .mock("POST", "/api/v1/generate")
        .match_body(Matcher::PartialJson(serde_json::json!({
            "temperature": 0.5,
            "max_tokens": 600
        })))
        .with_status(200)
        .with_body(reply.to_string())
        .create_async()
        .await;

    let service = CompletionService::new(
        Arc::new(client_for(&server)),
        Arc::new(PromptProfile::builtin()),
        common::agent(),
        GenerationConfig::default(),
    );

    let response = service
        .complete(&common::agent_conversation(), Some(0.5), None)
        .await
        .unwrap();
    let structured = response.as_structured().expect("reply should normalize");

    assert_eq!(structured.thoughts.text, "ok");
    assert_eq!(structured.command.name, "search");
    assert_eq!(structured.command.args.get("q").map(String::as_str), Some("cats"));
    mock.assert_async().await;
}
