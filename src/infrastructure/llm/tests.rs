//! Tests for the Ollama provider against a stubbed endpoint

use mockito::Matcher;
use serde_json::json;

use crate::infrastructure::llm::{LLM, LLMError, LLMMessage, OllamaProvider};

#[tokio::test]
async fn test_ollama_chat_returns_message_content() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/chat")
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(json!({
            "model": "Tamaki",
            "messages": [{"role": "user", "content": "Hello"}],
            "stream": false
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"model":"Tamaki","message":{"role":"assistant","content":"Hi there"},"done":true}"#)
        .create_async()
        .await;

    let provider = OllamaProvider::new(format!("{}/api/chat", server.url()), None).unwrap();
    let response = provider
        .chat(vec![LLMMessage::user("Hello")])
        .await
        .expect("chat should succeed");

    assert_eq!(response.content, "Hi there");
    assert_eq!(response.model, "Tamaki");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_ollama_uses_configured_model() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/chat")
        .match_body(Matcher::PartialJson(json!({"model": "Autumn"})))
        .with_status(200)
        .with_body(r#"{"message":{"content":"ok"}}"#)
        .create_async()
        .await;

    let provider = OllamaProvider::new(format!("{}/api/chat", server.url()), Some("Autumn")).unwrap();
    let response = provider.chat(vec![LLMMessage::user("x")]).await.unwrap();

    // Falls back to the configured model when the body omits it
    assert_eq!(response.model, "Autumn");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_ollama_non_success_status() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/api/chat")
        .with_status(500)
        .with_body("model not loaded")
        .create_async()
        .await;

    let provider = OllamaProvider::new(format!("{}/api/chat", server.url()), None).unwrap();
    let err = provider.chat(vec![LLMMessage::user("Hello")]).await.unwrap_err();

    match err {
        LLMError::ApiError { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "model not loaded");
        }
        other => panic!("expected ApiError, got {other:?}"),
    }
}

#[tokio::test]
async fn test_ollama_malformed_body() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/api/chat")
        .with_status(200)
        .with_body(r#"{"choices":[]}"#)
        .create_async()
        .await;

    let provider = OllamaProvider::new(format!("{}/api/chat", server.url()), None).unwrap();
    let err = provider.chat(vec![LLMMessage::user("Hello")]).await.unwrap_err();

    assert!(matches!(err, LLMError::ParseError(_)), "got {err:?}");
}

#[tokio::test]
async fn test_ollama_unreachable_endpoint() {
    // Port 9 (discard) is not expected to accept HTTP connections
    let provider = OllamaProvider::new("http://127.0.0.1:9/api/chat", None).unwrap();
    let err = provider.chat(vec![LLMMessage::user("Hello")]).await.unwrap_err();

    assert!(matches!(err, LLMError::NetworkError(_)), "got {err:?}");
}

#[test]
fn test_empty_url_is_rejected() {
    assert!(matches!(
        OllamaProvider::new("  ", None),
        Err(LLMError::ConfigError(_))
    ));
}

#[test]
fn test_llm_message_builder() {
    let msg = LLMMessage::user("Hello");
    assert_eq!(msg.role, "user");
    assert_eq!(msg.content, "Hello");
}
