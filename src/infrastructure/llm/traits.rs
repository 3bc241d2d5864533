//! LLM traits - Inference interface

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Chat message for LLM conversations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LLMMessage {
    /// Role: "user" for relayed chat
    pub role: String,
    /// Message content
    pub content: String,
}

impl LLMMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// LLM response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LLMResponse {
    /// Response content
    pub content: String,
    /// Model used
    pub model: String,
}

/// LLM errors
#[derive(Debug)]
pub enum LLMError {
    /// Endpoint answered with a non-success status
    ApiError { status: u16, body: String },
    /// Network error
    NetworkError(String),
    /// Parse error
    ParseError(String),
    /// Configuration error
    ConfigError(String),
}

impl std::fmt::Display for LLMError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LLMError::ApiError { status, body } => write!(f, "API error: status: {}, body: {}", status, body),
            LLMError::NetworkError(msg) => write!(f, "Network error: {}", msg),
            LLMError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            LLMError::ConfigError(msg) => write!(f, "Config error: {}", msg),
        }
    }
}

impl std::error::Error for LLMError {}

/// Result type for LLM operations
pub type LLMResult<T> = Result<T, LLMError>;

/// LLM Provider trait
#[async_trait]
pub trait LLM: Send + Sync {
    /// Get the provider name
    fn name(&self) -> &str;

    /// Non-streaming chat completion
    async fn chat(&self, messages: Vec<LLMMessage>) -> LLMResult<LLMResponse>;
}
