//! Ollama Provider - Locally hosted model over `/api/chat`

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::infrastructure::llm::{LLMMessage, LLMResponse, LLMError, LLMResult, LLM};

/// Model served by the local endpoint unless configured otherwise
pub const DEFAULT_MODEL: &str = "Tamaki";

/// Ollama provider
pub struct OllamaProvider {
    url: String,
    client: Client,
    model: String,
}

impl OllamaProvider {
    pub fn new(url: impl Into<String>, model: Option<&str>) -> LLMResult<Self> {
        let url = url.into();
        if url.trim().is_empty() {
            return Err(LLMError::ConfigError("inference endpoint URL is empty".to_string()));
        }
        Ok(Self {
            url,
            client: Client::new(),
            model: model.unwrap_or(DEFAULT_MODEL).to_string(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

/// API request structure
#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<LLMMessage>,
    stream: bool,
}

/// API response structure
#[derive(Deserialize, Debug)]
struct ChatResponse {
    #[serde(default)]
    model: Option<String>,
    message: ResponseMessage,
}

/// Response message
#[derive(Deserialize, Debug)]
struct ResponseMessage {
    content: String,
}

#[async_trait]
impl LLM for OllamaProvider {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn chat(&self, messages: Vec<LLMMessage>) -> LLMResult<LLMResponse> {
        let request = ChatRequest {
            model: &self.model,
            messages,
            stream: false,
        };

        let response = self.client
            .post(&self.url)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| LLMError::NetworkError(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| LLMError::NetworkError(e.to_string()))?;

        if !status.is_success() {
            return Err(LLMError::ApiError {
                status: status.as_u16(),
                body,
            });
        }

        let chat_response: ChatResponse = serde_json::from_str(&body)
            .map_err(|e| LLMError::ParseError(format!("{}: {}", e, body)))?;

        Ok(LLMResponse {
            content: chat_response.message.content,
            model: chat_response.model.unwrap_or_else(|| self.model.clone()),
        })
    }
}
