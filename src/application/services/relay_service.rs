use std::sync::Arc;

use crate::infrastructure::llm::{LLMMessage, LLMResult, LLM};

/// Relays a single chat turn to the inference endpoint.
///
/// Stateless: no history is kept between calls.
pub struct RelayService {
    llm: Arc<dyn LLM>,
}

impl RelayService {
    pub fn new(llm: Arc<dyn LLM>) -> Self {
        Self { llm }
    }

    /// Generated reply for `text`, returned verbatim
    pub async fn relay(&self, text: &str) -> LLMResult<String> {
        tracing::debug!(provider = self.llm.name(), "relaying message");
        let response = self.llm.chat(vec![LLMMessage::user(text)]).await?;
        Ok(response.content)
    }
}
