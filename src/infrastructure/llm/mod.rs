//! LLM integration - Local inference endpoint

pub mod traits;
pub mod providers;

#[cfg(test)]
mod tests;

pub use traits::{LLM, LLMMessage, LLMResponse, LLMError, LLMResult};
pub use providers::OllamaProvider;
