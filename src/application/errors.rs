//! Application layer errors

use thiserror::Error;

use crate::infrastructure::llm::LLMError;

/// General bot errors
#[derive(Error, Debug)]
pub enum BotError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Platform error: {0}")]
    Platform(String),

    #[error("Command error: {0}")]
    Command(#[from] CommandError),

    #[error("Inference error: {0}")]
    Llm(#[from] LLMError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Command execution errors
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("Command not found: {0}")]
    NotFound(String),

    #[error("Invalid arguments: {0}")]
    InvalidArgs(String),

    #[error("Execution failed: {0}")]
    ExecutionFailed(String),

    #[error("Platform error: {0}")]
    Platform(String),
}

impl From<BotError> for CommandError {
    fn from(err: BotError) -> Self {
        match err {
            BotError::Command(inner) => inner,
            other => CommandError::Platform(other.to_string()),
        }
    }
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
