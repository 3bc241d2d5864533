use async_trait::async_trait;
use crate::application::errors::BotError;

/// Bot trait - outbound side of a messaging platform
#[async_trait]
pub trait Bot: Send + Sync {
    /// Send a message to a channel, returning the new message id
    async fn send_message(&self, channel_id: &str, text: &str) -> Result<String, BotError>;
}

/// A response to a command invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub content: String,
    /// Only visible to the invoking user, where the platform supports it
    pub ephemeral: bool,
}

impl Reply {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ephemeral: false,
        }
    }

    pub fn ephemeral(mut self, ephemeral: bool) -> Self {
        self.ephemeral = ephemeral;
        self
    }
}

/// Responds to one command invocation.
///
/// The platform allows exactly one initial response (a reply or a deferral)
/// per invocation; everything after it must be a follow-up.
#[async_trait]
pub trait CommandResponder: Send + Sync {
    async fn reply(&self, reply: Reply) -> Result<(), BotError>;

    async fn defer(&self, ephemeral: bool) -> Result<(), BotError>;

    async fn follow_up(&self, reply: Reply) -> Result<(), BotError>;

    /// Whether a reply or deferral was already sent
    fn has_responded(&self) -> bool;
}
