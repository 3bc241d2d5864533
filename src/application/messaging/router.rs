//! Event router - Sends gateway events to commands or to the inference relay

use std::sync::Arc;

use super::parser::MessageParser;
use super::responder::ChannelResponder;
use crate::application::errors::BotError;
use crate::application::services::{CommandService, DispatchOutcome, RelayService};
use crate::domain::entities::{CommandInvocation, CommandRegistry, Content, Message, Trigger};
use crate::domain::traits::{Bot, CommandResponder};
use crate::infrastructure::config::ChatConfig;
use crate::infrastructure::llm::LLM;

/// What happened to an incoming message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageOutcome {
    /// Authored by a bot account
    IgnoredBot,
    /// Went down the command path
    Command(DispatchOutcome),
    /// Relayed and the reply was sent
    Relayed,
    /// Not relayed by the reply policy, or the reply was empty
    Skipped,
    /// Handling failed; the error was logged and the message dropped
    Failed,
}

/// Decides which free-text messages get relayed.
///
/// With no chat channels configured every message is relayed. Otherwise only
/// messages in those channels, direct messages, and messages mentioning a
/// trigger word are.
#[derive(Debug, Clone, Default)]
pub struct ReplyPolicy {
    chat_channels: Vec<String>,
    trigger_words: Vec<String>,
}

impl ReplyPolicy {
    pub fn relay_all() -> Self {
        Self::default()
    }

    pub fn new(chat_channels: Vec<String>, trigger_words: Vec<String>) -> Self {
        Self {
            chat_channels,
            trigger_words: trigger_words.into_iter().map(|w| w.to_lowercase()).collect(),
        }
    }

    pub fn allows(&self, message: &Message, text: &str) -> bool {
        if self.chat_channels.is_empty() || message.is_direct() {
            return true;
        }
        if self.chat_channels.iter().any(|c| c == &message.channel_id) {
            return true;
        }
        let lower = text.to_lowercase();
        self.trigger_words.iter().any(|w| lower.contains(w.as_str()))
    }
}

impl From<&ChatConfig> for ReplyPolicy {
    fn from(config: &ChatConfig) -> Self {
        Self::new(config.chat_channels.clone(), config.trigger_words.clone())
    }
}

/// Stateless between events; shares only the read-only registry
pub struct EventRouter {
    parser: MessageParser,
    commands: CommandService,
    relay: RelayService,
    policy: ReplyPolicy,
}

impl EventRouter {
    pub fn new(prefix: impl Into<String>, registry: Arc<CommandRegistry>, llm: Arc<dyn LLM>) -> Self {
        Self {
            parser: MessageParser::new(prefix),
            commands: CommandService::new(registry),
            relay: RelayService::new(llm),
            policy: ReplyPolicy::relay_all(),
        }
    }

    pub fn with_policy(mut self, policy: ReplyPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn parser(&self) -> &MessageParser {
        &self.parser
    }

    pub fn registry(&self) -> &CommandRegistry {
        self.commands.registry()
    }

    /// Handle a message-create event. Never fails: errors are logged and the
    /// message is dropped.
    pub async fn on_message(&self, bot: &dyn Bot, message: Message) -> MessageOutcome {
        let channel_id = message.channel_id.clone();
        match self.process_message(bot, message).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(channel_id = %channel_id, "Error in on_message: {}", e);
                MessageOutcome::Failed
            }
        }
    }

    pub async fn process_message(&self, bot: &dyn Bot, message: Message) -> Result<MessageOutcome, BotError> {
        // Checked before the prefix so bots can never trigger replies
        if message.author.is_bot {
            return Ok(MessageOutcome::IgnoredBot);
        }

        let text = match &message.content {
            Content::Command { name, args } => {
                let invocation = CommandInvocation::new(
                    name.clone(),
                    message.channel_id.clone(),
                    message.author.clone(),
                    Trigger::Prefix,
                )
                .with_args(args.clone())
                .with_issued_at(message.timestamp);

                let responder = ChannelResponder::new(bot, &message.channel_id);
                let outcome = self.commands.dispatch(&invocation, &responder).await;
                return Ok(MessageOutcome::Command(outcome));
            }
            Content::Text(text) => text,
        };

        if !self.policy.allows(&message, text) {
            return Ok(MessageOutcome::Skipped);
        }

        tracing::debug!(
            message_id = %message.id,
            channel_id = %message.channel_id,
            author = %message.author,
            "Sending message to inference endpoint"
        );
        let reply = self.relay.relay(text).await?;

        if reply.trim().is_empty() {
            tracing::warn!(channel_id = %message.channel_id, "Inference endpoint returned an empty reply");
            return Ok(MessageOutcome::Skipped);
        }

        bot.send_message(&message.channel_id, &reply).await?;
        Ok(MessageOutcome::Relayed)
    }

    /// Handle a slash-command interaction
    pub async fn on_interaction(
        &self,
        invocation: &CommandInvocation,
        responder: &dyn CommandResponder,
    ) -> DispatchOutcome {
        self.commands.dispatch(invocation, responder).await
    }
}
