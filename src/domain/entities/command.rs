use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::User;
use crate::application::errors::CommandError;
use crate::domain::traits::{CommandResponder, Reply};

/// Longest name the platform accepts for a slash command
pub const MAX_NAME_LEN: usize = 32;

/// What caused a command to run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// A registered slash-command interaction
    Slash,
    /// A chat message starting with the command prefix
    Prefix,
}

/// A single request to run a command, independent of how it was triggered
#[derive(Debug, Clone)]
pub struct CommandInvocation {
    pub name: String,
    pub args: Vec<String>,
    pub channel_id: String,
    pub user: User,
    pub trigger: Trigger,
    pub issued_at: DateTime<Utc>,
}

impl CommandInvocation {
    pub fn new(name: impl Into<String>, channel_id: impl Into<String>, user: User, trigger: Trigger) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
            channel_id: channel_id.into(),
            user,
            trigger,
            issued_at: Utc::now(),
        }
    }

    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    pub fn with_issued_at(mut self, issued_at: DateTime<Utc>) -> Self {
        self.issued_at = issued_at;
        self
    }
}

/// Everything a command can see while it runs
pub struct CommandContext<'a> {
    pub invocation: &'a CommandInvocation,
    pub registry: &'a CommandRegistry,
    responder: &'a dyn CommandResponder,
}

impl<'a> CommandContext<'a> {
    pub fn new(
        invocation: &'a CommandInvocation,
        registry: &'a CommandRegistry,
        responder: &'a dyn CommandResponder,
    ) -> Self {
        Self { invocation, registry, responder }
    }

    pub async fn reply(&self, content: impl Into<String>) -> Result<(), CommandError> {
        self.responder.reply(Reply::new(content)).await?;
        Ok(())
    }

    pub async fn reply_with(&self, reply: Reply) -> Result<(), CommandError> {
        self.responder.reply(reply).await?;
        Ok(())
    }

    pub async fn defer(&self, ephemeral: bool) -> Result<(), CommandError> {
        self.responder.defer(ephemeral).await?;
        Ok(())
    }

    pub async fn follow_up(&self, reply: Reply) -> Result<(), CommandError> {
        self.responder.follow_up(reply).await?;
        Ok(())
    }
}

/// A single optional free-text argument, offered as a slash-command option
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandArgument {
    pub name: &'static str,
    pub description: &'static str,
}

/// A bot command. Every command exposes an identifier and an executor.
#[async_trait]
pub trait Command: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str {
        "No description"
    }

    fn argument(&self) -> Option<CommandArgument> {
        None
    }

    async fn execute(&self, ctx: &CommandContext<'_>) -> Result<(), CommandError>;
}

/// Check a command name against the platform's slash-command rules
pub fn validate_name(name: &str) -> Result<(), CommandError> {
    if name.is_empty() || name.len() > MAX_NAME_LEN {
        return Err(CommandError::InvalidArgs(format!(
            "command name must be 1-{} characters: {:?}",
            MAX_NAME_LEN, name
        )));
    }
    let valid = name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_');
    if !valid {
        return Err(CommandError::InvalidArgs(format!(
            "command name may only contain a-z, 0-9, '-' and '_': {:?}",
            name
        )));
    }
    Ok(())
}

/// Immutable name -> command mapping, built once at startup
#[derive(Default, Clone)]
pub struct CommandRegistry {
    commands: HashMap<String, Arc<dyn Command>>,
}

impl CommandRegistry {
    pub fn builder() -> CommandRegistryBuilder {
        CommandRegistryBuilder::default()
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Command>> {
        self.commands.get(name).cloned()
    }

    /// Commands sorted by name
    pub fn all(&self) -> Vec<Arc<dyn Command>> {
        let mut all: Vec<_> = self.commands.values().cloned().collect();
        all.sort_by(|a, b| a.name().cmp(b.name()));
        all
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.commands.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// Collects commands before the registry is frozen
#[derive(Default)]
pub struct CommandRegistryBuilder {
    commands: HashMap<String, Arc<dyn Command>>,
}

impl CommandRegistryBuilder {
    /// Register a command. Invalid or duplicate names are skipped with a warning;
    /// the first registration of a name wins.
    pub fn register(&mut self, command: Arc<dyn Command>) -> bool {
        let name = command.name().to_string();
        if let Err(e) = validate_name(&name) {
            tracing::warn!("Skipping command: {}", e);
            return false;
        }
        if self.commands.contains_key(&name) {
            tracing::warn!("Duplicate command {:?} ignored", name);
            return false;
        }
        self.commands.insert(name, command);
        true
    }

    pub fn with(mut self, command: Arc<dyn Command>) -> Self {
        self.register(command);
        self
    }

    pub fn extend(&mut self, commands: impl IntoIterator<Item = Arc<dyn Command>>) {
        for command in commands {
            self.register(command);
        }
    }

    pub fn build(self) -> CommandRegistry {
        CommandRegistry {
            commands: self.commands,
        }
    }
}
