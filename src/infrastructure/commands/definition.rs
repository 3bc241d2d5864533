//! Command definition files

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::application::errors::{CommandError, ConfigError};
use crate::domain::entities::{Command, CommandContext};
use crate::domain::traits::Reply;

/// On-disk shape of a command definition
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct CommandDefinition {
    /// Command name (required)
    pub name: Option<String>,

    pub description: Option<String>,

    /// Text sent back when the command runs (required)
    pub response: Option<String>,

    #[serde(default)]
    pub ephemeral: bool,
}

impl CommandDefinition {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;

        serde_yaml::from_str(&content)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse command definition: {}", e)))
    }

    /// Turn the definition into a runnable command
    pub fn into_command(self) -> Result<StaticCommand, ConfigError> {
        let name = self
            .name
            .filter(|n| !n.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingField("name".to_string()))?;
        let response = self
            .response
            .ok_or_else(|| ConfigError::MissingField("response".to_string()))?;

        Ok(StaticCommand {
            name,
            description: self.description.unwrap_or_else(|| "No description".to_string()),
            response,
            ephemeral: self.ephemeral,
        })
    }
}

/// A command that answers with fixed text
#[derive(Debug, Clone)]
pub struct StaticCommand {
    name: String,
    description: String,
    response: String,
    ephemeral: bool,
}

#[async_trait]
impl Command for StaticCommand {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    async fn execute(&self, ctx: &CommandContext<'_>) -> Result<(), CommandError> {
        ctx.reply_with(Reply::new(self.response.clone()).ephemeral(self.ephemeral))
            .await
    }
}
