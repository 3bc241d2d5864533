//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use crate::application::errors::ConfigError;
use crate::infrastructure::llm::providers::ollama::DEFAULT_MODEL;

/// Environment variable holding the inference endpoint URL
pub const ENV_OLLAMA_URL: &str = "OLLAMA_URL";
/// Environment variable holding the bot token
pub const ENV_BOT_TOKEN: &str = "BOT_TOKEN";
pub const ENV_OLLAMA_MODEL: &str = "OLLAMA_MODEL";
pub const ENV_BOT_PREFIX: &str = "BOT_PREFIX";
pub const ENV_COMMANDS_DIR: &str = "COMMANDS_DIR";
/// Names read by earlier deployments, used when the primary name is unset
pub const LEGACY_ENV_OLLAMA_URL: &str = "OllamaURL";
pub const LEGACY_ENV_BOT_TOKEN: &str = "BotToken";

/// Bot configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Config {
    pub bot: BotConfig,
    pub inference: InferenceConfig,
    pub commands: CommandsConfig,
    pub chat: ChatConfig,
    pub discord: DiscordConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct BotConfig {
    pub name: String,
    pub prefix: String,
    /// "Playing ..." status shown once connected
    pub activity: Option<String>,
    /// Request the privileged message-content intent
    pub message_content: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct InferenceConfig {
    pub url: Option<String>,
    pub model: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct CommandsConfig {
    pub directory: PathBuf,
}

/// Where free-text messages get relayed. Empty lists relay everything.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ChatConfig {
    pub chat_channels: Vec<String>,
    pub trigger_words: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct DiscordConfig {
    pub token: Option<String>,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: "tamabot".to_string(),
            prefix: "!".to_string(),
            activity: None,
            message_content: false,
        }
    }
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            url: None,
            model: DEFAULT_MODEL.to_string(),
        }
    }
}

impl Default for CommandsConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("./commands"),
        }
    }
}

impl Config {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)
            .map_err(|e| ConfigError::Parse(format!("Failed to read config: {}", e)))?;

        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse config: {}", e)))
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        serde_yaml::to_string(self)
            .map_err(|e| ConfigError::Parse(format!("Failed to serialize config: {}", e)))
    }

    /// Override fields from the process environment
    pub fn apply_env(&mut self) {
        self.apply_env_with(|key| std::env::var(key).ok());
    }

    pub fn apply_env_with(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(ENV_OLLAMA_URL).or_else(|| lookup(LEGACY_ENV_OLLAMA_URL)) {
            self.inference.url = Some(url);
        }

        if let Some(token) = lookup(ENV_BOT_TOKEN).or_else(|| lookup(LEGACY_ENV_BOT_TOKEN)) {
            self.discord.token = Some(token);
        }

        if let Some(model) = lookup(ENV_OLLAMA_MODEL) {
            self.inference.model = model;
        }

        if let Some(prefix) = lookup(ENV_BOT_PREFIX) {
            self.bot.prefix = prefix;
        }

        if let Some(dir) = lookup(ENV_COMMANDS_DIR) {
            self.commands.directory = PathBuf::from(dir);
        }
    }

    pub fn inference_url(&self) -> Result<&str, ConfigError> {
        self.inference
            .url
            .as_deref()
            .ok_or_else(|| ConfigError::MissingField(ENV_OLLAMA_URL.to_string()))
    }

    pub fn token(&self) -> Result<&str, ConfigError> {
        self.discord
            .token
            .as_deref()
            .ok_or_else(|| ConfigError::MissingField(ENV_BOT_TOKEN.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.bot.prefix, "!");
        assert_eq!(config.inference.model, "Tamaki");
        assert!(config.inference.url.is_none());
        assert!(config.chat.chat_channels.is_empty());
        assert!(matches!(config.token(), Err(ConfigError::MissingField(f)) if f == "BOT_TOKEN"));
        assert!(matches!(config.inference_url(), Err(ConfigError::MissingField(f)) if f == "OLLAMA_URL"));
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = r#"
bot:
  prefix: "?"
  activity: Minecraft
inference:
  url: http://localhost:11434/api/chat
chat:
  trigger-words: [tama, tamaneko]
"#;
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.bot.prefix, "?");
        assert_eq!(config.bot.name, "tamabot");
        assert_eq!(config.bot.activity.as_deref(), Some("Minecraft"));
        assert_eq!(config.inference_url().unwrap(), "http://localhost:11434/api/chat");
        assert_eq!(config.inference.model, "Tamaki");
        assert_eq!(config.chat.trigger_words, vec!["tama", "tamaneko"]);
        assert_eq!(config.commands.directory, PathBuf::from("./commands"));
    }

    #[test]
    fn test_env_overrides_file() {
        let mut config = Config::from_yaml("inference:\n  url: http://file/api/chat\n").unwrap();
        let env: HashMap<&str, &str> = HashMap::from([
            ("OLLAMA_URL", "http://env/api/chat"),
            ("BOT_TOKEN", "secret"),
            ("OLLAMA_MODEL", "Autumn"),
            ("COMMANDS_DIR", "/srv/commands"),
        ]);
        config.apply_env_with(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.inference_url().unwrap(), "http://env/api/chat");
        assert_eq!(config.token().unwrap(), "secret");
        assert_eq!(config.inference.model, "Autumn");
        assert_eq!(config.bot.prefix, "!");
        assert_eq!(config.commands.directory, PathBuf::from("/srv/commands"));
    }

    #[test]
    fn test_legacy_env_names_are_fallbacks() {
        let mut config = Config::default();
        let env: HashMap<&str, &str> = HashMap::from([
            ("OllamaURL", "http://localhost:11434/api/chat"),
            ("BotToken", "old-secret"),
        ]);
        config.apply_env_with(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.inference_url().unwrap(), "http://localhost:11434/api/chat");
        assert_eq!(config.token().unwrap(), "old-secret");

        let env: HashMap<&str, &str> = HashMap::from([
            ("OLLAMA_URL", "http://new/api/chat"),
            ("OllamaURL", "http://old/api/chat"),
            ("BOT_TOKEN", "new-secret"),
            ("BotToken", "old-secret"),
        ]);
        config.apply_env_with(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.inference_url().unwrap(), "http://new/api/chat");
        assert_eq!(config.token().unwrap(), "new-secret");
    }

    #[test]
    fn test_yaml_round_trip_of_defaults() {
        let yaml = Config::default().to_yaml().unwrap();
        assert!(yaml.contains("message-content: false"));
        let parsed = Config::from_yaml(&yaml).unwrap();
        assert_eq!(parsed.bot.prefix, "!");
    }

    #[test]
    fn test_invalid_yaml() {
        assert!(matches!(
            Config::from_yaml("bot: [unterminated"),
            Err(ConfigError::Parse(_))
        ));
    }
}
