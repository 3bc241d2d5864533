//! Message parser - Turns raw message text into structured content

use crate::domain::entities::{Content, Message, User};

/// Splits prefixed command messages from free text
pub struct MessageParser {
    command_prefix: String,
}

impl MessageParser {
    /// An empty prefix disables prefix commands
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            command_prefix: prefix.into(),
        }
    }

    /// Parse a text message
    pub fn parse(&self, channel_id: impl Into<String>, author: User, text: &str) -> Message {
        Message::new(channel_id, author, self.parse_content(text))
    }

    /// Anything without the prefix is free text, blank text included
    pub fn parse_content(&self, text: &str) -> Content {
        if !self.command_prefix.is_empty() {
            if let Some(rest) = text.strip_prefix(&self.command_prefix) {
                return Self::parse_command(rest);
            }
        }

        Content::Text(text.to_string())
    }

    /// Command names are case-insensitive
    fn parse_command(cmd_text: &str) -> Content {
        let mut parts = cmd_text.split_whitespace();
        let name = parts.next().unwrap_or("").to_lowercase();
        let args = parts.map(|s| s.to_string()).collect();

        Content::Command { name, args }
    }
}
