use super::User;
use chrono::{DateTime, Utc};

/// Discord epoch (2015-01-01T00:00:00Z) in unix milliseconds
const SNOWFLAKE_EPOCH_MS: u64 = 1_420_070_400_000;

/// Creation time encoded in a platform snowflake id
pub fn snowflake_time(id: u64) -> DateTime<Utc> {
    let millis = (id >> 22) + SNOWFLAKE_EPOCH_MS;
    i64::try_from(millis)
        .ok()
        .and_then(DateTime::from_timestamp_millis)
        .unwrap_or_else(Utc::now)
}

/// Message content
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    Text(String),
    Command { name: String, args: Vec<String> },
}

/// An incoming message from the gateway
#[derive(Debug, Clone)]
pub struct Message {
    pub id: String,
    pub channel_id: String,
    /// Absent for direct messages
    pub guild_id: Option<String>,
    pub author: User,
    pub content: Content,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn new(channel_id: impl Into<String>, author: User, content: Content) -> Self {
        Self {
            id: String::new(),
            channel_id: channel_id.into(),
            guild_id: None,
            author,
            content,
            timestamp: Utc::now(),
        }
    }

    pub fn from_text(channel_id: impl Into<String>, author: User, text: impl Into<String>) -> Self {
        Self::new(channel_id, author, Content::Text(text.into()))
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_guild(mut self, guild_id: Option<impl Into<String>>) -> Self {
        self.guild_id = guild_id.map(|g| g.into());
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn is_direct(&self) -> bool {
        self.guild_id.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snowflake_time() {
        // 175928847299117063 is the example snowflake from the Discord docs
        let ts = snowflake_time(175928847299117063);
        assert_eq!(ts.timestamp_millis(), 1462015105796);
    }

    #[test]
    fn test_direct_message_has_no_guild() {
        let msg = Message::from_text("1", User::new("2"), "hi");
        assert!(msg.is_direct());
        assert_eq!(msg.content, Content::Text("hi".to_string()));

        let msg = msg.with_guild(Some("3"));
        assert!(!msg.is_direct());
    }
}
