//! Responder for commands triggered by a chat message

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::application::errors::BotError;
use crate::domain::traits::{Bot, CommandResponder, Reply};

/// Answers by posting into the channel the command came from.
///
/// Plain channel messages cannot be ephemeral, so the flag is ignored and
/// replies and follow-ups look the same.
pub struct ChannelResponder<'a> {
    bot: &'a dyn Bot,
    channel_id: &'a str,
    responded: AtomicBool,
}

impl<'a> ChannelResponder<'a> {
    pub fn new(bot: &'a dyn Bot, channel_id: &'a str) -> Self {
        Self {
            bot,
            channel_id,
            responded: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl CommandResponder for ChannelResponder<'_> {
    async fn reply(&self, reply: Reply) -> Result<(), BotError> {
        self.bot.send_message(self.channel_id, &reply.content).await?;
        self.responded.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn defer(&self, _ephemeral: bool) -> Result<(), BotError> {
        self.responded.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn follow_up(&self, reply: Reply) -> Result<(), BotError> {
        self.bot.send_message(self.channel_id, &reply.content).await?;
        Ok(())
    }

    fn has_responded(&self) -> bool {
        self.responded.load(Ordering::SeqCst)
    }
}
