//! Discord adapter
//!
//! Owns nothing but the glue between serenity's gateway events and the
//! [`EventRouter`]. Connection lifecycle, heartbeats and reconnects are left
//! to serenity. Channels arrive as bare ids and are never hydrated here.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serenity::all::{
    ActivityData, ChannelId, Client, Command as SlashCommand, CommandDataOptionValue,
    CommandInteraction, CommandOptionType, Context, CreateCommand, CreateCommandOption,
    CreateInteractionResponse, CreateInteractionResponseFollowup,
    CreateInteractionResponseMessage, EventHandler, GatewayIntents, Http, Interaction,
    Message as DiscordMessage, Ready,
};
use tracing::{debug, info, warn};

use crate::application::errors::BotError;
use crate::application::messaging::{EventRouter, MessageParser};
use crate::domain::entities::{snowflake_time, CommandInvocation, CommandRegistry, Message, Trigger, User};
use crate::domain::traits::{Bot, CommandResponder, Reply};

/// Slash command descriptions are capped at 100 characters
const MAX_DESCRIPTION_LEN: usize = 100;

/// Gateway intents: guild visibility and direct messages, plus guild
/// message content when explicitly requested.
pub fn intents(message_content: bool) -> GatewayIntents {
    let mut intents = GatewayIntents::GUILDS | GatewayIntents::DIRECT_MESSAGES;
    if message_content {
        intents |= GatewayIntents::GUILD_MESSAGES | GatewayIntents::MESSAGE_CONTENT;
    }
    intents
}

fn platform_error(e: serenity::Error) -> BotError {
    BotError::Platform(e.to_string())
}

fn parse_channel_id(raw: &str) -> Result<ChannelId, BotError> {
    raw.parse::<u64>()
        .ok()
        .filter(|id| *id != 0)
        .map(ChannelId::new)
        .ok_or_else(|| BotError::Platform(format!("invalid channel id: {:?}", raw)))
}

/// Outbound messages over the REST client
pub struct DiscordChannel {
    http: Arc<Http>,
}

impl DiscordChannel {
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }
}

#[async_trait]
impl Bot for DiscordChannel {
    async fn send_message(&self, channel_id: &str, text: &str) -> Result<String, BotError> {
        let sent = parse_channel_id(channel_id)?
            .say(&*self.http, text)
            .await
            .map_err(platform_error)?;
        Ok(sent.id.to_string())
    }
}

/// Responds to a slash-command interaction
pub struct InteractionResponder<'a> {
    http: &'a Http,
    interaction: &'a CommandInteraction,
    responded: AtomicBool,
}

impl<'a> InteractionResponder<'a> {
    pub fn new(http: &'a Http, interaction: &'a CommandInteraction) -> Self {
        Self {
            http,
            interaction,
            responded: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl CommandResponder for InteractionResponder<'_> {
    async fn reply(&self, reply: Reply) -> Result<(), BotError> {
        // A second initial response is rejected by the platform
        if self.has_responded() {
            return self.follow_up(reply).await;
        }

        let message = CreateInteractionResponseMessage::new()
            .content(reply.content)
            .ephemeral(reply.ephemeral);
        self.interaction
            .create_response(self.http, CreateInteractionResponse::Message(message))
            .await
            .map_err(platform_error)?;
        self.responded.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn defer(&self, ephemeral: bool) -> Result<(), BotError> {
        let deferred = if ephemeral {
            self.interaction.defer_ephemeral(self.http).await
        } else {
            self.interaction.defer(self.http).await
        };
        deferred.map_err(platform_error)?;
        self.responded.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn follow_up(&self, reply: Reply) -> Result<(), BotError> {
        let followup = CreateInteractionResponseFollowup::new()
            .content(reply.content)
            .ephemeral(reply.ephemeral);
        self.interaction
            .create_followup(self.http, followup)
            .await
            .map_err(platform_error)?;
        Ok(())
    }

    fn has_responded(&self) -> bool {
        self.responded.load(Ordering::SeqCst)
    }
}

fn to_user(user: &serenity::all::User) -> User {
    User::new(user.id.to_string())
        .with_username(user.name.clone())
        .with_global_name(user.global_name.clone())
        .bot(user.bot)
}

fn to_message(parser: &MessageParser, msg: &DiscordMessage) -> Message {
    parser
        .parse(msg.channel_id.to_string(), to_user(&msg.author), &msg.content)
        .with_id(msg.id.to_string())
        .with_guild(msg.guild_id.map(|g| g.to_string()))
        .with_timestamp(snowflake_time(msg.id.get()))
}

fn to_invocation(command: &CommandInteraction) -> CommandInvocation {
    let args = command
        .data
        .options
        .iter()
        .filter_map(|opt| match &opt.value {
            CommandDataOptionValue::String(s) => Some(s.clone()),
            _ => None,
        })
        .collect();

    CommandInvocation::new(
        command.data.name.clone(),
        command.channel_id.to_string(),
        to_user(&command.user),
        Trigger::Slash,
    )
    .with_args(args)
    .with_issued_at(snowflake_time(command.id.get()))
}

fn slash_description(description: &str) -> String {
    let trimmed: String = description.chars().take(MAX_DESCRIPTION_LEN).collect();
    if trimmed.trim().is_empty() {
        "No description".to_string()
    } else {
        trimmed
    }
}

/// Slash-command definitions for every registered command
pub fn slash_commands(registry: &CommandRegistry) -> Vec<CreateCommand> {
    registry
        .all()
        .iter()
        .map(|cmd| {
            let create = CreateCommand::new(cmd.name()).description(slash_description(cmd.description()));
            match cmd.argument() {
                Some(arg) => create.add_option(
                    CreateCommandOption::new(CommandOptionType::String, arg.name, slash_description(arg.description))
                        .required(false),
                ),
                None => create,
            }
        })
        .collect()
}

/// Handler for Discord gateway events
pub struct DiscordHandler {
    router: Arc<EventRouter>,
    activity: Option<String>,
}

impl DiscordHandler {
    pub fn new(router: Arc<EventRouter>) -> Self {
        Self {
            router,
            activity: None,
        }
    }

    pub fn with_activity(mut self, activity: Option<String>) -> Self {
        self.activity = activity;
        self
    }
}

#[async_trait]
impl EventHandler for DiscordHandler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!(guilds = ready.guilds.len(), "Ready! Logged in as {}", ready.user.tag());

        if let Some(activity) = &self.activity {
            ctx.set_activity(Some(ActivityData::playing(activity.clone())));
        }

        let commands = slash_commands(self.router.registry());
        match SlashCommand::set_global_commands(&ctx.http, commands).await {
            Ok(registered) => info!("Registered {} slash commands", registered.len()),
            Err(e) => warn!("Failed to register slash commands: {}", e),
        }
    }

    async fn message(&self, ctx: Context, msg: DiscordMessage) {
        debug!(channel_id = %msg.channel_id, "message event");
        let message = to_message(self.router.parser(), &msg);
        let channel = DiscordChannel::new(ctx.http.clone());
        self.router.on_message(&channel, message).await;
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        let Interaction::Command(command) = interaction else {
            return;
        };

        let invocation = to_invocation(&command);
        let responder = InteractionResponder::new(&ctx.http, &command);
        self.router.on_interaction(&invocation, &responder).await;
    }
}

/// Log in and run until the gateway connection ends
pub async fn run(token: &str, intents: GatewayIntents, handler: DiscordHandler) -> Result<(), BotError> {
    let mut client = Client::builder(token, intents)
        .event_handler(handler)
        .await
        .map_err(|e| BotError::Platform(format!("discord client error: {}", e)))?;

    info!("Connecting to Discord...");
    client
        .start()
        .await
        .map_err(|e| BotError::Platform(format!("discord client error: {}", e)))
}
