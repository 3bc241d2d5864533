//! Commands every bot ships with

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::application::errors::CommandError;
use crate::domain::entities::{Command, CommandArgument, CommandContext};

pub fn builtin_commands() -> Vec<Arc<dyn Command>> {
    vec![Arc::new(Ping), Arc::new(Help), Arc::new(Version)]
}

/// Round-trip check, reports the delay since the invocation was issued
pub struct Ping;

#[async_trait]
impl Command for Ping {
    fn name(&self) -> &str {
        "ping"
    }

    fn description(&self) -> &str {
        "Ping the bot"
    }

    async fn execute(&self, ctx: &CommandContext<'_>) -> Result<(), CommandError> {
        let elapsed = Utc::now()
            .signed_duration_since(ctx.invocation.issued_at)
            .num_milliseconds()
            .max(0);
        ctx.reply(format!("Pong! {}ms", elapsed)).await
    }
}

pub struct Help;

#[async_trait]
impl Command for Help {
    fn name(&self) -> &str {
        "help"
    }

    fn description(&self) -> &str {
        "Show available commands"
    }

    fn argument(&self) -> Option<CommandArgument> {
        Some(CommandArgument {
            name: "command",
            description: "Command to describe",
        })
    }

    async fn execute(&self, ctx: &CommandContext<'_>) -> Result<(), CommandError> {
        if let Some(name) = ctx.invocation.args.first() {
            let text = match ctx.registry.get(name) {
                Some(cmd) => format!("/{} - {}", cmd.name(), cmd.description()),
                None => format!("Command /{} not found", name),
            };
            return ctx.reply(text).await;
        }

        let mut help = "Available commands:\n".to_string();
        for cmd in ctx.registry.all() {
            help.push_str(&format!("  /{} - {}\n", cmd.name(), cmd.description()));
        }
        ctx.reply(help.trim_end()).await
    }
}

pub struct Version;

#[async_trait]
impl Command for Version {
    fn name(&self) -> &str {
        "version"
    }

    fn description(&self) -> &str {
        "Show bot version"
    }

    async fn execute(&self, ctx: &CommandContext<'_>) -> Result<(), CommandError> {
        ctx.reply(format!("tamabot v{}", env!("CARGO_PKG_VERSION"))).await
    }
}
