use std::path::Path;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use tamabot::application::errors::BotError;
use tamabot::application::messaging::{EventRouter, ReplyPolicy};
use tamabot::application::services::builtin_commands;
use tamabot::domain::entities::CommandRegistry;
use tamabot::infrastructure::adapters::discord::{self, DiscordHandler};
use tamabot::infrastructure::commands::CommandLoader;
use tamabot::infrastructure::config::Config;
use tamabot::infrastructure::llm::OllamaProvider;

#[derive(Parser)]
#[command(name = "tamabot")]
#[command(about = "Discord bot backed by a local language model", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file path
    #[arg(short, long, default_value = "config.yaml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bot (default)
    Run,
    /// Show version
    Version,
    /// Generate default config
    InitConfig,
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => {
            if let Err(e) = run_bot(&cli.config) {
                tracing::error!("tamabot stopped: {}", e);
                std::process::exit(1);
            }
        }
        Commands::Version => {
            println!("tamabot v{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::InitConfig => {
            if let Err(e) = init_config(&cli.config) {
                tracing::error!("Failed to write config: {}", e);
                std::process::exit(1);
            }
        }
    }
}

fn load_config(config_path: &str) -> Config {
    if let Err(e) = dotenvy::dotenv() {
        tracing::debug!("No .env loaded: {}", e);
    }

    let mut config = if Path::new(config_path).exists() {
        Config::load(config_path).unwrap_or_else(|e| {
            tracing::warn!("Failed to load config: {}, using defaults", e);
            Config::default()
        })
    } else {
        Config::default()
    };
    config.apply_env();
    config
}

fn run_bot(config_path: &str) -> Result<(), BotError> {
    let config = load_config(config_path);
    tracing::info!("Starting {}", config.bot.name);

    let mut builder = CommandRegistry::builder();
    builder.extend(builtin_commands());
    builder.extend(CommandLoader::new(&config.commands.directory).load_all());
    let registry = Arc::new(builder.build());
    tracing::info!("Loaded {} commands: {}", registry.len(), registry.names().join(", "));

    let llm = OllamaProvider::new(config.inference_url()?, Some(&config.inference.model))?;
    tracing::info!("Relaying chat to {} using model {}", llm.url(), llm.model());

    let router = EventRouter::new(config.bot.prefix.clone(), registry, Arc::new(llm))
        .with_policy(ReplyPolicy::from(&config.chat));
    let handler = DiscordHandler::new(Arc::new(router)).with_activity(config.bot.activity.clone());

    let token = config.token()?.to_string();
    let intents = discord::intents(config.bot.message_content);

    let rt = tokio::runtime::Runtime::new().map_err(|e| BotError::Internal(e.to_string()))?;
    rt.block_on(discord::run(&token, intents, handler))
}

fn init_config(config_path: &str) -> Result<(), BotError> {
    if Path::new(config_path).exists() {
        tracing::warn!("{} already exists, not overwriting", config_path);
        return Ok(());
    }
    let yaml = Config::default().to_yaml()?;
    std::fs::write(config_path, yaml).map_err(|e| BotError::Internal(e.to_string()))?;
    println!("Wrote default config to {}", config_path);
    Ok(())
}
