//! Infrastructure layer - External concerns
//!
//! This layer contains:
//! - Config: Configuration loading
//! - Commands: Command definitions discovered on disk
//! - LLM: The inference endpoint client
//! - Adapters: Platform integrations (Discord)

pub mod config;
pub mod commands;
pub mod llm;
pub mod adapters;
