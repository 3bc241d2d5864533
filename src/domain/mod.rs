//! Domain layer - Core business logic with no platform dependencies
//!
//! This layer contains:
//! - Entities: Core business objects (User, Message, Command)
//! - Traits: Abstractions for the messaging platform (Bot, CommandResponder)

pub mod entities;
pub mod traits;
