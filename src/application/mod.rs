//! Application layer - Use cases and business logic
//!
//! This layer contains:
//! - Services: Command dispatch, built-in commands and the inference relay
//! - Errors: Domain-specific errors
//! - Messaging: Message parsing, responders and event routing

pub mod errors;
pub mod services;
pub mod messaging;
