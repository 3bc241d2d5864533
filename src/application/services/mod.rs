//! Application services - Business logic orchestration

pub mod builtin_commands;
pub mod command_service;
pub mod relay_service;

pub use builtin_commands::builtin_commands;
pub use command_service::{CommandService, DispatchOutcome, GENERIC_ERROR};
pub use relay_service::RelayService;
