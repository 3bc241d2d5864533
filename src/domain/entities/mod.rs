//! Domain entities - Core business objects with no external dependencies

pub mod user;
pub mod message;
pub mod command;

pub use user::User;
pub use message::{snowflake_time, Message, Content};
pub use command::{
    Command, CommandArgument, CommandContext, CommandInvocation, CommandRegistry,
    CommandRegistryBuilder, Trigger,
};
