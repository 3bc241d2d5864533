//! File-defined commands

pub mod definition;
pub mod loader;

pub use definition::{CommandDefinition, StaticCommand};
pub use loader::CommandLoader;
