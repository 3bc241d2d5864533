//! Message handling - Event-driven message processing

pub mod parser;
pub mod responder;
pub mod router;

pub use parser::MessageParser;
pub use responder::ChannelResponder;
pub use router::{EventRouter, MessageOutcome, ReplyPolicy};
