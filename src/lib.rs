//! tamabot - relays Discord chat to a local language model and runs slash commands

pub mod domain;
pub mod application;
pub mod infrastructure;

#[cfg(test)]
pub(crate) mod test_support;
