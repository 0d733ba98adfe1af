//! Command handlers for the concierge CLI.
//!
//! Each subcommand lives in its own module.

pub mod ask;
pub mod chat;
pub mod chunk;
pub mod status;

// Re-export command types for convenience
pub use ask::AskCommand;
pub use chat::ChatCommand;
pub use chunk::ChunkCommand;
pub use status::StatusCommand;
