//! Completion provider implementations.

pub mod noop;
pub mod ollama;

pub use noop::NoopClient;
pub use ollama::OllamaClient;
