//! Generative-completion capability for the concierge.
//!
//! Answering never depends on a model being reachable: callers hold an
//! `Arc<dyn LlmClient>` chosen at construction time, which is either a real
//! provider or the [`NoopClient`] that always declines.
//!
//! # Providers
//! - **Ollama**: Local LLM runtime (default)
//! - **None**: No generation; the pipeline answers from templates only
//!
//! # Example
//! ```no_run
//! use concierge_llm::{LlmClient, LlmRequest, providers::OllamaClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = OllamaClient::new();
//! let request = LlmRequest::new("Describe the XR space.", "llama3.2");
//! let response = client.complete(&request).await?;
//! println!("{}", response.content);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod factory;
pub mod providers;
pub mod types;

// Re-export main types
pub use client::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
pub use factory::create_client;
pub use providers::{NoopClient, OllamaClient};
pub use types::ProviderType;
