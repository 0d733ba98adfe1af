//! Facility knowledge and question answering.
//!
//! The catalog is the authoritative description of the facility; crawled
//! pages add free text as chunks. A question is answered by the first of
//! several stages that recognises it (canned phrases, catalog listings,
//! named entities), and otherwise from context assembled out of both
//! sources, optionally elaborated by a language model.
//!
//! # Example
//! ```no_run
//! use concierge_core::AppConfig;
//! use concierge_knowledge::{ChatRequest, Concierge};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let concierge = Concierge::open(&AppConfig::load()?)?;
//! let outcome = concierge
//!     .handle_request(ChatRequest::new("What is the price for the Lounge?"))
//!     .await;
//! println!("{}", serde_json::to_string_pretty(&outcome)?);
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod chunk;
pub mod config;
pub mod context;
pub mod events;
pub mod intent;
pub mod keywords;
pub mod links;
pub mod pipeline;
pub mod rank;
pub mod resolve;
pub mod respond;
pub mod snapshot;
pub mod terminology;
pub mod types;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use catalog::{Catalog, CatalogKeys};
pub use chunk::{chunk_page, load_pages, ChunkStore};
pub use config::KnowledgeConfig;
pub use context::{assemble, QueryContext};
pub use intent::{broad_category, IntentClassifier};
pub use links::{append_links, KeywordLinks, LinkEntry, LinkProvider, NoLinks};
pub use pipeline::{ChatOutcome, ChatRequest, ChatResponse, Concierge, ResponseMetadata};
pub use resolve::{EntityResolver, SequenceRatio, SimilarityStrategy};
pub use respond::{Answer, Synthesizer};
pub use snapshot::{KnowledgeHandle, KnowledgeSnapshot};
pub use terminology::Terminology;
pub use types::{
    BroadCategory, Chunk, ChunkSummary, EventRecord, Facility, Intent, PageRecord, QaPair,
    Route, StaffMember, Topic,
};
