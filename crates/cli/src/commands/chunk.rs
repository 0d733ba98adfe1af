//! Chunk command handler.
//!
//! Turns a crawled pages file into the chunk snapshot the answering
//! pipeline searches, plus a summary of the run.

use clap::Args;
use concierge_core::{config::AppConfig, AppError, AppResult};
use concierge_knowledge::config::{load_config, save_config};
use concierge_knowledge::{load_pages, ChunkStore, ChunkSummary};
use std::path::PathBuf;

/// Split crawled pages into chunks
#[derive(Args, Debug)]
pub struct ChunkCommand {
    /// Pages file (default: the configured pages file in the data directory)
    #[arg(long)]
    pub pages: Option<PathBuf>,

    /// Words per chunk
    #[arg(long)]
    pub chunk_size: Option<usize>,

    /// Words shared by consecutive chunks
    #[arg(long)]
    pub overlap: Option<usize>,

    /// Site the pages were crawled from, recorded in the summary
    #[arg(long)]
    pub source_url: Option<String>,

    /// Remember --chunk-size and --overlap in the knowledge config
    #[arg(long)]
    pub save: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl ChunkCommand {
    pub fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing chunk command");

        let mut knowledge = load_config(&config.workspace)?;
        if let Some(size) = self.chunk_size {
            knowledge.chunk_size = size;
        }
        if let Some(overlap) = self.overlap {
            knowledge.chunk_overlap = overlap;
        }
        if knowledge.chunk_size == 0 {
            return Err(AppError::Config("Chunk size must be positive".to_string()));
        }

        let pages_path = self
            .pages
            .clone()
            .unwrap_or_else(|| knowledge.data_file(&config.workspace, &knowledge.pages_file));
        let pages = load_pages(&pages_path)?;
        tracing::debug!("Read {} pages from {:?}", pages.len(), pages_path);

        let store = ChunkStore::from_pages(&pages, knowledge.chunk_size, knowledge.chunk_overlap);
        store.save(&knowledge.data_file(&config.workspace, &knowledge.chunks_file))?;

        let summary = ChunkSummary::new(
            pages.len(),
            &store,
            self.source_url.clone(),
            knowledge.chunk_size,
            knowledge.chunk_overlap,
        );
        summary.save(&knowledge.data_file(&config.workspace, &knowledge.metadata_file))?;

        if self.save {
            save_config(&config.workspace, &knowledge)?;
        }

        if self.json {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        } else {
            println!(
                "Created {} chunks from {} pages ({} words, {} overlap)",
                summary.total_chunks_created,
                summary.total_pages_scraped,
                summary.chunk_size,
                summary.overlap
            );
        }

        Ok(())
    }
}
