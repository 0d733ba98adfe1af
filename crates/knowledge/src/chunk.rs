//! Chunk store: word-window chunking of crawled pages and the on-disk
//! snapshot of the result.

use crate::types::{Chunk, ChunkSummary, PageRecord};
use chrono::Utc;
use concierge_core::{AppError, AppResult};
use std::fs;
use std::path::Path;

/// Chunks shorter than this (after trimming) are dropped.
pub const MIN_CHUNK_CHARS: usize = 100;

/// Split one page into overlapping word windows.
///
/// Windows start every `chunk_size - overlap` words (every `chunk_size`
/// words when the overlap is not smaller than the size).
pub fn chunk_page(page: &PageRecord, chunk_size: usize, overlap: usize) -> Vec<Chunk> {
    let words: Vec<&str> = page.content.split_whitespace().collect();
    if words.is_empty() {
        return vec![];
    }

    let chunk_size = chunk_size.max(1);
    let step = if chunk_size > overlap {
        chunk_size - overlap
    } else {
        chunk_size
    };

    let mut chunks = Vec::new();
    let mut start = 0;

    while start < words.len() {
        let end = (start + chunk_size).min(words.len());
        let content = words[start..end].join(" ");

        if content.trim().chars().count() > MIN_CHUNK_CHARS {
            chunks.push(Chunk {
                id: format!("{}_{}", page.url, start),
                url: page.url.clone(),
                title: page.title.clone(),
                content,
                chunk_index: start,
                scraped_at: page.scraped_at.clone(),
            });
        }

        start += step;
    }

    chunks
}

/// An immutable list of chunks.
#[derive(Debug, Clone, Default)]
pub struct ChunkStore {
    chunks: Vec<Chunk>,
}

impl ChunkStore {
    pub fn new(chunks: Vec<Chunk>) -> Self {
        Self { chunks }
    }

    /// Chunk every page, in page order.
    pub fn from_pages(pages: &[PageRecord], chunk_size: usize, overlap: usize) -> Self {
        let chunks: Vec<Chunk> = pages
            .iter()
            .flat_map(|page| chunk_page(page, chunk_size, overlap))
            .collect();

        tracing::debug!(
            "Chunked {} pages into {} chunks (size: {}, overlap: {})",
            pages.len(),
            chunks.len(),
            chunk_size,
            overlap
        );

        Self { chunks }
    }

    pub fn all_chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Load a snapshot written by [`ChunkStore::save`].
    ///
    /// A missing file is an empty store.
    pub fn load(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            tracing::debug!("No chunk snapshot at {:?}", path);
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path).map_err(|e| {
            AppError::Knowledge(format!("Failed to read chunks at {:?}: {}", path, e))
        })?;
        let chunks: Vec<Chunk> = serde_json::from_str(&contents).map_err(|e| {
            AppError::Knowledge(format!("Failed to parse chunks at {:?}: {}", path, e))
        })?;

        tracing::debug!("Loaded {} chunks from {:?}", chunks.len(), path);
        Ok(Self { chunks })
    }

    /// Write the whole store as one JSON document.
    pub fn save(&self, path: &Path) -> AppResult<()> {
        write_json(path, &self.chunks)?;
        tracing::info!("Saved {} chunks to {:?}", self.chunks.len(), path);
        Ok(())
    }
}

/// Read the list of crawled pages.
pub fn load_pages(path: &Path) -> AppResult<Vec<PageRecord>> {
    let contents = fs::read_to_string(path)
        .map_err(|e| AppError::Knowledge(format!("Failed to read pages at {:?}: {}", path, e)))?;
    serde_json::from_str(&contents)
        .map_err(|e| AppError::Knowledge(format!("Failed to parse pages at {:?}: {}", path, e)))
}

impl ChunkSummary {
    /// Summary of a chunking run, stamped now.
    pub fn new(
        pages: usize,
        store: &ChunkStore,
        source_url: Option<String>,
        chunk_size: usize,
        overlap: usize,
    ) -> Self {
        Self {
            last_updated: Utc::now(),
            total_pages_scraped: pages,
            total_chunks_created: store.len(),
            source_url,
            chunk_size,
            overlap,
        }
    }

    pub fn load(path: &Path) -> AppResult<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(path).map_err(|e| {
            AppError::Knowledge(format!("Failed to read metadata at {:?}: {}", path, e))
        })?;
        Ok(Some(serde_json::from_str(&contents)?))
    }

    pub fn save(&self, path: &Path) -> AppResult<()> {
        write_json(path, self)
    }
}

fn write_json<T: serde::Serialize + ?Sized>(path: &Path, value: &T) -> AppResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            AppError::Knowledge(format!("Failed to create directory {:?}: {}", parent, e))
        })?;
    }
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json)
        .map_err(|e| AppError::Knowledge(format!("Failed to write {:?}: {}", path, e)))
}
