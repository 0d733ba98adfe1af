//! Lexical ranking of chunks by query-term overlap.

use crate::chunk::ChunkStore;
use crate::types::Chunk;

/// Title hits count this many times a body hit.
pub const TITLE_WEIGHT: usize = 2;

/// Lowercase whitespace-delimited query terms, first occurrence kept.
pub fn query_terms(query: &str) -> Vec<String> {
    let mut terms: Vec<String> = Vec::new();
    for term in query.to_lowercase().split_whitespace() {
        if !terms.iter().any(|t| t == term) {
            terms.push(term.to_string());
        }
    }
    terms
}

/// Score one chunk: terms found in the content plus weighted terms found in
/// the title. Matching is by substring on the lowercased text.
pub fn score_chunk(chunk: &Chunk, terms: &[String]) -> usize {
    let content = chunk.content.to_lowercase();
    let title = chunk.title.to_lowercase();

    let body_hits = terms.iter().filter(|t| content.contains(t.as_str())).count();
    let title_hits = terms.iter().filter(|t| title.contains(t.as_str())).count();

    body_hits + TITLE_WEIGHT * title_hits
}

/// Rank `chunks` against `query`, best first, at most `top_k` results.
///
/// Zero-score chunks are dropped. Equal scores keep their input order.
pub fn rank<'a>(chunks: &'a [Chunk], query: &str, top_k: usize) -> Vec<&'a Chunk> {
    let terms = query_terms(query);
    if terms.is_empty() || top_k == 0 {
        return vec![];
    }

    let mut scored: Vec<(usize, &Chunk)> = chunks
        .iter()
        .map(|chunk| (score_chunk(chunk, &terms), chunk))
        .filter(|(score, _)| *score > 0)
        .collect();

    // sort_by is stable
    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored.truncate(top_k);

    tracing::debug!(
        "Ranked {} of {} chunks for {} terms",
        scored.len(),
        chunks.len(),
        terms.len()
    );

    scored.into_iter().map(|(_, chunk)| chunk).collect()
}

impl ChunkStore {
    /// Lexical search over the whole store.
    pub fn search(&self, query: &str, top_k: usize) -> Vec<&Chunk> {
        rank(self.all_chunks(), query, top_k)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(title: &str, content: &str) -> Chunk {
        Chunk {
            id: format!("https://example.org/{}_0", title),
            url: format!("https://example.org/{}", title),
            title: title.to_string(),
            content: content.to_string(),
            chunk_index: 0,
            scraped_at: String::new(),
        }
    }

    #[test]
    fn test_query_terms_dedup() {
        assert_eq!(query_terms("Room  room Booking"), vec!["room", "booking"]);
    }

    #[test]
    fn test_title_weighs_double() {
        let c = chunk("Booking rules", "How to reserve a room");
        let terms = query_terms("booking room");
        // room in content (1) + booking in title (2)
        assert_eq!(score_chunk(&c, &terms), 3);
    }

    #[test]
    fn test_zero_scores_dropped() {
        let chunks = vec![chunk("About", "history of the lab")];
        assert!(rank(&chunks, "pricing", 5).is_empty());
    }

    #[test]
    fn test_empty_query() {
        let chunks = vec![chunk("About", "history of the lab")];
        assert!(rank(&chunks, "   ", 5).is_empty());
    }
}
