//! Context assembly: everything the knowledge base knows that is relevant
//! to one question, rendered as plain text for completion.

use crate::catalog::Catalog;
use crate::chunk::ChunkStore;
use crate::intent::matched_topics;
use crate::keywords::{count_hits, PRICING_CONTEXT_KEYWORDS};
use crate::resolve::EntityResolver;
use crate::types::{Chunk, QaPair, Topic};

/// Q&A pairs kept per matched topic.
pub const QA_PER_TOPIC: usize = 2;

/// Characters of chunk content quoted in the context.
pub const CHUNK_PREVIEW_CHARS: usize = 500;

/// A Q&A pair with its word overlap against the question.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredQa {
    pub topic: Topic,
    pub pair: QaPair,
    pub overlap: usize,
}

/// Assembled context for one question.
#[derive(Debug, Clone)]
pub struct QueryContext {
    pub facility: Option<String>,
    pub chunks: Vec<Chunk>,
    pub topics: Vec<Topic>,
    pub qa: Vec<ScoredQa>,
    text: String,
}

impl QueryContext {
    pub fn render(&self) -> &str {
        &self.text
    }

    /// Pair with the highest non-zero overlap; earlier pairs win ties.
    pub fn best_qa(&self) -> Option<&ScoredQa> {
        self.qa
            .iter()
            .filter(|qa| qa.overlap > 0)
            .fold(None, |best: Option<&ScoredQa>, qa| match best {
                Some(b) if b.overlap >= qa.overlap => Some(b),
                _ => Some(qa),
            })
    }
}

/// Number of words of `query` (lowercased, repeats counted) that occur in
/// `question`.
pub fn word_overlap(query: &str, question: &str) -> usize {
    let question = question.to_lowercase();
    query
        .to_lowercase()
        .split_whitespace()
        .filter(|word| question.contains(word))
        .count()
}

/// Build the context for `query`.
pub fn assemble(
    catalog: &Catalog,
    chunks: &ChunkStore,
    resolver: &EntityResolver,
    query: &str,
    top_k: usize,
) -> QueryContext {
    let name = catalog.display_name();
    let mut lines: Vec<String> = Vec::new();

    lines.push(format!("=== {} INFORMATION ===", name.to_uppercase()));
    let overview = catalog.overview();
    for (label, value) in [
        ("Name", overview.name.as_str()),
        ("Affiliation", overview.affiliation.as_str()),
        ("Positioning", overview.positioning.as_str()),
        ("Function", overview.function.as_str()),
    ] {
        if !value.trim().is_empty() {
            lines.push(format!("{}: {}", label, value));
        }
    }

    let ranked: Vec<Chunk> = chunks.search(query, top_k).into_iter().cloned().collect();
    if !ranked.is_empty() {
        lines.push("\n=== RAG RETRIEVED INFORMATION ===".to_string());
        for (i, chunk) in ranked.iter().enumerate() {
            let preview: String = chunk.content.chars().take(CHUNK_PREVIEW_CHARS).collect();
            lines.push(format!("\n--- Source {}: {} ---", i + 1, chunk.title));
            lines.push(format!("URL: {}", chunk.url));
            lines.push(format!("Content: {}...", preview));
        }
    }

    let topics = matched_topics(query);
    if topics == [Topic::General] {
        lines.push("\n=== GENERAL INFORMATION ===".to_string());
        lines.push(format!(
            "{} offers facilities, equipment, software, staff support, internships, events, policies, and AI tools.",
            name
        ));
        lines.push("Ask about specific topics for detailed information.".to_string());
    }

    let facility = resolver
        .resolve_facility(catalog.all_facilities().iter().map(|f| f.name.as_str()), query)
        .and_then(|resolved| catalog.facility(resolved));
    if let Some(facility) = facility {
        lines.push(format!("\n=== FULL DETAILS FOR {} ===", facility.name.to_uppercase()));
        for (label, value) in facility.attribute_lines() {
            lines.push(format!("{}: {}", label, value));
        }
    }

    let mut qa = Vec::new();
    for topic in &topics {
        let bucket = catalog.topic_bucket(*topic);
        if bucket.is_empty() {
            continue;
        }

        let mut scored: Vec<ScoredQa> = bucket
            .iter()
            .map(|pair| ScoredQa {
                topic: *topic,
                pair: pair.clone(),
                overlap: word_overlap(query, &pair.question),
            })
            .collect();
        scored.sort_by(|a, b| b.overlap.cmp(&a.overlap));
        scored.truncate(QA_PER_TOPIC);

        lines.push(format!("\n=== {} Q&A ===", topic.as_str().to_uppercase()));
        for entry in &scored {
            lines.push(format!("Q: {}", entry.pair.question));
            lines.push(format!("A: {}", entry.pair.answer));
        }
        qa.extend(scored);
    }

    if count_hits(&query.to_lowercase(), PRICING_CONTEXT_KEYWORDS) > 0 {
        lines.push(pricing_overview(catalog));
    }

    lines.push("\n=== INSTRUCTIONS ===".to_string());
    lines.push("Based on the above information, provide accurate and helpful responses.".to_string());
    lines.push(format!(
        "If the information is not available in the context above, clearly state that you don't have that specific information. If you need further assistance, please contact {} staff.",
        name
    ));

    tracing::debug!(
        "Assembled context: {} chunks, topics {:?}, facility {:?}, {} Q&A",
        ranked.len(),
        topics,
        facility.map(|f| f.name.as_str()),
        qa.len()
    );

    QueryContext {
        facility: facility.map(|f| f.name.clone()),
        chunks: ranked,
        topics,
        qa,
        text: lines.join("\n"),
    }
}

fn pricing_overview(catalog: &Catalog) -> String {
    let mut text = format!("\n**{} Pricing Information**:\n", catalog.display_name());
    for facility in catalog.all_facilities() {
        if facility.pricing.is_empty() {
            continue;
        }
        text.push_str(&format!("\n{}:\n", facility.name));
        for (category, rate) in &facility.pricing {
            text.push_str(&format!("  - {}: {}\n", category, rate));
        }
    }
    text
}
