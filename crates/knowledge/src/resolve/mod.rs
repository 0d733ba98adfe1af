//! Entity resolution: mapping free text onto catalog names.
//!
//! Resolution tries, in order, an exact match on normalised names, a
//! substring match in either direction, and finally the closest name by a
//! [`SimilarityStrategy`] above a threshold. The threshold is lower when the
//! text is a phrase already pulled out of a templated question.

pub mod extract;
pub mod similarity;

pub use extract::{extract_entity_phrase, extract_staff_names};
pub use similarity::{SequenceRatio, SimilarityStrategy};

use crate::config::KnowledgeConfig;
use std::sync::Arc;

/// Lowercase and keep only ASCII letters and digits.
pub fn normalize_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

#[derive(Debug, Clone)]
pub struct EntityResolver {
    strategy: Arc<dyn SimilarityStrategy>,
    free_text_threshold: f64,
    phrase_threshold: f64,
}

impl Default for EntityResolver {
    fn default() -> Self {
        Self {
            strategy: Arc::new(SequenceRatio),
            free_text_threshold: 0.6,
            phrase_threshold: 0.5,
        }
    }
}

impl EntityResolver {
    pub fn new(strategy: Arc<dyn SimilarityStrategy>) -> Self {
        Self {
            strategy,
            ..Default::default()
        }
    }

    pub fn from_config(config: &KnowledgeConfig) -> Self {
        Self::default().with_thresholds(config.free_text_threshold, config.phrase_threshold)
    }

    pub fn with_thresholds(mut self, free_text: f64, phrase: f64) -> Self {
        self.free_text_threshold = free_text;
        self.phrase_threshold = phrase;
        self
    }

    /// Match `text` against `names` and return the catalog spelling.
    ///
    /// The approximate tier accepts the best ratio only when it is strictly
    /// above `threshold`; the earliest name wins a tie.
    pub fn best_match<'a, I>(&self, names: I, text: &str, threshold: f64) -> Option<&'a str>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let input = normalize_name(text);
        if input.is_empty() {
            return None;
        }

        let candidates: Vec<(&'a str, String)> = names
            .into_iter()
            .map(|name| (name, normalize_name(name)))
            .filter(|(_, normalized)| !normalized.is_empty())
            .collect();

        if let Some((name, _)) = candidates.iter().find(|(_, n)| *n == input) {
            return Some(*name);
        }

        if let Some((name, _)) = candidates
            .iter()
            .find(|(_, n)| n.contains(&input) || input.contains(n.as_str()))
        {
            return Some(*name);
        }

        let mut best: Option<(&'a str, f64)> = None;
        for (name, normalized) in &candidates {
            let ratio = self.strategy.ratio(&input, normalized);
            if best.map_or(true, |(_, b)| ratio > b) {
                best = Some((*name, ratio));
            }
        }

        match best {
            Some((name, ratio)) if ratio > threshold => {
                tracing::debug!(
                    "Approximate match '{}' -> '{}' ({}: {:.2})",
                    text,
                    name,
                    self.strategy.name(),
                    ratio
                );
                Some(name)
            }
            _ => None,
        }
    }

    /// Resolve a facility named somewhere in `text`.
    ///
    /// A templated question ("tell me about X") is first resolved from its
    /// extracted phrase; otherwise, or when that misses, the whole text is
    /// matched at the stricter free-text threshold.
    pub fn resolve_facility<'a, I>(&self, names: I, text: &str) -> Option<&'a str>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let names: Vec<&'a str> = names.into_iter().collect();

        if let Some(phrase) = extract_entity_phrase(text) {
            let from_phrase = self.best_match(names.iter().copied(), &phrase, self.phrase_threshold);
            if from_phrase.is_some() {
                return from_phrase;
            }
        }

        self.best_match(names, text, self.free_text_threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NAMES: [&str; 3] = ["Lounge", "XR Space", "Black Box Studio"];

    #[test]
    fn test_normalize() {
        assert_eq!(normalize_name("X.R. Space-2!"), "xrspace2");
        assert_eq!(normalize_name("?!"), "");
    }

    #[test]
    fn test_exact_and_substring() {
        let resolver = EntityResolver::default();
        assert_eq!(resolver.best_match(NAMES, "xr-space", 0.6), Some("XR Space"));
        assert_eq!(
            resolver.best_match(NAMES, "how big is the black box studio", 0.6),
            Some("Black Box Studio")
        );
        assert_eq!(resolver.best_match(NAMES, "black box", 0.6), Some("Black Box Studio"));
    }

    #[test]
    fn test_approximate_threshold() {
        let resolver = EntityResolver::default();
        assert_eq!(resolver.best_match(NAMES, "lounje", 0.6), Some("Lounge"));
        assert_eq!(resolver.best_match(NAMES, "parking", 0.6), None);
    }

    #[test]
    fn test_resolve_from_templated_question() {
        let resolver = EntityResolver::default();
        assert_eq!(
            resolver.resolve_facility(NAMES, "What is the price for the Lounge?"),
            Some("Lounge")
        );
        assert_eq!(resolver.resolve_facility(NAMES, "Where can I park?"), None);
    }

    #[test]
    fn test_blank_input() {
        assert_eq!(EntityResolver::default().best_match(NAMES, "   ", 0.6), None);
    }
}
