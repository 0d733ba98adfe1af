//! Intent classification and topic detection.
//!
//! All three decisions here are table lookups over [`crate::keywords`]:
//! the intent of a question, whether it asks for a catalog-wide listing, and
//! which Q&A topics it touches.

use crate::keywords::{contains_keyword, count_hits, BROAD_KEYWORDS, INTENT_KEYWORDS, TOPIC_KEYWORDS};
use crate::types::{BroadCategory, Intent, Topic};

/// Keyword-scoring intent classifier.
#[derive(Debug, Clone)]
pub struct IntentClassifier {
    table: Vec<(Intent, Vec<String>)>,
}

impl Default for IntentClassifier {
    fn default() -> Self {
        let table = INTENT_KEYWORDS
            .iter()
            .map(|(intent, words)| (*intent, words.iter().map(|w| w.to_string()).collect()))
            .collect();
        Self { table }
    }
}

impl IntentClassifier {
    /// Add keywords to one intent, skipping duplicates and blanks.
    ///
    /// Used to teach the classifier catalog-specific words such as facility
    /// names and staff surnames.
    pub fn with_keywords<I, S>(mut self, intent: Intent, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if let Some((_, list)) = self.table.iter_mut().find(|(i, _)| *i == intent) {
            for word in words {
                let word = word.as_ref().trim().to_lowercase();
                if !word.is_empty() && !list.contains(&word) {
                    list.push(word);
                }
            }
        }
        self
    }

    /// Keyword hits per intent, in table order.
    pub fn scores(&self, query: &str) -> Vec<(Intent, usize)> {
        let lower = query.to_lowercase();
        self.table
            .iter()
            .map(|(intent, words)| {
                let hits = words.iter().filter(|w| contains_keyword(&lower, w)).count();
                (*intent, hits)
            })
            .collect()
    }

    /// Pick the intent with the strictly highest hit count.
    ///
    /// A query with no hits, or whose top count is shared by two or more
    /// intents, is `General`.
    pub fn classify(&self, query: &str) -> Intent {
        let mut best = Intent::General;
        let mut best_hits = 0;
        let mut shared = false;

        for (intent, hits) in self.scores(query) {
            if hits > best_hits {
                best = intent;
                best_hits = hits;
                shared = false;
            } else if hits > 0 && hits == best_hits {
                shared = true;
            }
        }

        if shared {
            best = Intent::General;
        }

        tracing::debug!(intent = %best, hits = best_hits, shared, "Classified query");
        best
    }
}

/// The catalog-wide listing a question asks for, if any.
pub fn broad_category(query: &str) -> Option<BroadCategory> {
    let lower = query.to_lowercase();
    BROAD_KEYWORDS
        .iter()
        .find(|(_, words)| count_hits(&lower, words) > 0)
        .map(|(category, _)| *category)
}

/// Every topic a question touches, or just `General` when none match.
pub fn matched_topics(query: &str) -> Vec<Topic> {
    let lower = query.to_lowercase();
    let topics: Vec<Topic> = TOPIC_KEYWORDS
        .iter()
        .filter(|(_, words)| count_hits(&lower, words) > 0)
        .map(|(topic, _)| *topic)
        .collect();

    if topics.is_empty() {
        vec![Topic::General]
    } else {
        topics
    }
}

/// The single bucket a logged question belongs to: first match wins.
pub fn bucket_for(question: &str) -> Topic {
    let lower = question.to_lowercase();
    TOPIC_KEYWORDS
        .iter()
        .find(|(_, words)| count_hits(&lower, words) > 0)
        .map(|(topic, _)| *topic)
        .unwrap_or(Topic::General)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_pricing() {
        let classifier = IntentClassifier::default();
        assert_eq!(classifier.classify("What is the rental fee?"), Intent::Pricing);
    }

    #[test]
    fn test_zero_hits_is_general() {
        let classifier = IntentClassifier::default();
        assert_eq!(classifier.classify("tell me a story"), Intent::General);
    }

    #[test]
    fn test_tie_is_general() {
        let classifier = IntentClassifier::default();
        // "room" (facility) and "price" (pricing) score one each
        assert_eq!(classifier.classify("room price"), Intent::General);
    }

    #[test]
    fn test_tie_below_leader_does_not_matter() {
        let classifier = IntentClassifier::default();
        // pricing: "price", "fee"; facility: "room"
        assert_eq!(classifier.classify("room price fee"), Intent::Pricing);
    }

    #[test]
    fn test_extra_keywords() {
        let classifier =
            IntentClassifier::default().with_keywords(Intent::Staff, ["Jenny", "jenny", " "]);
        assert_eq!(classifier.classify("is jenny around"), Intent::Staff);
    }

    #[test]
    fn test_broad_category_order() {
        assert_eq!(
            broad_category("What facilities are there?"),
            Some(BroadCategory::Facilities)
        );
        assert_eq!(
            broad_category("which software tools do you have"),
            Some(BroadCategory::Software)
        );
        assert_eq!(broad_category("What is the price for the Lounge?"), None);
    }

    #[test]
    fn test_matched_topics_default_general() {
        assert_eq!(matched_topics("hello there friend"), vec![Topic::General]);
        assert_eq!(
            matched_topics("gpu workstation"),
            vec![Topic::Equipment, Topic::Tools]
        );
    }

    #[test]
    fn test_bucket_first_match_wins() {
        assert_eq!(bucket_for("How much is the meeting room fee?"), Topic::Facilities);
        assert_eq!(bucket_for("Where do I park?"), Topic::General);
    }
}
