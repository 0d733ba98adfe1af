//! Terminology standardisation applied to every outgoing reply.

use concierge_core::{AppError, AppResult};
use regex::Regex;
use serde::Deserialize;
use std::fs;
use std::ops::Range;
use std::path::Path;

/// Concatenation artifacts repaired in every reply.
pub const FIXED_REPAIRS: &[(&str, &str)] = &[
    ("TheUniversityofHongKong", "The University of Hong Kong"),
    ("artsandtechnology", "arts and technology"),
];

#[derive(Deserialize)]
struct RuleFile {
    #[serde(default)]
    english: RuleSet,
}

#[derive(Deserialize, Default)]
struct RuleSet {
    #[serde(default)]
    replacements: Vec<RawRule>,
}

#[derive(Deserialize)]
struct RawRule {
    #[serde(default)]
    pattern: String,

    #[serde(default)]
    replacement: String,
}

#[derive(Debug, Clone)]
struct Rule {
    pattern: Regex,
    replacement: String,
}

/// Ordered regex replacement rules.
#[derive(Debug, Clone, Default)]
pub struct Terminology {
    rules: Vec<Rule>,
}

impl Terminology {
    /// Parse a `{"english": {"replacements": [{pattern, replacement}]}}`
    /// rule file. Rules with an empty side or an invalid pattern are
    /// skipped with a warning.
    pub fn parse(json: &str) -> AppResult<Self> {
        let file: RuleFile = serde_json::from_str(json)?;

        let mut raw = file.english.replacements;
        // Longer patterns first so compound names win over their parts
        raw.sort_by(|a, b| b.pattern.len().cmp(&a.pattern.len()));

        let mut rules = Vec::with_capacity(raw.len());
        for rule in raw {
            if rule.pattern.is_empty() || rule.replacement.is_empty() {
                continue;
            }
            match Regex::new(&rule.pattern) {
                Ok(pattern) => rules.push(Rule {
                    pattern,
                    replacement: rule.replacement,
                }),
                Err(e) => tracing::warn!("Skipping terminology rule '{}': {}", rule.pattern, e),
            }
        }

        Ok(Self {
            rules: drop_unstable(rules),
        })
    }

    /// Load rules from disk; a missing file means no rules.
    pub fn load(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            tracing::debug!("No terminology rules at {:?}", path);
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path).map_err(|e| {
            AppError::Knowledge(format!("Failed to read terminology {:?}: {}", path, e))
        })?;
        Self::parse(&contents)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Apply each rule once, longest pattern first, then the fixed repairs.
    ///
    /// Text written by one rule is never matched again by a later rule in
    /// the same pass.
    pub fn standardize(&self, text: &str) -> String {
        let mut result = text.to_string();
        let mut written: Vec<Range<usize>> = Vec::new();

        for rule in &self.rules {
            let (next, spans) = rule.apply(&result, &written);
            result = next;
            written = spans;
        }
        repair_artifacts(&result)
    }
}

impl Rule {
    /// Replace every match that does not touch a `protected` byte range.
    ///
    /// Returns the new text and the protected ranges in it, including the
    /// ones this rule wrote.
    fn apply(&self, text: &str, protected: &[Range<usize>]) -> (String, Vec<Range<usize>>) {
        let mut out = String::with_capacity(text.len());
        let mut spans = Vec::with_capacity(protected.len());
        // (end of the replaced match in `text`, shift applied after it)
        let mut shifts: Vec<(usize, isize)> = Vec::new();
        let mut shift: isize = 0;
        let mut last = 0;

        for caps in self.pattern.captures_iter(text) {
            let Some(m) = caps.get(0) else { continue };
            let overlaps = protected.iter().any(|p| m.start() < p.end && p.start < m.end());
            if m.as_str().is_empty() || overlaps {
                continue;
            }

            out.push_str(&text[last..m.start()]);
            let start = out.len();
            caps.expand(&self.replacement, &mut out);
            spans.push(start..out.len());

            shift += (out.len() - start) as isize - m.len() as isize;
            shifts.push((m.end(), shift));
            last = m.end();
        }
        out.push_str(&text[last..]);

        for range in protected {
            let moved = shifts
                .iter()
                .take_while(|(end, _)| *end <= range.start)
                .last()
                .map_or(0, |(_, shift)| *shift);
            let start = (range.start as isize + moved) as usize;
            spans.push(start..start + range.len());
        }
        spans.sort_by_key(|r| r.start);

        (out, spans)
    }

    /// Whether this rule would change `text`.
    fn changes(&self, text: &str) -> bool {
        self.pattern.replace_all(text, self.replacement.as_str()) != text
    }
}

/// Keep only rules whose replacement no rule (itself included) would
/// rewrite, so standardising a reply twice gives the same text.
///
/// Replacements with capture references are kept; their output is not known
/// until a match happens.
fn drop_unstable(rules: Vec<Rule>) -> Vec<Rule> {
    let unstable: Vec<bool> = rules
        .iter()
        .map(|rule| {
            !rule.replacement.contains('$')
                && rules.iter().any(|other| other.changes(&rule.replacement))
        })
        .collect();

    rules
        .into_iter()
        .zip(unstable)
        .filter_map(|(rule, unstable)| {
            if unstable {
                tracing::warn!(
                    "Skipping terminology rule '{}': its replacement '{}' would be rewritten again",
                    rule.pattern.as_str(),
                    rule.replacement
                );
                None
            } else {
                Some(rule)
            }
        })
        .collect()
}

/// Apply [`FIXED_REPAIRS`].
pub fn repair_artifacts(text: &str) -> String {
    FIXED_REPAIRS
        .iter()
        .fold(text.to_string(), |acc, (from, to)| acc.replace(from, to))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_longest_pattern_first() {
        let rules = Terminology::parse(
            r#"{"english": {"replacements": [
                {"pattern": "ATL", "replacement": "Arts Tech Lab"},
                {"pattern": "HKU ATL", "replacement": "Arts Tech Lab at HKU"}
            ]}}"#,
        )
        .unwrap();
        assert_eq!(rules.standardize("Visit HKU ATL"), "Visit Arts Tech Lab at HKU");
        assert_eq!(rules.standardize("The ATL"), "The Arts Tech Lab");
    }

    #[test]
    fn test_replaced_text_is_not_matched_again() {
        let rules = Terminology::parse(
            r#"{"english": {"replacements": [
                {"pattern": "the ATL", "replacement": "the Arts Tech Lab"},
                {"pattern": "Lab on", "replacement": "Lab in"}
            ]}}"#,
        )
        .unwrap();
        assert_eq!(rules.len(), 2);
        // "Lab on" straddles the text the first rule wrote
        assert_eq!(
            rules.standardize("Visit the ATL on Monday"),
            "Visit the Arts Tech Lab on Monday"
        );
        assert_eq!(rules.standardize("the Lab on site"), "the Lab in site");
    }

    #[test]
    fn test_self_expanding_rule_is_dropped() {
        let rules = Terminology::parse(
            r#"{"english": {"replacements": [
                {"pattern": "Lab", "replacement": "Arts Lab"},
                {"pattern": "colour", "replacement": "color"}
            ]}}"#,
        )
        .unwrap();
        assert_eq!(rules.len(), 1);

        let once = rules.standardize("A colour Lab");
        assert_eq!(once, "A color Lab");
        assert_eq!(rules.standardize(&once), once);
    }

    #[test]
    fn test_standardize_is_idempotent() {
        let rules = Terminology::parse(
            r#"{"english": {"replacements": [
                {"pattern": "(?i)arts tech lab", "replacement": "Arts Tech Lab"},
                {"pattern": "HKU ATL", "replacement": "Arts Tech Lab at HKU"},
                {"pattern": "ATL", "replacement": "Arts Tech Lab"}
            ]}}"#,
        )
        .unwrap();
        assert_eq!(rules.len(), 3);

        let once = rules.standardize("HKU ATL and the arts tech lab, also ATL");
        assert_eq!(once, "Arts Tech Lab at HKU and the Arts Tech Lab, also Arts Tech Lab");
        assert_eq!(rules.standardize(&once), once);
    }

    #[test]
    fn test_invalid_pattern_skipped() {
        let rules = Terminology::parse(
            r#"{"english": {"replacements": [
                {"pattern": "(unclosed", "replacement": "x"},
                {"pattern": "colour", "replacement": "color"}
            ]}}"#,
        )
        .unwrap();
        assert_eq!(rules.len(), 1);
    }

    #[test]
    fn test_fixed_repairs_always_apply() {
        let none = Terminology::default();
        assert_eq!(
            none.standardize("Part of TheUniversityofHongKong"),
            "Part of The University of Hong Kong"
        );
        assert_eq!(repair_artifacts("artsandtechnology"), "arts and technology");
    }

    #[test]
    fn test_missing_english_section() {
        assert!(Terminology::parse(r#"{"chinese": {}}"#).unwrap().is_empty());
    }
}
