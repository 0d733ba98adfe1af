//! Related-resource links appended to replies.
//!
//! The link table is deployment data (`links.yaml` in the data directory):
//! each entry carries a URL, a title, a short description, and keywords that
//! select it when they occur in the user's message.

use concierge_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::fs;
use std::path::Path;

/// Heading that marks a reply as already carrying links.
pub const LINKS_MARKER: &str = "**Learn More Online**";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkEntry {
    pub url: String,
    pub title: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub keywords: Vec<String>,
}

/// Source of links relevant to a message.
pub trait LinkProvider: Send + Sync + Debug {
    /// Links for `message`, unique by URL, in table order.
    fn links_for(&self, message: &str) -> Vec<LinkEntry>;
}

/// Provider used when links are disabled or no table is installed.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLinks;

impl LinkProvider for NoLinks {
    fn links_for(&self, _message: &str) -> Vec<LinkEntry> {
        vec![]
    }
}

/// Keyword-matched link table.
#[derive(Debug, Clone, Default)]
pub struct KeywordLinks {
    entries: Vec<LinkEntry>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LinkFile {
    Wrapped { links: Vec<LinkEntry> },
    Bare(Vec<LinkEntry>),
}

impl KeywordLinks {
    pub fn new(entries: Vec<LinkEntry>) -> Self {
        Self { entries }
    }

    /// Read a YAML (or JSON) link table. A missing file is an empty table.
    pub fn load(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            tracing::debug!("No link table at {:?}", path);
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path).map_err(|e| {
            AppError::Knowledge(format!("Failed to read link table {:?}: {}", path, e))
        })?;
        // YAML is a superset of JSON, so one parser covers both
        let file: LinkFile = serde_yaml::from_str(&contents)?;
        let entries = match file {
            LinkFile::Wrapped { links } => links,
            LinkFile::Bare(links) => links,
        };

        tracing::debug!("Loaded {} links from {:?}", entries.len(), path);
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl LinkProvider for KeywordLinks {
    fn links_for(&self, message: &str) -> Vec<LinkEntry> {
        let lower = message.to_lowercase();
        let mut found: Vec<LinkEntry> = Vec::new();

        for entry in &self.entries {
            let hit = entry
                .keywords
                .iter()
                .any(|k| !k.is_empty() && lower.contains(&k.to_lowercase()));
            if hit && !found.iter().any(|f| f.url == entry.url) {
                found.push(entry.clone());
            }
        }

        found
    }
}

/// Render links as a reply fragment, or `None` when there are none.
pub fn render_links(links: &[LinkEntry]) -> Option<String> {
    match links {
        [] => None,
        [link] => Some(format!(
            "**{}**\n\n{}\n\n**Learn More**: {}",
            link.title, link.description, link.url
        )),
        many => {
            let mut text = String::from("**Relevant Resources**\n\n");
            for link in many {
                text.push_str(&format!("• **{}**: {}\n", link.title, link.description));
                text.push_str(&format!("  {}\n\n", link.url));
            }
            Some(text.trim_end().to_string())
        }
    }
}

/// Append links relevant to `message` to `response`.
///
/// A response that already has a links section is returned unchanged, so
/// applying this twice gives the same text as applying it once.
pub fn append_links(response: &str, message: &str, provider: &dyn LinkProvider) -> String {
    if response.contains(LINKS_MARKER) {
        return response.to_string();
    }

    match render_links(&provider.links_for(message)) {
        Some(links) => format!("{}\n\n{}\n\n{}", response, LINKS_MARKER, links),
        None => response.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn table() -> KeywordLinks {
        KeywordLinks::new(vec![
            LinkEntry {
                url: "https://example.org/venue".to_string(),
                title: "Venue & Pricing".to_string(),
                description: "Rates and availability".to_string(),
                keywords: vec!["price".to_string(), "booking".to_string()],
            },
            LinkEntry {
                url: "https://example.org/events".to_string(),
                title: "Events".to_string(),
                description: "What's on".to_string(),
                keywords: vec!["event".to_string()],
            },
            LinkEntry {
                url: "https://example.org/venue".to_string(),
                title: "Venue again".to_string(),
                description: String::new(),
                keywords: vec!["rental".to_string()],
            },
        ])
    }

    #[test]
    fn test_single_link() {
        let text = append_links("Rates below.", "What is the price?", &table());
        assert!(text.starts_with("Rates below.\n\n**Learn More Online**"));
        assert!(text.ends_with("**Learn More**: https://example.org/venue"));
    }

    #[test]
    fn test_links_unique_by_url() {
        let links = table().links_for("price and rental for an event");
        let urls: Vec<&str> = links.iter().map(|l| l.url.as_str()).collect();
        assert_eq!(urls, vec!["https://example.org/venue", "https://example.org/events"]);
        assert!(render_links(&links).unwrap().starts_with("**Relevant Resources**"));
    }

    #[test]
    fn test_append_is_idempotent() {
        let once = append_links("Answer.", "booking events", &table());
        let twice = append_links(&once, "booking events", &table());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_no_links() {
        assert_eq!(append_links("Answer.", "price", &NoLinks), "Answer.");
        assert_eq!(append_links("Answer.", "parking", &table()), "Answer.");
    }

    #[test]
    fn test_load_yaml_table() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("links.yaml");
        fs::write(
            &path,
            "links:\n  - url: https://example.org/team\n    title: Lab Team\n    keywords: [staff, team]\n",
        )
        .unwrap();

        let links = KeywordLinks::load(&path).unwrap();
        assert_eq!(links.len(), 1);
        assert_eq!(links.links_for("Who is on the team?")[0].title, "Lab Team");
        assert!(KeywordLinks::load(&temp.path().join("missing.yaml")).unwrap().is_empty());
    }
}
