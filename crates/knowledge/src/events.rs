//! Event aggregation across the catalog, the conversation log and crawled
//! pages.

use crate::catalog::Catalog;
use crate::chunk::ChunkStore;
use crate::types::{Chunk, EventRecord, Topic};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{BTreeSet, HashSet};

static EVENT_LABEL: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"(?i)(?:Event|Title)[:：]\s*(.+)").ok());

static DATE_LABEL: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"(?i)Date[:：][ \t]*([\w\-/ \t]+)").ok());

static DESCRIPTION_LABEL: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"(?i)Description[:：]\s*(.+)").ok());

/// Chunk titles containing one of these are taken as event titles.
const EVENT_TITLE_WORDS: &[&str] = &["event", "exhibition", "lecture", "workshop", "series"];

/// Lines containing one of these are taken as event mentions.
const EVENT_LINE_WORDS: &[&str] = &["event", "workshop", "seminar"];

/// Only chunks whose title has one of these are scanned line by line.
const EVENT_PAGE_WORDS: &[&str] = &["event", "activity"];

/// Query used to pull event-heavy chunks from the store.
const EVENT_SEARCH_QUERY: &str = "events activities workshops seminars";

/// Longest line accepted as an event mention.
const MAX_EVENT_LINE_CHARS: usize = 160;

/// Event titles found in chunk text, sorted and unique.
///
/// A title is either the value of an `Event:`/`Title:` label (between 5 and
/// 99 characters) or the title of a chunk that looks like an event page.
pub fn mine_event_titles(chunks: &[Chunk]) -> Vec<String> {
    let mut titles = BTreeSet::new();

    for chunk in chunks {
        if let Some(label) = EVENT_LABEL.as_ref() {
            for line in chunk.content.lines() {
                if let Some(title) = label.captures(line).and_then(|c| c.get(1)) {
                    let title = title.as_str().trim();
                    let len = title.chars().count();
                    if len > 4 && len < 100 {
                        titles.insert(title.to_string());
                    }
                }
            }
        }

        let chunk_title = chunk.title.to_lowercase();
        if EVENT_TITLE_WORDS.iter().any(|w| chunk_title.contains(w)) {
            let title = chunk.title.trim();
            if !title.is_empty() {
                titles.insert(title.to_string());
            }
        }
    }

    titles.into_iter().collect()
}

/// Date and description of `title`, taken from the first chunk that
/// mentions it.
pub fn event_details(chunks: &[Chunk], title: &str) -> Option<EventRecord> {
    let needle = title.to_lowercase();
    let chunk = chunks.iter().find(|c| {
        c.content.to_lowercase().contains(&needle) || c.title.to_lowercase().contains(&needle)
    })?;

    let capture = |pattern: &Lazy<Option<Regex>>| {
        pattern
            .as_ref()
            .and_then(|re| re.captures(&chunk.content))
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().trim().to_string())
            .filter(|s| !s.is_empty())
    };

    Some(EventRecord {
        title: title.to_string(),
        date: capture(&DATE_LABEL),
        description: capture(&DESCRIPTION_LABEL),
    })
}

/// Role of `name` as written `Dr. Name (Role)` somewhere in the chunks.
///
/// `name` may carry its own title; it is ignored for matching.
pub fn staff_role(chunks: &[Chunk], name: &str) -> Option<String> {
    let bare = ["Dr.", "Mr.", "Ms.", "Dr", "Mr", "Ms"]
        .iter()
        .find_map(|title| name.strip_prefix(title).filter(|rest| rest.starts_with(' ')))
        .unwrap_or(name)
        .trim();
    let pattern = Regex::new(&format!(
        r"(Dr|Mr|Ms)\.\s*{}\s*\(([^)]+)\)",
        regex::escape(bare)
    ))
    .ok()?;

    chunks.iter().find_map(|chunk| {
        pattern
            .captures(&chunk.content)
            .and_then(|c| c.get(2))
            .map(|m| m.as_str().trim().to_string())
    })
}

/// Drop repeats compared case-insensitively after trimming, and anything
/// five characters or shorter. First occurrence and its casing are kept.
pub fn dedup_events<I>(events: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    events
        .into_iter()
        .filter(|event| {
            let normalized = event.trim().to_lowercase();
            normalized.chars().count() > 5 && seen.insert(normalized)
        })
        .map(|event| event.trim().to_string())
        .collect()
}

fn event_lines(content: &str) -> impl Iterator<Item = String> + '_ {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && line.chars().count() <= MAX_EVENT_LINE_CHARS)
        .filter(|line| {
            let lower = line.to_lowercase();
            EVENT_LINE_WORDS.iter().any(|w| lower.contains(w))
        })
        .map(str::to_string)
}

/// Every event known to the system, deduplicated.
///
/// Sources, in order: catalog events, answers in the events topic bucket,
/// event lines on event pages, and event lines in the best chunks for a
/// fixed event query.
pub fn all_events(catalog: &Catalog, chunks: &ChunkStore, search_top_k: usize) -> Vec<String> {
    let mut events: Vec<String> = catalog.events().iter().map(EventRecord::summary).collect();

    events.extend(
        catalog
            .topic_bucket(Topic::Events)
            .iter()
            .map(|qa| qa.answer.clone())
            .filter(|answer| !answer.trim().is_empty()),
    );

    for chunk in chunks.all_chunks() {
        let title = chunk.title.to_lowercase();
        if EVENT_PAGE_WORDS.iter().any(|w| title.contains(w)) {
            events.extend(event_lines(&chunk.content));
        }
    }

    for chunk in chunks.search(EVENT_SEARCH_QUERY, search_top_k) {
        events.extend(event_lines(&chunk.content));
    }

    let total = events.len();
    let events = dedup_events(events);
    tracing::debug!("Aggregated {} events ({} before dedup)", events.len(), total);
    events
}

/// Event titles grouped for the catalog-wide event listing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventCategories {
    pub ongoing: Vec<String>,
    pub workshops: Vec<String>,
    pub general: Vec<String>,
    pub external: Vec<String>,
}

impl EventCategories {
    /// Sort titles into categories. Bracketed dates mark a workshop; then
    /// "external", series-like words, and workshop-like words are checked in
    /// that order; everything else is general.
    pub fn organize<'a, I>(titles: I, organisation_suffix: Option<&str>) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut categories = Self::default();

        for title in titles {
            let lower = title.to_lowercase();
            let clean = match organisation_suffix {
                Some(suffix) => title.replace(suffix, ""),
                None => title.to_string(),
            };
            let clean = clean.trim().to_string();
            if clean.is_empty() {
                continue;
            }

            if title.contains('[') && title.contains(']') {
                categories.workshops.push(clean);
            } else if lower.contains("external") {
                categories.external.push(clean);
            } else if ["series", "microcredentialing", "transformations"]
                .iter()
                .any(|w| lower.contains(w))
            {
                categories.ongoing.push(clean);
            } else if ["workshop", "talk", "development"]
                .iter()
                .any(|w| lower.contains(w))
            {
                categories.workshops.push(clean);
            } else if clean.to_lowercase() != "events" {
                categories.general.push(clean);
            }
        }

        categories
    }

    pub fn is_empty(&self) -> bool {
        self.ongoing.is_empty()
            && self.workshops.is_empty()
            && self.general.is_empty()
            && self.external.is_empty()
    }

    /// External entries other than a bare "External"/"External Events".
    pub fn specific_external(&self) -> Vec<&str> {
        self.external
            .iter()
            .map(String::as_str)
            .filter(|e| !matches!(e.to_lowercase().as_str(), "external" | "external events"))
            .collect()
    }
}

/// `[12 Mar] Title` keeps the date up front; other titles pass through.
pub fn format_dated_title(title: &str) -> String {
    match (title.find('['), title.find(']')) {
        (Some(open), Some(close)) if open < close => {
            let date = &title[open + 1..close];
            let name = title[close + 1..].trim();
            format!("[{}] {}", date, name)
        }
        _ => title.to_string(),
    }
}
