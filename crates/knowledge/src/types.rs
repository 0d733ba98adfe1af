//! Knowledge system type definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A bookable space from the catalog.
///
/// The name is the display name exactly as the catalog spells it; lookups
/// normalise on the fly and never rewrite it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Facility {
    pub name: String,
    pub area: String,
    pub capacity: String,
    pub description: String,
    pub features: Vec<String>,
    pub equipment: Vec<String>,
    pub hardware: Vec<String>,
    pub software: Vec<String>,

    /// Rate category to price, in catalog order
    pub pricing: Vec<(String, String)>,
    pub permit: String,
    pub reservation_rate: String,
}

impl Facility {
    /// Every non-empty attribute as `(label, value)` lines, in a stable order.
    pub fn attribute_lines(&self) -> Vec<(String, String)> {
        let mut lines = Vec::new();
        let mut push = |label: &str, value: String| {
            if !value.trim().is_empty() {
                lines.push((label.to_string(), value));
            }
        };

        push("area", self.area.clone());
        push("capacity", self.capacity.clone());
        push("description", self.description.clone());
        push("features", self.features.join(", "));
        push("equipment", self.equipment.join(", "));
        push("hardware", self.hardware.join(", "));
        push("software", self.software.join(", "));
        push(
            "pricing",
            self.pricing
                .iter()
                .map(|(category, rate)| format!("{}: {}", category, rate))
                .collect::<Vec<_>>()
                .join("; "),
        );
        push("permit", self.permit.clone());
        push("reservation_rate", self.reservation_rate.clone());

        lines
    }
}

/// Identity block for the organisation running the facility.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Overview {
    #[serde(rename = "Name", default)]
    pub name: String,

    #[serde(rename = "Affiliation", default)]
    pub affiliation: String,

    #[serde(rename = "Positioning", default)]
    pub positioning: String,

    #[serde(rename = "Function", default)]
    pub function: String,
}

/// A member of staff and their role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffMember {
    pub name: String,

    #[serde(default)]
    pub title: String,
}

impl StaffMember {
    /// `Name (Title)`, or just the name when no title is known.
    pub fn display(&self) -> String {
        if self.title.trim().is_empty() {
            self.name.clone()
        } else {
            format!("{} ({})", self.name, self.title)
        }
    }
}

/// An event, either declared in the catalog or mined from page text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl EventRecord {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// One-line rendering: `Title (date): description`.
    pub fn summary(&self) -> String {
        let mut text = self.title.clone();
        if let Some(date) = self.date.as_deref().filter(|d| !d.is_empty()) {
            text.push_str(&format!(" ({})", date));
        }
        if let Some(description) = self.description.as_deref().filter(|d| !d.is_empty()) {
            text.push_str(&format!(": {}", description));
        }
        text
    }
}

/// A question and its answer from the conversation log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QaPair {
    pub question: String,
    pub answer: String,
}

/// One crawled page, as handed over by the crawler.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageRecord {
    pub url: String,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub content: String,

    #[serde(default)]
    pub scraped_at: String,

    /// Headings, links and similar extras; carried but not interpreted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

/// A window of page text used as the unit of retrieval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// `<url>_<word offset>`
    pub id: String,
    pub url: String,

    #[serde(default)]
    pub title: String,
    pub content: String,

    /// Word offset of the window within its page
    pub chunk_index: usize,

    #[serde(default)]
    pub scraped_at: String,
}

/// Summary written next to the chunk snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkSummary {
    pub last_updated: DateTime<Utc>,
    pub total_pages_scraped: usize,
    pub total_chunks_created: usize,

    #[serde(default)]
    pub source_url: Option<String>,
    pub chunk_size: usize,
    pub overlap: usize,
}

/// Topic categories. Used both to classify a question and to bucket the
/// conversation log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    Facility,
    Pricing,
    Booking,
    Equipment,
    Software,
    Staff,
    Internship,
    Event,
    Policy,
    Tool,
    General,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Facility => "facility",
            Intent::Pricing => "pricing",
            Intent::Booking => "booking",
            Intent::Equipment => "equipment",
            Intent::Software => "software",
            Intent::Staff => "staff",
            Intent::Internship => "internship",
            Intent::Event => "event",
            Intent::Policy => "policy",
            Intent::Tool => "tool",
            Intent::General => "general",
        }
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Named groups of Q&A pairs mined from the conversation log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Topic {
    Facilities,
    Pricing,
    Equipment,
    Software,
    Staff,
    Internships,
    Events,
    Policies,
    Tools,
    General,
}

impl Topic {
    pub fn as_str(&self) -> &'static str {
        match self {
            Topic::Facilities => "facilities",
            Topic::Pricing => "pricing",
            Topic::Equipment => "equipment",
            Topic::Software => "software",
            Topic::Staff => "staff",
            Topic::Internships => "internships",
            Topic::Events => "events",
            Topic::Policies => "policies",
            Topic::Tools => "tools",
            Topic::General => "general",
        }
    }
}

/// Catalog-wide listing requests ("what facilities are there").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BroadCategory {
    Facilities,
    Events,
    Staff,
    Equipment,
    Software,
    Pricing,
    Booking,
    Internships,
    Policies,
    Tools,
}

/// Which stage of the pipeline produced an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    NonText,
    FixedPhrase,
    BroadListing,
    Facility,
    Staff,
    Event,
    Completion,
    QaExtract,
    Apology,
}
