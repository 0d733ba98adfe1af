//! Catalog store: the structured facility data plus the mined Q&A buckets.
//!
//! Loading never fails. Each section of the source is parsed on its own; a
//! section that is missing or malformed is logged and left empty while the
//! rest of the catalog loads normally.

pub mod conversations;
pub mod source;
pub mod staff;

pub use conversations::parse_conversations;
pub use source::OrderedMap;
pub use staff::parse_staff;

use crate::config::KnowledgeConfig;
use crate::intent::bucket_for;
use crate::types::{EventRecord, Facility, Overview, QaPair, StaffMember, Topic};
use serde_json::value::RawValue;
use serde_json::Value;
use source::{field, string_list, text};
use std::collections::HashMap;
use std::path::Path;

/// Which keys of the source file hold the organisation and its facilities.
#[derive(Debug, Clone, Default)]
pub struct CatalogKeys {
    /// Top-level organisation key (first key when `None`)
    pub organisation: Option<String>,

    /// Facility list key (first key ending in "Facilities" when `None`)
    pub facilities: Option<String>,
}

impl From<&KnowledgeConfig> for CatalogKeys {
    fn from(config: &KnowledgeConfig) -> Self {
        Self {
            organisation: config.organisation_key.clone(),
            facilities: config.facilities_key.clone(),
        }
    }
}

/// Immutable, fully parsed catalog.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    organisation: String,
    overview: Overview,
    facilities: Vec<Facility>,
    equipment: Vec<(String, Vec<String>)>,
    software: Vec<(String, Vec<String>)>,
    contact: Vec<(String, String)>,
    programs: Vec<(String, String)>,
    rate_tiers: Vec<(String, String)>,
    booking: Vec<(String, Vec<String>)>,
    events: Vec<EventRecord>,
    internships: Vec<String>,
    staff: Vec<StaffMember>,
    buckets: HashMap<Topic, Vec<QaPair>>,
}

impl Catalog {
    /// Parse the structured source.
    ///
    /// Malformed input yields an empty catalog, never an error.
    pub fn parse(json: &str, keys: &CatalogKeys) -> Self {
        let top: OrderedMap<Box<RawValue>> = match serde_json::from_str(json) {
            Ok(top) => top,
            Err(e) => {
                tracing::error!("Catalog source is not a JSON object: {}", e);
                return Self::default();
            }
        };

        let organisation = match keys.organisation.as_deref() {
            Some(key) => key.to_string(),
            None => match top.keys().next() {
                Some(first) => first.to_string(),
                None => {
                    tracing::error!("Catalog source has no organisation entry");
                    return Self::default();
                }
            },
        };

        let sections: OrderedMap<Box<RawValue>> = match top.get(&organisation) {
            Some(raw) => parse_section(raw, "organisation", &organisation),
            None => {
                tracing::error!("Catalog source has no entry for '{}'", organisation);
                return Self {
                    organisation,
                    ..Default::default()
                };
            }
        };

        let facilities_key = keys.facilities.clone().or_else(|| {
            sections
                .keys()
                .find(|k| k.to_lowercase().ends_with("facilities"))
                .map(str::to_string)
        });

        let overview: Overview = section(&sections, "Overview");
        let facilities = match facilities_key.as_deref() {
            Some(key) => parse_facilities(section::<Vec<Value>>(&sections, key)),
            None => {
                tracing::warn!("Catalog for '{}' has no facility list", organisation);
                Vec::new()
            }
        };

        let catalog = Self {
            overview,
            facilities,
            equipment: grouped_lists(section(&sections, "Equipment")),
            software: grouped_lists(section(&sections, "Software")),
            contact: text_pairs(section(&sections, "Contact")),
            programs: text_pairs(section(&sections, "Special Programs")),
            rate_tiers: text_pairs(section(&sections, "Pricing Categories")),
            booking: grouped_lists(section(&sections, "Booking")),
            events: sections
                .get("Events")
                .map(|raw| parse_events(raw))
                .unwrap_or_default(),
            internships: section::<Vec<Value>>(&sections, "Internships")
                .iter()
                .map(internship_label)
                .filter(|s| !s.is_empty())
                .collect(),
            organisation,
            ..Default::default()
        };

        tracing::debug!(
            "Parsed catalog for '{}': {} facilities, {} events",
            catalog.organisation,
            catalog.facilities.len(),
            catalog.events.len()
        );

        catalog
    }

    /// Load the catalog, conversation log and staff roster from the data
    /// directory.
    pub fn load(workspace: &Path, config: &KnowledgeConfig) -> Self {
        let keys = CatalogKeys::from(config);

        let catalog = read_source(&config.data_file(workspace, &config.catalog_file))
            .map(|json| Self::parse(&json, &keys))
            .unwrap_or_default();

        let staff = read_source(&config.data_file(workspace, &config.staff_file))
            .and_then(|json| match parse_staff(&json) {
                Ok(staff) => Some(staff),
                Err(e) => {
                    tracing::error!("Failed to parse staff roster: {}", e);
                    None
                }
            })
            .unwrap_or_default();

        let pairs = read_source(&config.data_file(workspace, &config.conversations_file))
            .and_then(|json| match parse_conversations(&json) {
                Ok(pairs) => Some(pairs),
                Err(e) => {
                    tracing::error!("Failed to parse conversation log: {}", e);
                    None
                }
            })
            .unwrap_or_default();

        catalog.with_staff(staff).with_conversations(pairs)
    }

    /// Replace the staff roster.
    pub fn with_staff(mut self, staff: Vec<StaffMember>) -> Self {
        self.staff = staff;
        self
    }

    /// Sort Q&A pairs into topic buckets, first matching topic wins.
    pub fn with_conversations(mut self, pairs: Vec<QaPair>) -> Self {
        self.buckets.clear();
        for pair in pairs {
            let topic = bucket_for(&pair.question);
            self.buckets.entry(topic).or_default().push(pair);
        }
        self
    }

    /// Name to use in replies: the overview name, else the source key.
    pub fn display_name(&self) -> &str {
        if !self.overview.name.trim().is_empty() {
            &self.overview.name
        } else if !self.organisation.is_empty() {
            &self.organisation
        } else {
            "the lab"
        }
    }

    pub fn overview(&self) -> &Overview {
        &self.overview
    }

    /// All facilities in catalog order.
    pub fn all_facilities(&self) -> &[Facility] {
        &self.facilities
    }

    /// Look up a facility by its canonical name, ignoring case.
    pub fn facility(&self, name: &str) -> Option<&Facility> {
        self.facilities
            .iter()
            .find(|f| f.name == name)
            .or_else(|| self.facilities.iter().find(|f| f.name.eq_ignore_ascii_case(name)))
    }

    pub fn all_staff(&self) -> &[StaffMember] {
        &self.staff
    }

    /// Q&A pairs filed under one topic.
    pub fn topic_bucket(&self, topic: Topic) -> &[QaPair] {
        self.buckets.get(&topic).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn equipment_groups(&self) -> &[(String, Vec<String>)] {
        &self.equipment
    }

    pub fn software_groups(&self) -> &[(String, Vec<String>)] {
        &self.software
    }

    pub fn contact(&self) -> &[(String, String)] {
        &self.contact
    }

    /// Special programs, name to description.
    pub fn programs(&self) -> &[(String, String)] {
        &self.programs
    }

    /// User categories and what each pays, highest rate first.
    pub fn rate_tiers(&self) -> &[(String, String)] {
        &self.rate_tiers
    }

    /// Booking rules grouped by heading, e.g. "Process" or "Requirements".
    pub fn booking_policy(&self) -> &[(String, Vec<String>)] {
        &self.booking
    }

    pub fn events(&self) -> &[EventRecord] {
        &self.events
    }

    pub fn internships(&self) -> &[String] {
        &self.internships
    }
}

fn read_source(path: &Path) -> Option<String> {
    if !path.exists() {
        tracing::warn!("Data file not found: {:?}", path);
        return None;
    }

    match std::fs::read_to_string(path) {
        Ok(contents) => Some(contents),
        Err(e) => {
            tracing::error!("Failed to read {:?}: {}", path, e);
            None
        }
    }
}

fn parse_section<T: serde::de::DeserializeOwned + Default>(
    raw: &RawValue,
    what: &str,
    key: &str,
) -> T {
    serde_json::from_str(raw.get()).unwrap_or_else(|e| {
        tracing::error!("Malformed {} section '{}': {}", what, key, e);
        T::default()
    })
}

fn section<T: serde::de::DeserializeOwned + Default>(
    sections: &OrderedMap<Box<RawValue>>,
    key: &str,
) -> T {
    sections
        .get(key)
        .map(|raw| parse_section(raw, "catalog", key))
        .unwrap_or_default()
}

fn parse_facilities(items: Vec<Value>) -> Vec<Facility> {
    let mut facilities: Vec<Facility> = Vec::with_capacity(items.len());

    for (index, item) in items.iter().enumerate() {
        if !item.is_object() {
            tracing::error!("Facility entry {} is not an object", index);
            continue;
        }

        let name = field(item, &["Name"]).map(text).unwrap_or_default();
        if name.is_empty() {
            tracing::warn!("Skipping facility entry {} without a name", index);
            continue;
        }

        let pricing = match field(item, &["Fees"]) {
            Some(fees) => serde_json::from_value::<OrderedMap<Value>>(fees.clone())
                .map(|map| map.0.iter().map(|(k, v)| (k.clone(), text(v))).collect())
                .unwrap_or_else(|_| vec![("Fees".to_string(), text(fees))]),
            None => Vec::new(),
        };

        let list = |keys: &[&str]| field(item, keys).map(string_list).unwrap_or_default();
        let single = |keys: &[&str]| field(item, keys).map(text).unwrap_or_default();

        let facility = Facility {
            area: single(&["Area"]),
            capacity: single(&["Capacity"]),
            description: single(&["Description"]),
            features: list(&["Features"]),
            equipment: list(&["Equipment"]),
            hardware: list(&["Hardware"]),
            software: list(&["Software", "Virtual Simulation Media Software"]),
            pricing,
            permit: single(&["Permit"]),
            reservation_rate: single(&["Reservation Rate"]),
            name,
        };

        // A repeated name replaces the earlier entry in place
        match facilities.iter_mut().find(|f| f.name == facility.name) {
            Some(existing) => *existing = facility,
            None => facilities.push(facility),
        }
    }

    facilities
}

fn grouped_lists(map: OrderedMap<Value>) -> Vec<(String, Vec<String>)> {
    map.0
        .into_iter()
        .map(|(group, value)| {
            let items = string_list(&value);
            (group, items)
        })
        .collect()
}

fn text_pairs(map: OrderedMap<Value>) -> Vec<(String, String)> {
    map.0
        .into_iter()
        .map(|(key, value)| (key, text(&value)))
        .filter(|(_, value)| !value.is_empty())
        .collect()
}

fn parse_events(raw: &RawValue) -> Vec<EventRecord> {
    if let Ok(groups) = serde_json::from_str::<OrderedMap<Value>>(raw.get()) {
        let mut events = Vec::new();
        for (kind, data) in groups.0 {
            match data {
                Value::Array(items) => events.extend(items.iter().filter_map(event_from_value)),
                Value::String(s) if !s.trim().is_empty() => {
                    events.push(EventRecord::titled(format!("{}: {}", kind, s.trim())))
                }
                _ => {}
            }
        }
        return events;
    }

    match serde_json::from_str::<Vec<Value>>(raw.get()) {
        Ok(items) => items.iter().filter_map(event_from_value).collect(),
        Err(e) => {
            tracing::error!("Malformed catalog section 'Events': {}", e);
            Vec::new()
        }
    }
}

fn event_from_value(value: &Value) -> Option<EventRecord> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(EventRecord::titled(s.trim())),
        Value::Object(_) => {
            let title = field(value, &["title", "Title", "name", "Name"]).map(text)?;
            if title.is_empty() {
                return None;
            }
            let optional = |keys: &[&str]| {
                field(value, keys)
                    .map(text)
                    .filter(|s| !s.is_empty())
            };
            Some(EventRecord {
                title,
                date: optional(&["date", "Date"]),
                description: optional(&["description", "Description"]),
            })
        }
        _ => None,
    }
}

fn internship_label(value: &Value) -> String {
    match field(value, &["title", "Title", "position", "Position", "name", "Name"]) {
        Some(label) => text(label),
        None => text(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = r#"{
        "Example Arts Lab": {
            "Overview": {"Name": "Example Arts Lab", "Affiliation": "Faculty of Arts"},
            "Lab Facilities": [
                {"Name": "XR Space", "Area": 80, "Capacity": "20 people",
                 "Features": ["Motion capture"], "Virtual Simulation Media Software": ["Unity"],
                 "Fees": {"External": "$800/hr", "UGC": "waived"}},
                {"Name": "Lounge", "Capacity": "40 people", "Features": "Sofas"},
                {"Area": "no name"},
                "not an object"
            ],
            "Equipment": {"Cameras": ["DSLR", "360 camera"], "Audio": "Mixer"},
            "Contact": {"Phone": "(+852) 0000 0000", "Email": "lab@example.org"},
            "Events": {
                "Series": [{"title": "Creative Coding", "date": "Fridays"}, "Open Studio"],
                "External": "Coming soon"
            },
            "Internships": [{"title": "Summer Intern"}, "Research Assistant"],
            "Special Programs": {"Artist Residency": "Three-month studio residency"},
            "Pricing Categories": {"External Organizations": "Highest rates", "Students": "Fees waived"},
            "Booking": {
                "Process": ["Book through a faculty advisor"],
                "Requirements": ["Minimum charge of 4 hours", "7-30 days advance notice"]
            },
            "Software": "not a map"
        }
    }"#;

    #[test]
    fn test_parse_keeps_facility_order_and_fields() {
        let catalog = Catalog::parse(SOURCE, &CatalogKeys::default());
        let names: Vec<&str> = catalog.all_facilities().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["XR Space", "Lounge"]);

        let xr = catalog.facility("xr space").unwrap();
        assert_eq!(xr.area, "80");
        assert_eq!(xr.software, vec!["Unity"]);
        assert_eq!(
            xr.pricing,
            vec![
                ("External".to_string(), "$800/hr".to_string()),
                ("UGC".to_string(), "waived".to_string())
            ]
        );
        assert_eq!(catalog.facility("Lounge").unwrap().features, vec!["Sofas"]);
    }

    #[test]
    fn test_malformed_section_defaults_to_empty() {
        let catalog = Catalog::parse(SOURCE, &CatalogKeys::default());
        assert!(catalog.software_groups().is_empty());
        assert_eq!(catalog.equipment_groups().len(), 2);
        assert_eq!(catalog.contact().len(), 2);
    }

    #[test]
    fn test_events_and_internships() {
        let catalog = Catalog::parse(SOURCE, &CatalogKeys::default());
        let titles: Vec<&str> = catalog.events().iter().map(|e| e.title.as_str()).collect();
        assert_eq!(
            titles,
            vec!["Creative Coding", "Open Studio", "External: Coming soon"]
        );
        assert_eq!(catalog.events()[0].date.as_deref(), Some("Fridays"));
        assert_eq!(catalog.internships(), &["Summer Intern", "Research Assistant"]);
    }

    #[test]
    fn test_programs_and_booking_policy() {
        let catalog = Catalog::parse(SOURCE, &CatalogKeys::default());
        assert_eq!(
            catalog.programs(),
            &[("Artist Residency".to_string(), "Three-month studio residency".to_string())]
        );
        assert_eq!(catalog.rate_tiers()[0].0, "External Organizations");
        let headings: Vec<&str> = catalog.booking_policy().iter().map(|(h, _)| h.as_str()).collect();
        assert_eq!(headings, vec!["Process", "Requirements"]);
        assert_eq!(catalog.booking_policy()[1].1.len(), 2);
    }

    #[test]
    fn test_unparseable_source_is_empty() {
        let catalog = Catalog::parse("{ broken", &CatalogKeys::default());
        assert!(catalog.all_facilities().is_empty());
        assert_eq!(catalog.display_name(), "the lab");
    }

    #[test]
    fn test_unknown_organisation_key() {
        let keys = CatalogKeys {
            organisation: Some("Other Lab".to_string()),
            facilities: None,
        };
        let catalog = Catalog::parse(SOURCE, &keys);
        assert!(catalog.all_facilities().is_empty());
        assert_eq!(catalog.display_name(), "Other Lab");
    }

    #[test]
    fn test_conversations_are_bucketed() {
        let catalog = Catalog::default().with_conversations(vec![
            QaPair {
                question: "How much is the rental fee?".to_string(),
                answer: "It depends.".to_string(),
            },
            QaPair {
                question: "Where do I park?".to_string(),
                answer: "Nearby.".to_string(),
            },
        ]);
        assert_eq!(catalog.topic_bucket(Topic::Pricing).len(), 1);
        assert_eq!(catalog.topic_bucket(Topic::General).len(), 1);
        assert!(catalog.topic_bucket(Topic::Staff).is_empty());
    }

    #[test]
    fn test_load_from_data_dir() {
        let temp = tempfile::TempDir::new().unwrap();
        let config = KnowledgeConfig::default();
        let dir = config.data_dir(temp.path());
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("catalog.json"), SOURCE).unwrap();
        std::fs::write(
            dir.join("staff.json"),
            r#"{"core_staff": [{"name": "Jenny Lee", "title": "Coordinator"}]}"#,
        )
        .unwrap();
        std::fs::write(dir.join("conversations.json"), "not json").unwrap();

        let catalog = Catalog::load(temp.path(), &config);
        assert_eq!(catalog.all_facilities().len(), 2);
        assert_eq!(catalog.all_staff().len(), 1);
        assert!(catalog.topic_bucket(Topic::General).is_empty());
    }
}
