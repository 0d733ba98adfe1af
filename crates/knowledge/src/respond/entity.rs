//! Single-entity replies: one facility, one staff member or one event.

use super::format::{format_response, Section};
use crate::catalog::Catalog;
use crate::events::{event_details, staff_role};
use crate::keywords::contains_keyword;
use crate::types::{Chunk, EventRecord, Facility, StaffMember};

/// Shortest query that may match as a fragment of an event title.
const MIN_EVENT_FRAGMENT_CHARS: usize = 5;

fn or_na(value: &str) -> String {
    if value.trim().is_empty() {
        "N/A".to_string()
    } else {
        value.to_string()
    }
}

/// Everything the catalog knows about one facility.
pub fn facility_reply(facility: &Facility, organisation: &str) -> String {
    let name = &facility.name;

    let mut details = Section::new(format!("{} - Complete Information", name))
        .point("Area", or_na(&facility.area))
        .point("Capacity", or_na(&facility.capacity));

    if !facility.description.trim().is_empty() {
        details = details.point("Description", facility.description.clone());
    }
    details = details
        .points(facility.features.iter().map(|f| (format!("Feature: {}", f), "")))
        .points(facility.equipment.iter().map(|e| (format!("Equipment: {}", e), "")))
        .points(facility.hardware.iter().map(|h| (format!("Hardware: {}", h), "")))
        .points(facility.software.iter().map(|s| (format!("Software: {}", s), "")));
    if !facility.permit.trim().is_empty() {
        details = details.point("Permit Required", facility.permit.clone());
    }
    let details = details.paragraph(format!(
        "Let me know if you want to know about booking procedures or pricing for {}!",
        name
    ));

    let mut sections = vec![details];

    if !facility.pricing.is_empty() || !facility.reservation_rate.trim().is_empty() {
        let mut pricing = Section::new("Pricing & Fees").points(facility.pricing.iter().cloned());
        if !facility.reservation_rate.trim().is_empty() {
            pricing = pricing.point("Reservation Rate", facility.reservation_rate.clone());
        }
        sections.push(pricing.paragraph(format!(
            "Rates vary by user category. Contact {} for booking and payment procedures.",
            organisation
        )));
    }

    format_response(&format!("{} - Facility Details", name), &sections, organisation)
}

/// Staff member named in `query`.
///
/// Any part of a name longer than two characters counts when it appears as
/// a whole word; roster order breaks ties.
pub fn find_staff<'a>(staff: &'a [StaffMember], query: &str) -> Option<&'a StaffMember> {
    let lower = query.to_lowercase();
    staff.iter().find(|member| {
        member
            .name
            .split_whitespace()
            .map(|part| {
                part.chars()
                    .filter(|c| c.is_alphanumeric() || *c == '-')
                    .collect::<String>()
                    .to_lowercase()
            })
            .filter(|part| part.chars().count() > 2)
            .any(|part| contains_keyword(&lower, &part))
    })
}

/// Short introduction of a staff member, filling a missing title from page
/// text.
pub fn staff_reply(member: &StaffMember, chunks: &[Chunk], organisation: &str) -> String {
    let mut member = member.clone();
    if member.title.trim().is_empty() {
        if let Some(role) = staff_role(chunks, &member.name) {
            member.title = role;
        }
    }

    format!(
        "Here's information about {} at {}. For more details about their work and projects, please visit our website or contact {} staff.",
        member.display(),
        organisation,
        organisation
    )
}

/// Event title named in `query`.
///
/// Matches when the whole title appears in the query, or when the query is
/// a fragment of a title and long enough to be meaningful.
pub fn find_event<'a>(titles: &'a [String], query: &str) -> Option<&'a str> {
    let lower = query.trim().to_lowercase();
    if lower.is_empty() {
        return None;
    }

    titles
        .iter()
        .find(|title| {
            let title = title.to_lowercase();
            lower.contains(&title)
                || (lower.chars().count() >= MIN_EVENT_FRAGMENT_CHARS && title.contains(&lower))
        })
        .map(String::as_str)
}

/// Details of one event: catalog record first, page text otherwise.
pub fn event_reply(title: &str, catalog: &Catalog, chunks: &[Chunk]) -> String {
    let record = catalog
        .events()
        .iter()
        .find(|e| e.title.eq_ignore_ascii_case(title))
        .cloned()
        .or_else(|| event_details(chunks, title))
        .unwrap_or_else(|| EventRecord::titled(title));

    let mut text = format!(
        "Here's what I found about this event:\n\n• **Title**: {}",
        record.title
    );
    if let Some(date) = record.date.as_deref().filter(|d| !d.trim().is_empty()) {
        text.push_str(&format!("\n• **Date**: {}", date.trim()));
    }
    if let Some(description) = record.description.as_deref().filter(|d| !d.trim().is_empty()) {
        text.push_str(&format!("\n• **Description**: {}", description.trim()));
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lounge() -> Facility {
        Facility {
            name: "Lounge".to_string(),
            capacity: "40 people".to_string(),
            features: vec!["Sofas".to_string(), "Projector".to_string()],
            pricing: vec![
                ("UGC".to_string(), "waived".to_string()),
                ("External".to_string(), "$500/hr".to_string()),
            ],
            permit: "Yes".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_facility_reply_layout() {
        let text = facility_reply(&lounge(), "Arts Lab");
        assert!(text.starts_with("**Lounge - Facility Details**\n\n__Lounge - Complete Information__"));
        assert!(text.contains("  • Area: N/A\n  • Capacity: 40 people\n"));
        assert!(text.contains("**Key Features**\n  • Sofas\n  • Projector\n"));
        assert!(text.contains("**Requirements**\n  • Permit Required: Yes\n"));
        assert!(text.contains("__Pricing & Fees__"));
        assert!(text.contains("waived"));
        assert!(text.contains("$500/hr"));
        assert!(text.contains("Contact Arts Lab for booking and payment procedures."));
    }

    #[test]
    fn test_facility_without_pricing_has_no_fee_section() {
        let facility = Facility {
            name: "Studio".to_string(),
            ..Default::default()
        };
        let text = facility_reply(&facility, "Arts Lab");
        assert!(!text.contains("Pricing & Fees"));
    }

    #[test]
    fn test_find_staff_whole_word() {
        let staff = vec![
            StaffMember {
                name: "Dr. Jane Doe".to_string(),
                title: "Director".to_string(),
            },
            StaffMember {
                name: "Ms. Amy Li".to_string(),
                title: String::new(),
            },
        ];
        assert_eq!(find_staff(&staff, "Who is Jane?").map(|s| s.title.as_str()), Some("Director"));
        assert_eq!(find_staff(&staff, "Tell me about Amy").map(|s| s.name.as_str()), Some("Ms. Amy Li"));
        assert!(find_staff(&staff, "janet's schedule").is_none());
        // "Li" is too short to count on its own
        assert!(find_staff(&staff, "li").is_none());
    }

    #[test]
    fn test_staff_reply_fills_title_from_pages() {
        let member = StaffMember {
            name: "Dr. Jane Doe".to_string(),
            title: String::new(),
        };
        let chunks = vec![Chunk {
            id: "p_0".to_string(),
            url: "p".to_string(),
            title: "Team".to_string(),
            content: "Meet Dr. Jane Doe (Lab Director) and the team.".to_string(),
            chunk_index: 0,
            scraped_at: String::new(),
        }];
        let text = staff_reply(&member, &chunks, "Arts Lab");
        assert!(text.starts_with("Here's information about Dr. Jane Doe (Lab Director) at Arts Lab."));
    }

    #[test]
    fn test_find_event() {
        let titles = vec!["Creative Coding Workshop".to_string(), "Open Studio".to_string()];
        assert_eq!(
            find_event(&titles, "When is the creative coding workshop?"),
            Some("Creative Coding Workshop")
        );
        assert_eq!(find_event(&titles, "open st"), Some("Open Studio"));
        assert_eq!(find_event(&titles, "open"), None);
    }

    #[test]
    fn test_event_reply_prefers_catalog() {
        let catalog = Catalog::default();
        let text = event_reply("Open Studio", &catalog, &[]);
        assert_eq!(text, "Here's what I found about this event:\n\n• **Title**: Open Studio");
    }
}
