//! Catalog-wide listings, built straight from the catalog without
//! completion.

use super::format::{format_response, Section};
use crate::catalog::Catalog;
use crate::chunk::ChunkStore;
use crate::events::{all_events, format_dated_title, EventCategories};
use crate::types::BroadCategory;
use std::collections::BTreeSet;

/// Listing for `category`, or `None` when the catalog has nothing to list.
pub fn broad_listing(
    category: BroadCategory,
    catalog: &Catalog,
    chunks: &ChunkStore,
    event_top_k: usize,
) -> Option<String> {
    let org = catalog.display_name();

    match category {
        BroadCategory::Facilities => {
            let names: Vec<&str> = catalog
                .all_facilities()
                .iter()
                .map(|f| f.name.as_str())
                .collect();
            bullet_list(&names).map(|list| {
                format!(
                    "Here are the main facilities at {}:\n\n{}\n\nLet me know if you'd like more details about any specific facility!",
                    org, list
                )
            })
        }
        BroadCategory::Events => events_listing(catalog, chunks, event_top_k),
        BroadCategory::Staff => {
            let staff: Vec<String> = catalog.all_staff().iter().map(|s| s.display()).collect();
            let names: Vec<&str> = staff.iter().map(String::as_str).collect();
            bullet_list(&names).map(|list| {
                format!(
                    "Here are some of the staff members at {}:\n\n{}\n\nYou can find more details about their roles on our website.",
                    org, list
                )
            })
        }
        BroadCategory::Equipment => {
            let mut items = BTreeSet::new();
            for facility in catalog.all_facilities() {
                items.extend(facility.equipment.iter().map(String::as_str));
                items.extend(facility.hardware.iter().map(String::as_str));
            }
            for (_, group) in catalog.equipment_groups() {
                items.extend(group.iter().map(String::as_str));
            }
            let items: Vec<&str> = items.into_iter().collect();
            bullet_list(&items).map(|list| {
                format!(
                    "Here is a list of equipment and hardware available at {}:\n\n{}\n\nLet me know if you'd like more details about any specific equipment!",
                    org, list
                )
            })
        }
        BroadCategory::Software => {
            let mut items = BTreeSet::new();
            for facility in catalog.all_facilities() {
                items.extend(facility.software.iter().map(String::as_str));
            }
            for (_, group) in catalog.software_groups() {
                items.extend(group.iter().map(String::as_str));
            }
            let items: Vec<&str> = items.into_iter().collect();
            bullet_list(&items).map(|list| {
                format!(
                    "Here is a list of software tools available at {}:\n\n{}\n\nLet me know if you'd like more details about any specific software!",
                    org, list
                )
            })
        }
        BroadCategory::Pricing => Some(pricing_overview(catalog)),
        BroadCategory::Booking => Some(booking_overview(catalog)),
        BroadCategory::Internships => {
            let mut text = format!(
                "{} offers internship opportunities for students interested in arts and technology.",
                org
            );
            let positions: Vec<&str> = catalog.internships().iter().map(String::as_str).collect();
            if let Some(list) = bullet_list(&positions) {
                text.push_str(&format!("\n\nCurrent openings:\n\n{}", list));
            }
            text.push_str("\n\nYou can find more details and application info on our website.");
            Some(text)
        }
        BroadCategory::Policies => Some(format!(
            "{} has clear policies and guidelines for lab use, booking, and safety. You can find more details on our website.",
            org
        )),
        BroadCategory::Tools => Some(format!(
            "{} provides access to a variety of AI tools and creative software. You can find more details and tutorials on our website.",
            org
        )),
    }
}

fn bullet_list(items: &[&str]) -> Option<String> {
    if items.is_empty() {
        return None;
    }
    Some(
        items
            .iter()
            .map(|item| format!("• {}", item))
            .collect::<Vec<_>>()
            .join("\n"),
    )
}

/// Every known event, grouped by category.
pub fn events_listing(
    catalog: &Catalog,
    chunks: &ChunkStore,
    event_top_k: usize,
) -> Option<String> {
    let org = catalog.display_name();
    let events = all_events(catalog, chunks, event_top_k);
    let suffix = format!(" – {}", org);
    let categories =
        EventCategories::organize(events.iter().map(String::as_str), Some(suffix.as_str()));
    if categories.is_empty() && catalog.programs().is_empty() {
        return None;
    }

    let mut text = format!("**{} Events & Programs**\n\n", org);
    let mut block = |heading: &str, items: Vec<String>| {
        if items.is_empty() {
            return;
        }
        text.push_str(&format!("__{}__\n", heading));
        for item in items {
            text.push_str(&format!("• **{}**\n", item));
        }
        text.push('\n');
    };

    block("Ongoing Series & Programs", categories.ongoing.clone());
    block(
        "Workshops & Talks",
        categories
            .workshops
            .iter()
            .map(|w| format_dated_title(w))
            .collect(),
    );
    block("General Events", categories.general.clone());

    if !categories.external.is_empty() {
        text.push_str("__External Events__\n");
        let specific = categories.specific_external();
        if specific.is_empty() {
            text.push_str("• (Not yet ready, is coming soon)\n");
        } else {
            for event in specific {
                text.push_str(&format!("• **{}**\n", event));
            }
        }
        text.push('\n');
    }

    if !catalog.programs().is_empty() {
        text.push_str("__Special Programs__\n");
        for (name, description) in catalog.programs() {
            text.push_str(&format!("• **{}**: {}\n", name, description));
        }
        text.push('\n');
    }

    text.push_str(
        "_For detailed information about any event, please visit our website or contact us directly!_",
    );
    Some(text)
}

/// Pricing for every facility, then the catalog's rate tiers and booking
/// requirements when it lists them.
pub fn pricing_overview(catalog: &Catalog) -> String {
    let org = catalog.display_name();
    let mut sections = Vec::new();

    for facility in catalog.all_facilities() {
        let mut section = Section::new(facility.name.clone())
            .point("Area", or_na(&facility.area))
            .point("Capacity", or_na(&facility.capacity));

        if facility.pricing.is_empty() {
            section = section.point("Pricing", "Information available upon request");
        } else {
            section = section.points(facility.pricing.iter().cloned());
        }
        for feature in facility.features.iter().take(3) {
            section = section.point(format!("Key Feature: {}", feature), "");
        }

        sections.push(section.paragraph(format!(
            "Pricing for {} is flexible and depends on your user category. Let me know if you want a quote!",
            facility.name
        )));
    }

    if let Some(section) = rate_tier_section(catalog) {
        sections.push(section.paragraph(format!(
            "We offer different rates for different user types to make {} accessible to everyone!",
            org
        )));
    }

    for (heading, rules) in catalog.booking_policy() {
        if heading.to_lowercase().contains("requirement") {
            sections.push(
                policy_section("Booking Requirements", rules)
                    .paragraph("Booking is simple! Just follow these steps and you're set."),
            );
        }
    }

    sections.push(Section::new("Need Help?").paragraph(
        "Let me know which facility you want to book, and I can provide detailed information for your user category!",
    ));

    format_response(&format!("{} Facilities and Pricing Overview", org), &sections, org)
}

/// Booking rules from the catalog, then each facility, the rate tiers and
/// contact details.
pub fn booking_overview(catalog: &Catalog) -> String {
    let org = catalog.display_name();
    let mut sections: Vec<Section> = catalog
        .booking_policy()
        .iter()
        .map(|(heading, rules)| {
            let title = if heading.to_lowercase().contains("booking") {
                heading.clone()
            } else {
                format!("Booking {}", heading)
            };
            policy_section(&title, rules)
        })
        .collect();

    if sections.is_empty() {
        sections.push(Section::new("Booking Process").paragraph(format!(
            "Please contact {} staff to reserve a space. They will confirm availability and the steps for your user category.",
            org
        )));
    }

    for facility in catalog.all_facilities() {
        let mut section = Section::new(facility.name.clone())
            .point("Area", or_na(&facility.area))
            .point("Capacity", or_na(&facility.capacity));
        for feature in facility.features.iter().take(2) {
            section = section.point(format!("Key Feature: {}", feature), "");
        }
        sections.push(section.paragraph(format!(
            "Let me know if you want to book {} or need more details!",
            facility.name
        )));
    }

    if let Some(section) = rate_tier_section(catalog) {
        sections.push(section.paragraph("We offer different rates for different user types!"));
    }

    let contact: Vec<(String, String)> = catalog.contact().to_vec();
    if !contact.is_empty() {
        sections.push(
            Section::new("Contact Information")
                .points(contact)
                .paragraph("Reach out if you need help with booking or have any questions!"),
        );
    }

    sections.push(Section::new("Which facility would you like to book?").paragraph(
        "I can provide detailed pricing and information for any specific facility.",
    ));

    format_response(&format!("{} Booking Information and Requirements", org), &sections, org)
}

fn rate_tier_section(catalog: &Catalog) -> Option<Section> {
    if catalog.rate_tiers().is_empty() {
        return None;
    }
    Some(Section::new("Pricing Categories").points(catalog.rate_tiers().iter().cloned()))
}

/// One rule per point. "Key: value" rules keep their value as the
/// explanation.
fn policy_section(title: &str, rules: &[String]) -> Section {
    rules.iter().fold(Section::new(title), |section, rule| match rule.split_once(": ") {
        Some((key, value)) => section.point(key, value),
        None => section.point(rule.as_str(), ""),
    })
}

fn or_na(value: &str) -> String {
    if value.trim().is_empty() {
        "N/A".to_string()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogKeys;
    use crate::types::StaffMember;

    const SOURCE: &str = r#"{"Arts Lab": {
        "Facilities": [
            {"Name": "Lounge", "Equipment": ["Projector"], "Software": "Blender",
             "Fees": {"UGC": "waived", "External": "$500/hr"}},
            {"Name": "XR Space", "Hardware": ["RTX 4090", "Projector"], "Software": ["Unity"]}
        ],
        "Events": {"Series": [{"title": "Lecture Series"}], "External": "Coming soon"},
        "Special Programs": {"Artist Residency": "Three months in the studio"},
        "Pricing Categories": {"External Organizations": "Highest rates", "Students": "Fees waived"},
        "Booking": {
            "Process": ["Book through a faculty advisor"],
            "Requirements": ["Minimum charge: 4 hours per room"]
        }
    }}"#;

    fn catalog() -> Catalog {
        Catalog::parse(SOURCE, &CatalogKeys::default())
    }

    #[test]
    fn test_facilities_in_catalog_order() {
        let chunks = ChunkStore::default();
        let text = broad_listing(BroadCategory::Facilities, &catalog(), &chunks, 10).unwrap();
        assert!(text.contains("• Lounge\n• XR Space\n\n"));
    }

    #[test]
    fn test_equipment_is_sorted_union() {
        let chunks = ChunkStore::default();
        let text = broad_listing(BroadCategory::Equipment, &catalog(), &chunks, 10).unwrap();
        assert!(text.contains("• Projector\n• RTX 4090\n\n"));
        assert_eq!(text.matches("Projector").count(), 1);
    }

    #[test]
    fn test_empty_sections_fall_through() {
        let empty = Catalog::default();
        let chunks = ChunkStore::default();
        assert!(broad_listing(BroadCategory::Facilities, &empty, &chunks, 10).is_none());
        assert!(broad_listing(BroadCategory::Staff, &empty, &chunks, 10).is_none());
        assert!(broad_listing(BroadCategory::Events, &empty, &chunks, 10).is_none());
        assert!(broad_listing(BroadCategory::Policies, &empty, &chunks, 10).is_some());
    }

    #[test]
    fn test_staff_listing() {
        let catalog = catalog().with_staff(vec![StaffMember {
            name: "Dr. Kal Ng".to_string(),
            title: "Director".to_string(),
        }]);
        let text =
            broad_listing(BroadCategory::Staff, &catalog, &ChunkStore::default(), 10).unwrap();
        assert!(text.contains("• Dr. Kal Ng (Director)"));
    }

    #[test]
    fn test_events_listing() {
        let text = events_listing(&catalog(), &ChunkStore::default(), 10).unwrap();
        assert!(text.starts_with("**Arts Lab Events & Programs**"));
        assert!(text.contains("__Ongoing Series & Programs__\n• **Lecture Series**"));
        assert!(text.contains("__External Events__\n• **External: Coming soon**"));
        assert!(text.contains("__Special Programs__\n• **Artist Residency**: Three months in the studio"));
    }

    #[test]
    fn test_programs_alone_still_list() {
        let source = r#"{"Lab": {"Special Programs": {"Residency": "Open call"}}}"#;
        let catalog = Catalog::parse(source, &CatalogKeys::default());
        let text = events_listing(&catalog, &ChunkStore::default(), 10).unwrap();
        assert!(text.contains("• **Residency**: Open call"));
    }

    #[test]
    fn test_booking_overview_uses_catalog_policy() {
        let text = booking_overview(&catalog());
        assert!(text.contains("__Booking Process__"));
        assert!(text.contains("Book through a faculty advisor"));
        assert!(text.contains("• **Students**: Fees waived"));

        let bare = booking_overview(&Catalog::default());
        assert!(bare.contains("Please contact the lab staff to reserve a space."));
        assert!(!bare.contains("Pricing Categories"));
        assert!(!bare.contains("faculty advisor"));
    }

    #[test]
    fn test_pricing_overview_lists_rates() {
        let text = pricing_overview(&catalog());
        assert!(text.contains("__Lounge__"));
        assert!(text.contains("UGC: waived"));
        assert!(text.contains("Information available upon request"));
        assert!(text.contains("• **Minimum charge**: 4 hours per room"));
        // "External" sorts the tier into the grouped pricing block
        assert!(text.contains("  • External Organizations: Highest rates"));

        let without_policy = pricing_overview(&Catalog::parse(
            r#"{"Lab": {"Facilities": [{"Name": "Studio"}]}}"#,
            &CatalogKeys::default(),
        ));
        assert!(!without_policy.contains("Minimum charge"));
        assert!(!without_policy.contains("Pricing Categories"));
    }
}
