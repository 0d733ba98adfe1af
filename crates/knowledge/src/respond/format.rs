//! Structured reply formatting: a title, then sections of grouped points.

/// One labelled block of a structured reply.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Section {
    pub subtitle: String,

    /// `(point, explanation)` pairs; the explanation may be empty
    pub points: Vec<(String, String)>,
    pub paragraph: Option<String>,
}

impl Section {
    pub fn new(subtitle: impl Into<String>) -> Self {
        Self {
            subtitle: subtitle.into(),
            ..Default::default()
        }
    }

    pub fn point(mut self, point: impl Into<String>, explanation: impl Into<String>) -> Self {
        self.points.push((point.into(), explanation.into()));
        self
    }

    pub fn points<I, P, E>(mut self, points: I) -> Self
    where
        I: IntoIterator<Item = (P, E)>,
        P: Into<String>,
        E: Into<String>,
    {
        self.points
            .extend(points.into_iter().map(|(p, e)| (p.into(), e.into())));
        self
    }

    pub fn paragraph(mut self, paragraph: impl Into<String>) -> Self {
        self.paragraph = Some(paragraph.into());
        self
    }
}

/// Points longer than this print as plain text when alone in a group.
const LONG_POINT_CHARS: usize = 120;

/// Collapse `Feature:`-style prefixes and similar points into named groups.
///
/// Groups appear in the order their first point does. Points that fit no
/// group go to `General`.
pub fn group_similar_points(
    points: &[(String, String)],
) -> Vec<(&'static str, Vec<(String, String)>)> {
    const PREFIXES: &[(&str, &str)] = &[
        ("feature:", "Key Features"),
        ("hardware:", "Hardware"),
        ("software:", "Software"),
        ("equipment:", "Equipment"),
        ("key feature:", "Key Features"),
    ];
    const KEYWORD_GROUPS: &[(&[&str], &str)] = &[
        (
            &["external", "non-ugc", "ugc", "waived", "dollars/hour", "hong kong"],
            "Pricing",
        ),
        (&["area", "capacity", "square meters", "people"], "Basic Information"),
        (&["permit", "permission", "requirement"], "Requirements"),
    ];

    let mut groups: Vec<(&'static str, Vec<(String, String)>)> = Vec::new();
    let mut push = |group: &'static str, point: String, explanation: &str| {
        let entry = (point, explanation.to_string());
        match groups.iter_mut().find(|(name, _)| *name == group) {
            Some((_, items)) => items.push(entry),
            None => groups.push((group, vec![entry])),
        }
    };

    for (point, explanation) in points {
        let lower = point.to_lowercase();

        if let Some((prefix, group)) = PREFIXES.iter().find(|(p, _)| lower.starts_with(p)) {
            let rest = point.get(prefix.len()..).unwrap_or_default();
            push(*group, rest.trim().to_string(), explanation);
        } else if let Some((_, group)) = KEYWORD_GROUPS
            .iter()
            .find(|(words, _)| words.iter().any(|w| lower.contains(w)))
        {
            push(*group, point.clone(), explanation);
        } else {
            push("General", point.clone(), explanation);
        }
    }

    groups
}

/// One-line summary for a section with more than two points.
pub fn section_summary(subtitle: &str) -> String {
    let lower = subtitle.to_lowercase();
    let has = |words: &[&str]| words.iter().any(|w| lower.contains(w));

    if has(&["basic information"]) {
        "This facility provides essential space and capacity for your activities!".to_string()
    } else if has(&["key features"]) {
        "These features make this space versatile and suitable for various creative and technical projects!".to_string()
    } else if has(&["equipment"]) {
        "Professional equipment is available to support your projects and activities!".to_string()
    } else if has(&["hardware"]) {
        "High-performance hardware systems are installed to handle demanding computational tasks!".to_string()
    } else if has(&["software"]) {
        "Professional software tools are available for creative and technical work!".to_string()
    } else if has(&["pricing categories"]) {
        "We offer different rates for different user types to make our facilities accessible to everyone!".to_string()
    } else if has(&["pricing", "cost"]) {
        "Pricing varies based on user category, with different rates for different types of users!".to_string()
    } else if has(&["booking"]) {
        "The booking process involves several steps and requirements to ensure smooth facility access!".to_string()
    } else if has(&["requirements"]) {
        "These requirements help maintain facility quality and ensure fair access for all users!".to_string()
    } else if has(&["responsibilities"]) {
        "These guidelines help ensure everyone has a positive experience and facilities remain in good condition!".to_string()
    } else if has(&["facilities"]) {
        "All facilities are designed for specific activities and group sizes to meet various needs!".to_string()
    } else if has(&["contact"]) {
        "Multiple contact channels are available for questions and support!".to_string()
    } else {
        format!("This section provides important information about {}!", subtitle)
    }
}

fn push_point(out: &mut String, bullet: &str, point: &str, explanation: &str) {
    out.push_str(bullet);
    out.push_str(point);
    if !explanation.is_empty() {
        out.push_str(": ");
        out.push_str(explanation);
    }
    out.push('\n');
}

/// Render a structured reply.
///
/// Each section prints its subtitle, its grouped points, its paragraph and,
/// past two points, a summary line. The reply ends with a pointer to
/// `organisation` staff.
pub fn format_response(title: &str, sections: &[Section], organisation: &str) -> String {
    let mut out = format!("**{}**\n\n", title);

    for section in sections {
        if !section.subtitle.is_empty() {
            out.push_str(&format!("__{}__\n\n", section.subtitle));
        }

        if !section.points.is_empty() {
            for (group, items) in group_similar_points(&section.points) {
                match items.as_slice() {
                    [(point, explanation)] if point.chars().count() > LONG_POINT_CHARS => {
                        out.push_str(point);
                        if !explanation.is_empty() {
                            out.push(' ');
                            out.push_str(explanation);
                        }
                        out.push('\n');
                    }
                    _ if group == "General" => {
                        for (point, explanation) in &items {
                            push_point(&mut out, "• ", &format!("**{}**", point), explanation);
                        }
                    }
                    _ => {
                        out.push_str(&format!("**{}**\n", group));
                        for (point, explanation) in &items {
                            push_point(&mut out, "  • ", point, explanation);
                        }
                        out.push('\n');
                    }
                }
            }
            out.push('\n');
        }

        if let Some(paragraph) = &section.paragraph {
            out.push_str(paragraph);
            out.push_str("\n\n");
        }

        if section.points.len() > 2 {
            out.push_str(&format!("**Summary**: {}\n\n", section_summary(&section.subtitle)));
        }
    }

    out.push_str(&format!(
        "If you have more questions, feel free to ask!\nFor further assistance, you may contact {} staff.",
        organisation
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(p, e)| (p.to_string(), e.to_string()))
            .collect()
    }

    #[test]
    fn test_prefixes_collapse_into_groups() {
        let grouped = group_similar_points(&pts(&[
            ("Feature: Sofas", ""),
            ("Area", "120 square meters"),
            ("Key Feature: Projector", ""),
            ("Hardware: RTX 4090", ""),
            ("Opening hours", "9 to 6"),
        ]));
        let names: Vec<&str> = grouped.iter().map(|(g, _)| *g).collect();
        assert_eq!(names, vec!["Key Features", "Basic Information", "Hardware", "General"]);
        assert_eq!(grouped[0].1[1].0, "Projector");
    }

    #[test]
    fn test_pricing_keywords() {
        let grouped = group_similar_points(&pts(&[("UGC", "waived"), ("External", "$500/hr")]));
        assert_eq!(grouped.len(), 1);
        assert_eq!(grouped[0].0, "Pricing");
    }

    #[test]
    fn test_format_layout() {
        let sections = vec![Section::new("Pricing & Fees")
            .point("UGC", "waived")
            .point("External", "$500/hr")
            .paragraph("Rates vary by user category.")];
        let text = format_response("Lounge - Facility Details", &sections, "Arts Lab");

        assert!(text.starts_with(
            "**Lounge - Facility Details**\n\n__Pricing & Fees__\n\n**Pricing**\n  • UGC: waived\n  • External: $500/hr\n"
        ));
        assert!(text.contains("Rates vary by user category.\n\n"));
        assert!(!text.contains("**Summary**"));
        assert!(text.ends_with("you may contact Arts Lab staff."));
    }

    #[test]
    fn test_general_points_and_summary() {
        let sections = vec![Section::new("Contact Information").points([
            ("Phone Number", "555-0100"),
            ("Email Address", "lab@example.org"),
            ("Office", "Fourth floor"),
        ])];
        let text = format_response("Contact", &sections, "Arts Lab");
        assert!(text.contains("• **Phone Number**: 555-0100\n"));
        assert!(text.contains(
            "**Summary**: Multiple contact channels are available for questions and support!"
        ));
    }

    #[test]
    fn test_long_single_point_is_plain() {
        let long = "x".repeat(130);
        let sections = vec![Section::new("Notes").point(long.clone(), "")];
        let text = format_response("T", &sections, "Lab");
        assert!(text.contains(&format!("\n{}\n", long)));
        assert!(!text.contains("• **x"));
    }
}
