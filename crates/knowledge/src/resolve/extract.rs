//! Pattern-based extraction of entity phrases and staff names from text.

use crate::types::StaffMember;
use once_cell::sync::Lazy;
use regex::Regex;
use std::ops::Range;

/// Question templates, tried in order; group 1 is the entity phrase.
static ENTITY_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"what is (.+)",
        r"tell me about (.+)",
        r"describe (.+)",
        r"give me information about (.+)",
        r"can you explain (.+)",
        r"(.+) information",
    ]
    .iter()
    .filter_map(|p| Regex::new(p).ok())
    .collect()
});

/// `Dr Kal Ng (Director)`, `Ms. Jo Lee Lab Manager (Technical)`
static PARENTHESISED_STAFF: Lazy<Option<Regex>> = Lazy::new(|| {
    Regex::new(r"\b(Dr|Mr|Ms)\.?\s*([A-Z][a-z]+(?:[ \t]+[A-Z][a-z]+)*)\s*\(([^)]+)\)").ok()
});

static TOKEN: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"\S+").ok());

/// Pull the entity phrase out of a templated question, lowercased, with
/// trailing `?`, `.` and `!` removed.
///
/// ```
/// use concierge_knowledge::resolve::extract_entity_phrase;
/// assert_eq!(extract_entity_phrase("Tell me about the XR Space?").as_deref(), Some("the xr space"));
/// assert_eq!(extract_entity_phrase("opening hours"), None);
/// ```
pub fn extract_entity_phrase(question: &str) -> Option<String> {
    let lower = question.to_lowercase();
    ENTITY_PATTERNS.iter().find_map(|pattern| {
        let captured = pattern.captures(&lower)?.get(1)?.as_str();
        let phrase = captured
            .trim()
            .trim_end_matches(['?', '.', '!'])
            .trim_end();
        if phrase.is_empty() {
            None
        } else {
            Some(phrase.to_string())
        }
    })
}

/// Find `Title Name Role` mentions of staff in free text.
///
/// Two shapes are recognised: the role in parentheses after the name, and
/// the role written straight after a two-word name up to the next title or
/// the end of the line. A mention found by the first shape is never
/// reported again by the second. Results are in text order; names are
/// rendered as `Dr. Given Family`.
pub fn extract_staff_names(text: &str) -> Vec<StaffMember> {
    let mut found: Vec<(usize, Range<usize>, StaffMember)> = Vec::new();

    if let Some(pattern) = PARENTHESISED_STAFF.as_ref() {
        for caps in pattern.captures_iter(text) {
            let (Some(whole), Some(title), Some(name), Some(role)) =
                (caps.get(0), caps.get(1), caps.get(2), caps.get(3))
            else {
                continue;
            };

            let tokens: Vec<&str> = name.as_str().split_whitespace().collect();
            let split = tokens.len().min(2);
            let mut role_parts: Vec<&str> = tokens[split..].to_vec();
            role_parts.push(role.as_str().trim());

            found.push((
                whole.start(),
                whole.range(),
                StaffMember {
                    name: format!("{}. {}", title.as_str(), tokens[..split].join(" ")),
                    title: role_parts.join(" "),
                },
            ));
        }
    }

    for (range, member) in unparenthesised_mentions(text) {
        let overlaps = found
            .iter()
            .any(|(_, taken, _)| range.start < taken.end && taken.start < range.end);
        if !overlaps {
            found.push((range.start, range, member));
        }
    }

    found.sort_by_key(|(start, _, _)| *start);
    found.into_iter().map(|(_, _, member)| member).collect()
}

fn title_token(token: &str) -> Option<&str> {
    match token.trim_end_matches('.') {
        t @ ("Dr" | "Mr" | "Ms") => Some(t),
        _ => None,
    }
}

fn capitalised(token: &str) -> bool {
    let mut chars = token.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_uppercase())
        && chars.clone().next().is_some()
        && chars.all(|c| c.is_ascii_lowercase())
}

/// `Dr Kal Ng Professional Practitioner` style mentions, scanned per line.
fn unparenthesised_mentions(text: &str) -> Vec<(Range<usize>, StaffMember)> {
    let Some(token_pattern) = TOKEN.as_ref() else {
        return vec![];
    };

    let mut mentions = Vec::new();
    let mut line_start = 0;

    for line in text.split('\n') {
        let tokens: Vec<(Range<usize>, &str)> = token_pattern
            .find_iter(line)
            .map(|m| (m.start() + line_start..m.end() + line_start, m.as_str()))
            .collect();

        let mut i = 0;
        while i < tokens.len() {
            let Some(title) = title_token(tokens[i].1) else {
                i += 1;
                continue;
            };

            let mut end = i + 1;
            while end < tokens.len()
                && capitalised(tokens[end].1)
                && title_token(tokens[end].1).is_none()
            {
                end += 1;
            }

            // The run must stop at a title or the end of the line
            let terminated = end == tokens.len() || title_token(tokens[end].1).is_some();
            let words: Vec<&str> = tokens[i + 1..end].iter().map(|(_, t)| *t).collect();

            if terminated && words.len() >= 3 {
                mentions.push((
                    tokens[i].0.start..tokens[end - 1].0.end,
                    StaffMember {
                        name: format!("{}. {}", title, words[..2].join(" ")),
                        title: words[2..].join(" "),
                    },
                ));
            }

            i = end.max(i + 1);
        }

        line_start += line.len() + 1;
    }

    mentions
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_templates() {
        assert_eq!(
            extract_entity_phrase("What is the Black Box Studio?!").as_deref(),
            Some("the black box studio")
        );
        assert_eq!(
            extract_entity_phrase("Lounge information").as_deref(),
            Some("lounge")
        );
        assert_eq!(
            extract_entity_phrase("can you explain motion capture.").as_deref(),
            Some("motion capture")
        );
        assert_eq!(extract_entity_phrase("what is ?"), None);
    }

    #[test]
    fn test_parenthesised_staff() {
        let staff = extract_staff_names("Contact Dr. Kal Ng (Director) for details.");
        assert_eq!(staff.len(), 1);
        assert_eq!(staff[0].display(), "Dr. Kal Ng (Director)");
    }

    #[test]
    fn test_role_spilled_before_parentheses() {
        let staff = extract_staff_names("Dr Kal Ng Professional (Practitioner)");
        assert_eq!(staff.len(), 1);
        assert_eq!(staff[0].name, "Dr. Kal Ng");
        assert_eq!(staff[0].title, "Professional Practitioner");
    }

    #[test]
    fn test_role_without_parentheses() {
        let staff =
            extract_staff_names("Team: Dr Kal Ng Professional Practitioner Ms Jo Lee Lab Manager");
        let names: Vec<String> = staff.iter().map(StaffMember::display).collect();
        assert_eq!(
            names,
            vec![
                "Dr. Kal Ng (Professional Practitioner)",
                "Ms. Jo Lee (Lab Manager)"
            ]
        );
    }

    #[test]
    fn test_no_double_count_across_shapes() {
        let text = "Dr. Kal Ng (Director)\nMr Sam Wu Technical Officer";
        let staff = extract_staff_names(text);
        assert_eq!(staff.len(), 2);
        assert_eq!(staff[0].title, "Director");
        assert_eq!(staff[1].display(), "Mr. Sam Wu (Technical Officer)");
    }

    #[test]
    fn test_run_followed_by_prose_is_ignored() {
        assert!(extract_staff_names("Dr Kal Ng Director and others").is_empty());
    }
}
