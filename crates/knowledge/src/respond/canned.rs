//! Canned replies: non-text input and fixed conversational phrases.

use super::format::{format_response, Section};
use crate::catalog::Catalog;
use crate::keywords::{APPRECIATIONS, CONTACT_PHRASES, FAREWELLS, GREETINGS};
use rand::seq::SliceRandom;

/// Empty input, or input with no letters at all (digits, punctuation,
/// symbols).
pub fn is_non_text(input: &str) -> bool {
    !input.chars().any(char::is_alphabetic)
}

/// Lowercase, trim and drop trailing `?`, `!` and `.`.
pub fn normalize_phrase(input: &str) -> String {
    input
        .trim()
        .to_lowercase()
        .trim_end_matches(['?', '!', '.'])
        .trim_end()
        .to_string()
}

/// A fixed conversational phrase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixedPhrase {
    Greeting,
    Farewell,
    Appreciation,
    Contact,
}

impl FixedPhrase {
    /// Match only when the whole normalised message is a listed phrase.
    pub fn detect(message: &str) -> Option<Self> {
        let phrase = normalize_phrase(message);
        let is = |list: &[&str]| list.iter().any(|p| *p == phrase);

        if is(GREETINGS) {
            Some(Self::Greeting)
        } else if is(FAREWELLS) {
            Some(Self::Farewell)
        } else if is(APPRECIATIONS) {
            Some(Self::Appreciation)
        } else if is(CONTACT_PHRASES) {
            Some(Self::Contact)
        } else {
            None
        }
    }
}

fn pick(pool: &[String]) -> String {
    pool.choose(&mut rand::thread_rng())
        .cloned()
        .unwrap_or_default()
}

/// Friendly request to rephrase in words.
pub fn non_text_reply(organisation: &str) -> String {
    pick(&[
        "I see you've entered some numbers or symbols! Could you please type a question or message in words? I'd love to help you with information about facilities, booking, equipment, or anything else!".to_string(),
        format!("Oops! It looks like you might have typed numbers or symbols by accident! Could you please write your question in words? I'm here to help with all things {}!", organisation),
        "I'm not sure I understand that input! Could you please type your question using words? For example, you could ask about 'facilities', 'booking', 'pricing', or 'equipment'!".to_string(),
        format!("That looks like numbers or symbols to me! Could you please rephrase your question using words? I'm excited to help you learn about {}!", organisation),
        format!("I'd love to help you, but I need a text message! Could you please type your question in words? You can ask about anything related to {}!", organisation),
    ])
}

/// Reply for a detected fixed phrase.
pub fn fixed_phrase_reply(phrase: FixedPhrase, catalog: &Catalog) -> String {
    let org = catalog.display_name();
    match phrase {
        FixedPhrase::Greeting => pick(&[
            format!("Hey there! How can I help you with {} today?", org),
            format!("Hi! What would you like to know about {}?", org),
            format!("Hello! Ready to explore the facilities at {}?", org),
            format!("Hey! What's on your mind about {}?", org),
            format!("Hi there! How can I assist you with {} info?", org),
        ]),
        FixedPhrase::Farewell => pick(&[
            "Goodbye! Have a great day!".to_string(),
            "See you later! Take care!".to_string(),
            "Farewell! Hope to chat again soon!".to_string(),
            format!("Bye for now! Enjoy your time at {}!", org),
            "Catch you later! Stay creative!".to_string(),
        ]),
        FixedPhrase::Appreciation => pick(&[
            "You're welcome! I'm glad I could help!".to_string(),
            format!("No problem! Happy to assist you with {} info!", org),
            "Anytime! If you have more questions, just ask!".to_string(),
            "Glad to help! If you need anything else, let me know!".to_string(),
            "You're very welcome! Keep being creative and curious!".to_string(),
        ]),
        FixedPhrase::Contact => contact_card(catalog),
    }
}

/// Contact details from the catalog, phone and email first.
///
/// A catalog without a contact section gets a pointer to the staff rather
/// than made-up details.
pub fn contact_card(catalog: &Catalog) -> String {
    let org = catalog.display_name();
    let contact = catalog.contact();

    if contact.is_empty() {
        let section = Section::new("Contact Information").paragraph(format!(
            "I don't have contact details on file. Please ask {} staff in person or check the official website.",
            org
        ));
        return format_response(&format!("{} Contact Information", org), &[section], org);
    }

    let rank = |key: &str| {
        let lower = key.to_lowercase();
        if lower.contains("phone") {
            0
        } else if lower.contains("email") {
            1
        } else {
            2
        }
    };
    let mut entries: Vec<&(String, String)> = contact.iter().collect();
    entries.sort_by_key(|(key, _)| rank(key));

    let section = entries
        .into_iter()
        .fold(Section::new("Contact Information"), |section, (key, value)| {
            let label = match rank(key) {
                0 => "Phone Number".to_string(),
                1 => "Email Address".to_string(),
                _ => key.clone(),
            };
            section.point(label, value.clone())
        })
        .paragraph(format!(
            "Feel free to reach out to us for any questions about {} facilities, booking, or services!",
            org
        ));
    format_response(&format!("{} Contact Information", org), &[section], org)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_text_detection() {
        assert!(is_non_text("12345"));
        assert!(is_non_text("???"));
        assert!(is_non_text("42!? #"));
        assert!(is_non_text("   "));
        assert!(!is_non_text("room101"));
        assert!(!is_non_text("x"));
    }

    #[test]
    fn test_fixed_phrases_exact_only() {
        assert_eq!(FixedPhrase::detect("Hello!"), Some(FixedPhrase::Greeting));
        assert_eq!(FixedPhrase::detect("  Thanks a lot. "), Some(FixedPhrase::Appreciation));
        assert_eq!(FixedPhrase::detect("bye"), Some(FixedPhrase::Farewell));
        assert_eq!(FixedPhrase::detect("Contact?"), Some(FixedPhrase::Contact));
        assert_eq!(FixedPhrase::detect("hello, what rooms do you have"), None);
        assert_eq!(FixedPhrase::detect("what is your email address"), None);
    }

    #[test]
    fn test_contact_card_without_contact_section() {
        let card = contact_card(&Catalog::default());
        assert!(card.starts_with("**the lab Contact Information**"));
        assert!(card.contains("I don't have contact details on file."));
        assert!(!card.contains("Phone Number"));
        assert!(!card.contains('@'));
    }

    #[test]
    fn test_contact_card_orders_phone_then_email() {
        let source = r#"{"Lab": {"Contact": {
            "Address": "1 Main St", "Email": "hello@example.org", "Phone": "555-0100"
        }}}"#;
        let catalog = Catalog::parse(source, &crate::catalog::CatalogKeys::default());
        let card = contact_card(&catalog);
        let phone = card.find("• **Phone Number**: 555-0100").unwrap();
        let email = card.find("• **Email Address**: hello@example.org").unwrap();
        let address = card.find("• **Address**: 1 Main St").unwrap();
        assert!(phone < email && email < address);
    }

    #[test]
    fn test_pools_use_organisation() {
        let reply = non_text_reply("Arts Lab");
        assert!(reply.contains("words"));
    }
}
