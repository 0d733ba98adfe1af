//! Keyword tables and the matcher shared by every classifier.
//!
//! Keywords match whole words (or whole phrases) in lowercased text, with a
//! trailing `s`/`es` tolerated so "workshop" also finds "workshops".

use crate::types::{BroadCategory, Intent, Topic};

/// Whether `keyword` occurs in `haystack` on word boundaries.
///
/// Both sides are expected to be lowercase already.
pub fn contains_keyword(haystack: &str, keyword: &str) -> bool {
    if keyword.is_empty() {
        return false;
    }

    haystack.match_indices(keyword).any(|(start, _)| {
        let starts_word = keyword.starts_with(|c: char| !c.is_alphanumeric())
            || haystack[..start]
                .chars()
                .next_back()
                .map_or(true, |c| !c.is_alphanumeric());

        let rest = &haystack[start + keyword.len()..];
        let ends_word = keyword.ends_with(|c: char| !c.is_alphanumeric())
            || at_boundary(rest)
            || rest.strip_prefix('s').is_some_and(at_boundary)
            || rest.strip_prefix("es").is_some_and(at_boundary);

        starts_word && ends_word
    })
}

fn at_boundary(rest: &str) -> bool {
    rest.chars().next().map_or(true, |c| !c.is_alphanumeric())
}

/// Number of keywords from `keywords` present in `haystack`.
pub fn count_hits(haystack: &str, keywords: &[&str]) -> usize {
    keywords
        .iter()
        .filter(|k| contains_keyword(haystack, k))
        .count()
}

/// Per-intent keyword lists. `General` has none: it only wins by default.
pub const INTENT_KEYWORDS: &[(Intent, &[&str])] = &[
    (
        Intent::Facility,
        &[
            "facility", "facilities", "room", "space", "lounge", "xr", "meeting", "research",
        ],
    ),
    (
        Intent::Pricing,
        &["price", "cost", "fee", "rental", "charge", "rate"],
    ),
    (
        Intent::Booking,
        &["book", "booking", "reserve", "reservation", "schedule", "appointment"],
    ),
    (
        Intent::Equipment,
        &["equipment", "hardware", "device", "machine", "gpu"],
    ),
    (
        Intent::Software,
        &["software", "program", "application", "tool"],
    ),
    (
        Intent::Staff,
        &["staff", "team", "dr.", "mr.", "ms.", "engineer", "coordinator", "practitioner"],
    ),
    (Intent::Internship, &["intern", "internship", "position", "job"]),
    (
        Intent::Event,
        &["event", "activity", "lecture", "workshop", "exhibition", "presentation"],
    ),
    (
        Intent::Policy,
        &["policy", "requirement", "responsibility", "rule"],
    ),
    (Intent::Tool, &["tool", "ai", "ollama", "chatgpt", "atlhpc"]),
    (Intent::General, &[]),
];

/// Topic keyword lists, in bucket matching order.
pub const TOPIC_KEYWORDS: &[(Topic, &[&str])] = &[
    (
        Topic::Facilities,
        &[
            "facility", "facilities", "space", "room", "lounge", "xr", "meeting", "research",
            "seasonal",
        ],
    ),
    (
        Topic::Pricing,
        &["price", "cost", "fee", "rental", "charge", "rate", "pricing"],
    ),
    (
        Topic::Equipment,
        &["equipment", "hardware", "device", "machine", "projector", "gpu", "workstation"],
    ),
    (
        Topic::Software,
        &["software", "program", "application", "tool", "unreal", "unity", "touchdesigner"],
    ),
    (
        Topic::Staff,
        &["staff", "team", "dr.", "mr.", "ms.", "engineer", "coordinator", "practitioner"],
    ),
    (
        Topic::Internships,
        &["intern", "internship", "position", "job", "apply"],
    ),
    (
        Topic::Events,
        &["event", "activity", "lecture", "workshop", "series", "exhibition", "presentation"],
    ),
    (
        Topic::Policies,
        &[
            "policy", "requirement", "responsibility", "neutral", "reservation", "rule",
            "guideline", "clean", "damage", "safety", "emergency",
        ],
    ),
    (
        Topic::Tools,
        &[
            "tool", "ai", "ollama", "chatgpt", "notion", "perplexity", "dall", "canva",
            "designer", "slidesgo", "slidesai", "synthesia", "natural readers", "atlhpc", "hpc",
            "gpu", "server",
        ],
    ),
];

/// Catalog-wide listing triggers, checked in this order.
///
/// Singular entity words ("facility", "event") and "price" are left out so
/// a question about one named thing reaches entity resolution.
pub const BROAD_KEYWORDS: &[(BroadCategory, &[&str])] = &[
    (
        BroadCategory::Facilities,
        &["all facilities", "facilities", "what facilities", "spaces", "rooms"],
    ),
    (
        BroadCategory::Events,
        &["all events", "events", "exhibitions", "workshops", "lectures", "activities"],
    ),
    (
        BroadCategory::Staff,
        &["all staff", "staff", "team", "members", "who are working here"],
    ),
    (
        BroadCategory::Equipment,
        &["all equipment", "equipment", "devices", "hardware", "machines"],
    ),
    (
        BroadCategory::Software,
        &["all software", "software", "programs", "applications", "tools"],
    ),
    (
        BroadCategory::Pricing,
        &["all pricing", "pricing", "cost", "fees", "rates"],
    ),
    (
        BroadCategory::Booking,
        &["booking", "book", "reserve", "reservation", "schedule", "appointment"],
    ),
    (
        BroadCategory::Internships,
        &["internship", "internships", "intern", "positions", "job opportunities"],
    ),
    (
        BroadCategory::Policies,
        &["policies", "policy", "rules", "guidelines", "requirements"],
    ),
    (
        BroadCategory::Tools,
        &[
            "ai tools", "tools", "ai", "ollama", "chatgpt", "notion", "perplexity", "dall",
            "canva", "designer", "slidesgo", "slidesai", "synthesia", "natural readers",
            "atlhpc", "hpc", "gpu", "server",
        ],
    ),
];

/// Words that make the context assembler attach the pricing overview.
pub const PRICING_CONTEXT_KEYWORDS: &[&str] = &[
    "price", "cost", "fee", "rent", "rental", "booking", "reservation",
];

pub const GREETINGS: &[&str] = &[
    "hi", "hello", "hey", "yo", "sup", "what's up", "howdy", "greetings", "good morning",
    "good afternoon", "good evening", "morning", "afternoon", "evening", "hola", "bonjour",
    "你好", "嗨", "哈囉", "早安", "午安", "晚安",
];

pub const FAREWELLS: &[&str] = &[
    "bye", "goodbye", "see you", "take care", "later", "farewell", "ciao", "adios",
    "good night", "goodbye for now", "catch you later", "peace out",
];

pub const APPRECIATIONS: &[&str] = &[
    "thank you", "thanks", "appreciate", "grateful", "cheers", "much appreciated",
    "thanks a lot", "thank you so much", "thank you very much", "many thanks",
];

pub const CONTACT_PHRASES: &[&str] = &[
    "contact", "how do i contact", "how can i contact", "how do i reach", "how can i reach",
    "reach staff", "contact staff", "contact you", "contact info", "contact information",
    "email", "phone", "call", "reach you", "get in touch", "how do i get in touch",
    "how can i get in touch", "who can i contact", "ways to contact", "how to contact",
];
