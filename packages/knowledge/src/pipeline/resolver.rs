//! Company name resolution.
//!
//! Strategies run in a fixed order and the first one that produces a name
//! wins:
//!
//! 1. [`Strategy::Exact`] - the whole normalized message is a known name
//! 2. [`Strategy::Registry`] - fuzzy match against registered companies
//! 3. [`Strategy::KnowledgeBase`] - fuzzy match against stored knowledge
//! 4. [`Strategy::Capitalized`] - first run of capitalized words
//! 5. [`Strategy::Pattern`] - templates such as "tell me about X"
//! 6. [`Strategy::ShortMessage`] - the first words of a short message
//!
//! Each strategy is a standalone function so it can be tested alone.

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;

use super::similarity::{similarity, SHORT_NAME_LEN};

/// Score a fuzzy candidate must beat.
const FUZZY_MIN_SCORE: f32 = 0.7;

/// Score a candidate must beat when either side is a short name.
const SHORT_MIN_SCORE: f32 = 0.9;

/// Share of a candidate's words that must appear in the message.
const WORD_MATCH_RATIO: f32 = 0.8;

/// Words never taken as a company name.
const STOP_WORDS: &[&str] = &[
    "what",
    "is",
    "the",
    "a",
    "an",
    "about",
    "tell",
    "me",
    "give",
    "show",
    "how",
    "does",
    "do",
    "can",
    "you",
    "i",
    "want",
    "to",
    "know",
    "need",
    "required",
    "skills",
    "eligibility",
    "process",
    "interview",
    "salary",
    "package",
    "company",
    "info",
    "information",
    "details",
];

/// One or more capitalized words; acronyms such as "TCS" count.
const CAPITALIZED: &str = r"[A-Z][A-Za-z0-9&]*(?:\s+[A-Z][A-Za-z0-9&]*)*";

lazy_static! {
    static ref NON_WORD: Regex = Regex::new(r"[^\w\s]").unwrap();

    static ref CAPITALIZED_RUN: Regex =
        Regex::new(&format!(r"\b{CAPITALIZED}\b")).unwrap();

    /// Lead phrases match in any case; the captured name must be capitalized.
    static ref NAME_PATTERNS: Vec<Regex> = [
        format!(r"(?i:what\s+is)\s+({CAPITALIZED})"),
        format!(r"(?i:tell\s+me\s+about)\s+({CAPITALIZED})"),
        format!(r"(?i:about)\s+({CAPITALIZED})"),
        format!(r"({CAPITALIZED})\s+(?i:company)"),
        format!(r"({CAPITALIZED})\s+(?i:skills)"),
        format!(r"({CAPITALIZED})\s+(?i:eligibility)"),
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect();

    static ref STOP_SET: HashSet<&'static str> = STOP_WORDS.iter().copied().collect();
}

/// Which strategy produced a name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Exact,
    Registry,
    KnowledgeBase,
    Capitalized,
    Pattern,
    ShortMessage,
}

impl Strategy {
    /// Whether the name came from a known-company list rather than text
    /// heuristics.
    pub fn is_known(&self) -> bool {
        matches!(
            self,
            Strategy::Exact | Strategy::Registry | Strategy::KnowledgeBase
        )
    }
}

/// A resolved company name and how it was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub name: String,
    pub strategy: Strategy,
}

impl Resolution {
    fn new(name: impl Into<String>, strategy: Strategy) -> Self {
        Self {
            name: name.into(),
            strategy,
        }
    }
}

/// Lower-case, turn punctuation into spaces and collapse whitespace.
pub fn normalize_message(message: &str) -> String {
    NON_WORD
        .replace_all(&message.to_lowercase(), " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Whether a lower-cased word or phrase is a stop word.
pub fn is_stop_word(word: &str) -> bool {
    STOP_SET.contains(word)
}

/// Resolve a company name from a message.
///
/// `registry` holds business-registered company names and `knowledge_base`
/// the names of stored knowledge records, each in store iteration order.
pub fn resolve(message: &str, registry: &[String], knowledge_base: &[String]) -> Option<Resolution> {
    let normalized = normalize_message(message);
    let filtered = filtered_words(&normalized);
    if filtered.is_empty() {
        return None;
    }

    if let Some(name) = exact_match(&normalized, registry.iter().chain(knowledge_base)) {
        return Some(Resolution::new(name, Strategy::Exact));
    }
    if let Some(name) = fuzzy_match(&normalized, registry) {
        return Some(Resolution::new(name, Strategy::Registry));
    }
    if let Some(name) = fuzzy_match(&normalized, knowledge_base) {
        return Some(Resolution::new(name, Strategy::KnowledgeBase));
    }
    if let Some(name) = capitalized_phrase(message) {
        return Some(Resolution::new(name, Strategy::Capitalized));
    }
    if let Some(name) = pattern_match(message) {
        return Some(Resolution::new(name, Strategy::Pattern));
    }
    short_message(message).map(|name| Resolution::new(name, Strategy::ShortMessage))
}

/// [`resolve`] without the strategy.
pub fn extract(message: &str, registry: &[String], knowledge_base: &[String]) -> Option<String> {
    resolve(message, registry, knowledge_base).map(|r| r.name)
}

/// Words of a normalized message that are not stop words and are longer
/// than two characters.
pub fn filtered_words(normalized: &str) -> Vec<&str> {
    normalized
        .split_whitespace()
        .filter(|w| !is_stop_word(w) && w.chars().count() > 2)
        .collect()
}

/// A known name equal to the whole normalized message.
pub fn exact_match<'a>(
    normalized: &str,
    names: impl IntoIterator<Item = &'a String>,
) -> Option<String> {
    names
        .into_iter()
        .find(|name| !name.trim().is_empty() && name.trim().to_lowercase() == normalized)
        .map(|name| name.trim().to_string())
}

/// Best fuzzy candidate from one registry.
///
/// Short names need a near-exact score. Longer names need most of their
/// words present in the message and a good overall score. The first
/// candidate with the highest score wins.
pub fn fuzzy_match(normalized: &str, names: &[String]) -> Option<String> {
    let message_words: HashSet<&str> = normalized.split_whitespace().collect();
    let message_len = normalized.chars().count();

    let mut best: Option<(&str, f32)> = None;
    for name in names {
        let candidate = name.trim().to_lowercase();
        if candidate.is_empty() {
            continue;
        }

        let score = if candidate.chars().count() <= SHORT_NAME_LEN || message_len <= SHORT_NAME_LEN
        {
            let score = similarity(&candidate, normalized);
            if score <= SHORT_MIN_SCORE {
                continue;
            }
            score
        } else {
            let words: Vec<&str> = candidate.split_whitespace().collect();
            let matched = words
                .iter()
                .filter(|w| w.chars().count() > 2 && message_words.contains(*w))
                .count();
            if (matched as f32 / words.len() as f32) < WORD_MATCH_RATIO {
                continue;
            }
            let score = similarity(&candidate, normalized);
            if score <= FUZZY_MIN_SCORE {
                continue;
            }
            score
        };

        if best.map_or(true, |(_, top)| score > top) {
            best = Some((name.trim(), score));
        }
    }

    best.filter(|(_, score)| *score > FUZZY_MIN_SCORE)
        .map(|(name, _)| name.to_string())
}

/// First maximal run of capitalized words, unless it is a stop word or too
/// short.
pub fn capitalized_phrase(message: &str) -> Option<String> {
    CAPITALIZED_RUN
        .find(message)
        .map(|m| m.as_str().trim().to_string())
        .filter(|name| acceptable_name(name))
}

/// First template capture that passes the stop-word and length filter.
pub fn pattern_match(message: &str) -> Option<String> {
    NAME_PATTERNS.iter().find_map(|pattern| {
        pattern
            .captures(message)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string())
            .filter(|name| acceptable_name(name))
    })
}

/// The first two remaining words of a short message, title-cased.
///
/// Only applies when at most three words survive stop-word filtering.
/// Words typed in all capitals are kept as written.
pub fn short_message(message: &str) -> Option<String> {
    let cleaned = NON_WORD.replace_all(message, " ");
    let words: Vec<&str> = cleaned
        .split_whitespace()
        .filter(|w| !is_stop_word(&w.to_lowercase()) && w.chars().count() > 2)
        .collect();
    if words.is_empty() || words.len() > 3 {
        return None;
    }

    let name = words
        .iter()
        .take(2)
        .map(|w| title_case(w))
        .collect::<Vec<_>>()
        .join(" ");
    (name.chars().count() > 2).then_some(name)
}

fn title_case(word: &str) -> String {
    let is_acronym = word.chars().any(char::is_alphabetic)
        && word.chars().all(|c| !c.is_alphabetic() || c.is_uppercase());
    if is_acronym {
        return word.to_string();
    }

    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

fn acceptable_name(name: &str) -> bool {
    !is_stop_word(&name.to_lowercase()) && name.chars().count() > 2
}
