//! Quality gate for scraped records.
//!
//! Rejected records are never persisted, but the caller may still answer
//! from them.

use crate::types::record::ScrapedFields;

/// Minimum description length worth storing.
pub const MIN_DESCRIPTION_LEN: usize = 50;

/// Phrases that mark a templated, contentless description.
const PLACEHOLDER_PHRASES: &[&str] = &[
    "is a company",
    "detailed information is being gathered",
    "information is being gathered",
];

/// Why a record was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    MissingDescription,
    DescriptionTooShort { len: usize },
    Placeholder { phrase: &'static str },
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rejection::MissingDescription => write!(f, "no description"),
            Rejection::DescriptionTooShort { len } => {
                write!(f, "description too short ({len} chars)")
            }
            Rejection::Placeholder { phrase } => write!(f, "placeholder phrase \"{phrase}\""),
        }
    }
}

/// Check a description, returning why it is unacceptable.
pub fn check_description(description: &str) -> Result<(), Rejection> {
    let description = description.trim();
    if description.is_empty() {
        return Err(Rejection::MissingDescription);
    }

    let len = description.chars().count();
    if len < MIN_DESCRIPTION_LEN {
        return Err(Rejection::DescriptionTooShort { len });
    }

    let lower = description.to_lowercase();
    match PLACEHOLDER_PHRASES.iter().find(|p| lower.contains(*p)) {
        Some(phrase) => Err(Rejection::Placeholder { phrase: *phrase }),
        None => Ok(()),
    }
}

/// Whether scraped fields may be persisted.
pub fn acceptable(fields: &ScrapedFields) -> bool {
    check_description(&fields.description).is_ok()
}
