//! Keyword-count intent classification.
//!
//! Each intent owns a set of keyword phrases. A message scores one point per
//! phrase it contains (plain substring match on the lower-cased text); the
//! best score wins, earlier intents win ties, and confidence is the share of
//! the winner's phrases that matched.

use crate::types::intent::{Intent, IntentResult};

/// Confidence reported when no keyword matched.
pub const FALLBACK_CONFIDENCE: f32 = 0.3;

const GREETING_KEYWORDS: &[&str] = &[
    "hello",
    "hi",
    "hey",
    "greetings",
    "good morning",
    "good afternoon",
];

const COMPANY_INFO_KEYWORDS: &[&str] = &[
    "company",
    "about",
    "information",
    "details",
    "what is",
    "tell me about",
];

const SKILLS_KEYWORDS: &[&str] = &[
    "skill",
    "technology",
    "tech stack",
    "programming",
    "language",
    "framework",
    "what skills",
    "required skills",
    "what skill",
    "skills needed",
    "skills required",
    "need to prepare",
    "prepare for",
    "what to learn",
    "technologies",
    "tech",
];

const ELIGIBILITY_KEYWORDS: &[&str] = &[
    "eligibility",
    "qualification",
    "requirement",
    "cgpa",
    "percentage",
    "degree",
    "education",
    "criteria",
    "requirements",
];

const PACKAGE_KEYWORDS: &[&str] = &[
    "salary",
    "package",
    "ctc",
    "lpa",
    "compensation",
    "pay",
    "stipend",
    "earnings",
];

const INTERVIEW_KEYWORDS: &[&str] = &[
    "interview",
    "round",
    "process",
    "hiring",
    "selection",
    "technical",
    "hr",
    "interview process",
    "hiring process",
    "selection process",
    "interview round",
    "interview stages",
    "how to prepare for interview",
];

const EXPERIENCE_KEYWORDS: &[&str] = &[
    "experience",
    "review",
    "feedback",
    "interview experience",
    "placement experience",
];

const RESUME_KEYWORDS: &[&str] = &[
    "resume",
    "cv",
    "curriculum vitae",
    "resume tips",
    "resume format",
];

const ROADMAP_KEYWORDS: &[&str] = &[
    "roadmap",
    "path",
    "how to prepare",
    "preparation",
    "study plan",
    "learning path",
];

const INTERNSHIP_KEYWORDS: &[&str] = &[
    "internship",
    "intern",
    "summer intern",
    "winter intern",
    "internship opportunity",
];

const PLACEMENT_DRIVE_KEYWORDS: &[&str] = &[
    "drive",
    "placement drive",
    "campus drive",
    "recruitment",
    "hiring drive",
    "upcoming",
];

const TECH_STACK_KEYWORDS: &[&str] = &[
    "tech stack",
    "technologies",
    "tools",
    "stack",
    "framework",
    "library",
];

const LOCATION_KEYWORDS: &[&str] = &[
    "location",
    "located",
    "where",
    "address",
    "headquarters",
    "office",
    "city",
    "place",
];

/// Keyword phrases for an intent. `General` has none.
pub fn keywords(intent: Intent) -> &'static [&'static str] {
    match intent {
        Intent::Greeting => GREETING_KEYWORDS,
        Intent::CompanyInfo => COMPANY_INFO_KEYWORDS,
        Intent::Skills => SKILLS_KEYWORDS,
        Intent::Eligibility => ELIGIBILITY_KEYWORDS,
        Intent::Package => PACKAGE_KEYWORDS,
        Intent::Interview => INTERVIEW_KEYWORDS,
        Intent::Experience => EXPERIENCE_KEYWORDS,
        Intent::Resume => RESUME_KEYWORDS,
        Intent::Roadmap => ROADMAP_KEYWORDS,
        Intent::Internship => INTERNSHIP_KEYWORDS,
        Intent::PlacementDrive => PLACEMENT_DRIVE_KEYWORDS,
        Intent::TechStack => TECH_STACK_KEYWORDS,
        Intent::Location => LOCATION_KEYWORDS,
        Intent::General => &[],
    }
}

/// Classify a message into one intent with a confidence score.
pub fn classify(message: &str) -> IntentResult {
    let lower = message.to_lowercase();

    let mut best: Option<(Intent, usize)> = None;
    for intent in Intent::SCORED {
        let hits = keywords(intent)
            .iter()
            .filter(|k| lower.contains(*k))
            .count();
        let better = match best {
            Some((_, top)) => hits > top,
            None => hits > 0,
        };
        if better {
            best = Some((intent, hits));
        }
    }

    match best {
        Some((intent, hits)) => {
            let total = keywords(intent).len();
            IntentResult::new(intent, (hits as f32 / total as f32).min(1.0))
        }
        None => IntentResult::new(Intent::General, FALLBACK_CONFIDENCE),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_greeting() {
        let result = classify("hello there");
        assert_eq!(result.intent, Intent::Greeting);
        assert!(result.confidence > 0.0);
    }

    #[test]
    fn test_no_keywords_is_general() {
        let result = classify("xyz nonsense blob");
        assert_eq!(result.intent, Intent::General);
        assert_eq!(result.confidence, FALLBACK_CONFIDENCE);
    }

    #[test]
    fn test_highest_count_wins() {
        // skill, what skills, what skill
        let result = classify("What skills does TCS need?");
        assert_eq!(result.intent, Intent::Skills);
        assert_eq!(result.confidence, 3.0 / SKILLS_KEYWORDS.len() as f32);
    }

    #[test]
    fn test_ties_go_to_earlier_intent() {
        // "company" (company_info) and "salary" (package) score one each.
        let result = classify("company salary");
        assert_eq!(result.intent, Intent::CompanyInfo);
    }

    #[test]
    fn test_substring_matching_is_naive() {
        // "hr" inside "three" counts for interview.
        let result = classify("three");
        assert_eq!(result.intent, Intent::Interview);
    }

    #[test]
    fn test_every_scored_intent_has_keywords() {
        for intent in Intent::SCORED {
            assert!(!keywords(intent).is_empty(), "{intent} has no keywords");
        }
        assert!(keywords(Intent::General).is_empty());
    }
}
