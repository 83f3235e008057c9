//! Decides whether a stored record answers the current request or must be
//! refreshed by scraping.
//!
//! Evaluated per request: a record can be complete for one question and
//! incomplete for the next.

use crate::types::intent::Intent;
use crate::types::record::CompanyKnowledgeRecord;

/// Minimum interview-process length considered useful.
pub const MIN_PROCESS_LEN: usize = 50;

/// Minimum location length considered useful.
pub const MIN_LOCATION_LEN: usize = 3;

/// Which field, if any, the request needs but the record lacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingField {
    Skills,
    Process,
    Location,
}

/// Fields the request asks for that the record cannot supply.
pub fn missing_fields(
    intent: Intent,
    record: &CompanyKnowledgeRecord,
    message: &str,
) -> Vec<MissingField> {
    let lower = message.to_lowercase();
    let mut missing = Vec::new();

    let wants_skills = intent == Intent::Skills || lower.contains("skill");
    if wants_skills && record.skills.is_empty() {
        missing.push(MissingField::Skills);
    }

    let wants_process = intent == Intent::Interview || asks_about_process(&lower);
    if wants_process && record.process.chars().count() < MIN_PROCESS_LEN {
        missing.push(MissingField::Process);
    }

    let wants_location =
        intent == Intent::Location || lower.contains("where") || lower.contains("located");
    if wants_location && record.location.chars().count() < MIN_LOCATION_LEN {
        missing.push(MissingField::Location);
    }

    missing
}

/// Words that turn a mention of "interview" into a process question.
const PROCESS_WORDS: &[&str] = &["process", "hiring", "selection"];

/// Whether a lower-cased message asks how the interview or hiring process
/// works.
pub fn asks_about_process(lower: &str) -> bool {
    lower.contains("interview") && PROCESS_WORDS.iter().any(|w| lower.contains(w))
}

/// Whether the record must be refreshed before answering.
pub fn needs_refresh(intent: Intent, record: &CompanyKnowledgeRecord, message: &str) -> bool {
    !missing_fields(intent, record, message).is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skills_intent_with_empty_skills() {
        let record = CompanyKnowledgeRecord::new("Meril");
        assert!(needs_refresh(Intent::Skills, &record, ""));

        let record = record.with_skills(["Python", "Java"]);
        assert!(!needs_refresh(Intent::Skills, &record, ""));
    }

    #[test]
    fn test_message_text_overrides_intent() {
        let record = CompanyKnowledgeRecord::new("Meril");
        assert_eq!(
            missing_fields(Intent::General, &record, "Meril skill set?"),
            vec![MissingField::Skills]
        );
        assert_eq!(
            missing_fields(Intent::General, &record, "where is Meril located"),
            vec![MissingField::Location]
        );
    }

    #[test]
    fn test_short_process_needs_refresh() {
        let record = CompanyKnowledgeRecord::new("Meril").with_process("Aptitude, HR");
        assert!(needs_refresh(Intent::Interview, &record, "Meril interview"));

        let record = record.with_process(
            "Online aptitude test, two technical interviews and a final HR discussion.",
        );
        assert!(!needs_refresh(Intent::Interview, &record, "Meril interview"));
    }

    #[test]
    fn test_interview_hiring_or_selection_needs_process() {
        let record = CompanyKnowledgeRecord::new("Meril");
        for message in [
            "Meril eligibility criteria and interview selection",
            "how does interview hiring work at Meril",
            "Meril interview process",
        ] {
            assert_eq!(
                missing_fields(Intent::Eligibility, &record, message),
                vec![MissingField::Process],
                "{message}"
            );
        }
        assert!(!needs_refresh(Intent::Eligibility, &record, "Meril selection criteria"));
    }

    #[test]
    fn test_unrelated_intent_never_refreshes() {
        let record = CompanyKnowledgeRecord::new("Meril");
        assert!(!needs_refresh(Intent::Eligibility, &record, "Meril eligibility"));
    }
}
