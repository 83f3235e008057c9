//! Company knowledge records and the scraped working set that feeds them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum slug length used as a storage key.
pub const MAX_SLUG_LEN: usize = 50;

/// Maximum number of skills kept on a record.
pub const MAX_SKILLS: usize = 20;

/// Per-field character caps applied after merging.
pub const MAX_DESCRIPTION_LEN: usize = 500;
pub const MAX_PROCESS_LEN: usize = 1000;
pub const MAX_ELIGIBILITY_LEN: usize = 300;
pub const MAX_SALARY_LEN: usize = 200;
pub const MAX_LOCATION_LEN: usize = 200;

/// Normalize a company display name into an ID-safe storage key.
///
/// Lower-cases, replaces anything outside `[a-z0-9_-]` with `_` and caps the
/// result at [`MAX_SLUG_LEN`] characters.
pub fn slugify(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .take(MAX_SLUG_LEN)
        .collect()
}

/// Truncate to at most `max` characters, respecting char boundaries.
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

/// Deduplicate skills case-insensitively, keeping the first spelling seen.
pub fn dedup_skills(skills: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    skills
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .filter(|s| seen.insert(s.to_lowercase()))
        .collect()
}

/// Where a knowledge record came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    #[default]
    Scraped,
    #[serde(other)]
    Other,
}

/// Persisted structured facts about one company.
///
/// Text fields use the empty string for "unknown"; the store never holds
/// `null` for them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyKnowledgeRecord {
    pub company_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub eligibility: String,
    #[serde(default)]
    pub process: String,
    #[serde(default)]
    pub salary: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub source_url: String,
    #[serde(default)]
    pub collected_from: Provenance,
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
}

impl CompanyKnowledgeRecord {
    pub fn new(company_name: impl Into<String>) -> Self {
        Self {
            company_name: company_name.into(),
            ..Default::default()
        }
    }

    /// Storage key for this record.
    pub fn slug(&self) -> String {
        slugify(&self.company_name)
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_skills(mut self, skills: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.skills = dedup_skills(skills.into_iter().map(Into::into));
        self
    }

    pub fn with_eligibility(mut self, eligibility: impl Into<String>) -> Self {
        self.eligibility = eligibility.into();
        self
    }

    pub fn with_process(mut self, process: impl Into<String>) -> Self {
        self.process = process.into();
        self
    }

    pub fn with_salary(mut self, salary: impl Into<String>) -> Self {
        self.salary = salary.into();
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    /// Build a fresh scraped record from a working set.
    pub fn from_scraped(
        company_name: impl Into<String>,
        fields: &ScrapedFields,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            company_name: company_name.into(),
            description: fields.description.clone(),
            skills: fields.skills.clone(),
            eligibility: fields.eligibility.clone(),
            process: fields.process.clone(),
            salary: fields.salary.clone(),
            location: fields.location.clone(),
            source_url: fields.source_url.clone(),
            collected_from: Provenance::Scraped,
            last_updated: Some(now),
        }
    }

    /// Copy of this record with every non-empty scraped field laid over it.
    pub fn overlaid_with(&self, fields: &ScrapedFields) -> Self {
        fn pick(new: &str, old: &str) -> String {
            let chosen = if new.is_empty() { old } else { new };
            chosen.to_string()
        }

        Self {
            company_name: self.company_name.clone(),
            description: pick(&fields.description, &self.description),
            skills: if fields.skills.is_empty() {
                self.skills.clone()
            } else {
                fields.skills.clone()
            },
            eligibility: pick(&fields.eligibility, &self.eligibility),
            process: pick(&fields.process, &self.process),
            salary: pick(&fields.salary, &self.salary),
            location: pick(&fields.location, &self.location),
            source_url: pick(&fields.source_url, &self.source_url),
            collected_from: self.collected_from,
            last_updated: self.last_updated,
        }
    }
}

/// Transient working record built up while scraping.
///
/// Sources are merged into it one by one; it is only flushed to the store
/// after the quality gate accepts it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScrapedFields {
    pub description: String,
    pub skills: Vec<String>,
    pub eligibility: String,
    pub process: String,
    pub salary: String,
    pub location: String,
    pub source_url: String,
}

impl ScrapedFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no source contributed anything.
    pub fn is_empty(&self) -> bool {
        self.description.is_empty()
            && self.skills.is_empty()
            && self.eligibility.is_empty()
            && self.process.is_empty()
            && self.salary.is_empty()
            && self.location.is_empty()
    }

    /// Merge a later source into this one.
    ///
    /// Text fields are only filled when still empty. Process text is appended
    /// after a blank line when both sides have content. Skills are unioned.
    pub fn merge_from(&mut self, other: ScrapedFields) {
        fn fill(slot: &mut String, value: String) {
            if slot.is_empty() && !value.is_empty() {
                *slot = value;
            }
        }

        fill(&mut self.description, other.description);
        fill(&mut self.eligibility, other.eligibility);
        fill(&mut self.salary, other.salary);
        fill(&mut self.location, other.location);
        fill(&mut self.source_url, other.source_url);

        if !other.process.is_empty() {
            if self.process.is_empty() {
                self.process = other.process;
            } else {
                self.process.push_str("\n\n");
                self.process.push_str(&other.process);
            }
        }

        if !other.skills.is_empty() {
            let combined = std::mem::take(&mut self.skills)
                .into_iter()
                .chain(other.skills);
            self.skills = dedup_skills(combined);
        }
    }

    /// Apply skill dedup/cap and per-field length caps.
    pub fn normalize(&mut self) {
        let mut skills = dedup_skills(std::mem::take(&mut self.skills));
        skills.truncate(MAX_SKILLS);
        self.skills = skills;

        self.description = truncate_chars(self.description.trim(), MAX_DESCRIPTION_LEN);
        self.process = truncate_chars(self.process.trim(), MAX_PROCESS_LEN);
        self.eligibility = truncate_chars(self.eligibility.trim(), MAX_ELIGIBILITY_LEN);
        self.salary = truncate_chars(self.salary.trim(), MAX_SALARY_LEN);
        self.location = truncate_chars(self.location.trim(), MAX_LOCATION_LEN);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Tata Consultancy Services"), "tata_consultancy_services");
        assert_eq!(slugify("AT&T Inc."), "at_t_inc_");
        assert_eq!(slugify("  Meril  "), "meril");
        assert_eq!(slugify(&"x".repeat(80)).len(), MAX_SLUG_LEN);
    }

    #[test]
    fn test_truncate_chars_respects_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("abc", 10), "abc");
    }

    #[test]
    fn test_merge_fills_only_empty_fields() {
        let mut base = ScrapedFields {
            description: "Official description".into(),
            salary: String::new(),
            ..Default::default()
        };
        base.merge_from(ScrapedFields {
            description: "Review site description".into(),
            salary: "6 LPA".into(),
            ..Default::default()
        });

        assert_eq!(base.description, "Official description");
        assert_eq!(base.salary, "6 LPA");
    }

    #[test]
    fn test_merge_appends_process_text() {
        let mut base = ScrapedFields {
            process: "Aptitude test".into(),
            ..Default::default()
        };
        base.merge_from(ScrapedFields {
            process: "Two technical rounds".into(),
            ..Default::default()
        });

        assert_eq!(base.process, "Aptitude test\n\nTwo technical rounds");
    }

    #[test]
    fn test_merge_unions_skills() {
        let mut base = ScrapedFields {
            skills: vec!["Python".into(), "Java".into()],
            ..Default::default()
        };
        base.merge_from(ScrapedFields {
            skills: vec!["java".into(), "Sql".into()],
            ..Default::default()
        });

        assert_eq!(base.skills, vec!["Python", "Java", "Sql"]);
    }

    #[test]
    fn test_normalize_caps_fields() {
        let mut fields = ScrapedFields {
            description: "d".repeat(900),
            process: "p".repeat(1500),
            eligibility: "e".repeat(400),
            salary: "s".repeat(300),
            location: "l".repeat(300),
            skills: (0..30).map(|i| format!("Skill{i}")).collect(),
            ..Default::default()
        };
        fields.normalize();

        assert_eq!(fields.description.len(), 500);
        assert_eq!(fields.process.len(), 1000);
        assert_eq!(fields.eligibility.len(), 300);
        assert_eq!(fields.salary.len(), 200);
        assert_eq!(fields.location.len(), 200);
        assert_eq!(fields.skills.len(), 20);
    }

    #[test]
    fn test_overlay_keeps_existing_when_scrape_is_empty() {
        let stored = CompanyKnowledgeRecord::new("Meril")
            .with_description("Medical devices maker")
            .with_location("Vapi, Gujarat");
        let scraped = ScrapedFields {
            skills: vec!["Python".into()],
            ..Default::default()
        };

        let merged = stored.overlaid_with(&scraped);
        assert_eq!(merged.description, "Medical devices maker");
        assert_eq!(merged.location, "Vapi, Gujarat");
        assert_eq!(merged.skills, vec!["Python"]);
    }

    #[test]
    fn test_unknown_provenance_deserializes_as_other() {
        let record: CompanyKnowledgeRecord =
            serde_json::from_str(r#"{"companyName":"Meril","collectedFrom":"admin"}"#).unwrap();
        assert_eq!(record.collected_from, Provenance::Other);
        assert!(record.skills.is_empty());
    }
}
