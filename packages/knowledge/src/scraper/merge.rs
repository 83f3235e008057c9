//! Per-source scrape outcomes and their aggregation.

use std::fmt;

use tracing::{debug, warn};

use crate::pipeline::quality::MIN_DESCRIPTION_LEN;
use crate::types::record::ScrapedFields;

/// Where a set of fields came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Source {
    Official,
    Encyclopedia,
    ReviewSite,
    InterviewSite,
    JobBoard,
}

impl Source {
    /// Secondary sources, in merge order.
    pub const SECONDARY: [Source; 3] = [Source::ReviewSite, Source::InterviewSite, Source::JobBoard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Official => "official",
            Source::Encyclopedia => "encyclopedia",
            Source::ReviewSite => "review_site",
            Source::InterviewSite => "interview_site",
            Source::JobBoard => "job_board",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What one source contributed.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceOutcome {
    Found {
        source: Source,
        fields: ScrapedFields,
    },
    Failed {
        source: Source,
        reason: String,
    },
}

impl SourceOutcome {
    pub fn found(source: Source, fields: ScrapedFields) -> Self {
        SourceOutcome::Found { source, fields }
    }

    pub fn failed(source: Source, reason: impl Into<String>) -> Self {
        SourceOutcome::Failed {
            source,
            reason: reason.into(),
        }
    }

    pub fn source(&self) -> Source {
        match self {
            SourceOutcome::Found { source, .. } | SourceOutcome::Failed { source, .. } => *source,
        }
    }

    pub fn fields(&self) -> Option<&ScrapedFields> {
        match self {
            SourceOutcome::Found { fields, .. } => Some(fields),
            SourceOutcome::Failed { .. } => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, SourceOutcome::Found { .. })
    }
}

/// Fold outcomes into one normalized record, in the order given.
///
/// Earlier sources win for text fields. An encyclopedia description
/// replaces an earlier description too short to be useful.
pub fn merge(outcomes: Vec<SourceOutcome>) -> ScrapedFields {
    let mut merged = ScrapedFields::default();

    for outcome in outcomes {
        match outcome {
            SourceOutcome::Found { source, fields } => {
                debug!(source = %source, empty = fields.is_empty(), "Merging source");
                if source == Source::Encyclopedia
                    && !fields.description.is_empty()
                    && merged.description.chars().count() < MIN_DESCRIPTION_LEN
                {
                    merged.description.clear();
                }
                merged.merge_from(fields);
            }
            SourceOutcome::Failed { source, reason } => {
                warn!(source = %source, reason = %reason, "Source contributed nothing");
            }
        }
    }

    merged.normalize();
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(f: impl FnOnce(&mut ScrapedFields)) -> ScrapedFields {
        let mut fields = ScrapedFields::default();
        f(&mut fields);
        fields
    }

    #[test]
    fn test_failed_sources_contribute_nothing() {
        let merged = merge(vec![
            SourceOutcome::failed(Source::Official, "no official website found"),
            SourceOutcome::failed(Source::ReviewSite, "HTTP 404"),
        ]);
        assert!(merged.is_empty());
    }

    #[test]
    fn test_earlier_sources_win_and_process_appends() {
        let merged = merge(vec![
            SourceOutcome::found(
                Source::Official,
                fields(|f| {
                    f.salary = "4 LPA".into();
                    f.process = "Aptitude test".into();
                    f.skills = vec!["Java".into()];
                }),
            ),
            SourceOutcome::found(
                Source::ReviewSite,
                fields(|f| {
                    f.salary = "3.6 LPA".into();
                    f.process = "Two technical rounds".into();
                }),
            ),
            SourceOutcome::found(
                Source::JobBoard,
                fields(|f| f.skills = vec!["java".into(), "AWS".into()]),
            ),
        ]);
        assert_eq!(merged.salary, "4 LPA");
        assert_eq!(merged.process, "Aptitude test\n\nTwo technical rounds");
        assert_eq!(merged.skills, vec!["Java", "AWS"]);
    }

    #[test]
    fn test_encyclopedia_replaces_short_description() {
        let long = "Meril Life Sciences is an Indian medical device company based in Vapi.";
        let merged = merge(vec![
            SourceOutcome::found(Source::Official, fields(|f| f.description = "Welcome!".into())),
            SourceOutcome::found(Source::Encyclopedia, fields(|f| f.description = long.into())),
        ]);
        assert_eq!(merged.description, long);

        let official = "Official description that is comfortably longer than fifty characters.";
        let merged = merge(vec![
            SourceOutcome::found(Source::Official, fields(|f| f.description = official.into())),
            SourceOutcome::found(Source::Encyclopedia, fields(|f| f.description = long.into())),
        ]);
        assert_eq!(merged.description, official);
    }
}
