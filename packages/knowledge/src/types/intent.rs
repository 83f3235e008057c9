//! Closed set of message intents.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Classified purpose of a user message.
///
/// Declaration order matters: when two intents score the same number of
/// keyword hits, the one declared first wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Greeting,
    CompanyInfo,
    Skills,
    Eligibility,
    Package,
    Interview,
    Experience,
    Resume,
    Roadmap,
    Internship,
    PlacementDrive,
    TechStack,
    Location,
    General,
}

impl Intent {
    /// Every intent that has a keyword set, in tie-break order.
    pub const SCORED: [Intent; 13] = [
        Intent::Greeting,
        Intent::CompanyInfo,
        Intent::Skills,
        Intent::Eligibility,
        Intent::Package,
        Intent::Interview,
        Intent::Experience,
        Intent::Resume,
        Intent::Roadmap,
        Intent::Internship,
        Intent::PlacementDrive,
        Intent::TechStack,
        Intent::Location,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Greeting => "greeting",
            Intent::CompanyInfo => "company_info",
            Intent::Skills => "skills",
            Intent::Eligibility => "eligibility",
            Intent::Package => "package",
            Intent::Interview => "interview",
            Intent::Experience => "experience",
            Intent::Resume => "resume",
            Intent::Roadmap => "roadmap",
            Intent::Internship => "internship",
            Intent::PlacementDrive => "placement_drive",
            Intent::TechStack => "tech_stack",
            Intent::Location => "location",
            Intent::General => "general",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of intent classification. Transient, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntentResult {
    pub intent: Intent,
    /// Keyword coverage in `0.0..=1.0`.
    pub confidence: f32,
}

impl IntentResult {
    pub fn new(intent: Intent, confidence: f32) -> Self {
        Self {
            intent,
            confidence: confidence.clamp(0.0, 1.0),
        }
    }
}
