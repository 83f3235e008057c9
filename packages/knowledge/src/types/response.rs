//! Answer payloads and chat log entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::intent::Intent;
use super::record::CompanyKnowledgeRecord;

/// Where the final answer came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseSource {
    /// Answered from a stored record or a reused chat answer
    KnowledgeBase,
    /// Answered after scraping the web
    Scraped,
    /// Answered from fixed general content, no company involved
    Ai,
    /// Pipeline failed; answer is an apology
    Error,
}

impl ResponseSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseSource::KnowledgeBase => "knowledge_base",
            ResponseSource::Scraped => "scraped",
            ResponseSource::Ai => "ai",
            ResponseSource::Error => "error",
        }
    }
}

impl fmt::Display for ResponseSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display view of a company's knowledge, as returned to API callers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeData {
    pub description: String,
    pub skills: Vec<String>,
    pub eligibility: String,
    pub process: String,
    pub salary: String,
    pub location: String,
}

impl KnowledgeData {
    /// Placeholder text for empty fields on freshly scraped data.
    ///
    /// Display only: placeholders are never persisted.
    pub fn with_placeholders(mut self, company_name: &str) -> Self {
        if self.description.is_empty() {
            self.description =
                format!("Details about {company_name} are still being collected.");
        }
        if self.eligibility.is_empty() {
            self.eligibility = "Eligibility criteria will be updated soon.".to_string();
        }
        if self.process.is_empty() {
            self.process = "Interview process details will be updated soon.".to_string();
        }
        if self.salary.is_empty() {
            self.salary = "Salary information will be updated soon.".to_string();
        }
        self
    }
}

impl From<&CompanyKnowledgeRecord> for KnowledgeData {
    fn from(record: &CompanyKnowledgeRecord) -> Self {
        Self {
            description: record.description.clone(),
            skills: record.skills.clone(),
            eligibility: record.eligibility.clone(),
            process: record.process.clone(),
            salary: record.salary.clone(),
            location: record.location.clone(),
        }
    }
}

/// Result of handling one user message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResponse {
    pub response: String,
    pub source: ResponseSource,
    pub intent: Intent,
    pub company_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<KnowledgeData>,
}

impl QueryResponse {
    pub fn new(response: impl Into<String>, source: ResponseSource, intent: Intent) -> Self {
        Self {
            response: response.into(),
            source,
            intent,
            company_name: None,
            data: None,
        }
    }

    pub fn with_company(mut self, company_name: Option<String>) -> Self {
        self.company_name = company_name;
        self
    }

    pub fn with_data(mut self, data: KnowledgeData) -> Self {
        self.data = Some(data);
        self
    }
}

/// One handled message, as written to the chat log sink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatLogEntry {
    pub user_id: String,
    pub message: String,
    pub response: String,
    pub intent: Intent,
    #[serde(default)]
    pub company_name: Option<String>,
    pub source: ResponseSource,
    pub timestamp: DateTime<Utc>,
}

impl ChatLogEntry {
    pub fn from_response(
        user_id: impl Into<String>,
        message: impl Into<String>,
        answer: &QueryResponse,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            message: message.into(),
            response: answer.response.clone(),
            intent: answer.intent,
            company_name: answer.company_name.clone(),
            source: answer.source,
            timestamp,
        }
    }
}
