//! Per-message entry point of the knowledge pipeline.
//!
//! ```text
//! classify + resolve ─▶ similar past answer? ─▶ stored record complete?
//!                                                  │ yes ─▶ render (knowledge_base)
//!                                                  │ no  ─▶ scrape ─▶ gate ─▶ store ─▶ render (scraped)
//! no company ─▶ content search (knowledge_base) or general answer (ai)
//! ```

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error, info, warn};

use super::resolver::{self, Resolution};
use super::{completeness, intent, render};
use crate::collections::{ChatLogStore, CompanyRegistry, KnowledgeStore};
use crate::error::{KnowledgeError, Result, StoreResult};
use crate::scraper::MultiSourceScraper;
use crate::traits::store::DocumentStore;
use crate::types::config::PipelineConfig;
use crate::types::intent::{Intent, IntentResult};
use crate::types::record::CompanyKnowledgeRecord;
use crate::types::response::{ChatLogEntry, KnowledgeData, QueryResponse, ResponseSource};

/// Answer given when the pipeline fails.
pub const APOLOGY: &str = "I apologize, but I ran into a problem while looking that up. \
                           Please try again in a moment.";

/// Sequences classification, resolution, lookup, scraping and rendering.
#[derive(Clone)]
pub struct QueryOrchestrator {
    knowledge: KnowledgeStore,
    registry: CompanyRegistry,
    chat_logs: ChatLogStore,
    scraper: MultiSourceScraper,
    config: PipelineConfig,
}

impl QueryOrchestrator {
    pub fn new(store: Arc<dyn DocumentStore>, scraper: MultiSourceScraper) -> Self {
        Self {
            knowledge: KnowledgeStore::new(store.clone()),
            registry: CompanyRegistry::new(store.clone()),
            chat_logs: ChatLogStore::new(store),
            scraper,
            config: PipelineConfig::default(),
        }
    }

    pub fn with_config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn knowledge(&self) -> &KnowledgeStore {
        &self.knowledge
    }

    pub fn registry(&self) -> &CompanyRegistry {
        &self.registry
    }

    pub fn chat_logs(&self) -> &ChatLogStore {
        &self.chat_logs
    }

    pub fn scraper(&self) -> &MultiSourceScraper {
        &self.scraper
    }

    /// Answer one message. Never fails: errors become an apology tagged
    /// [`ResponseSource::Error`].
    pub async fn handle(&self, user_id: &str, message: &str) -> QueryResponse {
        let classified = intent::classify(message);

        let answer = match self.answer(user_id, message, &classified).await {
            Ok(answer) => answer,
            Err(e) => {
                error!(user_id = %user_id, intent = %classified.intent, error = %e, "Query failed");
                QueryResponse::new(APOLOGY, ResponseSource::Error, classified.intent)
            }
        };

        if self.config.record_chat_logs && !message.trim().is_empty() {
            let entry = ChatLogEntry::from_response(user_id, message.trim(), &answer, Utc::now());
            if let Err(e) = self.chat_logs.append(&entry).await {
                warn!(user_id = %user_id, error = %e, "Failed to record chat log");
            }
        }

        answer
    }

    async fn answer(
        &self,
        user_id: &str,
        message: &str,
        classified: &IntentResult,
    ) -> Result<QueryResponse> {
        let message = message.trim();
        if message.is_empty() {
            return Err(KnowledgeError::EmptyMessage);
        }
        let intent = classified.intent;

        let registry_names = names_or_empty(
            "registry",
            self.registry.names(self.config.registry_scan_limit).await,
        );
        let knowledge_names = names_or_empty(
            "knowledge base",
            self.knowledge.names(self.config.registry_scan_limit).await,
        );

        let resolution = resolver::resolve(message, &registry_names, &knowledge_names)
            .and_then(strip_greeting);
        debug!(
            intent = %intent,
            confidence = classified.confidence,
            company = ?resolution.as_ref().map(|r| &r.name),
            strategy = ?resolution.as_ref().map(|r| r.strategy),
            "Message analysed"
        );
        let company_name = resolution.map(|r| r.name);

        if classified.confidence > self.config.chat_reuse_confidence {
            let previous = self
                .chat_logs
                .find_similar(user_id, message, self.config.chat_history_window)
                .await?;
            if let Some(previous) = previous {
                info!(user_id = %user_id, "Reusing similar past answer");
                return Ok(QueryResponse::new(previous, ResponseSource::KnowledgeBase, intent)
                    .with_company(company_name));
            }
        }

        match company_name {
            Some(name) => self.answer_for_company(intent, &name, message).await,
            None => self.answer_without_company(intent, message).await,
        }
    }

    async fn answer_for_company(
        &self,
        intent: Intent,
        company_name: &str,
        message: &str,
    ) -> Result<QueryResponse> {
        let existing = self.knowledge.find(company_name).await?;

        if let Some(record) = &existing {
            if !completeness::needs_refresh(intent, record, message) {
                info!(company = %company_name, intent = %intent, "Answering from knowledge base");
                return Ok(respond(intent, record, message, ResponseSource::KnowledgeBase)
                    .with_company(Some(company_name.to_string())));
            }
            info!(company = %company_name, intent = %intent, "Stored record incomplete, refreshing");
        }

        let seed_url = match self.registry.seed_url(company_name).await {
            Ok(seed) => seed,
            Err(e) => {
                warn!(company = %company_name, error = %e, "Registry lookup failed");
                None
            }
        };

        let report = self
            .scraper
            .scrape_and_store(&self.knowledge, company_name, seed_url.as_deref())
            .await;

        let record = match &existing {
            Some(record) => record.overlaid_with(&report.fields),
            None => CompanyKnowledgeRecord::from_scraped(company_name, &report.fields, Utc::now()),
        };
        let data = KnowledgeData::from(&record).with_placeholders(company_name);

        Ok(respond(intent, &record, message, ResponseSource::Scraped)
            .with_company(Some(company_name.to_string()))
            .with_data(data))
    }

    async fn answer_without_company(&self, intent: Intent, message: &str) -> Result<QueryResponse> {
        if intent != Intent::Greeting {
            let hit = self
                .knowledge
                .search_content(message, self.config.content_search_limit)
                .await?;
            if let Some(record) = hit {
                info!(company = %record.company_name, "Answering from content search");
                return Ok(respond(intent, &record, message, ResponseSource::KnowledgeBase)
                    .with_company(Some(record.company_name.clone())));
            }
        }

        Ok(QueryResponse::new(
            render::render_general(intent, message),
            ResponseSource::Ai,
            intent,
        ))
    }
}

fn respond(
    intent: Intent,
    record: &CompanyKnowledgeRecord,
    message: &str,
    source: ResponseSource,
) -> QueryResponse {
    QueryResponse::new(render::render(intent, record, message), source, intent)
        .with_data(KnowledgeData::from(record))
}

/// Words that only complete a greeting, as in "Hello There".
const GREETING_FILLERS: &[&str] = &["there", "everyone", "all", "team", "friend", "bot"];

/// Drop leading greeting words from a heuristically captured name.
///
/// "Hello Zoho" becomes "Zoho"; "Hello There" resolves to nothing. Names
/// from the known-company lists are kept as they are.
fn strip_greeting(resolution: Resolution) -> Option<Resolution> {
    if resolution.strategy.is_known() {
        return Some(resolution);
    }

    let greetings = intent::keywords(Intent::Greeting);
    let words: Vec<&str> = resolution
        .name
        .split_whitespace()
        .skip_while(|w| greetings.contains(&w.to_lowercase().as_str()))
        .collect();
    if words
        .iter()
        .all(|w| GREETING_FILLERS.contains(&w.to_lowercase().as_str()))
    {
        return None;
    }

    Some(Resolution {
        name: words.join(" "),
        ..resolution
    })
}

fn names_or_empty(list: &str, names: StoreResult<Vec<String>>) -> Vec<String> {
    names.unwrap_or_else(|e| {
        warn!(list = %list, error = %e, "Company names unavailable");
        vec![]
    })
}
