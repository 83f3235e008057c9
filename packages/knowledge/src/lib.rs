//! Company knowledge resolution for a placement assistant.
//!
//! Given a free-text question from a student, the pipeline classifies the
//! intent, resolves which company is meant, answers from stored knowledge
//! when that knowledge is complete enough, and otherwise scrapes the web,
//! gates the result on quality, stores it and answers from it.
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use placement_knowledge::{MemoryStore, MultiSourceScraper, QueryOrchestrator, ScraperConfig};
//!
//! let store = Arc::new(MemoryStore::new());
//! let scraper = MultiSourceScraper::from_config(ScraperConfig::default());
//! let pipeline = QueryOrchestrator::new(store, scraper);
//!
//! let answer = pipeline.handle("student-42", "What skills does TCS need?").await;
//! println!("[{}] {}", answer.source, answer.response);
//! ```
//!
//! # Modules
//!
//! - [`traits`] - Collaborator abstractions (Fetcher, DocumentStore)
//! - [`types`] - Records, intents, responses and configuration
//! - [`pipeline`] - Classification, resolution, gating, rendering, orchestration
//! - [`scraper`] - Multi-source company scraper
//! - [`fetchers`] - HTTP transport, rate limiting, retries
//! - [`stores`] - Document store implementations
//! - [`collections`] - Typed views over the stored collections
//! - [`testing`] - Mock implementations for testing

pub mod collections;
pub mod error;
pub mod fetchers;
pub mod pipeline;
pub mod scraper;
pub mod stores;
pub mod testing;
pub mod traits;
pub mod types;

pub use error::{FetchError, KnowledgeError, Result, StoreError};
pub use traits::{
    fetcher::{FetchRequest, FetchedPage, Fetcher},
    store::{Direction, Document, DocumentStore, Query, StoredDocument},
};
pub use types::{
    config::{Gazetteer, PipelineConfig, ScraperConfig},
    intent::{Intent, IntentResult},
    record::{CompanyKnowledgeRecord, Provenance, ScrapedFields},
    response::{ChatLogEntry, KnowledgeData, QueryResponse, ResponseSource},
};

pub use collections::{ChatLogStore, CompanyRegistry, KnowledgeStore};
pub use fetchers::{HttpFetcher, PoliteFetcher, RateLimitedFetcher, Sleeper, TokioSleeper};
pub use pipeline::QueryOrchestrator;
pub use scraper::{MultiSourceScraper, ScrapeReport, Source, SourceOutcome, StoreOutcome};

pub use stores::MemoryStore;

#[cfg(feature = "sqlite")]
pub use stores::SqliteStore;
