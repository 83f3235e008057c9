//! Testing utilities including mock implementations.
//!
//! These are useful for testing applications that use the knowledge library
//! without making real network calls or touching a database.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::error::{FetchError, FetchResult, StoreError, StoreResult};
use crate::fetchers::polite::{Pause, PauseKind, Sleeper};
use crate::traits::{
    fetcher::{FetchRequest, FetchedPage, Fetcher},
    store::{Document, DocumentStore, Query, StoredDocument},
};

/// A mock fetcher for testing.
///
/// Serves predefined pages by exact URL. Unknown URLs answer 404, which the
/// scraper treats as a failed source.
#[derive(Default)]
pub struct MockFetcher {
    /// Predefined (status, body) by URL
    pages: Arc<RwLock<HashMap<String, (u16, String)>>>,

    /// Remaining transport failures by URL
    failures: Arc<RwLock<HashMap<String, u32>>>,

    /// URLs that always fail at the transport level
    fail_urls: Arc<RwLock<Vec<String>>>,

    /// Call tracking
    calls: Arc<RwLock<Vec<FetchRequest>>>,
}

impl MockFetcher {
    /// Create a new mock fetcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` with status 200 at `url`.
    pub fn with_page(self, url: impl Into<String>, body: impl Into<String>) -> Self {
        self.pages
            .write()
            .unwrap()
            .insert(url.into(), (200, body.into()));
        self
    }

    /// Answer `url` with an empty body and the given status.
    pub fn with_status(self, url: impl Into<String>, status: u16) -> Self {
        self.pages
            .write()
            .unwrap()
            .insert(url.into(), (status, String::new()));
        self
    }

    /// Fail the first `times` requests to `url` with a connection error.
    pub fn fail_times(self, url: impl Into<String>, times: u32) -> Self {
        self.failures.write().unwrap().insert(url.into(), times);
        self
    }

    /// Mark a URL as always failing.
    pub fn fail_url(self, url: impl Into<String>) -> Self {
        self.fail_urls.write().unwrap().push(url.into());
        self
    }

    /// All requests seen, in order.
    pub fn requests(&self) -> Vec<FetchRequest> {
        self.calls.read().unwrap().clone()
    }

    /// How many times `url` was requested.
    pub fn call_count(&self, url: &str) -> usize {
        self.calls
            .read()
            .unwrap()
            .iter()
            .filter(|r| r.url == url)
            .count()
    }

    /// Whether any request went to a URL containing `fragment`.
    pub fn was_requested(&self, fragment: &str) -> bool {
        self.calls
            .read()
            .unwrap()
            .iter()
            .any(|r| r.url.contains(fragment))
    }

    fn refused(url: &str) -> FetchError {
        FetchError::Network {
            url: url.to_string(),
            source: Box::new(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "Mock connection refused",
            )),
        }
    }
}

#[async_trait]
impl Fetcher for MockFetcher {
    async fn fetch(&self, request: &FetchRequest) -> FetchResult<FetchedPage> {
        self.calls.write().unwrap().push(request.clone());
        let url = request.url.as_str();

        if self.fail_urls.read().unwrap().iter().any(|u| u == url) {
            return Err(Self::refused(url));
        }

        if let Some(remaining) = self.failures.write().unwrap().get_mut(url) {
            if *remaining > 0 {
                *remaining -= 1;
                return Err(Self::refused(url));
            }
        }

        let page = match self.pages.read().unwrap().get(url) {
            Some((status, body)) => FetchedPage::new(url, *status, body.clone()),
            None => FetchedPage::new(url, 404, "Not Found"),
        };
        Ok(page)
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// Sleeper that records pauses and returns immediately.
#[derive(Default)]
pub struct RecordingSleeper {
    pauses: RwLock<Vec<Pause>>,
}

impl RecordingSleeper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pauses(&self) -> Vec<Pause> {
        self.pauses.read().unwrap().clone()
    }

    /// Number of recorded pauses of one kind.
    pub fn count(&self, kind: PauseKind) -> usize {
        self.pauses
            .read()
            .unwrap()
            .iter()
            .filter(|p| p.kind == kind)
            .count()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn pause(&self, pause: Pause) {
        self.pauses.write().unwrap().push(pause);
    }
}

/// A document store whose every operation fails.
///
/// Used to check that storage outages degrade instead of aborting a query.
#[derive(Debug, Default, Clone, Copy)]
pub struct FailingStore;

impl FailingStore {
    fn error() -> StoreError {
        StoreError::backend("store unavailable")
    }
}

#[async_trait]
impl DocumentStore for FailingStore {
    async fn get_document(&self, _collection: &str, _id: &str) -> StoreResult<Option<Document>> {
        Err(Self::error())
    }

    async fn query(&self, _collection: &str, _query: &Query) -> StoreResult<Vec<StoredDocument>> {
        Err(Self::error())
    }

    async fn upsert_merge(&self, _collection: &str, _id: &str, _partial: Document) -> StoreResult<()> {
        Err(Self::error())
    }

    async fn add_document(&self, _collection: &str, _data: Document) -> StoreResult<String> {
        Err(Self::error())
    }
}
