//! Typed errors for the knowledge library.
//!
//! Uses `thiserror` for library errors (not `anyhow`) so callers can match
//! on the failing collaborator.

use thiserror::Error;

/// Errors surfaced by the knowledge-resolution pipeline.
#[derive(Debug, Error)]
pub enum KnowledgeError {
    /// Fetch operation failed
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    /// Document store operation failed
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Message was empty after trimming
    #[error("empty message")]
    EmptyMessage,

    /// Configuration error
    #[error("config error: {0}")]
    Config(String),
}

/// Errors that can occur while fetching a page.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport-level failure (DNS, connection reset, TLS, ...)
    #[error("network error for {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Server answered with a non-success status
    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    /// Request did not complete in time
    #[error("timeout fetching: {url}")]
    Timeout { url: String },

    /// Invalid URL format
    #[error("invalid URL: {url}")]
    InvalidUrl { url: String },

    /// Every attempt failed
    #[error("gave up on {url} after {attempts} attempts")]
    RetriesExhausted { url: String, attempts: u32 },
}

impl FetchError {
    /// Whether another attempt could plausibly succeed.
    ///
    /// Status failures are retried too: bot walls commonly answer 403/404
    /// to one request and 200 to the next.
    pub fn is_retryable(&self) -> bool {
        !matches!(
            self,
            FetchError::InvalidUrl { .. } | FetchError::RetriesExhausted { .. }
        )
    }
}

/// Errors raised by document store backends.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Backend failed (connection, SQL, lock poisoning)
    #[error("backend error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Stored document could not be decoded into the expected record
    #[error("malformed document {collection}/{id}: {source}")]
    Malformed {
        collection: String,
        id: String,
        #[source]
        source: serde_json::Error,
    },

    /// Record could not be encoded into a document
    #[error("JSON encode error: {0}")]
    Encode(#[from] serde_json::Error),
}

impl StoreError {
    pub fn backend(message: impl Into<String>) -> Self {
        StoreError::Backend(message.into().into())
    }
}

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, KnowledgeError>;

/// Result type alias for fetch operations.
pub type FetchResult<T> = std::result::Result<T, FetchError>;

/// Result type alias for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;
