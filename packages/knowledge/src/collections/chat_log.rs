//! Per-user chat history.

use chrono::SecondsFormat;
use serde_json::Value;
use std::sync::Arc;
use tracing::warn;

use super::{decode, encode};
use crate::error::StoreResult;
use crate::traits::store::{Direction, DocumentStore, Query};
use crate::types::response::ChatLogEntry;

pub const CHAT_LOGS_COLLECTION: &str = "chat_logs";

/// Append-only log of handled messages.
#[derive(Clone)]
pub struct ChatLogStore {
    store: Arc<dyn DocumentStore>,
}

impl ChatLogStore {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Append an entry, returning its generated ID.
    pub async fn append(&self, entry: &ChatLogEntry) -> StoreResult<String> {
        let mut doc = encode(entry)?;
        // Fixed-width timestamps so string ordering is chronological.
        doc.insert(
            "timestamp".into(),
            Value::String(entry.timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)),
        );
        self.store.add_document(CHAT_LOGS_COLLECTION, doc).await
    }

    /// Up to `limit` most recent entries for a user, newest first.
    pub async fn recent(&self, user_id: &str, limit: usize) -> StoreResult<Vec<ChatLogEntry>> {
        let query = Query::new()
            .where_eq("userId", user_id)
            .order_by("timestamp", Direction::Descending)
            .limit(limit);
        let docs = self.store.query(CHAT_LOGS_COLLECTION, &query).await?;

        let mut entries = Vec::with_capacity(docs.len());
        for doc in docs {
            let id = doc.id.clone();
            match decode(CHAT_LOGS_COLLECTION, doc) {
                Ok(entry) => entries.push(entry),
                Err(e) => warn!(id = %id, error = %e, "Skipping malformed chat log entry"),
            }
        }
        Ok(entries)
    }

    /// Up to `limit` most recent entries for a user, oldest first.
    pub async fn history(&self, user_id: &str, limit: usize) -> StoreResult<Vec<ChatLogEntry>> {
        let mut entries = self.recent(user_id, limit).await?;
        entries.reverse();
        Ok(entries)
    }

    /// A past answer to a similar question among the user's last `window`
    /// messages.
    ///
    /// A past message is similar when it contains the whole new message, or
    /// any of the new message's first three words.
    pub async fn find_similar(
        &self,
        user_id: &str,
        message: &str,
        window: usize,
    ) -> StoreResult<Option<String>> {
        let query = message.to_lowercase();
        let lead_words: Vec<&str> = query.split_whitespace().take(3).collect();

        let found = self
            .recent(user_id, window)
            .await?
            .into_iter()
            .find(|entry| {
                let past = entry.message.to_lowercase();
                past.contains(&query) || lead_words.iter().any(|w| past.contains(w))
            })
            .map(|entry| entry.response);
        Ok(found)
    }
}
