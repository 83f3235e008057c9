//! Document store abstraction.
//!
//! The pipeline persists into a generic document store: named collections of
//! JSON objects keyed by string IDs, with equality queries, ordered scans and
//! top-level merge writes. Anything from an in-process map to a hosted
//! document database fits behind [`DocumentStore`].

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::cmp::Ordering;

use crate::error::StoreResult;

/// A stored document body.
pub type Document = Map<String, Value>;

/// A document together with its ID.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub id: String,
    pub data: Document,
}

impl StoredDocument {
    pub fn new(id: impl Into<String>, data: Document) -> Self {
        Self {
            id: id.into(),
            data,
        }
    }

    /// String field, or `""` when absent or not a string.
    pub fn str_field(&self, field: &str) -> &str {
        self.data.get(field).and_then(Value::as_str).unwrap_or("")
    }
}

/// Sort direction for ordered queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

/// Filter, order and limit for a collection read.
///
/// An empty query is a plain scan in store iteration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pub filter: Option<(String, Value)>,
    pub order_by: Option<(String, Direction)>,
    pub limit: Option<usize>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only documents whose `field` equals `value`.
    pub fn where_eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filter = Some((field.into(), value.into()));
        self
    }

    pub fn order_by(mut self, field: impl Into<String>, direction: Direction) -> Self {
        self.order_by = Some((field.into(), direction));
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Whether a document passes the filter.
    pub fn matches(&self, data: &Document) -> bool {
        match &self.filter {
            Some((field, value)) => data.get(field) == Some(value),
            None => true,
        }
    }

    /// Apply order and limit to an already-filtered, iteration-ordered list.
    ///
    /// Sorting is stable, so equal keys keep iteration order.
    pub fn finish(&self, mut docs: Vec<StoredDocument>) -> Vec<StoredDocument> {
        if let Some((field, direction)) = &self.order_by {
            docs.sort_by(|a, b| {
                let ord = compare_values(a.data.get(field), b.data.get(field));
                match direction {
                    Direction::Ascending => ord,
                    Direction::Descending => ord.reverse(),
                }
            });
        }
        if let Some(limit) = self.limit {
            docs.truncate(limit);
        }
        docs
    }
}

/// Total order over optional JSON scalars: missing < null < bool < number < string.
///
/// Timestamps are stored as RFC 3339 strings, which sort chronologically.
pub fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    fn rank(v: Option<&Value>) -> u8 {
        match v {
            None => 0,
            Some(Value::Null) => 1,
            Some(Value::Bool(_)) => 2,
            Some(Value::Number(_)) => 3,
            Some(Value::String(_)) => 4,
            Some(_) => 5,
        }
    }

    match (a, b) {
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let x = x.as_f64().unwrap_or(0.0);
            let y = y.as_f64().unwrap_or(0.0);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}

/// Merge `partial` into `target` field by field.
///
/// Top-level keys in `partial` replace those in `target`; keys absent from
/// `partial` are left alone. Applying the same partial twice is a no-op.
pub fn merge_document(target: &mut Document, partial: Document) {
    for (key, value) in partial {
        target.insert(key, value);
    }
}

/// Persisted document store.
///
/// Supports atomic per-document reads, merge writes and filtered reads. No
/// multi-document transactions are required.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Get a document by ID.
    async fn get_document(&self, collection: &str, id: &str) -> StoreResult<Option<Document>>;

    /// Read documents matching a query.
    async fn query(&self, collection: &str, query: &Query) -> StoreResult<Vec<StoredDocument>>;

    /// Merge fields into a document, creating it if absent.
    async fn upsert_merge(&self, collection: &str, id: &str, partial: Document) -> StoreResult<()>;

    /// Add a document under a generated ID and return that ID.
    async fn add_document(&self, collection: &str, data: Document) -> StoreResult<String>;

    /// Documents whose `field` equals `value`.
    async fn query_by_field(
        &self,
        collection: &str,
        field: &str,
        value: Value,
        limit: Option<usize>,
    ) -> StoreResult<Vec<StoredDocument>> {
        let mut query = Query::new().where_eq(field, value);
        query.limit = limit;
        self.query(collection, &query).await
    }
}

#[async_trait]
impl<T: DocumentStore + ?Sized> DocumentStore for std::sync::Arc<T> {
    async fn get_document(&self, collection: &str, id: &str) -> StoreResult<Option<Document>> {
        (**self).get_document(collection, id).await
    }

    async fn query(&self, collection: &str, query: &Query) -> StoreResult<Vec<StoredDocument>> {
        (**self).query(collection, query).await
    }

    async fn upsert_merge(&self, collection: &str, id: &str, partial: Document) -> StoreResult<()> {
        (**self).upsert_merge(collection, id, partial).await
    }

    async fn add_document(&self, collection: &str, data: Document) -> StoreResult<String> {
        (**self).add_document(collection, data).await
    }
}
