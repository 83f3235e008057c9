//! In-memory document store for testing and development.

use async_trait::async_trait;
use indexmap::IndexMap;
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::{StoreError, StoreResult};
use crate::traits::store::{merge_document, Document, DocumentStore, Query, StoredDocument};

type Collections = HashMap<String, IndexMap<String, Document>>;

/// In-memory document store.
///
/// Collections iterate in insertion order, so scans are deterministic within
/// a process. Data is lost on restart.
#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<Collections>,
}

impl MemoryStore {
    /// Create a new empty memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a document, replacing any existing one with the same ID.
    pub fn insert(&self, collection: &str, id: &str, data: Document) -> StoreResult<()> {
        self.write()?
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), data);
        Ok(())
    }

    /// Number of documents in a collection.
    pub fn count(&self, collection: &str) -> usize {
        self.read()
            .map(|c| c.get(collection).map_or(0, |docs| docs.len()))
            .unwrap_or(0)
    }

    /// Clear all stored data.
    pub fn clear(&self) -> StoreResult<()> {
        self.write()?.clear();
        Ok(())
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Collections>> {
        self.collections
            .read()
            .map_err(|_| StoreError::backend("memory store lock poisoned"))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, Collections>> {
        self.collections
            .write()
            .map_err(|_| StoreError::backend("memory store lock poisoned"))
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get_document(&self, collection: &str, id: &str) -> StoreResult<Option<Document>> {
        Ok(self
            .read()?
            .get(collection)
            .and_then(|docs| docs.get(id))
            .cloned())
    }

    async fn query(&self, collection: &str, query: &Query) -> StoreResult<Vec<StoredDocument>> {
        let collections = self.read()?;
        let matching = collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|(_, data)| query.matches(data))
                    .map(|(id, data)| StoredDocument::new(id.clone(), data.clone()))
                    .collect()
            })
            .unwrap_or_default();
        Ok(query.finish(matching))
    }

    async fn upsert_merge(&self, collection: &str, id: &str, partial: Document) -> StoreResult<()> {
        let mut collections = self.write()?;
        let target = collections
            .entry(collection.to_string())
            .or_default()
            .entry(id.to_string())
            .or_default();
        merge_document(target, partial);
        Ok(())
    }

    async fn add_document(&self, collection: &str, data: Document) -> StoreResult<String> {
        let id = uuid::Uuid::new_v4().to_string();
        self.insert(collection, &id, data)?;
        Ok(id)
    }
}
