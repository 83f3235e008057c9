//! SQLite document store.
//!
//! A file-based backend using SQLite. Good for:
//! - Local development
//! - Single-server deployments
//! - Testing with persistent data
//!
//! Every document lives in one `documents` table as a JSON text column. Filters
//! are applied in Rust after a per-collection scan; collections here are small
//! (one row per company, a bounded chat history per user).

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::FromRow;
use std::str::FromStr;

use crate::error::{StoreError, StoreResult};
use crate::traits::store::{merge_document, Document, DocumentStore, Query, StoredDocument};

/// SQLite-backed document store.
pub struct SqliteStore {
    pool: SqlitePool,
}

fn backend(e: sqlx::Error) -> StoreError {
    StoreError::Backend(Box::new(e))
}

impl SqliteStore {
    /// Open (creating if needed) a SQLite database.
    ///
    /// # Example URLs
    /// - `sqlite://./knowledge.db` - File-based database
    /// - `sqlite::memory:` - Use [`SqliteStore::in_memory`] instead
    pub async fn new(database_url: &str) -> StoreResult<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(backend)?
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(backend)?;

        let store = Self { pool };
        store.run_migrations().await?;
        Ok(store)
    }

    /// Create an in-memory SQLite store (for testing).
    ///
    /// Uses a single connection: every SQLite in-memory connection is its own
    /// database.
    pub async fn in_memory() -> StoreResult<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .map_err(backend)?;

        let store = Self { pool };
        store.run_migrations().await?;
        Ok(store)
    }

    async fn run_migrations(&self) -> StoreResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS documents (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                collection TEXT NOT NULL,
                id TEXT NOT NULL,
                data TEXT NOT NULL,
                UNIQUE(collection, id)
            );
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(backend)?;

        Ok(())
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[derive(Debug, FromRow)]
struct DocumentRow {
    id: String,
    data: String,
}

impl DocumentRow {
    fn decode(self, collection: &str) -> StoreResult<StoredDocument> {
        let data: Document =
            serde_json::from_str(&self.data).map_err(|source| StoreError::Malformed {
                collection: collection.to_string(),
                id: self.id.clone(),
                source,
            })?;
        Ok(StoredDocument::new(self.id, data))
    }
}

#[async_trait]
impl DocumentStore for SqliteStore {
    async fn get_document(&self, collection: &str, id: &str) -> StoreResult<Option<Document>> {
        let row = sqlx::query_as::<_, DocumentRow>(
            "SELECT id, data FROM documents WHERE collection = ? AND id = ?",
        )
        .bind(collection)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)?;

        match row {
            Some(r) => Ok(Some(r.decode(collection)?.data)),
            None => Ok(None),
        }
    }

    async fn query(&self, collection: &str, query: &Query) -> StoreResult<Vec<StoredDocument>> {
        let rows = sqlx::query_as::<_, DocumentRow>(
            "SELECT id, data FROM documents WHERE collection = ? ORDER BY seq",
        )
        .bind(collection)
        .fetch_all(&self.pool)
        .await
        .map_err(backend)?;

        let mut matching = Vec::new();
        for row in rows {
            let doc = row.decode(collection)?;
            if query.matches(&doc.data) {
                matching.push(doc);
            }
        }
        Ok(query.finish(matching))
    }

    async fn upsert_merge(&self, collection: &str, id: &str, partial: Document) -> StoreResult<()> {
        let mut tx = self.pool.begin().await.map_err(backend)?;

        let existing = sqlx::query_as::<_, DocumentRow>(
            "SELECT id, data FROM documents WHERE collection = ? AND id = ?",
        )
        .bind(collection)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(backend)?;

        let mut merged = match existing {
            Some(row) => row.decode(collection)?.data,
            None => Document::new(),
        };
        merge_document(&mut merged, partial);
        let data = serde_json::to_string(&merged)?;

        sqlx::query(
            r#"
            INSERT INTO documents (collection, id, data)
            VALUES (?, ?, ?)
            ON CONFLICT(collection, id) DO UPDATE SET data = excluded.data
            "#,
        )
        .bind(collection)
        .bind(id)
        .bind(&data)
        .execute(&mut *tx)
        .await
        .map_err(backend)?;

        tx.commit().await.map_err(backend)?;
        Ok(())
    }

    async fn add_document(&self, collection: &str, data: Document) -> StoreResult<String> {
        let id = uuid::Uuid::new_v4().to_string();
        let data = serde_json::to_string(&data)?;

        sqlx::query("INSERT INTO documents (collection, id, data) VALUES (?, ?, ?)")
            .bind(collection)
            .bind(&id)
            .bind(&data)
            .execute(&self.pool)
            .await
            .map_err(backend)?;

        Ok(id)
    }
}
