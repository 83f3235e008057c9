//! Business-registered companies.
//!
//! The registry is owned by the company CRUD side of the application; the
//! pipeline only reads names and seed URLs from it.

use serde_json::{Map, Value};
use std::sync::Arc;

use crate::error::StoreResult;
use crate::traits::store::{DocumentStore, Query};

pub const COMPANIES_COLLECTION: &str = "companies";

/// Read access to the `companies` collection.
#[derive(Clone)]
pub struct CompanyRegistry {
    store: Arc<dyn DocumentStore>,
}

impl CompanyRegistry {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Display names of up to `limit` registered companies, in store order.
    pub async fn names(&self, limit: usize) -> StoreResult<Vec<String>> {
        let docs = self
            .store
            .query(COMPANIES_COLLECTION, &Query::new().limit(limit))
            .await?;
        Ok(docs
            .iter()
            .map(|d| d.str_field("company_name").to_string())
            .filter(|name| !name.is_empty())
            .collect())
    }

    /// The company's registered website, if one was entered.
    pub async fn seed_url(&self, company_name: &str) -> StoreResult<Option<String>> {
        let docs = self
            .store
            .query_by_field(
                COMPANIES_COLLECTION,
                "company_name",
                Value::String(company_name.to_string()),
                Some(1),
            )
            .await?;

        Ok(docs
            .first()
            .map(|d| d.str_field("optional_url").trim().to_string())
            .filter(|url| !url.is_empty()))
    }

    /// Register a company, returning the generated ID.
    pub async fn register(&self, company_name: &str, url: Option<&str>) -> StoreResult<String> {
        let mut doc = Map::new();
        doc.insert("company_name".into(), Value::String(company_name.to_string()));
        if let Some(url) = url {
            doc.insert("optional_url".into(), Value::String(url.to_string()));
        }
        self.store.add_document(COMPANIES_COLLECTION, doc).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stores::MemoryStore;

    #[tokio::test]
    async fn test_names_and_seed_url() {
        let registry = CompanyRegistry::new(Arc::new(MemoryStore::new()));
        registry
            .register("Meril", Some("https://www.merillife.com"))
            .await
            .unwrap();
        registry.register("Deloitte", None).await.unwrap();

        assert_eq!(registry.names(100).await.unwrap(), vec!["Meril", "Deloitte"]);
        assert_eq!(
            registry.seed_url("Meril").await.unwrap().as_deref(),
            Some("https://www.merillife.com")
        );
        assert_eq!(registry.seed_url("Deloitte").await.unwrap(), None);
        assert_eq!(registry.seed_url("Unknown").await.unwrap(), None);
    }
}
