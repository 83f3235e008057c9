//! The company knowledge base.

use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

use super::{decode, encode};
use crate::error::StoreResult;
use crate::traits::store::{DocumentStore, Query, StoredDocument};
use crate::types::record::{slugify, CompanyKnowledgeRecord};

/// Collection holding one document per company, keyed by slug.
pub const KNOWLEDGE_COLLECTION: &str = "company_knowledge_base";

/// Read/write access to persisted company knowledge.
#[derive(Clone)]
pub struct KnowledgeStore {
    store: Arc<dyn DocumentStore>,
}

impl KnowledgeStore {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Record for a company: by slug first, then by exact display name.
    pub async fn find(&self, company_name: &str) -> StoreResult<Option<CompanyKnowledgeRecord>> {
        let slug = slugify(company_name);
        if let Some(data) = self.store.get_document(KNOWLEDGE_COLLECTION, &slug).await? {
            let doc = StoredDocument::new(slug, data);
            return decode(KNOWLEDGE_COLLECTION, doc).map(Some);
        }
        self.find_by_name(company_name).await
    }

    /// Record whose stored `companyName` equals `company_name` exactly.
    pub async fn find_by_name(
        &self,
        company_name: &str,
    ) -> StoreResult<Option<CompanyKnowledgeRecord>> {
        let docs = self
            .store
            .query_by_field(
                KNOWLEDGE_COLLECTION,
                "companyName",
                Value::String(company_name.to_string()),
                Some(1),
            )
            .await?;

        match docs.into_iter().next() {
            Some(doc) => decode(KNOWLEDGE_COLLECTION, doc).map(Some),
            None => Ok(None),
        }
    }

    /// First record among the first `limit` whose description or skills
    /// contain the whole message (case-insensitive).
    pub async fn search_content(
        &self,
        message: &str,
        limit: usize,
    ) -> StoreResult<Option<CompanyKnowledgeRecord>> {
        let needle = message.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(None);
        }

        let docs = self
            .store
            .query(KNOWLEDGE_COLLECTION, &Query::new().limit(limit))
            .await?;

        for doc in docs {
            let id = doc.id.clone();
            let record: CompanyKnowledgeRecord = match decode(KNOWLEDGE_COLLECTION, doc) {
                Ok(record) => record,
                Err(e) => {
                    warn!(id = %id, error = %e, "Skipping malformed knowledge record");
                    continue;
                }
            };

            let skills = record.skills.join(" ").to_lowercase();
            if record.description.to_lowercase().contains(&needle) || skills.contains(&needle) {
                debug!(company = %record.company_name, "Content search hit");
                return Ok(Some(record));
            }
        }
        Ok(None)
    }

    /// Display names of up to `limit` stored companies, in store order.
    pub async fn names(&self, limit: usize) -> StoreResult<Vec<String>> {
        let docs = self
            .store
            .query(KNOWLEDGE_COLLECTION, &Query::new().limit(limit))
            .await?;
        Ok(docs
            .iter()
            .map(|d| d.str_field("companyName").to_string())
            .filter(|name| !name.is_empty())
            .collect())
    }

    /// Merge a record into the store under its slug.
    ///
    /// Empty fields are left out of the write so they never blank out
    /// values an earlier scrape stored.
    pub async fn upsert(&self, record: &CompanyKnowledgeRecord) -> StoreResult<()> {
        let mut partial = encode(record)?;
        partial.retain(|_, value| !is_blank(value));

        let slug = record.slug();
        self.store
            .upsert_merge(KNOWLEDGE_COLLECTION, &slug, partial)
            .await?;
        debug!(company = %record.company_name, slug = %slug, "Knowledge record merged");
        Ok(())
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stores::MemoryStore;

    fn knowledge() -> (Arc<MemoryStore>, KnowledgeStore) {
        let store = Arc::new(MemoryStore::new());
        (store.clone(), KnowledgeStore::new(store))
    }

    #[tokio::test]
    async fn test_upsert_then_find_by_slug_and_name() {
        let (_, kb) = knowledge();
        let record = CompanyKnowledgeRecord::new("Tata Consultancy Services")
            .with_description("IT services and consulting")
            .with_skills(["Java", "SQL"]);

        kb.upsert(&record).await.unwrap();

        let by_slug = kb.find("tata consultancy services").await.unwrap().unwrap();
        assert_eq!(by_slug.company_name, "Tata Consultancy Services");
        assert_eq!(by_slug.skills, vec!["Java", "SQL"]);

        let by_name = kb
            .find_by_name("Tata Consultancy Services")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_name, by_slug);
    }

    #[tokio::test]
    async fn test_upsert_skips_empty_fields() {
        let (store, kb) = knowledge();
        kb.upsert(&CompanyKnowledgeRecord::new("Meril").with_location("Vapi, Gujarat"))
            .await
            .unwrap();
        kb.upsert(&CompanyKnowledgeRecord::new("Meril").with_salary("4.5 LPA"))
            .await
            .unwrap();

        let record = kb.find("Meril").await.unwrap().unwrap();
        assert_eq!(record.location, "Vapi, Gujarat");
        assert_eq!(record.salary, "4.5 LPA");
        assert_eq!(store.count(KNOWLEDGE_COLLECTION), 1);
    }

    #[tokio::test]
    async fn test_upsert_twice_leaves_record_unchanged() {
        let (_, kb) = knowledge();
        let record = CompanyKnowledgeRecord::new("Meril")
            .with_description("Medical devices")
            .with_skills(["Python"]);

        kb.upsert(&record).await.unwrap();
        let first = kb.find("Meril").await.unwrap();
        kb.upsert(&record).await.unwrap();
        let second = kb.find("Meril").await.unwrap();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_search_content_matches_description_or_skills() {
        let (_, kb) = knowledge();
        kb.upsert(
            &CompanyKnowledgeRecord::new("Meril")
                .with_description("Maker of cardiac stents and orthopaedic implants")
                .with_skills(["Biomedical Engineering"]),
        )
        .await
        .unwrap();

        let hit = kb.search_content("Cardiac Stents", 20).await.unwrap();
        assert_eq!(hit.unwrap().company_name, "Meril");

        let hit = kb.search_content("biomedical", 20).await.unwrap();
        assert!(hit.is_some());

        assert!(kb.search_content("rocket fuel", 20).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_names_in_store_order() {
        let (_, kb) = knowledge();
        for name in ["Zoho", "Infosys"] {
            kb.upsert(&CompanyKnowledgeRecord::new(name)).await.unwrap();
        }
        assert_eq!(kb.names(100).await.unwrap(), vec!["Zoho", "Infosys"]);
    }
}
