//! Typed views over the document store collections the pipeline uses.

pub mod chat_log;
pub mod knowledge;
pub mod registry;

pub use chat_log::ChatLogStore;
pub use knowledge::KnowledgeStore;
pub use registry::CompanyRegistry;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{StoreError, StoreResult};
use crate::traits::store::{Document, StoredDocument};

/// Decode a stored document into a typed record.
pub(crate) fn decode<T: DeserializeOwned>(collection: &str, doc: StoredDocument) -> StoreResult<T> {
    let StoredDocument { id, data } = doc;
    serde_json::from_value(Value::Object(data)).map_err(|source| StoreError::Malformed {
        collection: collection.to_string(),
        id,
        source,
    })
}

/// Encode a record as a document body.
pub(crate) fn encode<T: serde::Serialize>(value: &T) -> StoreResult<Document> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(StoreError::backend(format!(
            "expected a JSON object, got {other}"
        ))),
    }
}
