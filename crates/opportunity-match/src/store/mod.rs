//! Keyed document store the lifecycle persists through.
//!
//! Records are JSON objects addressed by `(collection, key)`. Implementations must make
//! [`RecordStore::upsert`] atomic per key: the read handed to `mutate` and the write of its
//! result happen without another writer in between.

mod memory;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

pub use memory::MemoryStore;

pub type Document = Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Overwrite the whole record.
    Replace,
    /// Set the given top-level fields, leaving the others untouched.
    Merge,
}

pub trait RecordStore: Send + Sync {
    fn get(&self, collection: &str, key: &str) -> Result<Option<Document>, StoreError>;

    fn put(
        &self,
        collection: &str,
        key: &str,
        record: Document,
        mode: WriteMode,
    ) -> Result<(), StoreError>;

    fn query_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> Result<Vec<Document>, StoreError>;

    /// Reads the record under `key`, passes it to `mutate`, and merges the returned fields
    /// into the stored record as one atomic step. Returns the record as stored afterwards.
    /// When `mutate` fails, or returns no fields for a missing record, nothing is written.
    fn upsert<F, E>(&self, collection: &str, key: &str, mutate: F) -> Result<Document, E>
    where
        F: FnOnce(Option<&Document>) -> Result<Document, E>,
        E: From<StoreError>;
}

/// Failures raised by a [`RecordStore`]. Callers propagate them as-is.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record store unavailable: {0}")]
    Unavailable(String),
    #[error("record could not be encoded or decoded: {0}")]
    Codec(#[from] serde_json::Error),
    #[error("value does not serialize to a JSON object")]
    NotADocument,
}

pub fn to_document<T: Serialize>(value: &T) -> Result<Document, StoreError> {
    match serde_json::to_value(value)? {
        Value::Object(document) => Ok(document),
        _ => Err(StoreError::NotADocument),
    }
}

pub fn from_document<T: DeserializeOwned>(document: Document) -> Result<T, StoreError> {
    Ok(serde_json::from_value(Value::Object(document))?)
}

pub(crate) fn merge_into(target: &mut Document, fields: Document) {
    for (field, value) in fields {
        target.insert(field, value);
    }
}
