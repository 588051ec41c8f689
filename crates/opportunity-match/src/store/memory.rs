use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::Value;

use super::{merge_into, Document, RecordStore, StoreError, WriteMode};

type Collections = HashMap<String, BTreeMap<String, Document>>;

/// Process-local store guarded by one mutex, which also makes `upsert` atomic.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    collections: Arc<Mutex<Collections>>,
}

impl MemoryStore {
    fn lock(&self) -> Result<MutexGuard<'_, Collections>, StoreError> {
        self.collections
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))
    }

    pub fn record_count(&self, collection: &str) -> usize {
        self.collections
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(collection)
            .map(BTreeMap::len)
            .unwrap_or(0)
    }
}

impl RecordStore for MemoryStore {
    fn get(&self, collection: &str, key: &str) -> Result<Option<Document>, StoreError> {
        let guard = self.lock()?;
        Ok(guard
            .get(collection)
            .and_then(|records| records.get(key))
            .cloned())
    }

    fn put(
        &self,
        collection: &str,
        key: &str,
        record: Document,
        mode: WriteMode,
    ) -> Result<(), StoreError> {
        let mut guard = self.lock()?;
        let records = guard.entry(collection.to_string()).or_default();
        match (mode, records.get_mut(key)) {
            (WriteMode::Merge, Some(existing)) => merge_into(existing, record),
            _ => {
                records.insert(key.to_string(), record);
            }
        }
        Ok(())
    }

    fn query_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> Result<Vec<Document>, StoreError> {
        let guard = self.lock()?;
        Ok(guard
            .get(collection)
            .map(|records| {
                records
                    .values()
                    .filter(|record| record.get(field) == Some(value))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn upsert<F, E>(&self, collection: &str, key: &str, mutate: F) -> Result<Document, E>
    where
        F: FnOnce(Option<&Document>) -> Result<Document, E>,
        E: From<StoreError>,
    {
        let mut guard = self.lock()?;
        let records = guard.entry(collection.to_string()).or_default();
        let fields = mutate(records.get(key))?;
        if fields.is_empty() && !records.contains_key(key) {
            return Ok(fields);
        }

        let stored = records.entry(key.to_string()).or_default();
        merge_into(stored, fields);
        Ok(stored.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn document(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn merge_keeps_unspecified_fields() {
        let store = MemoryStore::default();
        store
            .put(
                "things",
                "a",
                document(json!({ "name": "first", "count": 1 })),
                WriteMode::Replace,
            )
            .expect("put");
        store
            .put(
                "things",
                "a",
                document(json!({ "count": 2 })),
                WriteMode::Merge,
            )
            .expect("merge");

        let stored = store.get("things", "a").expect("get").expect("present");
        assert_eq!(stored.get("name"), Some(&json!("first")));
        assert_eq!(stored.get("count"), Some(&json!(2)));
    }

    #[test]
    fn replace_drops_previous_fields() {
        let store = MemoryStore::default();
        store
            .put("things", "a", document(json!({ "name": "x" })), WriteMode::Replace)
            .expect("put");
        store
            .put("things", "a", document(json!({ "count": 3 })), WriteMode::Replace)
            .expect("put");

        let stored = store.get("things", "a").expect("get").expect("present");
        assert!(stored.get("name").is_none());
    }

    #[test]
    fn query_matches_on_field_value() {
        let store = MemoryStore::default();
        for (key, owner) in [("a", "org-1"), ("b", "org-2"), ("c", "org-1")] {
            store
                .put(
                    "things",
                    key,
                    document(json!({ "owner": owner })),
                    WriteMode::Replace,
                )
                .expect("put");
        }

        let matches = store
            .query_by_field("things", "owner", &json!("org-1"))
            .expect("query");
        assert_eq!(matches.len(), 2);
        assert!(store
            .query_by_field("missing", "owner", &json!("org-1"))
            .expect("query")
            .is_empty());
    }

    #[test]
    fn failed_upsert_writes_nothing() {
        let store = MemoryStore::default();
        let result: Result<Document, StoreError> = store.upsert("things", "a", |_| {
            Err(StoreError::Unavailable("refused".to_string()))
        });

        assert!(result.is_err());
        assert_eq!(store.record_count("things"), 0);
    }

    #[test]
    fn upsert_sees_existing_record() {
        let store = MemoryStore::default();
        store
            .put("things", "a", document(json!({ "count": 1 })), WriteMode::Replace)
            .expect("put");

        let stored = store
            .upsert::<_, StoreError>("things", "a", |existing| {
                let count = existing
                    .and_then(|record| record.get("count"))
                    .and_then(Value::as_i64)
                    .unwrap_or(0);
                Ok(document(json!({ "count": count + 1 })))
            })
            .expect("upsert");

        assert_eq!(stored.get("count"), Some(&json!(2)));
    }

    #[test]
    fn empty_upsert_on_missing_record_stores_nothing() {
        let store = MemoryStore::default();
        let stored = store
            .upsert::<_, StoreError>("things", "a", |_| Ok(Document::new()))
            .expect("upsert");

        assert!(stored.is_empty());
        assert_eq!(store.record_count("things"), 0);
        assert!(store.get("things", "a").expect("get").is_none());
    }
}
