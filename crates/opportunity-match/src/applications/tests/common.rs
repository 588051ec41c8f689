use std::sync::Arc;

use axum::response::Response;
use serde_json::Value;

use crate::applications::{ApplicationLifecycle, ReapplyPolicy};
use crate::store::{Document, MemoryStore, RecordStore, StoreError, WriteMode};

pub(super) const OPPORTUNITY: &str = "opp-42";
pub(super) const STUDENT: &str = "stu-7";
pub(super) const ORG: &str = "org-3";

pub(super) fn build_lifecycle() -> (ApplicationLifecycle<MemoryStore>, Arc<MemoryStore>) {
    build_lifecycle_with(ReapplyPolicy::default())
}

pub(super) fn build_lifecycle_with(
    policy: ReapplyPolicy,
) -> (ApplicationLifecycle<MemoryStore>, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::default());
    let lifecycle = ApplicationLifecycle::with_policy(store.clone(), policy);
    (lifecycle, store)
}

pub(super) struct UnavailableStore;

impl RecordStore for UnavailableStore {
    fn get(&self, _collection: &str, _key: &str) -> Result<Option<Document>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn put(
        &self,
        _collection: &str,
        _key: &str,
        _record: Document,
        _mode: WriteMode,
    ) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn query_by_field(
        &self,
        _collection: &str,
        _field: &str,
        _value: &Value,
    ) -> Result<Vec<Document>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn upsert<F, E>(&self, _collection: &str, _key: &str, _mutate: F) -> Result<Document, E>
    where
        F: FnOnce(Option<&Document>) -> Result<Document, E>,
        E: From<StoreError>,
    {
        Err(StoreError::Unavailable("database offline".to_string()).into())
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
