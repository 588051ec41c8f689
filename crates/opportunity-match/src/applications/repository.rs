use std::sync::Arc;

use serde_json::Value;

use super::domain::{Application, ApplicationKey, ApplicationPatch};
use super::service::LifecycleError;
use crate::store::{from_document, to_document, Document, RecordStore, StoreError};

pub const APPLICATIONS_COLLECTION: &str = "applications";

/// Indexed fields applications can be listed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplicationField {
    Opportunity,
    Organization,
    Student,
}

impl ApplicationField {
    pub const fn name(self) -> &'static str {
        match self {
            ApplicationField::Opportunity => "opportunity_id",
            ApplicationField::Organization => "org_id",
            ApplicationField::Student => "student_id",
        }
    }
}

/// Write decided from the currently stored record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Write {
    Create(Application),
    Patch(ApplicationPatch),
    Keep,
}

/// Typed access to the `applications` collection of a [`RecordStore`].
pub struct ApplicationRepository<S> {
    store: Arc<S>,
}

impl<S> ApplicationRepository<S>
where
    S: RecordStore,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn fetch(&self, key: &ApplicationKey) -> Result<Option<Application>, StoreError> {
        self.store
            .get(APPLICATIONS_COLLECTION, key.as_str())?
            .map(from_document)
            .transpose()
    }

    /// Applications whose `field` equals `value`, newest first.
    pub fn list_by(
        &self,
        field: ApplicationField,
        value: &str,
    ) -> Result<Vec<Application>, StoreError> {
        let mut applications = self
            .store
            .query_by_field(
                APPLICATIONS_COLLECTION,
                field.name(),
                &Value::String(value.to_string()),
            )?
            .into_iter()
            .map(from_document::<Application>)
            .collect::<Result<Vec<_>, _>>()?;
        applications.sort_by(|left, right| right.created_at.cmp(&left.created_at));
        Ok(applications)
    }

    /// Atomically decides and applies one write against the record under `key`.
    pub(crate) fn write<F>(
        &self,
        key: &ApplicationKey,
        decide: F,
    ) -> Result<Application, LifecycleError>
    where
        F: FnOnce(Option<Application>) -> Result<Write, LifecycleError>,
    {
        let stored = self
            .store
            .upsert(APPLICATIONS_COLLECTION, key.as_str(), |existing| {
                let current = existing
                    .cloned()
                    .map(from_document::<Application>)
                    .transpose()?;
                let fields = match decide(current)? {
                    Write::Create(application) => to_document(&application)?,
                    Write::Patch(patch) => to_document(&patch)?,
                    Write::Keep => Document::new(),
                };
                Ok::<_, LifecycleError>(fields)
            })?;
        Ok(from_document(stored)?)
    }
}

impl<S> Clone for ApplicationRepository<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}
