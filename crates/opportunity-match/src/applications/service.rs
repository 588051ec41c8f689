use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use super::domain::{
    Application, ApplicationKey, ApplicationPatch, ApplicationStatus, ReapplyPolicy,
};
use super::repository::{ApplicationField, ApplicationRepository, Write};
use crate::store::{RecordStore, StoreError};

/// Owns the application state machine on top of a [`RecordStore`].
///
/// Every mutation is a single atomic upsert on the composite key, so concurrent callers
/// touching the same pair never produce two records; the last writer wins. Store failures are
/// returned unchanged and never retried here.
pub struct ApplicationLifecycle<S> {
    repository: ApplicationRepository<S>,
    reapply: ReapplyPolicy,
}

impl<S> ApplicationLifecycle<S>
where
    S: RecordStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self::with_policy(store, ReapplyPolicy::default())
    }

    pub fn with_policy(store: Arc<S>, reapply: ReapplyPolicy) -> Self {
        Self {
            repository: ApplicationRepository::new(store),
            reapply,
        }
    }

    pub fn reapply_policy(&self) -> ReapplyPolicy {
        self.reapply
    }

    /// Student applies to an opportunity.
    ///
    /// Creates the record as `applied` when absent. A `shortlisted` or `contacted` record is
    /// returned untouched. An `applied` or `rejected` record follows the [`ReapplyPolicy`].
    pub fn apply(
        &self,
        opportunity_id: &str,
        student_id: &str,
        org_id: &str,
    ) -> Result<Application, LifecycleError> {
        let key = ApplicationKey::new(opportunity_id, student_id);
        let now = Utc::now();
        let policy = self.reapply;
        let mut reapplied = None;

        let application = self.repository.write(&key, |existing| {
            let Some(existing) = existing else {
                return Ok(Write::Create(Application::new(
                    opportunity_id,
                    student_id,
                    org_id,
                    ApplicationStatus::Applied,
                    now,
                )));
            };
            ensure_same_pair(&existing, opportunity_id, student_id)?;

            let keep = existing.status.is_advanced() || policy == ReapplyPolicy::KeepExisting;
            reapplied = Some((existing.status, keep));
            if keep {
                Ok(Write::Keep)
            } else {
                Ok(Write::Patch(ApplicationPatch::status(
                    ApplicationStatus::Applied,
                    now,
                )))
            }
        })?;

        match reapplied {
            None => info!(
                application_key = %key,
                org_id = %application.org_id,
                actor = "student",
                "application created"
            ),
            Some((status, true)) => debug!(
                application_key = %key,
                status = %status,
                "re-apply left application unchanged"
            ),
            Some((status, false)) => info!(
                application_key = %key,
                from = %status,
                status = %application.status,
                actor = "student",
                "re-apply reset application"
            ),
        }

        Ok(application)
    }

    /// Reviewer-driven status change. No transition is refused.
    ///
    /// A missing record is created directly in `next`, which needs the owning organization;
    /// without one the call fails with [`LifecycleError::MissingOwner`].
    pub fn set_status(
        &self,
        opportunity_id: &str,
        student_id: &str,
        next: ApplicationStatus,
        org_id_if_creating: Option<&str>,
    ) -> Result<Application, LifecycleError> {
        self.transition(opportunity_id, student_id, next, org_id_if_creating, "reviewer")
    }

    /// Student withdrawal, recorded as `rejected`.
    pub fn withdraw(
        &self,
        opportunity_id: &str,
        student_id: &str,
    ) -> Result<Application, LifecycleError> {
        self.transition(
            opportunity_id,
            student_id,
            ApplicationStatus::Rejected,
            None,
            "student",
        )
    }

    pub fn get(
        &self,
        opportunity_id: &str,
        student_id: &str,
    ) -> Result<Option<Application>, LifecycleError> {
        let key = ApplicationKey::new(opportunity_id, student_id);
        Ok(self.repository.fetch(&key)?)
    }

    pub fn by_opportunity(&self, opportunity_id: &str) -> Result<Vec<Application>, LifecycleError> {
        Ok(self
            .repository
            .list_by(ApplicationField::Opportunity, opportunity_id)?)
    }

    pub fn by_organization(&self, org_id: &str) -> Result<Vec<Application>, LifecycleError> {
        Ok(self
            .repository
            .list_by(ApplicationField::Organization, org_id)?)
    }

    pub fn by_student(&self, student_id: &str) -> Result<Vec<Application>, LifecycleError> {
        Ok(self
            .repository
            .list_by(ApplicationField::Student, student_id)?)
    }

    fn transition(
        &self,
        opportunity_id: &str,
        student_id: &str,
        next: ApplicationStatus,
        org_id_if_creating: Option<&str>,
        actor: &'static str,
    ) -> Result<Application, LifecycleError> {
        let key = ApplicationKey::new(opportunity_id, student_id);
        let now = Utc::now();
        let mut previous = None;

        let application = self.repository.write(&key, |existing| match existing {
            None => {
                let org_id = org_id_if_creating
                    .filter(|org_id| !org_id.trim().is_empty())
                    .ok_or_else(|| LifecycleError::MissingOwner { key: key.clone() })?;
                Ok(Write::Create(Application::new(
                    opportunity_id,
                    student_id,
                    org_id,
                    next,
                    now,
                )))
            }
            Some(existing) => {
                ensure_same_pair(&existing, opportunity_id, student_id)?;
                previous = Some(existing.status);
                Ok(Write::Patch(ApplicationPatch::status(next, now)))
            }
        })?;

        match previous {
            None => info!(
                application_key = %key,
                status = %next,
                actor,
                "application created by status change"
            ),
            Some(from) => {
                if !from.is_conventional_transition(next) {
                    debug!(
                        application_key = %key,
                        from = %from,
                        to = %next,
                        "status change outside the usual pipeline order"
                    );
                }
                info!(
                    application_key = %key,
                    from = %from,
                    status = %next,
                    actor,
                    "application status changed"
                );
            }
        }

        Ok(application)
    }
}

/// Ids containing `_` can produce the same composite key for two different pairs.
fn ensure_same_pair(
    existing: &Application,
    opportunity_id: &str,
    student_id: &str,
) -> Result<(), LifecycleError> {
    if existing.opportunity_id == opportunity_id && existing.student_id == student_id {
        Ok(())
    } else {
        Err(LifecycleError::KeyCollision {
            key: existing.key.clone(),
            opportunity_id: existing.opportunity_id.clone(),
            student_id: existing.student_id.clone(),
        })
    }
}

/// Error raised by the application lifecycle.
#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    #[error("application {key} does not exist and no owning organization was supplied")]
    MissingOwner { key: ApplicationKey },
    #[error(
        "application key {key} already belongs to opportunity {opportunity_id} and student {student_id}"
    )]
    KeyCollision {
        key: ApplicationKey,
        opportunity_id: String,
        student_id: String,
    },
    #[error(transparent)]
    Store(#[from] StoreError),
}
