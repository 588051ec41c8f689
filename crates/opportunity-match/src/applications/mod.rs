//! Application lifecycle: idempotent apply, reviewer status changes, and withdrawal, keyed
//! by the (opportunity, student) pair.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    Application, ApplicationKey, ApplicationPatch, ApplicationStatus, ReapplyPolicy,
    UnknownStatus,
};
pub use repository::{ApplicationField, ApplicationRepository, APPLICATIONS_COLLECTION};
pub use router::{application_router, ApplyRequest, StatusRequest};
pub use service::{ApplicationLifecycle, LifecycleError};
