use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Store key for an application: `{opportunity_id}_{student_id}`.
///
/// One key per pair means a second create for the same pair lands on the same record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApplicationKey(pub String);

impl ApplicationKey {
    pub fn new(opportunity_id: &str, student_id: &str) -> Self {
        Self(format!("{opportunity_id}_{student_id}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ApplicationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Hiring pipeline status. Any status may follow any other when set by a reviewer;
/// [`ApplicationStatus::conventional_next`] only describes the usual path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Applied,
    Shortlisted,
    Contacted,
    Rejected,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 4] = [
        ApplicationStatus::Applied,
        ApplicationStatus::Shortlisted,
        ApplicationStatus::Contacted,
        ApplicationStatus::Rejected,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Applied => "applied",
            ApplicationStatus::Shortlisted => "shortlisted",
            ApplicationStatus::Contacted => "contacted",
            ApplicationStatus::Rejected => "rejected",
        }
    }

    /// Statuses a re-apply must never move away from.
    pub const fn is_advanced(self) -> bool {
        matches!(
            self,
            ApplicationStatus::Shortlisted | ApplicationStatus::Contacted
        )
    }

    pub const fn conventional_next(self) -> &'static [ApplicationStatus] {
        match self {
            ApplicationStatus::Applied => {
                &[ApplicationStatus::Shortlisted, ApplicationStatus::Rejected]
            }
            ApplicationStatus::Shortlisted => {
                &[ApplicationStatus::Contacted, ApplicationStatus::Rejected]
            }
            ApplicationStatus::Contacted => &[ApplicationStatus::Rejected],
            ApplicationStatus::Rejected => {
                &[ApplicationStatus::Applied, ApplicationStatus::Shortlisted]
            }
        }
    }

    pub fn is_conventional_transition(self, next: ApplicationStatus) -> bool {
        self == next || self.conventional_next().contains(&next)
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown application status '{0}'")]
pub struct UnknownStatus(pub String);

impl FromStr for ApplicationStatus {
    type Err = UnknownStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        ApplicationStatus::ALL
            .into_iter()
            .find(|status| status.label() == normalized)
            .ok_or_else(|| UnknownStatus(value.to_string()))
    }
}

/// Stored application for one (opportunity, student) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    pub key: ApplicationKey,
    pub opportunity_id: String,
    pub student_id: String,
    /// Copied from the opportunity when the record is first created.
    pub org_id: String,
    pub status: ApplicationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Application {
    pub fn new(
        opportunity_id: &str,
        student_id: &str,
        org_id: &str,
        status: ApplicationStatus,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            key: ApplicationKey::new(opportunity_id, student_id),
            opportunity_id: opportunity_id.to_string(),
            student_id: student_id.to_string(),
            org_id: org_id.to_string(),
            status,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update merged onto an existing record. `None` fields are left as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ApplicationStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub org_id: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl ApplicationPatch {
    pub fn status(status: ApplicationStatus, now: DateTime<Utc>) -> Self {
        Self {
            status: Some(status),
            org_id: None,
            updated_at: now,
        }
    }

    pub fn apply_to(&self, application: &mut Application) {
        if let Some(status) = self.status {
            application.status = status;
        }
        if let Some(org_id) = &self.org_id {
            application.org_id = org_id.clone();
        }
        application.updated_at = self.updated_at;
    }
}

/// What `apply` does when a record for the pair already exists in a non-advanced status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReapplyPolicy {
    /// Rewrite the status to `applied`, keeping `created_at` and `org_id`.
    #[default]
    ResetToApplied,
    /// Return the stored record untouched.
    KeepExisting,
}

impl FromStr for ReapplyPolicy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "reset" | "reset_to_applied" => Ok(Self::ResetToApplied),
            "keep" | "keep_existing" => Ok(Self::KeepExisting),
            other => Err(other.to_string()),
        }
    }
}
