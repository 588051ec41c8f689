//! CSV snapshots of opportunities and student profiles for offline ranking.
//!
//! Opportunity columns: `id,org_id,status,required_skills,tags`.
//! Profile columns: `id,skills,interests`. List cells are `;`-separated.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use super::scoring::{OpportunityRequirements, OpportunityStatus, SkillProfile};

#[derive(Debug)]
pub enum SnapshotError {
    Io(std::io::Error),
    Csv(csv::Error),
    InvalidTag { row: String, value: String },
    InvalidStatus { row: String, value: String },
}

impl std::fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SnapshotError::Io(err) => write!(f, "failed to read snapshot: {}", err),
            SnapshotError::Csv(err) => write!(f, "invalid snapshot CSV data: {}", err),
            SnapshotError::InvalidTag { row, value } => {
                write!(f, "row '{}' has a non-numeric tag '{}'", row, value)
            }
            SnapshotError::InvalidStatus { row, value } => {
                write!(
                    f,
                    "row '{}' has unknown status '{}' (expected open or closed)",
                    row, value
                )
            }
        }
    }
}

impl std::error::Error for SnapshotError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SnapshotError::Io(err) => Some(err),
            SnapshotError::Csv(err) => Some(err),
            SnapshotError::InvalidTag { .. } | SnapshotError::InvalidStatus { .. } => None,
        }
    }
}

impl From<std::io::Error> for SnapshotError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for SnapshotError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

#[derive(Debug, Deserialize)]
struct OpportunityRow {
    id: String,
    org_id: String,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    required_skills: String,
    #[serde(default)]
    tags: String,
}

#[derive(Debug, Deserialize)]
struct ProfileRow {
    id: String,
    #[serde(default)]
    skills: String,
    #[serde(default)]
    interests: String,
}

pub fn opportunities_from_path<P: AsRef<Path>>(
    path: P,
) -> Result<Vec<OpportunityRequirements>, SnapshotError> {
    let file = std::fs::File::open(path)?;
    opportunities_from_reader(file)
}

pub fn opportunities_from_reader<R: Read>(
    reader: R,
) -> Result<Vec<OpportunityRequirements>, SnapshotError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut opportunities = Vec::new();

    for record in csv_reader.deserialize::<OpportunityRow>() {
        let row = record?;
        let status = parse_status(&row.id, row.status.as_deref())?;
        let tags = split_tags(&row.id, &row.tags)?;

        opportunities.push(OpportunityRequirements {
            opportunity_id: row.id,
            org_id: row.org_id,
            required_skills: split_list(&row.required_skills),
            tags,
            status,
        });
    }

    Ok(opportunities)
}

pub fn profiles_from_path<P: AsRef<Path>>(path: P) -> Result<Vec<SkillProfile>, SnapshotError> {
    let file = std::fs::File::open(path)?;
    profiles_from_reader(file)
}

pub fn profiles_from_reader<R: Read>(reader: R) -> Result<Vec<SkillProfile>, SnapshotError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut profiles = Vec::new();

    for record in csv_reader.deserialize::<ProfileRow>() {
        let row = record?;
        let interests = split_tags(&row.id, &row.interests)?;
        profiles.push(SkillProfile {
            student_id: row.id,
            skills: split_list(&row.skills),
            interests,
        });
    }

    Ok(profiles)
}

pub fn split_list(cell: &str) -> Vec<String> {
    cell.split(';')
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_status(row: &str, cell: Option<&str>) -> Result<OpportunityStatus, SnapshotError> {
    let value = cell.map(str::trim).unwrap_or_default();
    match value.to_ascii_lowercase().as_str() {
        "" | "open" => Ok(OpportunityStatus::Open),
        "closed" => Ok(OpportunityStatus::Closed),
        _ => Err(SnapshotError::InvalidStatus {
            row: row.to_string(),
            value: value.to_string(),
        }),
    }
}

fn split_tags(row: &str, cell: &str) -> Result<Vec<u8>, SnapshotError> {
    split_list(cell)
        .into_iter()
        .map(|value| {
            value.parse::<u8>().map_err(|_| SnapshotError::InvalidTag {
                row: row.to_string(),
                value,
            })
        })
        .collect()
}
