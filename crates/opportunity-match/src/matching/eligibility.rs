//! Caller-side filtering around the ranking pass.
//!
//! Ranking itself never drops anything; these helpers narrow the snapshot beforehand and trim
//! the ranked list afterwards.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::overlap::normalize_label;
use super::scoring::{MatchResult, OpportunityRequirements, OpportunityStatus, SkillProfile};

/// Keeps only opportunities that are still accepting applicants.
pub fn open_opportunities<I>(opportunities: I) -> Vec<OpportunityRequirements>
where
    I: IntoIterator<Item = OpportunityRequirements>,
{
    opportunities
        .into_iter()
        .filter(|opportunity| opportunity.status == OpportunityStatus::Open)
        .collect()
}

/// Optional narrowing criteria. Empty criteria admit everything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchFilter {
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub tags: Vec<u8>,
    #[serde(default)]
    pub min_score: Option<f64>,
}

impl MatchFilter {
    pub fn is_empty(&self) -> bool {
        self.skills.is_empty() && self.tags.is_empty() && self.min_score.is_none()
    }

    /// True when the opportunity declares any filter skill and any filter tag.
    pub fn admits_opportunity(&self, opportunity: &OpportunityRequirements) -> bool {
        self.admits_skills(&opportunity.required_skills) && self.admits_tags(&opportunity.tags)
    }

    pub fn admits_profile(&self, profile: &SkillProfile) -> bool {
        self.admits_skills(&profile.skills) && self.admits_tags(&profile.interests)
    }

    pub fn retain_opportunities(
        &self,
        opportunities: Vec<OpportunityRequirements>,
    ) -> Vec<OpportunityRequirements> {
        opportunities
            .into_iter()
            .filter(|opportunity| self.admits_opportunity(opportunity))
            .collect()
    }

    pub fn retain_profiles(&self, profiles: Vec<SkillProfile>) -> Vec<SkillProfile> {
        profiles
            .into_iter()
            .filter(|profile| self.admits_profile(profile))
            .collect()
    }

    /// Drops ranked entries under `min_score`, keeping ranked order.
    pub fn retain_scores(&self, mut ranked: Vec<MatchResult>) -> Vec<MatchResult> {
        if let Some(min_score) = self.min_score {
            ranked.retain(|result| result.score >= min_score);
        }
        ranked
    }

    fn admits_skills(&self, declared: &[String]) -> bool {
        if self.skills.is_empty() {
            return true;
        }
        let declared: HashSet<String> =
            declared.iter().map(|skill| normalize_label(skill)).collect();
        self.skills
            .iter()
            .any(|skill| declared.contains(&normalize_label(skill)))
    }

    fn admits_tags(&self, declared: &[u8]) -> bool {
        self.tags.is_empty() || self.tags.iter().any(|tag| declared.contains(tag))
    }
}
