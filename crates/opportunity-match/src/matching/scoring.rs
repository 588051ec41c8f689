use serde::{Deserialize, Serialize};

use super::overlap::{
    distinct_label_count, distinct_tag_count, overlap_labels, overlap_tags, Overlap,
};
use super::weights::MatchWeights;

/// A student's declared skills and thematic interests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillProfile {
    pub student_id: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub interests: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpportunityStatus {
    #[default]
    Open,
    Closed,
}

impl OpportunityStatus {
    pub const fn label(self) -> &'static str {
        match self {
            OpportunityStatus::Open => "open",
            OpportunityStatus::Closed => "closed",
        }
    }
}

/// What an opportunity asks of candidates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpportunityRequirements {
    pub opportunity_id: String,
    pub org_id: String,
    #[serde(default)]
    pub required_skills: Vec<String>,
    #[serde(default)]
    pub tags: Vec<u8>,
    #[serde(default)]
    pub status: OpportunityStatus,
}

/// Derived comparison of one student against one opportunity. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub subject_id: String,
    pub counterpart_id: String,
    pub skill_overlap: Vec<String>,
    pub tag_overlap: Vec<u8>,
    pub skill_overlap_count: usize,
    pub tag_overlap_count: usize,
    pub skill_ratio: f64,
    pub tag_ratio: f64,
    pub score: f64,
}

/// Scores `profile` against `requirements`.
///
/// Each ratio is the overlap count over the counterpart's requirement count, or 0 when the
/// counterpart requires nothing. The composite is `100 * (w_skill * skill + w_tag * tag)`,
/// rounded half-up to two decimals and kept within `[0, 100]`.
pub fn score_match(
    profile: &SkillProfile,
    requirements: &OpportunityRequirements,
    weights: &MatchWeights,
) -> MatchResult {
    let skills = overlap_labels(&profile.skills, &requirements.required_skills);
    let tags = overlap_tags(&profile.interests, &requirements.tags);

    let skill_ratio = ratio(&skills, distinct_label_count(&requirements.required_skills));
    let tag_ratio = ratio(&tags, distinct_tag_count(&requirements.tags));

    let raw = 100.0 * (weights.skill() * skill_ratio + weights.tag() * tag_ratio);
    let score = round_half_up(raw).clamp(0.0, 100.0);

    MatchResult {
        subject_id: profile.student_id.clone(),
        counterpart_id: requirements.opportunity_id.clone(),
        skill_overlap_count: skills.count,
        tag_overlap_count: tags.count,
        skill_overlap: skills.members,
        tag_overlap: tags.members,
        skill_ratio,
        tag_ratio,
        score,
    }
}

fn ratio<T>(overlap: &Overlap<T>, required: usize) -> f64 {
    if required == 0 {
        0.0
    } else {
        overlap.count as f64 / required as f64
    }
}

/// Two-decimal rounding with halves going up.
pub fn round_half_up(value: f64) -> f64 {
    (value * 100.0 + 0.5).floor() / 100.0
}
