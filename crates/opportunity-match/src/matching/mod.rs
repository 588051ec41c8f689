//! Overlap, scoring, and ranking of students against opportunities.
//!
//! Everything below the router is synchronous and free of shared state apart from
//! [`WeightSettings`], which only hands out copies of the validated weight pair.

pub mod eligibility;
pub mod overlap;
pub mod ranking;
pub mod router;
pub mod scoring;
pub mod snapshot;
pub mod tags;
pub mod weights;

pub use eligibility::{open_opportunities, MatchFilter};
pub use overlap::{normalize_label, overlap_labels, overlap_tags, Overlap};
pub use ranking::{rank_counterparts_for_subject, rank_subjects_for_counterpart};
pub use router::{match_router, RankOpportunitiesRequest, RankStudentsRequest};
pub use scoring::{
    score_match, MatchResult, OpportunityRequirements, OpportunityStatus, SkillProfile,
};
pub use snapshot::SnapshotError;
pub use tags::{normalize_tags, InterestTag, SUPPORTED_TAGS};
pub use weights::{InvalidWeightConfiguration, MatchWeights, WeightPair, WeightSettings};
