use tracing::debug;

use super::scoring::{score_match, MatchResult, OpportunityRequirements, SkillProfile};
use super::weights::MatchWeights;

/// Ranks every opportunity for one student, best score first.
///
/// Equal scores keep their input order. Nothing is filtered out here; callers pass only the
/// opportunities the student may see.
pub fn rank_counterparts_for_subject(
    subject: &SkillProfile,
    counterparts: &[OpportunityRequirements],
    weights: &MatchWeights,
) -> Vec<MatchResult> {
    let results = counterparts
        .iter()
        .map(|requirements| score_match(subject, requirements, weights))
        .collect();
    debug!(
        student_id = %subject.student_id,
        candidates = counterparts.len(),
        "ranking opportunities for student"
    );
    sorted_by_score(results)
}

/// Ranks candidate students against one opportunity. Mirror of
/// [`rank_counterparts_for_subject`] with the same ordering rules.
pub fn rank_subjects_for_counterpart(
    counterpart: &OpportunityRequirements,
    subjects: &[SkillProfile],
    weights: &MatchWeights,
) -> Vec<MatchResult> {
    let results = subjects
        .iter()
        .map(|profile| score_match(profile, counterpart, weights))
        .collect();
    debug!(
        opportunity_id = %counterpart.opportunity_id,
        candidates = subjects.len(),
        "ranking students for opportunity"
    );
    sorted_by_score(results)
}

fn sorted_by_score(mut results: Vec<MatchResult>) -> Vec<MatchResult> {
    // `sort_by` is stable, so ties stay in input order.
    results.sort_by(|left, right| right.score.total_cmp(&left.score));
    results
}
