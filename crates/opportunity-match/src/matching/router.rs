use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::eligibility::{open_opportunities, MatchFilter};
use super::ranking::{rank_counterparts_for_subject, rank_subjects_for_counterpart};
use super::scoring::{MatchResult, OpportunityRequirements, SkillProfile};
use super::weights::{WeightPair, WeightSettings};

/// Snapshot a student view ranks against. Closed openings are dropped before ranking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankOpportunitiesRequest {
    pub student: SkillProfile,
    #[serde(default)]
    pub opportunities: Vec<OpportunityRequirements>,
    #[serde(default)]
    pub filter: MatchFilter,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankStudentsRequest {
    pub opportunity: OpportunityRequirements,
    #[serde(default)]
    pub students: Vec<SkillProfile>,
    #[serde(default)]
    pub filter: MatchFilter,
}

/// Router builder exposing ranking and weight configuration endpoints.
pub fn match_router(settings: WeightSettings) -> Router {
    Router::new()
        .route(
            "/api/v1/matches/opportunities",
            post(rank_opportunities_handler),
        )
        .route("/api/v1/matches/students", post(rank_students_handler))
        .route(
            "/api/v1/settings/weights",
            get(weights_handler).put(update_weights_handler),
        )
        .with_state(settings)
}

pub(crate) async fn rank_opportunities_handler(
    State(settings): State<WeightSettings>,
    Json(request): Json<RankOpportunitiesRequest>,
) -> Json<Vec<MatchResult>> {
    let RankOpportunitiesRequest {
        student,
        opportunities,
        filter,
    } = request;

    let eligible = filter.retain_opportunities(open_opportunities(opportunities));
    let ranked = rank_counterparts_for_subject(&student, &eligible, &settings.current());
    Json(filter.retain_scores(ranked))
}

pub(crate) async fn rank_students_handler(
    State(settings): State<WeightSettings>,
    Json(request): Json<RankStudentsRequest>,
) -> Json<Vec<MatchResult>> {
    let RankStudentsRequest {
        opportunity,
        students,
        filter,
    } = request;

    let eligible = filter.retain_profiles(students);
    let ranked = rank_subjects_for_counterpart(&opportunity, &eligible, &settings.current());
    Json(filter.retain_scores(ranked))
}

pub(crate) async fn weights_handler(State(settings): State<WeightSettings>) -> Response {
    (StatusCode::OK, Json(settings.current())).into_response()
}

pub(crate) async fn update_weights_handler(
    State(settings): State<WeightSettings>,
    Json(pair): Json<WeightPair>,
) -> Response {
    match settings.update(pair) {
        Ok(weights) => (StatusCode::OK, Json(weights)).into_response(),
        Err(error) => {
            let payload = json!({
                "error": error.to_string(),
                "weights": settings.current(),
            });
            (StatusCode::BAD_REQUEST, Json(payload)).into_response()
        }
    }
}
