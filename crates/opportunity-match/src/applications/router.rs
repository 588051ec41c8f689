use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::domain::{Application, ApplicationKey, ApplicationStatus};
use super::service::{ApplicationLifecycle, LifecycleError};
use crate::error::AppError;
use crate::store::{RecordStore, StoreError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplyRequest {
    pub opportunity_id: String,
    pub student_id: String,
    pub org_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusRequest {
    pub status: ApplicationStatus,
    #[serde(default)]
    pub org_id: Option<String>,
}

/// Router builder exposing the application lifecycle over HTTP.
pub fn application_router<S>(lifecycle: Arc<ApplicationLifecycle<S>>) -> Router
where
    S: RecordStore + 'static,
{
    Router::new()
        .route("/api/v1/applications", post(apply_handler::<S>))
        .route(
            "/api/v1/applications/:opportunity_id/:student_id",
            get(get_handler::<S>),
        )
        .route(
            "/api/v1/applications/:opportunity_id/:student_id/status",
            put(status_handler::<S>),
        )
        .route(
            "/api/v1/applications/:opportunity_id/:student_id/withdraw",
            post(withdraw_handler::<S>),
        )
        .route(
            "/api/v1/opportunities/:opportunity_id/applications",
            get(by_opportunity_handler::<S>),
        )
        .route(
            "/api/v1/organizations/:org_id/applications",
            get(by_organization_handler::<S>),
        )
        .route(
            "/api/v1/students/:student_id/applications",
            get(by_student_handler::<S>),
        )
        .with_state(lifecycle)
}

pub(crate) async fn apply_handler<S>(
    State(lifecycle): State<Arc<ApplicationLifecycle<S>>>,
    Json(request): Json<ApplyRequest>,
) -> Response
where
    S: RecordStore + 'static,
{
    match lifecycle.apply(&request.opportunity_id, &request.student_id, &request.org_id) {
        Ok(application) => (StatusCode::OK, Json(application)).into_response(),
        Err(error) => lifecycle_error_response(error),
    }
}

pub(crate) async fn get_handler<S>(
    State(lifecycle): State<Arc<ApplicationLifecycle<S>>>,
    Path((opportunity_id, student_id)): Path<(String, String)>,
) -> Response
where
    S: RecordStore + 'static,
{
    match lifecycle.get(&opportunity_id, &student_id) {
        Ok(Some(application)) => (StatusCode::OK, Json(application)).into_response(),
        Ok(None) => {
            let payload = json!({
                "error": "application not found",
                "key": ApplicationKey::new(&opportunity_id, &student_id),
            });
            (StatusCode::NOT_FOUND, Json(payload)).into_response()
        }
        Err(error) => lifecycle_error_response(error),
    }
}

pub(crate) async fn status_handler<S>(
    State(lifecycle): State<Arc<ApplicationLifecycle<S>>>,
    Path((opportunity_id, student_id)): Path<(String, String)>,
    Json(request): Json<StatusRequest>,
) -> Response
where
    S: RecordStore + 'static,
{
    match lifecycle.set_status(
        &opportunity_id,
        &student_id,
        request.status,
        request.org_id.as_deref(),
    ) {
        Ok(application) => (StatusCode::OK, Json(application)).into_response(),
        Err(error) => lifecycle_error_response(error),
    }
}

pub(crate) async fn withdraw_handler<S>(
    State(lifecycle): State<Arc<ApplicationLifecycle<S>>>,
    Path((opportunity_id, student_id)): Path<(String, String)>,
) -> Response
where
    S: RecordStore + 'static,
{
    match lifecycle.withdraw(&opportunity_id, &student_id) {
        Ok(application) => (StatusCode::OK, Json(application)).into_response(),
        Err(error) => lifecycle_error_response(error),
    }
}

pub(crate) async fn by_opportunity_handler<S>(
    State(lifecycle): State<Arc<ApplicationLifecycle<S>>>,
    Path(opportunity_id): Path<String>,
) -> Result<Json<Vec<Application>>, AppError>
where
    S: RecordStore + 'static,
{
    Ok(Json(lifecycle.by_opportunity(&opportunity_id)?))
}

pub(crate) async fn by_organization_handler<S>(
    State(lifecycle): State<Arc<ApplicationLifecycle<S>>>,
    Path(org_id): Path<String>,
) -> Result<Json<Vec<Application>>, AppError>
where
    S: RecordStore + 'static,
{
    Ok(Json(lifecycle.by_organization(&org_id)?))
}

pub(crate) async fn by_student_handler<S>(
    State(lifecycle): State<Arc<ApplicationLifecycle<S>>>,
    Path(student_id): Path<String>,
) -> Result<Json<Vec<Application>>, AppError>
where
    S: RecordStore + 'static,
{
    Ok(Json(lifecycle.by_student(&student_id)?))
}

fn lifecycle_error_response(error: LifecycleError) -> Response {
    let status = match &error {
        LifecycleError::MissingOwner { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        LifecycleError::KeyCollision { .. } => StatusCode::CONFLICT,
        LifecycleError::Store(StoreError::Unavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
        LifecycleError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let payload = json!({
        "error": error.to_string(),
    });
    (status, Json(payload)).into_response()
}
