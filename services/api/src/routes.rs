use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::{Extension, Json};
use opportunity_match::applications::{application_router, ApplicationLifecycle};
use opportunity_match::matching::{match_router, InterestTag, WeightSettings};
use opportunity_match::store::RecordStore;
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_service_routes<S>(
    lifecycle: Arc<ApplicationLifecycle<S>>,
    weights: WeightSettings,
) -> axum::Router
where
    S: RecordStore + 'static,
{
    application_router(lifecycle)
        .merge(match_router(weights))
        .route("/api/v1/tags", axum::routing::get(tag_catalog))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn tag_catalog() -> Json<&'static [InterestTag]> {
    Json(InterestTag::catalog())
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
