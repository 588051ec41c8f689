use crate::cli::ServeArgs;
use crate::infra::{in_memory_lifecycle, AppState};
use crate::routes::with_service_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use opportunity_match::config::AppConfig;
use opportunity_match::error::AppError;
use opportunity_match::matching::WeightSettings;
use opportunity_match::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let lifecycle = in_memory_lifecycle(config.matching.reapply);
    let weights = WeightSettings::new(config.matching.weights);

    let app = with_service_routes(lifecycle, weights)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        skill_weight = config.matching.weights.skill(),
        tag_weight = config.matching.weights.tag(),
        reapply = ?config.matching.reapply,
        "opportunity match service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
