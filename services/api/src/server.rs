use crate::cli::ServeArgs;
use crate::infra::{build_feedback_sink, build_screening_service, AppState};
use crate::routes::with_service_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use momly::companion::CompanionEngine;
use momly::config::AppConfig;
use momly::error::AppError;
use momly::telemetry;
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

    let screenings = build_screening_service(&config.screening);
    let companion = Arc::new(CompanionEngine::standard());
    let feedback = build_feedback_sink(&config.screening);

    let app = with_service_routes(screenings, companion, feedback)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, encoding = config.screening.support_encoding.name(), "momly screening service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
