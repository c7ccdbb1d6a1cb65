use crate::cli::ServeArgs;
use crate::infra::{sample_applications, AppState};
use crate::routes::with_board_package_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use board_package::config::AppConfig;
use board_package::error::AppError;
use board_package::telemetry;
use board_package::workflows::board_package::{
    BoardPackageService, InMemoryApplicationRepository, InMemoryOverrideRepository,
};
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

    let service = Arc::new(BoardPackageService::new(
        Arc::new(InMemoryApplicationRepository::default()),
        Arc::new(InMemoryOverrideRepository::default()),
        config.completeness,
    ));
    if args.seed_samples {
        for application in sample_applications() {
            service.register(application)?;
        }
    }

    let app = with_board_package_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        allow_warning_sections = config.completeness.allow_warning_sections,
        "board package service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
