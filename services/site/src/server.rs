use crate::cli::ServeArgs;
use crate::infra::{AppState, SessionRegistry, SiteState};
use crate::routes::site_router;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use carbon_intake::config::AppConfig;
use carbon_intake::error::AppError;
use carbon_intake::telemetry;
use carbon_intake::workflows::scoring::AnalysisProxy;
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

    telemetry::init(&config.telemetry, config.environment)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let site_state = SiteState {
        proxy: Arc::new(AnalysisProxy::new(&config.scoring)),
        sessions: SessionRegistry::new(config.session.idle_ttl),
    };

    let app = site_router(site_state)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        upstream = %config.scoring.api_url,
        session_ttl_minutes = config.session.idle_ttl.num_minutes(),
        "eligibility site ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
