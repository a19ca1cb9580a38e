use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::dashboard_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use lead_insights::config::AppConfig;
use lead_insights::error::AppError;
use lead_insights::telemetry;
use lead_insights::workflows::outreach::{InMemoryTableCache, LeadLoader, LeadTableSource};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if let Some(source) = args.source.take() {
        config.leads.source_path = source;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));

    let leads = Arc::new(LeadTableSource::new(
        LeadLoader::from_config(&config.leads),
        InMemoryTableCache::default(),
    ));
    match leads.load(&config.leads.source_path) {
        Ok(table) => info!(
            path = %config.leads.source_path.display(),
            records = table.len(),
            "lead spreadsheet preloaded"
        ),
        Err(err) => warn!(
            path = %config.leads.source_path.display(),
            error = %err,
            "lead spreadsheet unavailable at startup; dashboard will show a warning"
        ),
    }

    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        leads,
        source_path: Arc::new(config.leads.source_path.clone()),
    };

    let app = dashboard_routes()
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "lead dashboard service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
