use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use lead_insights::error::AppError;
use lead_insights::workflows::outreach::{
    DashboardView, LeadLoader, LeadReport, LeadTable, LoadError,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::io::{self, Cursor};
use std::sync::Arc;
use tracing::{info, warn};

const INLINE_SOURCE: &str = "inline.csv";

#[derive(Debug, Deserialize)]
pub(crate) struct LeadReportRequest {
    pub(crate) csv: String,
    #[serde(default)]
    pub(crate) include_report: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct LeadReportResponse {
    pub(crate) dashboard: DashboardView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) report: Option<LeadReport>,
}

pub(crate) fn dashboard_routes() -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/leads/dashboard", get(dashboard_endpoint))
        .route("/api/v1/leads/refresh", post(refresh_endpoint))
        .route("/api/v1/leads/report", post(lead_report_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
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

/// Spreadsheet reads block, so they run on the blocking pool.
async fn read_source(
    state: &AppState,
    reload: bool,
) -> Result<Result<Arc<LeadTable>, LoadError>, AppError> {
    let leads = state.leads.clone();
    let path = state.source_path.clone();
    tokio::task::spawn_blocking(move || {
        if reload {
            leads.reload(&path)
        } else {
            leads.load(&path)
        }
    })
    .await
    .map_err(|err| AppError::Io(io::Error::other(err)))
}

/// Answers 200 for any load failure; the spreadsheet problem becomes the
/// view's warning.
pub(crate) async fn dashboard_endpoint(
    Extension(state): Extension<AppState>,
) -> Result<Json<DashboardView>, AppError> {
    let view = match read_source(&state, false).await? {
        Ok(table) => DashboardView::from_table(&table),
        Err(err) => {
            warn!(
                path = %state.source_path.display(),
                error = %err,
                "serving dashboard without lead data"
            );
            DashboardView::from_outcome(Err(&err))
        }
    };
    Ok(Json(view))
}

pub(crate) async fn refresh_endpoint(
    Extension(state): Extension<AppState>,
) -> Result<Json<DashboardView>, AppError> {
    let table = read_source(&state, true).await??;
    info!(
        path = %state.source_path.display(),
        records = table.len(),
        "lead spreadsheet reloaded"
    );
    Ok(Json(DashboardView::from_table(&table)))
}

pub(crate) async fn lead_report_endpoint(
    Json(payload): Json<LeadReportRequest>,
) -> Result<Json<LeadReportResponse>, AppError> {
    let LeadReportRequest {
        csv,
        include_report,
    } = payload;

    let table = LeadLoader::new().load_csv(INLINE_SOURCE, Cursor::new(csv.into_bytes()))?;
    let report = LeadReport::build(&table);
    let mut dashboard = DashboardView::from_report(&report);
    dashboard.dropped_rows = table.dropped_rows();

    Ok(Json(LeadReportResponse {
        dashboard,
        report: include_report.then_some(report),
    }))
}
