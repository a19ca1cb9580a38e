use lead_insights::workflows::outreach::{InMemoryTableCache, LeadTableSource};
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

pub(crate) type SharedLeadSource = Arc<LeadTableSource<InMemoryTableCache>>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) leads: SharedLeadSource,
    pub(crate) source_path: Arc<PathBuf>,
}
