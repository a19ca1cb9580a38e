//! Sales-lead outreach analytics: load a spreadsheet, aggregate response KPIs,
//! derive insights, and shape everything for a dashboard front-end.

pub mod cache;
pub mod domain;
pub mod loader;
pub mod presenter;
pub mod report;

/// Spreadsheet read when no source path is configured.
pub const DEFAULT_SOURCE_FILE: &str = "dashboard_rank.xlsx";

pub use cache::{InMemoryTableCache, LeadTableSource, TableCache};
pub use domain::{LeadRecord, LeadTable, OutcomeClass, YearMonth};
pub use loader::{LeadLoader, LoadDiagnostic, LoadError, LoadErrorKind, SourceCell};
pub use presenter::{DashboardView, RenderSummary};
pub use report::LeadReport;
