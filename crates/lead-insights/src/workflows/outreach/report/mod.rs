mod insights;
mod summary;
pub mod views;

pub use insights::generate_insights;
pub use summary::LeadReport;
