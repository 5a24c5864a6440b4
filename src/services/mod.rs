//! Service layer for orchestration concerns around the algorithms.
//!
//! Holds the result cache that keeps repeated dashboard interactions from
//! re-running expensive model fits, and the dashboard summary statistics.

pub mod cache;
pub mod insights;

pub use cache::{series_key, AnalysisCache};
pub use insights::{summarize_table, TableSummary};
