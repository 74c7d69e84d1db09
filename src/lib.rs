//! Fracboard: well fracturing progress monitor
//!
//! Polls a spreadsheet-export JSON document describing per-well fracturing
//! stages and stock levels, normalizes it into a stable per-well model, and
//! serves the model plus KPI aggregates over HTTP for the dashboard page.
//!
//! ## Architecture
//!
//! - **Normalizer**: pure transformation from the raw export to the model
//! - **KPI**: aggregate derivations (stages/day, today/yesterday, totals)
//! - **Pipeline**: timer-driven polling with change detection
//! - **Storage**: string-list preference persistence for the UI controls
//! - **API**: Axum endpoints plus the embedded dashboard page

pub mod api;
pub mod config;
pub mod kpi;
pub mod normalizer;
pub mod pipeline;
pub mod storage;
pub mod types;

// Re-export the core entry point
pub use normalizer::normalize;

// Re-export commonly used types
pub use kpi::KpiSummary;
pub use types::{NormalizedModel, NormalizedWell, RawDocument, Stage, StockItem, WELL_SLOTS};

// Re-export storage
pub use storage::{InMemoryPrefs, JsonFilePrefs, PreferenceError, PreferenceStore};
