//! Shared application state, written by the poller and read by the API.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::kpi::KpiSummary;
use crate::types::NormalizedModel;

/// Latest normalized view of the data document plus poller bookkeeping.
///
/// Held behind `Arc<RwLock<...>>` and swapped wholesale on each refresh; the
/// model is never mutated in place.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AppState {
    /// Latest normalized model; `None` until the first successful refresh.
    pub model: Option<NormalizedModel>,

    /// KPI aggregates matching `model`.
    pub kpi: Option<KpiSummary>,

    /// Last fetch or parse failure, surfaced on the dashboard. Cleared on
    /// the next successful refresh; the previous model stays rendered.
    pub last_error: Option<String>,

    /// Timestamp of the last successful refresh.
    pub last_refresh: Option<DateTime<Utc>>,

    /// Total fetch attempts since startup.
    pub fetches: u64,

    /// Refreshes that actually replaced the model (document changed).
    pub refreshes: u64,

    /// Failed fetch attempts.
    pub fetch_errors: u64,
}
