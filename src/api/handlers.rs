//! HTTP handlers for the fracboard dashboard.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::warn;

use crate::kpi::{self, KpiSummary};
use crate::normalizer;
use crate::pipeline::state::AppState;
use crate::storage::{PreferenceError, PreferenceStore, KNOWN_KEYS};
use crate::types::{NormalizedModel, NormalizedWell, RawDocument, StockItem};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct DashboardState {
    /// Application state from the polling pipeline
    pub app_state: Arc<RwLock<AppState>>,
    /// Preference persistence for the dashboard controls
    pub prefs: Arc<dyn PreferenceStore>,
    /// Source description for the status endpoint (e.g. "file ./data.json")
    pub source: String,
    /// Poll interval in seconds
    pub poll_interval_secs: u64,
    /// Process start time, for uptime reporting
    pub started_at: DateTime<Utc>,
}

impl DashboardState {
    pub fn new(
        app_state: Arc<RwLock<AppState>>,
        prefs: Arc<dyn PreferenceStore>,
        source: String,
        poll_interval_secs: u64,
    ) -> Self {
        Self {
            app_state,
            prefs,
            source,
            poll_interval_secs,
            started_at: Utc::now(),
        }
    }
}

/// The well-shaped default model served before the first refresh: six empty
/// wells with synthesized names, so the table and controls render stably.
fn placeholder_model() -> NormalizedModel {
    normalizer::normalize(&RawDocument::default())
}

// ============================================================================
// Dashboard Endpoint
// ============================================================================

/// Everything the dashboard page renders, in one payload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub wells: Vec<NormalizedWell>,
    pub stock: Vec<StockItem>,
    pub last_update: Option<String>,
    pub kpi: KpiSummary,
    /// User-visible fetch error; the page shows it and keeps the previous
    /// table contents.
    pub last_error: Option<String>,
    pub last_refresh: Option<DateTime<Utc>>,
}

/// GET /api/v1/dashboard - Full dashboard payload
pub async fn get_dashboard(State(state): State<DashboardState>) -> Json<DashboardResponse> {
    let app_state = state.app_state.read().await;
    let model = app_state
        .model
        .clone()
        .unwrap_or_else(placeholder_model);
    let kpi = app_state
        .kpi
        .clone()
        .unwrap_or_else(|| kpi::compute(&model));

    Json(DashboardResponse {
        wells: model.wells,
        stock: model.stock,
        last_update: model.last_update,
        kpi,
        last_error: app_state.last_error.clone(),
        last_refresh: app_state.last_refresh,
    })
}

/// GET /api/v1/kpi - KPI aggregates only
pub async fn get_kpi(State(state): State<DashboardState>) -> Json<KpiSummary> {
    let app_state = state.app_state.read().await;
    let kpi = app_state
        .kpi
        .clone()
        .unwrap_or_else(|| kpi::compute(&placeholder_model()));
    Json(kpi)
}

/// GET /api/v1/wells - Normalized wells only
pub async fn get_wells(State(state): State<DashboardState>) -> Json<Vec<NormalizedWell>> {
    let app_state = state.app_state.read().await;
    let model = app_state.model.clone().unwrap_or_else(placeholder_model);
    Json(model.wells)
}

/// GET /api/v1/stock - Stock lines only
pub async fn get_stock(State(state): State<DashboardState>) -> Json<Vec<StockItem>> {
    let app_state = state.app_state.read().await;
    let model = app_state.model.clone().unwrap_or_else(placeholder_model);
    Json(model.stock)
}

// ============================================================================
// Status Endpoint
// ============================================================================

/// Poller and server health for the status endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    /// "running" once data has been served, "waiting for data" before
    pub system_status: String,
    /// Source description (kind + location)
    pub source: String,
    /// Poll interval in seconds
    pub poll_interval_secs: u64,
    /// Uptime in seconds
    pub uptime_secs: i64,
    /// Total fetch attempts
    pub fetches: u64,
    /// Refreshes that replaced the model
    pub refreshes: u64,
    /// Failed fetch attempts
    pub fetch_errors: u64,
    /// Last successful refresh timestamp
    pub last_refresh: Option<DateTime<Utc>>,
    /// Last fetch error, if the most recent poll failed
    pub last_error: Option<String>,
}

/// GET /api/v1/status - Poller statistics and system status
pub async fn get_status(State(state): State<DashboardState>) -> Json<StatusResponse> {
    let app_state = state.app_state.read().await;
    let system_status = if app_state.model.is_some() {
        "running"
    } else {
        "waiting for data"
    };

    Json(StatusResponse {
        system_status: system_status.to_string(),
        source: state.source.clone(),
        poll_interval_secs: state.poll_interval_secs,
        uptime_secs: (Utc::now() - state.started_at).num_seconds(),
        fetches: app_state.fetches,
        refreshes: app_state.refreshes,
        fetch_errors: app_state.fetch_errors,
        last_refresh: app_state.last_refresh,
        last_error: app_state.last_error.clone(),
    })
}

// ============================================================================
// Preference Endpoints
// ============================================================================

/// POST body for a preference update.
#[derive(Debug, Deserialize)]
pub struct PreferenceUpdate {
    pub key: String,
    pub values: Vec<String>,
}

/// GET /api/v1/preferences - All known preference lists
pub async fn get_preferences(
    State(state): State<DashboardState>,
) -> Json<HashMap<String, Vec<String>>> {
    let mut preferences = HashMap::with_capacity(KNOWN_KEYS.len());
    for &key in KNOWN_KEYS {
        match state.prefs.load(key) {
            Ok(values) => {
                preferences.insert(key.to_string(), values);
            }
            Err(error) => {
                warn!(key, error = %error, "Failed to load preference");
                preferences.insert(key.to_string(), Vec::new());
            }
        }
    }
    Json(preferences)
}

/// POST /api/v1/preferences - Replace one preference list
pub async fn update_preferences(
    State(state): State<DashboardState>,
    Json(update): Json<PreferenceUpdate>,
) -> Result<StatusCode, (StatusCode, String)> {
    // The file-backed store writes synchronously; keep that off the
    // async workers.
    let prefs = state.prefs.clone();
    let key = update.key.clone();
    let saved = tokio::task::spawn_blocking(move || prefs.save(&update.key, &update.values))
        .await
        .map_err(|error| {
            warn!(key = %key, error = %error, "Preference save task failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "failed to persist preference".to_string(),
            )
        })?;

    match saved {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(PreferenceError::UnknownKey(unknown)) => Err((
            StatusCode::BAD_REQUEST,
            format!("unknown preference key: {unknown}"),
        )),
        Err(error) => {
            warn!(key = %key, error = %error, "Failed to save preference");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                "failed to persist preference".to_string(),
            ))
        }
    }
}

// ============================================================================
// Health Endpoint
// ============================================================================

/// Legacy health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
}

/// GET /health - Liveness check
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        service: "fracboard".to_string(),
    })
}
