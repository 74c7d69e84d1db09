//! API route definitions
//!
//! Organizes endpoints for the fracboard dashboard:
//! - /api/v1/dashboard - Full payload (wells, stock, KPI, errors)
//! - /api/v1/kpi - KPI aggregates
//! - /api/v1/wells - Normalized wells
//! - /api/v1/stock - Stock lines
//! - /api/v1/status - Poller statistics
//! - /api/v1/preferences - UI preference lists

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{self, DashboardState};

/// Create all API routes for the dashboard
pub fn api_routes(state: DashboardState) -> Router {
    Router::new()
        .route("/dashboard", get(handlers::get_dashboard))
        .route("/kpi", get(handlers::get_kpi))
        .route("/wells", get(handlers::get_wells))
        .route("/stock", get(handlers::get_stock))
        .route("/status", get(handlers::get_status))
        .route("/preferences", get(handlers::get_preferences))
        .route("/preferences", post(handlers::update_preferences))
        .with_state(state)
}

/// Legacy health endpoint at root level
pub fn legacy_routes() -> Router {
    Router::new().route("/health", get(handlers::health_check))
}
