//! REST API over the delivery planner.
//!
//! Provides three GET endpoints:
//! - `/plans`: delivery plans for a week (`?week=YYYY-MM-DD&mode=...`)
//! - `/summary`: the same plans grouped by weekday
//! - `/holidays`: configured holidays

mod handlers;
mod types;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use chrono::NaiveDate;
use tracing::info;

use crate::config::PlannerConfig;
use crate::model::SchoolActivities;

/// Immutable application state shared across all request handlers.
///
/// Plans are rebuilt on every request from this snapshot; nothing is cached
/// and no locks are needed.
pub struct AppState {
    /// Planner configuration (default week, mode, holidays).
    pub config: PlannerConfig,
    /// Ingested schools.
    pub schools: Vec<SchoolActivities>,
    /// Date used when a request gives no valid week.
    pub today: NaiveDate,
}

/// Builds the axum router with all API routes.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/plans", get(handlers::get_plans))
        .route("/summary", get(handlers::get_summary))
        .route("/holidays", get(handlers::get_holidays))
        .with_state(state)
}

/// Binds to the given address and serves the API.
///
/// # Errors
///
/// Returns an `io::Error` if the listener cannot bind or the server fails.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> std::io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "API server listening");
    axum::serve(listener, app).await
}
