//! REST API for projection results.
//!
//! Provides two GET endpoints:
//! - `/summary` — utility identity, final-year bills, and per-scenario deltas
//! - `/trajectory` — full year-by-year records with optional scenario and
//!   year-range filtering

mod handlers;
mod types;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::get;

use crate::model::market::MarketType;
use crate::model::summary::Summary;
use crate::model::types::Trajectory;

/// Immutable application state shared across all request handlers.
///
/// Constructed once after the projection completes and wrapped in `Arc` —
/// no locks needed since all data is read-only.
pub struct AppState {
    /// Utility display name.
    pub utility_name: String,
    /// Market structure of the utility under study.
    pub market: MarketType,
    /// Final-year comparison figures.
    pub summary: Summary,
    /// Complete multi-scenario projection.
    pub trajectory: Trajectory,
}

/// Builds the axum router with all API routes.
///
/// # Arguments
///
/// * `state` - Shared application state
///
/// # Returns
///
/// Configured `Router` ready to serve.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/summary", get(handlers::get_summary))
        .route("/trajectory", get(handlers::get_trajectory))
        .with_state(state)
}

/// Binds to the given address and serves the API.
///
/// # Arguments
///
/// * `state` - Shared application state
/// * `addr` - Socket address to bind to
///
/// # Panics
///
/// Panics if the TCP listener cannot bind to `addr`.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind to {addr}: {e}"));
    eprintln!("API server listening on http://{addr}");
    axum::serve(listener, app)
        .await
        .unwrap_or_else(|e| panic!("server error: {e}"));
}
