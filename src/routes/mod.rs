//! HTTP route definitions and handlers.
//!
//! This module organizes all HTTP endpoints into logical groups:
//! session lifecycle, gate decisions, the page catalog, provider
//! information, health checks, and metrics.

mod gate_routes;
mod health_routes;
mod metrics_routes;
mod page_routes;
mod provider_routes;
mod session_routes;

use crate::state::AppState;
use axum::Router;

/// Creates the application router with all configured routes.
///
/// Combines all route modules into a single router and attaches
/// the application state for access in handlers.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(session_routes::routes())
        .merge(gate_routes::routes())
        .merge(page_routes::routes())
        .merge(provider_routes::routes())
        .merge(health_routes::routes())
        .merge(metrics_routes::routes())
        .with_state(state)
}
