//! Metrics exposition endpoint.

use axum::extract::State;
use axum::routing::get;
use axum::Router;

use crate::state::AppState;

/// Registers metrics routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/metrics", get(render_metrics))
}

/// Renders all collected metrics in Prometheus text format.
async fn render_metrics(State(state): State<AppState>) -> String {
    state.metrics.render()
}
