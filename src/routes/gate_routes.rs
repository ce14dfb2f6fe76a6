//! Gate decision endpoint handlers.

use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use crate::gate::GateDecision;
use crate::metrics::MetricsRecorder;
use crate::state::AppState;

/// Registers gate routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/gate/decision", get(decision))
}

#[derive(Deserialize)]
struct DecisionQuery {
    path: String,
}

fn decision_label(decision: &GateDecision) -> &'static str {
    match decision {
        GateDecision::Render => "render",
        GateDecision::Loading => "loading",
        GateDecision::Redirect { .. } => "redirect",
        GateDecision::Superseded => "superseded",
    }
}

/// Runs the gate algorithm for the requested path.
///
/// The request `Host` header feeds the preview shim; everything else comes
/// from the session store and the access policy.
async fn decision(
    State(state): State<AppState>,
    Query(query): Query<DecisionQuery>,
    headers: HeaderMap,
) -> Json<GateDecision> {
    let host = headers.get("host").and_then(|value| value.to_str().ok());
    let decision = state.gate.decide(&query.path, host).await;
    state.metrics.record_gate_decision(decision_label(&decision));
    Json(decision)
}
