//! Session lifecycle endpoint handlers.

use std::time::Instant;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::metrics::MetricsRecorder;
use crate::models::Identity;
use crate::providers::AuthErrorKind;
use crate::session::SessionPhase;
use crate::state::AppState;
use crate::utils::http_helpers::HTTPError;

/// Registers session routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/session/sign-in", post(sign_in))
        .route("/session/sign-out", post(sign_out))
        .route("/session", get(current_session))
}

#[derive(Deserialize)]
struct SignInRequest {
    email: String,
    password: String,
}

#[derive(Serialize)]
struct SessionResponse {
    state: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    identity: Option<Identity>,
}

/// Signs the app instance in with the given credentials.
///
/// The response status is keyed to the error kind so the shell can show a
/// precise inline message without inspecting provider text.
async fn sign_in(
    State(state): State<AppState>,
    Json(body): Json<SignInRequest>,
) -> Result<Json<Identity>, HTTPError> {
    let started = Instant::now();
    match state.sessions.sign_in(&body.email, &body.password).await {
        Ok(identity) => {
            state.metrics.record_sign_in_attempt("success");
            state
                .metrics
                .record_sign_in_duration(started.elapsed().as_secs_f64(), "success");
            Ok(Json(identity))
        }
        Err(e) => {
            state.metrics.record_sign_in_attempt(e.code());
            state
                .metrics
                .record_sign_in_duration(started.elapsed().as_secs_f64(), "failure");
            warn!("Sign-in failed: {}", e);
            let status = match e.kind() {
                AuthErrorKind::InvalidCredentials => StatusCode::UNAUTHORIZED,
                AuthErrorKind::EmailNotVerified => StatusCode::FORBIDDEN,
                AuthErrorKind::Unknown => StatusCode::BAD_GATEWAY,
            };
            Err(HTTPError::new(status, e.user_message(), Some(e.code())))
        }
    }
}

/// Clears the current session. Always succeeds from the caller's point of
/// view; repeated calls are no-ops.
async fn sign_out(State(state): State<AppState>) -> Result<StatusCode, HTTPError> {
    state.sessions.sign_out().await.map_err(|e| {
        HTTPError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            e.user_message(),
            Some(e.code()),
        )
    })?;
    Ok(StatusCode::NO_CONTENT)
}

/// Reports the current session state.
async fn current_session(State(state): State<AppState>) -> Json<SessionResponse> {
    let snapshot = state.sessions.snapshot();
    let response = match snapshot.phase {
        SessionPhase::Unresolved => SessionResponse {
            state: "unresolved",
            identity: None,
        },
        SessionPhase::Anonymous => SessionResponse {
            state: "anonymous",
            identity: None,
        },
        SessionPhase::Authenticated(identity) => SessionResponse {
            state: "authenticated",
            identity: Some(identity),
        },
    };
    Json(response)
}
