//! Application startup and server initialization.
//!
//! This module handles the creation and configuration of the HTTP server,
//! including initialization of the session store, access policy, gate, and
//! route setup.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use crate::config::ConfigV1;
use crate::gate::{Gate, PreviewMode};
use crate::metrics::Metrics;
use crate::policy::{create_profile_source, AccessPolicy};
use crate::routes;
use crate::session::{create_session_backend, SessionStore};
use crate::state::AppState;

/// Initializes and runs the application server.
///
/// Sets up the session store, access policy, and HTTP server with
/// configured routes. Session restoration runs in the background so the
/// gate can answer (with a loading state) from the first request on.
///
/// # Errors
///
/// Returns an error if the server fails to bind to the specified address
/// or encounters a runtime error during execution.
pub async fn run(config: Arc<ConfigV1>) -> Result<(), Box<dyn std::error::Error>> {
    let backend = create_session_backend(&config.store).await;
    let sessions = Arc::new(SessionStore::new(
        &config.providers,
        backend,
        config.auth.clone(),
        config.jwt.clone(),
    ));

    // Restore the persisted session without holding up the server; the
    // store settles to Anonymous or Authenticated on its own.
    let restoring = sessions.clone();
    tokio::spawn(async move {
        restoring.initialize().await;
    });

    let source = create_profile_source(&config.profiles).await;
    let policy = Arc::new(AccessPolicy::new(
        source,
        config.auth.profile_timeout_in_ms,
    ));

    let gate = Arc::new(Gate::new(
        sessions.clone(),
        policy.clone(),
        PreviewMode::from_config(&config.preview),
    ));

    info!("Starting server on {}", config.bind_address);

    let state = AppState {
        config: config.clone(),
        sessions,
        policy,
        gate,
        metrics: Metrics::new(),
    };

    let app = routes::create_router(state);

    let listener = TcpListener::bind(&config.bind_address)
        .await
        .expect("Could not bind to specified address");

    axum::serve(listener, app).await?;

    Ok(())
}
