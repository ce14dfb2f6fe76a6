//! Shared application state.
//!
//! Contains the state that is shared across all request handlers,
//! including configuration, the session store, the access policy, and the
//! gate itself.

use crate::config::ConfigV1;
use crate::gate::Gate;
use crate::metrics::Metrics;
use crate::policy::AccessPolicy;
use crate::session::SessionStore;
use std::sync::Arc;

/// Application state shared across all HTTP handlers.
///
/// This state is cloned for each request handler. The session store is the
/// only mutable piece; the policy and the gate read from it.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded at startup.
    pub config: Arc<ConfigV1>,
    /// The single source of truth for the current session.
    pub sessions: Arc<SessionStore>,
    /// Authorization decisions for identities and pages.
    pub policy: Arc<AccessPolicy>,
    /// The enforcement point deciding render vs. redirect per navigation.
    pub gate: Arc<Gate>,
    /// Prometheus metrics recorder.
    pub metrics: Metrics,
}
