use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use crate::gate::preview::PreviewMode;
use crate::models::page::{first_segment, Page};
use crate::policy::{is_allowed, AccessPolicy};
use crate::session::{SessionPhase, SessionStore};

/// Route the gate redirects anonymous visitors to.
pub const LOGIN_PATH: &str = "/auth";
/// Default landing page for denied navigations.
pub const DEFAULT_PATH: &str = "/dashboard";

const ACCESS_DENIED_NOTICE: &str = "You do not have access to that page.";

/// The outcome of one navigation through the gate.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum GateDecision {
    /// Render the requested view.
    Render,
    /// The session is still resolving; show a neutral placeholder. Neither
    /// the protected view nor a redirect may appear yet.
    Loading,
    /// Navigate elsewhere, replacing history so back cannot re-enter the
    /// gated page.
    Redirect {
        target: String,
        replace: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        notice: Option<String>,
    },
    /// A newer navigation started while this decision was resolving; its
    /// side effects must not fire.
    Superseded,
}

impl GateDecision {
    fn to_login() -> Self {
        GateDecision::Redirect {
            target: LOGIN_PATH.to_string(),
            replace: true,
            notice: None,
        }
    }

    fn to_default_denied() -> Self {
        GateDecision::Redirect {
            target: DEFAULT_PATH.to_string(),
            replace: true,
            notice: Some(ACCESS_DENIED_NOTICE.to_string()),
        }
    }
}

/// Routes that never require authentication.
fn is_public(path: &str) -> bool {
    matches!(
        first_segment(path),
        "" | "auth" | "terms" | "privacy" | "refund"
    )
}

/// The single enforcement point in front of every protected view.
///
/// Reads the session store and the access policy; never mutates either.
/// Decisions are recomputed per navigation and never cached.
pub struct Gate {
    sessions: Arc<SessionStore>,
    policy: Arc<AccessPolicy>,
    preview: PreviewMode,
    navigations: AtomicU64,
}

impl Gate {
    pub fn new(sessions: Arc<SessionStore>, policy: Arc<AccessPolicy>, preview: PreviewMode) -> Self {
        Gate {
            sessions,
            policy,
            preview,
            navigations: AtomicU64::new(0),
        }
    }

    /// Decide render vs. redirect for a navigation to `path`. `host` is the
    /// request hostname, consulted only by the preview shim.
    pub async fn decide(&self, path: &str, host: Option<&str>) -> GateDecision {
        let navigation = self.navigations.fetch_add(1, Ordering::SeqCst) + 1;

        // Preview mode short-circuits before anything else, including the
        // loading state.
        if self.preview.is_active(host) {
            debug!("Preview mode active; rendering '{}' unchecked", path);
            return GateDecision::Render;
        }

        if is_public(path) {
            return GateDecision::Render;
        }

        let state = self.sessions.snapshot();
        let identity = match state.phase {
            SessionPhase::Unresolved => return GateDecision::Loading,
            SessionPhase::Anonymous => {
                debug!("Anonymous navigation to '{}'; redirecting to login", path);
                return GateDecision::to_login();
            }
            SessionPhase::Authenticated(identity) => identity,
        };

        let profile = self.policy.resolve_profile(Some(&identity)).await;

        // A newer navigation may have started while the profile lookup was
        // in flight; its decision wins and this one must not fire.
        if self.navigations.load(Ordering::SeqCst) != navigation {
            debug!("Navigation to '{}' superseded during profile lookup", path);
            return GateDecision::Superseded;
        }

        match Page::from_path(path) {
            Some(page) if is_allowed(&profile, page) => GateDecision::Render,
            _ => {
                info!(
                    "Access denied for '{}' on '{}'; redirecting to {}",
                    identity.email, path, DEFAULT_PATH
                );
                GateDecision::to_default_denied()
            }
        }
    }
}
