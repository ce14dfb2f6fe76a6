use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{watch, Mutex};
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::config::{AuthConfig, JWTConfig};
use crate::models::{Identity, Session};
use crate::providers::{
    create_credential_provider, AuthError, AuthErrorKind, CredentialProvider, ProviderConfig,
};
use crate::session::SessionBackend;

/// Where the store is in its lifecycle. `Unresolved` is the only initial
/// state; `initialize` terminates in `Anonymous` or `Authenticated`.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SessionPhase {
    #[default]
    Unresolved,
    Anonymous,
    Authenticated(Identity),
}

/// A settled snapshot of the store. The version bumps on every transition,
/// so readers can tell two states apart even when the phase repeats.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub phase: SessionPhase,
    pub version: u64,
}

impl SessionState {
    pub fn is_loading(&self) -> bool {
        matches!(self.phase, SessionPhase::Unresolved)
    }

    pub fn identity(&self) -> Option<&Identity> {
        match &self.phase {
            SessionPhase::Authenticated(identity) => Some(identity),
            _ => None,
        }
    }
}

/// The single source of truth for "who is signed in right now".
///
/// All mutation funnels through `initialize`, `sign_in`, and `sign_out`;
/// the gate and the policy only read snapshots. State is published through
/// a watch channel, so subscribers always observe the latest settled state
/// and never a torn intermediate one.
pub struct SessionStore {
    providers: Vec<Box<dyn CredentialProvider>>,
    backend: Arc<dyn SessionBackend>,
    auth_config: AuthConfig,
    jwt_config: JWTConfig,
    state: watch::Sender<SessionState>,
    // Serializes mutations so rapid repeated sign-ins resolve
    // last-writer-wins with a single surviving session.
    write_lock: Mutex<()>,
}

impl SessionStore {
    /// Initialize the store by creating providers from the configurations.
    /// The store starts `Unresolved`; call `initialize` to settle it.
    pub fn new(
        provider_config: &[ProviderConfig],
        backend: Arc<dyn SessionBackend>,
        auth_config: AuthConfig,
        jwt_config: JWTConfig,
    ) -> Self {
        info!("Creating credential providers...");
        let providers = provider_config
            .iter()
            .map(create_credential_provider)
            .collect();

        let (state, _) = watch::channel(SessionState::default());

        SessionStore {
            providers,
            backend,
            auth_config,
            jwt_config,
            state,
            write_lock: Mutex::new(()),
        }
    }

    /// The latest settled state. Synchronous; never blocks.
    pub fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Subscribe to state transitions.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    fn transition(&self, phase: SessionPhase) {
        self.state.send_modify(|state| {
            debug!("Session transition: {:?} -> {:?}", state.phase, phase);
            state.phase = phase;
            state.version += 1;
        });
    }

    /// Attempt to restore a previously persisted session. Bounded by
    /// `restore_timeout_in_ms`; on timeout or backend failure the terminal
    /// state is `Anonymous`, never a stuck `Unresolved`.
    pub async fn initialize(&self) {
        let _guard = self.write_lock.lock().await;

        let restore_timeout = Duration::from_millis(self.auth_config.restore_timeout_in_ms);
        let loaded = match timeout(restore_timeout, self.backend.load()).await {
            Ok(Ok(loaded)) => loaded,
            Ok(Err(e)) => {
                warn!("Session restore failed: {}", e);
                self.transition(SessionPhase::Anonymous);
                return;
            }
            Err(_) => {
                warn!(
                    "Session restore timed out after {}ms",
                    self.auth_config.restore_timeout_in_ms
                );
                self.transition(SessionPhase::Anonymous);
                return;
            }
        };

        let session = match loaded {
            Some(session) => session,
            None => {
                debug!("No persisted session found.");
                self.transition(SessionPhase::Anonymous);
                return;
            }
        };

        match Identity::from_session_jwt(&session.token, &self.jwt_config) {
            Ok(identity) => {
                info!("Restored session for '{}'", identity.email);
                self.transition(SessionPhase::Authenticated(identity));
            }
            Err(e) => {
                // An expired or tampered session must not be restorable on
                // the next startup either.
                warn!("Persisted session rejected: {}", e);
                if let Err(e) = self.backend.clear().await {
                    warn!("Failed to clear rejected session: {}", e);
                }
                self.transition(SessionPhase::Anonymous);
            }
        }
    }

    /// Validate credentials against the configured providers, in order,
    /// each bounded by `sign_in_timeout_in_ms`. The first success wins; on
    /// total failure the most specific provider error is returned, so a
    /// definite `InvalidCredentials` is never masked by a later `Unknown`.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        let _guard = self.write_lock.lock().await;

        let provider_timeout = Duration::from_millis(self.auth_config.sign_in_timeout_in_ms);
        let mut best_error: Option<AuthError> = None;

        for provider in &self.providers {
            let name = provider.get_name();
            match timeout(provider_timeout, provider.sign_in(email, password)).await {
                Ok(Ok(identity)) => {
                    info!("Provider '{}' signed in '{}'", name, identity.email);
                    let session = Session::issue(identity.clone(), &self.jwt_config)
                        .map_err(AuthError::unknown)?;
                    if let Err(e) = self.backend.save(&session).await {
                        // Persistence is best-effort; the live session is
                        // still valid for this process.
                        warn!("Failed to persist session: {}", e);
                    }
                    self.transition(SessionPhase::Authenticated(identity.clone()));
                    return Ok(identity);
                }
                Ok(Err(e)) => {
                    debug!("Provider '{}' rejected sign-in: {}", name, e);
                    best_error = Some(prefer_specific(best_error, e));
                }
                Err(_) => {
                    warn!("Provider '{}' timed out during sign-in", name);
                    let timed_out = AuthError::unknown(format!("provider '{}' timed out", name));
                    best_error = Some(prefer_specific(best_error, timed_out));
                }
            }
        }

        Err(best_error
            .unwrap_or_else(|| AuthError::unknown("no credential providers configured")))
    }

    /// Clear the current session. Local state always clears, even when the
    /// backend invalidation fails; idempotent when already anonymous.
    pub async fn sign_out(&self) -> Result<(), AuthError> {
        let _guard = self.write_lock.lock().await;

        if matches!(self.state.borrow().phase, SessionPhase::Anonymous) {
            debug!("Sign-out requested while already anonymous.");
            return Ok(());
        }

        self.transition(SessionPhase::Anonymous);

        if let Err(e) = self.backend.clear().await {
            warn!("Failed to invalidate persisted session: {}", e);
        }
        Ok(())
    }
}

/// Keep the first specific error; only replace an `Unknown`.
fn prefer_specific(best: Option<AuthError>, candidate: AuthError) -> AuthError {
    match best {
        None => candidate,
        Some(best) => {
            if best.kind() == AuthErrorKind::Unknown && candidate.kind() != AuthErrorKind::Unknown {
                candidate
            } else {
                best
            }
        }
    }
}
