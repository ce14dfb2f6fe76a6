use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;
use tracing::warn;

use crate::models::{AccessProfile, Identity, Page};
use crate::policy::ProfileSource;

/// Pages every authenticated identity may visit regardless of role
/// configuration, so account management can never be locked out by a
/// misconfigured assignment.
pub const ALWAYS_ALLOWED: [Page; 3] = [Page::Profile, Page::Settings, Page::Dashboard];

/// Translates an Identity (or its absence) into an authorization decision
/// for a specific page. Resolution fails closed: no identity, a source
/// error, or a timeout all produce the locked profile.
pub struct AccessPolicy {
    source: Arc<dyn ProfileSource>,
    lookup_timeout: Duration,
}

impl AccessPolicy {
    pub fn new(source: Arc<dyn ProfileSource>, lookup_timeout_in_ms: u64) -> Self {
        AccessPolicy {
            source,
            lookup_timeout: Duration::from_millis(lookup_timeout_in_ms),
        }
    }

    /// Resolve the authorization view of an identity, bounded by the
    /// lookup timeout. Never errors; failures degrade to the locked
    /// profile and a warning.
    pub async fn resolve_profile(&self, identity: Option<&Identity>) -> AccessProfile {
        let identity = match identity {
            Some(identity) => identity,
            None => return AccessProfile::locked(),
        };

        match timeout(self.lookup_timeout, self.source.fetch_profile(&identity.id)).await {
            Ok(Ok(profile)) => profile,
            Ok(Err(e)) => {
                warn!(
                    "Profile source '{}' failed for '{}': {}",
                    self.source.get_name(),
                    identity.id,
                    e
                );
                AccessProfile::locked()
            }
            Err(_) => {
                warn!(
                    "Profile source '{}' timed out for '{}'",
                    self.source.get_name(),
                    identity.id
                );
                AccessProfile::locked()
            }
        }
    }
}

/// Whether a profile may visit a page. Pure: depends only on its inputs.
/// Masters pass unconditionally; everyone else needs the page in the
/// always-allowed set or in their explicit allow-list.
pub fn is_allowed(profile: &AccessProfile, page: Page) -> bool {
    if profile.is_master {
        return true;
    }
    ALWAYS_ALLOWED.contains(&page) || profile.allowed_pages.contains(&page)
}
