use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::models::page::Page;

/// The authorization view of an Identity: a master flag plus the explicit
/// allow-list of pages the identity may visit.
///
/// A profile is recomputed whenever the identity changes; it is never
/// persisted by this crate, only fetched from a profile source.
#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, Default, PartialEq)]
pub struct AccessProfile {
    /// Masters bypass every per-page check.
    pub is_master: bool,
    #[serde(default)]
    pub allowed_pages: Vec<Page>,
}

impl AccessProfile {
    /// The fail-closed profile: not a master, no pages. Used whenever the
    /// identity is absent or the profile lookup fails or times out.
    pub fn locked() -> Self {
        AccessProfile {
            is_master: false,
            allowed_pages: Vec::new(),
        }
    }

    /// An unrestricted master profile.
    pub fn master() -> Self {
        AccessProfile {
            is_master: true,
            allowed_pages: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locked_profile_is_empty() {
        let profile = AccessProfile::locked();
        assert!(!profile.is_master);
        assert!(profile.allowed_pages.is_empty());
    }

    #[test]
    fn test_deserialize_defaults_allowed_pages() {
        let profile: AccessProfile =
            serde_json::from_str(r#"{"is_master": true}"#).expect("profile should deserialize");
        assert!(profile.is_master);
        assert!(profile.allowed_pages.is_empty());
    }
}
