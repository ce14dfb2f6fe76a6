use std::collections::HashMap;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::models::{AccessProfile, Page};
use crate::policy::ProfileSource;

/// PlainSourceConfig inlines the authorization data: a master list and a
/// per-identity page assignment map.
#[derive(Deserialize, Serialize, Debug, JsonSchema, Clone)]
pub struct PlainSourceConfig {
    /// A friendly name for logs.
    pub name: String,
    /// Identity ids with unrestricted access.
    #[serde(default)]
    pub masters: Vec<String>,
    /// Identity id -> pages that identity may visit.
    #[serde(default)]
    pub assignments: HashMap<String, Vec<Page>>,
}

/// A `PlainSource` that serves profiles straight from configuration.
pub struct PlainSource {
    pub config: PlainSourceConfig,
}

impl PlainSource {
    /// Create a new `PlainSource` from the config struct.
    pub fn new(config: &PlainSourceConfig) -> Self {
        info!("Creating PlainSource '{}'", config.name);
        Self {
            config: config.clone(),
        }
    }
}

#[async_trait]
impl ProfileSource for PlainSource {
    fn get_name(&self) -> &str {
        &self.config.name
    }

    fn get_type(&self) -> &str {
        "plain"
    }

    /// Look the identity up in the config. Unknown identities get the
    /// locked profile rather than an error; absence of assignments is a
    /// valid configuration, not a failure.
    async fn fetch_profile(&self, identity_id: &str) -> Result<AccessProfile, String> {
        if self.config.masters.iter().any(|m| m == identity_id) {
            debug!("'{}' is a master identity", identity_id);
            return Ok(AccessProfile::master());
        }

        let allowed_pages = self
            .config
            .assignments
            .get(identity_id)
            .cloned()
            .unwrap_or_default();

        Ok(AccessProfile {
            is_master: false,
            allowed_pages,
        })
    }
}

#[cfg(test)]
mod tests {
    use figment::providers::{Format, Yaml};
    use figment::Figment;

    use super::*;

    fn make_test_config() -> PlainSourceConfig {
        let config_str = r#"
name: TestSource
masters:
    - m1
assignments:
    u1:
        - inventory
        - reports
    u2: []
"#;
        Figment::new()
            .merge(Yaml::string(config_str))
            .extract()
            .expect("Failed to parse test config")
    }

    #[tokio::test]
    async fn test_master_identity() {
        let source = PlainSource::new(&make_test_config());
        let profile = source.fetch_profile("m1").await.expect("fetch");
        assert!(profile.is_master);
    }

    #[tokio::test]
    async fn test_assigned_pages() {
        let source = PlainSource::new(&make_test_config());
        let profile = source.fetch_profile("u1").await.expect("fetch");
        assert!(!profile.is_master);
        assert_eq!(profile.allowed_pages, vec![Page::Inventory, Page::Reports]);
    }

    #[tokio::test]
    async fn test_empty_assignment() {
        let source = PlainSource::new(&make_test_config());
        let profile = source.fetch_profile("u2").await.expect("fetch");
        assert!(!profile.is_master);
        assert!(profile.allowed_pages.is_empty());
    }

    /// Unknown identities resolve to the locked profile, not an error.
    #[tokio::test]
    async fn test_unknown_identity_is_locked() {
        let source = PlainSource::new(&make_test_config());
        let profile = source.fetch_profile("stranger").await.expect("fetch");
        assert_eq!(profile, AccessProfile::locked());
    }

    #[tokio::test]
    async fn test_get_name_type() {
        let source = PlainSource::new(&make_test_config());
        assert_eq!(source.get_name(), "TestSource");
        assert_eq!(source.get_type(), "plain");
    }
}
