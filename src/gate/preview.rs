use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// PreviewConfig controls the full-bypass preview mode.
///
/// `enabled: true` is the supported switch: an explicit deployment-time
/// decision to run the instance gateless. The `hosts` list is a
/// compatibility shim matching the request hostname against known preview
/// domains; both default off so the bypass can never ship by accident.
#[derive(Deserialize, Serialize, Debug, JsonSchema, Clone, Default)]
pub struct PreviewConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub hosts: Vec<String>,
}

/// Decides whether preview mode applies to a request. Pure hostname
/// inspection; no network, no state.
pub struct PreviewMode {
    enabled: bool,
    hosts: Vec<String>,
}

impl PreviewMode {
    pub fn from_config(config: &PreviewConfig) -> Self {
        if config.enabled {
            warn!("Preview mode is enabled: the access gate is bypassed for every request.");
        }
        PreviewMode {
            enabled: config.enabled,
            hosts: config.hosts.iter().map(|h| h.to_lowercase()).collect(),
        }
    }

    /// True when the instance-wide flag is set, or the request host matches
    /// a configured preview domain exactly or as a subdomain.
    pub fn is_active(&self, host: Option<&str>) -> bool {
        if self.enabled {
            return true;
        }
        let host = match host {
            Some(host) => host,
            None => return false,
        };
        // Ports are not part of the match.
        let host = host.split(':').next().unwrap_or("").to_lowercase();
        self.hosts
            .iter()
            .any(|p| host == *p || host.ends_with(&format!(".{}", p)))
    }
}
