use figment::providers::{Env, Format, Yaml};
use figment::Figment;
use schemars::{schema_for, JsonSchema};
use serde::{Deserialize, Serialize};

use super::logging::LoggingConfig;
use super::store::StoreConfig;
use crate::gate::PreviewConfig;
use crate::policy::SourceConfig;
use crate::providers::ProviderConfig;

/// A top-level enum for versioned configurations.
#[derive(Deserialize, Serialize, JsonSchema)]
#[serde(tag = "version")]
pub enum Config {
    #[serde(rename = "1.0.0")]
    ConfigV1(ConfigV1),
}

/// Main config for v1.0.0: providers, profile source, preview mode,
/// session persistence, and the ambient pieces.
#[derive(Deserialize, Serialize, Debug, JsonSchema)]
pub struct ConfigV1 {
    pub logging: LoggingConfig,
    pub auth: AuthConfig,
    pub providers: Vec<ProviderConfig>,
    pub profiles: SourceConfig,
    #[serde(default)]
    pub preview: PreviewConfig,
    pub store: StoreConfig,
    pub jwt: JWTConfig,
    pub bind_address: String,
}

/// Load config from "config.yaml" in the current directory, with
/// environment overrides under the SESSIONGATE_ prefix
/// (e.g. SESSIONGATE_BIND_ADDRESS).
pub fn load_config() -> ConfigV1 {
    let figment = Figment::new()
        .merge(Yaml::file("./config.yaml"))
        .merge(Env::prefixed("SESSIONGATE_").split("__"));
    let config = match figment.extract::<Config>() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            std::process::exit(1);
        }
    };
    match config {
        Config::ConfigV1(c) => c,
    }
}

/// Print the JSON schema for the configuration to stdout.
pub fn print_schema() {
    let schema = schema_for!(Config);
    println!("{}", serde_json::to_string_pretty(&schema).unwrap());
}

/// Timeouts bounding the store's suspension points, so no I/O failure can
/// leave the UI stuck in a loading state.
#[derive(Deserialize, Serialize, Debug, JsonSchema, Clone)]
pub struct AuthConfig {
    pub sign_in_timeout_in_ms: u64,
    pub restore_timeout_in_ms: u64,
    pub profile_timeout_in_ms: u64,
}

/// Signing parameters for session tokens.
#[derive(Deserialize, Serialize, Debug, JsonSchema, Clone)]
pub struct JWTConfig {
    pub iss: String,
    pub exp: i64,
    pub secret: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_CONFIG: &str = r#"
version: "1.0.0"
logging:
  level: "debug"
  format: "json"
auth:
  sign_in_timeout_in_ms: 3000
  restore_timeout_in_ms: 3000
  profile_timeout_in_ms: 3000
providers:
  - name: "Plain provider"
    type: "plain"
    users:
      - email: user@example.com
        password: password1
  - name: "Auth backend"
    type: "http"
    uri: https://auth.example.com
profiles:
  type: "plain"
  name: "Inline profiles"
  masters:
    - m1
  assignments:
    u1:
      - inventory
preview:
  hosts:
    - preview.example.com
store:
  enabled: true
  type: memory
jwt:
  iss: sessiongate-test
  exp: 3600
  secret: test-secret
bind_address: 127.0.0.1:8080
"#;

    /// The full fixture parses into ConfigV1 with every section populated.
    #[test]
    fn test_full_config_parses() {
        let config: Config = Figment::new()
            .merge(Yaml::string(FULL_CONFIG))
            .extract()
            .expect("config should parse");
        let config = match config {
            Config::ConfigV1(c) => c,
        };

        assert_eq!(config.providers.len(), 2);
        assert_eq!(config.bind_address, "127.0.0.1:8080");
        assert_eq!(config.auth.sign_in_timeout_in_ms, 3000);
        assert!(!config.preview.enabled);
        assert_eq!(config.preview.hosts, vec!["preview.example.com"]);
        assert!(config.store.enabled);
    }

    /// The preview section is optional and defaults to off.
    #[test]
    fn test_preview_section_optional() {
        let trimmed = FULL_CONFIG.replace(
            "preview:\n  hosts:\n    - preview.example.com\n",
            "",
        );
        let config: Config = Figment::new()
            .merge(Yaml::string(&trimmed))
            .extract()
            .expect("config should parse");
        let config = match config {
            Config::ConfigV1(c) => c,
        };
        assert!(!config.preview.enabled);
        assert!(config.preview.hosts.is_empty());
    }
}
