use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::session::mongodb_backend::MongoDBBackendConfig;

/// A wrapper for the session-persistence configuration:
/// - enabled: if false, persistence is effectively disabled (NoPersistence).
/// - backend: the actual backend (memory, MongoDB, ...).
#[derive(Deserialize, Serialize, Debug, JsonSchema)]
pub struct StoreConfig {
    pub enabled: bool,
    #[serde(flatten)]
    pub backend: Option<StoreBackendConfig>,
}

/// The existing persistence backends. We differentiate them via a "type"
/// tag in the YAML.
#[derive(Deserialize, Serialize, Debug, JsonSchema)]
#[serde(tag = "type")]
pub enum StoreBackendConfig {
    #[serde(rename = "memory")]
    Memory,
    #[serde(rename = "mongo")]
    MongoDB(MongoDBBackendConfig),
}
