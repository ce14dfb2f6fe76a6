use std::sync::Arc;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::error;

use super::mongodb_source::{MongoDBSource, MongoDBSourceConfig};
use super::plain_source::{PlainSource, PlainSourceConfig};
use crate::models::AccessProfile;

/// Configuration options for each profile source.
#[derive(Deserialize, Serialize, JsonSchema, Debug)]
#[serde(tag = "type")]
pub enum SourceConfig {
    #[serde(rename = "plain")]
    Plain(PlainSourceConfig),

    #[serde(rename = "mongo")]
    MongoDB(MongoDBSourceConfig),
}

/// A profile source resolves an identity id into its authorization view.
/// Sources are read-only from this crate's perspective.
#[async_trait::async_trait]
pub trait ProfileSource: Send + Sync {
    fn get_name(&self) -> &str;
    fn get_type(&self) -> &str;
    async fn fetch_profile(&self, identity_id: &str) -> Result<AccessProfile, String>;
}

/// Create a profile source from a given config.
pub async fn create_profile_source(config: &SourceConfig) -> Arc<dyn ProfileSource> {
    match config {
        SourceConfig::Plain(cfg) => Arc::new(PlainSource::new(cfg)),
        SourceConfig::MongoDB(cfg) => match MongoDBSource::new(cfg).await {
            Ok(source) => Arc::new(source),
            Err(e) => {
                error!("Failed to create MongoDB profile source: {}", e);
                std::process::exit(1);
            }
        },
    }
}
