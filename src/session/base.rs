use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info};

use super::memory_backend::MemoryBackend;
use super::mongodb_backend::MongoDBBackend;
use super::no_persistence::NoPersistence;
use crate::config::{StoreBackendConfig, StoreConfig};
use crate::models::Session;

/// The SessionBackend trait abstracts persistence of the current session,
/// so a restarted app instance can restore it on startup.
#[async_trait]
pub trait SessionBackend: Send + Sync {
    async fn save(&self, session: &Session) -> Result<(), String>;
    async fn load(&self) -> Result<Option<Session>, String>;
    async fn clear(&self) -> Result<(), String>;
    fn is_enabled(&self) -> bool {
        // Default implementation should return always True for real backends
        // NoPersistence will return false so we can write better debug messages
        true
    }
}

/// Creates a concrete backend based on the StoreConfig.
/// If `store.enabled = false`, returns NoPersistence. Otherwise, picks the
/// specified backend.
pub async fn create_session_backend(config: &StoreConfig) -> Arc<dyn SessionBackend> {
    if !config.enabled {
        info!("Session persistence is disabled. Using NoPersistence.");
        return Arc::new(NoPersistence::new());
    }

    match &config.backend {
        Some(StoreBackendConfig::Memory) => {
            info!("Using in-process memory session backend.");
            Arc::new(MemoryBackend::new())
        }
        Some(StoreBackendConfig::MongoDB(mongo_config)) => {
            match MongoDBBackend::new(mongo_config).await {
                Ok(backend) => {
                    info!("Successfully created MongoDB session backend.");
                    Arc::new(backend)
                }
                Err(e) => {
                    error!("Failed to create MongoDB session backend: {}", e);
                    std::process::exit(1);
                }
            }
        }
        None => {
            error!("Session persistence is enabled, but no backend config is provided!");
            std::process::exit(1);
        }
    }
}
