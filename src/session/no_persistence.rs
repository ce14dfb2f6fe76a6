use async_trait::async_trait;

use super::SessionBackend;
use crate::models::Session;

/// A no-op backend used when persistence is disabled. Sessions live only
/// for the process lifetime; restore always finds nothing.
pub struct NoPersistence;

impl NoPersistence {
    pub fn new() -> Self {
        NoPersistence
    }
}

impl Default for NoPersistence {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionBackend for NoPersistence {
    async fn save(&self, _session: &Session) -> Result<(), String> {
        Ok(())
    }

    async fn load(&self) -> Result<Option<Session>, String> {
        Ok(None)
    }

    async fn clear(&self) -> Result<(), String> {
        Ok(())
    }

    fn is_enabled(&self) -> bool {
        false
    }
}
