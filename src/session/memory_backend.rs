use async_trait::async_trait;
use tokio::sync::Mutex;

use super::SessionBackend;
use crate::models::Session;

/// An in-process backend holding the single current session. Survives
/// store re-initialization but not a process restart; the default choice
/// for tests and single-node development runs.
pub struct MemoryBackend {
    slot: Mutex<Option<Session>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        MemoryBackend {
            slot: Mutex::new(None),
        }
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionBackend for MemoryBackend {
    async fn save(&self, session: &Session) -> Result<(), String> {
        *self.slot.lock().await = Some(session.clone());
        Ok(())
    }

    async fn load(&self) -> Result<Option<Session>, String> {
        Ok(self.slot.lock().await.clone())
    }

    async fn clear(&self) -> Result<(), String> {
        *self.slot.lock().await = None;
        Ok(())
    }
}
