//! In-memory registry of identification sessions.
//!
//! Nothing persists; a restart drops every session.

use std::collections::HashMap;
use std::sync::Arc;

use finscope_agent::{FishAnalyzer, SharedSession};
use finscope_core::FinscopeError;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Clone, Default)]
pub struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<Uuid, SharedSession>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new, empty session.
    pub async fn create(&self) -> (Uuid, SharedSession) {
        let id = Uuid::new_v4();
        let session = FishAnalyzer::new_session();
        self.sessions.write().await.insert(id, Arc::clone(&session));
        (id, session)
    }

    pub async fn get(&self, id: &Uuid) -> Result<SharedSession, FinscopeError> {
        self.sessions
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| FinscopeError::SessionNotFound(id.to_string()))
    }

    /// Drop a session. Returns false if it did not exist.
    pub async fn remove(&self, id: &Uuid) -> bool {
        self.sessions.write().await.remove(id).is_some()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}
