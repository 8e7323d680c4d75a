//! The session store seam and its in-memory implementation.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::config::{AccessToken, StoreHash};
use crate::session::{SessionError, SessionId};

/// The credentials bound to one session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionData {
    /// Store the session operates on.
    pub store_hash: StoreHash,
    /// Token for that store.
    pub access_token: AccessToken,
}

/// Key-value storage for session data, owned by the web layer.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Reads the data bound to a session.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Backend`] if the store cannot be read.
    async fn get(&self, id: &SessionId) -> Result<Option<SessionData>, SessionError>;

    /// Replaces the data bound to a session.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Backend`] if the store cannot be written.
    async fn put(&self, id: &SessionId, data: SessionData) -> Result<(), SessionError>;

    /// Removes a session's data.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Backend`] if the store cannot be written.
    async fn forget(&self, id: &SessionId) -> Result<(), SessionError>;
}

/// A [`SessionStore`] backed by a `HashMap`.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<SessionId, SessionData>>,
}

impl MemorySessionStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get(&self, id: &SessionId) -> Result<Option<SessionData>, SessionError> {
        Ok(self.sessions.read().await.get(id).cloned())
    }

    async fn put(&self, id: &SessionId, data: SessionData) -> Result<(), SessionError> {
        self.sessions.write().await.insert(id.clone(), data);
        Ok(())
    }

    async fn forget(&self, id: &SessionId) -> Result<(), SessionError> {
        self.sessions.write().await.remove(id);
        Ok(())
    }
}
