//! Binding of store credentials to browser sessions.
//!
//! Session state is never ambient: every operation takes the
//! [`SessionId`] of the request it serves, and the data lives in a
//! [`SessionStore`] the web layer provides. Concurrent requests for different
//! sessions therefore cannot see each other's credentials.

mod error;
mod id;
mod store;

pub use error::SessionError;
pub use id::SessionId;
pub use store::{MemorySessionStore, SessionData, SessionStore};

use std::sync::Arc;

use crate::config::{AccessToken, StoreHash};

/// Reads and writes the store hash and access token of a session.
///
/// A bind replaces whatever the session held before; the two fields are
/// never merged across binds.
///
/// # Example
///
/// ```rust,ignore
/// use bigcommerce_app::session::{MemorySessionStore, SessionBinder, SessionId};
///
/// let binder = SessionBinder::new(Arc::new(MemorySessionStore::new()));
/// let session = SessionId::generate();
/// binder.bind(&session, store_hash, access_token).await?;
/// assert!(binder.current_store_hash(&session).await?.is_some());
/// ```
#[derive(Clone)]
pub struct SessionBinder {
    store: Arc<dyn SessionStore>,
}

impl std::fmt::Debug for SessionBinder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionBinder").finish_non_exhaustive()
    }
}

impl SessionBinder {
    /// Creates a binder over the given store.
    #[must_use]
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// Binds a store and its token to the session, replacing prior values.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if the session store fails.
    pub async fn bind(
        &self,
        id: &SessionId,
        store_hash: StoreHash,
        access_token: AccessToken,
    ) -> Result<(), SessionError> {
        tracing::debug!(store_hash = %store_hash, "binding session");
        self.store
            .put(
                id,
                SessionData {
                    store_hash,
                    access_token,
                },
            )
            .await
    }

    /// Returns both bound values, if the session has them.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if the session store fails.
    pub async fn current(&self, id: &SessionId) -> Result<Option<SessionData>, SessionError> {
        self.store.get(id).await
    }

    /// Returns the store hash bound to the session.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if the session store fails.
    pub async fn current_store_hash(
        &self,
        id: &SessionId,
    ) -> Result<Option<StoreHash>, SessionError> {
        Ok(self.current(id).await?.map(|data| data.store_hash))
    }

    /// Returns the access token bound to the session.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if the session store fails.
    pub async fn current_access_token(
        &self,
        id: &SessionId,
    ) -> Result<Option<AccessToken>, SessionError> {
        Ok(self.current(id).await?.map(|data| data.access_token))
    }

    /// Drops everything bound to the session.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if the session store fails.
    pub async fn unbind(&self, id: &SessionId) -> Result<(), SessionError> {
        self.store.forget(id).await
    }
}
