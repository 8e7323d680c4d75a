//! Persistence of per-user, per-store credentials.
//!
//! # Overview
//!
//! - [`CredentialRecord`]: one (user email, store hash) pairing and its token
//! - [`NewCredential`] / [`CredentialUpdate`]: create and partial-update inputs
//! - [`CredentialStore`]: the async persistence seam
//! - [`MemoryCredentialStore`]: the bundled in-memory implementation
//!
//! Records are always addressed by both the user email and the store hash.
//! Looking up by only one of them could hand one merchant's token to another.
//!
//! # Example
//!
//! ```rust
//! use bigcommerce_app::credentials::{CredentialStore, MemoryCredentialStore, NewCredential};
//! use bigcommerce_app::StoreHash;
//!
//! # tokio_test_block_on(async {
//! let store = MemoryCredentialStore::new();
//! let hash = StoreHash::new("stores/abc").unwrap();
//! store.create(NewCredential::new(1, "a@b.com", hash.clone())).await.unwrap();
//! assert!(store.find_by_identity("a@b.com", &hash).await.unwrap().is_some());
//! # });
//! # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```

mod error;
mod memory;
mod record;

pub use error::CredentialError;
pub use memory::MemoryCredentialStore;
pub use record::{CredentialRecord, CredentialUpdate, NewCredential};

use async_trait::async_trait;

use crate::config::StoreHash;

/// Async persistence for [`CredentialRecord`]s.
///
/// Implementations must make each `update` atomic for its record; racing
/// updates may resolve in any order but never interleave field by field.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Looks up the record for a (user email, store hash) pair.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::Backend`] if the store cannot be read.
    async fn find_by_identity(
        &self,
        user_email: &str,
        store_hash: &StoreHash,
    ) -> Result<Option<CredentialRecord>, CredentialError>;

    /// Inserts a new record and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::Backend`] if the record cannot be written,
    /// including when the pair already exists.
    async fn create(&self, new: NewCredential) -> Result<CredentialRecord, CredentialError>;

    /// Applies a partial update to an existing record.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::NotFound`] if no record matches the pair.
    async fn update(
        &self,
        user_email: &str,
        store_hash: &StoreHash,
        update: CredentialUpdate,
    ) -> Result<(), CredentialError>;
}

// Verify credential types are Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<CredentialRecord>();
    assert_send_sync::<MemoryCredentialStore>();
};
