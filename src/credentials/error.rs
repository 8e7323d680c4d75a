//! Credential store error types.

use thiserror::Error;

/// Errors returned by a [`CredentialStore`](super::CredentialStore).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CredentialError {
    /// No record exists for the (email, store) pair.
    #[error("No credential record for '{user_email}' in store '{store_hash}'")]
    NotFound {
        /// Email half of the lookup key.
        user_email: String,
        /// Store half of the lookup key.
        store_hash: String,
    },

    /// The backing store failed.
    #[error("Credential store backend error: {0}")]
    Backend(String),
}
