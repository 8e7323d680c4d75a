//! Session store error types.

use thiserror::Error;

/// Errors returned by a [`SessionStore`](super::SessionStore).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// The backing store failed.
    #[error("Session store backend error: {0}")]
    Backend(String),
}
