//! API proxy error types.
//!
//! Upstream error statuses are not errors here: a 404 from BigCommerce is
//! relayed as a 404 [`ProxiedResponse`](super::ProxiedResponse). Only
//! failures that leave no upstream response to relay become a
//! [`ProxyError`].

use thiserror::Error;

use crate::session::SessionError;

/// Errors that can occur while forwarding an API call.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// The session has no bound store hash or access token.
    #[error("Unauthenticated: no store credentials are bound to this session")]
    Unauthenticated,

    /// The endpoint contains a `..` segment that would leave the store path.
    #[error("Invalid endpoint '{endpoint}': path traversal is not allowed")]
    InvalidEndpoint {
        /// The rejected endpoint.
        endpoint: String,
    },

    /// BigCommerce could not be reached.
    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(#[from] reqwest::Error),

    /// The session store failed.
    #[error(transparent)]
    Session(#[from] SessionError),
}

impl ProxyError {
    /// Returns the HTTP status to answer the browser with.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Unauthenticated => 401,
            Self::InvalidEndpoint { .. } => 400,
            Self::UpstreamUnavailable(_) => 502,
            Self::Session(_) => 500,
        }
    }
}

// Verify ProxyError is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ProxyError>();
};
