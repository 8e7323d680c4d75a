//! OAuth-specific error types.
//!
//! # Error Types
//!
//! - [`OAuthError::InvalidCallback`]: the install callback is missing parameters
//! - [`OAuthError::ExchangeFailed`]: the token endpoint rejected the exchange,
//!   answered with an unexpected body, or could not be reached
//!
//! # Example
//!
//! ```rust
//! use bigcommerce_app::auth::oauth::OAuthError;
//!
//! let error = OAuthError::ExchangeFailed {
//!     status: 400,
//!     body: r#"{"error":"invalid_grant"}"#.to_string(),
//! };
//! assert!(error.to_string().contains("400"));
//! assert!(!error.is_server_error());
//! ```

use thiserror::Error;

/// Errors that can occur during the install (authorization code) flow.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OAuthError {
    /// Callback parameters are missing or empty.
    #[error("Invalid install callback: {reason}")]
    InvalidCallback {
        /// Description of what's invalid about the callback.
        reason: String,
    },

    /// The authorization code could not be exchanged for an access token.
    ///
    /// `status` is the HTTP status of the token endpoint's answer, or `0`
    /// when no answer was received (connection failure, timeout).
    #[error("Token exchange failed with status {status}: {body}")]
    ExchangeFailed {
        /// The HTTP status code returned, `0` for transport failures.
        status: u16,
        /// The response body, or a description of the transport failure.
        body: String,
    },
}

impl OAuthError {
    /// Returns `true` if the failure is on BigCommerce's side or in transit.
    ///
    /// Bodies of such failures may describe server internals and should not be
    /// shown to merchants.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        match self {
            Self::ExchangeFailed { status, .. } => *status == 0 || *status >= 500,
            Self::InvalidCallback { .. } => false,
        }
    }
}

// Verify OAuthError is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<OAuthError>();
};
