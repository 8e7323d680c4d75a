//! Errors raised while verifying a signed payload.

use thiserror::Error;

/// Errors that can occur while verifying a `signed_payload`.
///
/// The two variants are deliberately distinct for logging: a
/// [`VerifyError::SignatureMismatch`] means someone presented a payload that
/// was not signed with the app's secret and is a security event, while a
/// [`VerifyError::MalformedPayload`] is usually a truncated or mangled
/// request. End users should see the same message for both.
///
/// # Example
///
/// ```rust
/// use bigcommerce_app::auth::signed_payload::VerifyError;
///
/// let error = VerifyError::MalformedPayload {
///     reason: "missing '.' delimiter".to_string(),
/// };
/// assert!(error.to_string().contains("delimiter"));
/// assert!(!error.is_security_event());
/// assert!(VerifyError::SignatureMismatch.is_security_event());
/// ```
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VerifyError {
    /// The payload could not be split, decoded, or parsed, or lacks a
    /// required field.
    #[error("Malformed signed payload: {reason}")]
    MalformedPayload {
        /// What was wrong with the payload.
        reason: String,
    },

    /// The signature does not match the HMAC of the payload data.
    #[error("Signed payload signature does not match")]
    SignatureMismatch,
}

impl VerifyError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedPayload {
            reason: reason.into(),
        }
    }

    /// Returns `true` if the failure indicates a forged or tampered payload.
    #[must_use]
    pub const fn is_security_event(&self) -> bool {
        matches!(self, Self::SignatureMismatch)
    }
}

// Verify VerifyError is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<VerifyError>();
};
