//! HMAC-SHA256 signing and constant-time comparison for signed payloads.
//!
//! BigCommerce signs the JSON body of a load payload with the app's client
//! secret and sends the lowercase hex digest, base64-encoded, as the second
//! half of `signed_payload`.
//!
//! # Security
//!
//! Signatures are always compared with [`constant_time_eq`], which inspects
//! every byte of both inputs regardless of where the first difference is.
//!
//! # Example
//!
//! ```rust
//! use bigcommerce_app::auth::signed_payload::hmac::{compute_signature, constant_time_eq};
//!
//! let signature = compute_signature(br#"{"user":{"id":1}}"#, "client-secret");
//! assert_eq!(signature.len(), 64);
//! assert!(constant_time_eq(signature.as_bytes(), signature.as_bytes()));
//! ```

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Computes the lowercase hex HMAC-SHA256 of `message` keyed by `secret`.
///
/// `message` is the raw decoded payload bytes, never the base64 text.
///
/// # Example
///
/// ```rust
/// use bigcommerce_app::auth::signed_payload::hmac::compute_signature;
///
/// let sig = compute_signature(b"message", "key");
/// assert_eq!(sig, "6e9ef29b75fffc5b7abae527d58fdadb2fe42e7219011976917343065f58ed4a");
/// ```
#[must_use]
#[allow(clippy::missing_panics_doc)] // HMAC accepts any key size, so this never panics
pub fn compute_signature(message: &[u8], secret: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(message);
    hex::encode(mac.finalize().into_bytes())
}

/// Compares two byte strings in constant time.
///
/// Inputs of different lengths compare unequal without revealing how much of
/// the shorter one matched.
#[must_use]
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.ct_eq(b).into()
}

/// Returns `true` if `signature` is the hex HMAC of `message` under `secret`.
#[must_use]
pub fn signature_matches(message: &[u8], signature: &[u8], secret: &str) -> bool {
    let expected = compute_signature(message, secret);
    constant_time_eq(expected.as_bytes(), signature)
}
