//! Verification of the `signed_payload` BigCommerce posts to the load callback.
//!
//! A signed payload has the form `<base64 data>.<base64 signature>`, where the
//! data is a JSON document describing the user and store, and the signature is
//! the lowercase hex HMAC-SHA256 of the raw JSON bytes keyed by the app's
//! client secret.
//!
//! # Verification steps
//!
//! 1. Split on the first `.` into data and signature parts
//! 2. Base64-decode both parts (standard or URL-safe alphabet, padding optional)
//! 3. Parse the data as JSON
//! 4. Recompute the HMAC over the decoded data bytes
//! 5. Compare it with the decoded signature in constant time, retrying with
//!    the previous client secret during a rotation
//! 6. Extract the typed fields
//!
//! Failures in steps 1–3 and 6 are [`VerifyError::MalformedPayload`]; a
//! failure in step 5 is [`VerifyError::SignatureMismatch`].
//!
//! # Replay
//!
//! Verification proves the payload was produced by BigCommerce, not that it
//! is fresh. A captured payload verifies for as long as the secret is valid.
//!
//! # Example
//!
//! ```rust
//! use bigcommerce_app::auth::signed_payload::{sign_payload, verify_with_secret, VerifyError};
//! use serde_json::json;
//!
//! let data = json!({
//!     "user": {"id": 1, "email": "a@b.com", "locale": "en-US"},
//!     "owner": {"id": 1, "email": "a@b.com"},
//!     "context": "stores/abc123",
//!     "timestamp": 1_700_000_000
//! });
//! let signed = sign_payload(&data, "client-secret");
//!
//! let payload = verify_with_secret(&signed, "client-secret").unwrap();
//! assert_eq!(payload.store_hash().as_ref(), "stores/abc123");
//!
//! assert_eq!(
//!     verify_with_secret(&signed, "other-secret"),
//!     Err(VerifyError::SignatureMismatch)
//! );
//! ```

mod error;
pub mod hmac;
mod payload;

pub use error::VerifyError;
pub use payload::{PayloadOwner, PayloadUser, SignedPayload};

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, STANDARD};
use base64::engine::DecodePaddingMode;
use base64::Engine as _;

use crate::auth::secrets::SecretProvider;
use crate::config::ClientSecret;

const LENIENT: GeneralPurposeConfig =
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent);

const STANDARD_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::STANDARD, LENIENT);

const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::URL_SAFE, LENIENT);

/// Verifies a signed payload with the secrets of the running app.
///
/// The current client secret is tried first, then the previous one if the
/// provider has it.
///
/// # Errors
///
/// - [`VerifyError::MalformedPayload`] if the payload cannot be split, decoded
///   or parsed, or lacks a required field
/// - [`VerifyError::SignatureMismatch`] if no configured secret produced the
///   signature
pub fn verify_signed_payload(
    signed: &str,
    secrets: &dyn SecretProvider,
) -> Result<SignedPayload, VerifyError> {
    let secrets = std::iter::once(secrets.client_secret())
        .chain(secrets.previous_client_secret())
        .map(<ClientSecret as AsRef<str>>::as_ref);
    verify_with_secrets(signed, secrets)
}

/// Verifies a signed payload against a single secret.
///
/// # Errors
///
/// Same as [`verify_signed_payload`].
pub fn verify_with_secret(signed: &str, secret: &str) -> Result<SignedPayload, VerifyError> {
    verify_with_secrets(signed, std::iter::once(secret))
}

fn verify_with_secrets<'a>(
    signed: &str,
    secrets: impl IntoIterator<Item = &'a str>,
) -> Result<SignedPayload, VerifyError> {
    let (encoded_data, encoded_signature) = signed
        .split_once('.')
        .ok_or_else(|| VerifyError::malformed("missing '.' delimiter"))?;

    if encoded_data.is_empty() || encoded_signature.is_empty() {
        return Err(VerifyError::malformed("empty data or signature part"));
    }

    let data = decode_segment(encoded_data)
        .ok_or_else(|| VerifyError::malformed("data part is not valid base64"))?;
    let signature = decode_segment(encoded_signature)
        .ok_or_else(|| VerifyError::malformed("signature part is not valid base64"))?;

    let value: serde_json::Value = serde_json::from_slice(&data)
        .map_err(|e| VerifyError::malformed(format!("data part is not valid JSON: {e}")))?;

    let verified = secrets
        .into_iter()
        .any(|secret| hmac::signature_matches(&data, &signature, secret));
    if !verified {
        return Err(VerifyError::SignatureMismatch);
    }

    SignedPayload::from_value(value)
}

fn decode_segment(segment: &str) -> Option<Vec<u8>> {
    STANDARD_LENIENT
        .decode(segment)
        .or_else(|_| URL_SAFE_LENIENT.decode(segment))
        .ok()
}

/// Produces a signed payload for `data` the same way BigCommerce does.
///
/// Useful for local tooling and tests that need to drive the load flow.
#[must_use]
pub fn sign_payload(data: &serde_json::Value, secret: &str) -> String {
    let json = data.to_string();
    let signature = hmac::compute_signature(json.as_bytes(), secret);
    format!("{}.{}", STANDARD.encode(json), STANDARD.encode(signature))
}
