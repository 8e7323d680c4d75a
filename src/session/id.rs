//! Browser session identifiers.

use rand::RngCore;
use std::fmt;

/// Number of random bytes in a generated id.
const SESSION_ID_BYTES: usize = 32;

/// Identifies one browser session.
///
/// The id is opaque to this crate; the web layer reads it from a cookie and
/// passes it into every flow. [`SessionId::generate`] produces 64 lowercase
/// hex characters from the thread-local CSPRNG.
///
/// # Example
///
/// ```rust
/// use bigcommerce_app::session::SessionId;
///
/// let id = SessionId::generate();
/// let value: &str = id.as_ref();
/// assert_eq!(value.len(), 64);
/// assert_ne!(id, SessionId::generate());
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    /// Wraps an id received from the client.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generates a fresh random id.
    #[must_use]
    pub fn generate() -> Self {
        let mut bytes = [0u8; SESSION_ID_BYTES];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(hex::encode(bytes))
    }
}

impl AsRef<str> for SessionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// Session ids are bearer values; keep them out of logs
impl fmt::Debug for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionId(*****)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_hex() {
        let id = SessionId::generate();
        let value: &str = id.as_ref();
        assert_eq!(value.len(), SESSION_ID_BYTES * 2);
        assert!(value.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_debug_hides_value() {
        let id = SessionId::new("abc");
        assert_eq!(format!("{id:?}"), "SessionId(*****)");
    }
}
