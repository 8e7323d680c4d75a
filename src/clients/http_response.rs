//! The response relayed back to the browser.

use serde::Serialize;

/// Content type of every proxied response.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// An upstream response, or a locally generated error, ready to relay.
///
/// Upstream status and body are passed through untouched; no JSON parsing is
/// attempted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ProxiedResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body, verbatim.
    pub body: String,
    /// Always `application/json`.
    pub content_type: &'static str,
}

impl ProxiedResponse {
    /// Creates a JSON response.
    #[must_use]
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
            content_type: JSON_CONTENT_TYPE,
        }
    }

    /// Creates a `{"error": message}` response.
    #[must_use]
    pub fn error(status: u16, message: &str) -> Self {
        Self::new(status, serde_json::json!({ "error": message }).to_string())
    }

    /// Returns `true` for 2xx statuses.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.status >= 200 && self.status <= 299
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_body_is_json() {
        let response = ProxiedResponse::error(401, "Unauthenticated");
        let body: serde_json::Value = serde_json::from_str(&response.body).unwrap();
        assert_eq!(body["error"], "Unauthenticated");
        assert_eq!(response.content_type, "application/json");
        assert!(!response.is_ok());
    }

    #[test]
    fn test_body_is_not_reencoded() {
        let response = ProxiedResponse::new(200, "{ \"a\" :1 }");
        assert_eq!(response.body, "{ \"a\" :1 }");
        assert!(response.is_ok());
    }
}
