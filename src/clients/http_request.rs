//! Outbound request parts for the API proxy.

use std::fmt;

use serde::{Deserialize, Serialize};

/// HTTP methods the proxy forwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    /// HTTP GET.
    Get,
    /// HTTP POST.
    Post,
    /// HTTP PUT.
    Put,
    /// HTTP PATCH.
    Patch,
    /// HTTP DELETE.
    Delete,
}

impl HttpMethod {
    /// Returns `true` for methods whose request body is forwarded upstream.
    #[must_use]
    pub const fn carries_body(self) -> bool {
        matches!(self, Self::Post | Self::Put | Self::Patch)
    }

    pub(crate) const fn as_reqwest(self) -> reqwest::Method {
        match self {
            Self::Get => reqwest::Method::GET,
            Self::Post => reqwest::Method::POST,
            Self::Put => reqwest::Method::PUT,
            Self::Patch => reqwest::Method::PATCH,
            Self::Delete => reqwest::Method::DELETE,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => write!(f, "GET"),
            Self::Post => write!(f, "POST"),
            Self::Put => write!(f, "PUT"),
            Self::Patch => write!(f, "PATCH"),
            Self::Delete => write!(f, "DELETE"),
        }
    }
}

/// Error returned when parsing an unknown method name.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
#[error("Unsupported HTTP method '{0}'")]
pub struct UnsupportedMethod(pub String);

impl std::str::FromStr for HttpMethod {
    type Err = UnsupportedMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            "PATCH" => Ok(Self::Patch),
            "DELETE" => Ok(Self::Delete),
            _ => Err(UnsupportedMethod(s.to_string())),
        }
    }
}

/// Rewrites a client-supplied endpoint into the path appended to the store URL.
///
/// The leading `/` is dropped, and V2 endpoints get the `.json` suffix the
/// V2 API requires. V3 endpoints pass through unchanged.
///
/// # Example
///
/// ```rust
/// use bigcommerce_app::clients::normalize_endpoint;
///
/// assert_eq!(normalize_endpoint("/catalog/v2/products"), "catalog/v2/products.json");
/// assert_eq!(normalize_endpoint("v3/catalog/products"), "v3/catalog/products");
/// ```
#[must_use]
pub fn normalize_endpoint(endpoint: &str) -> String {
    let endpoint = endpoint.trim_start_matches('/');
    let (path, query) = match endpoint.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (endpoint, None),
    };

    let mut normalized = path.to_string();
    if path.contains("v2") && !path.ends_with(".json") {
        normalized.push_str(".json");
    }
    if let Some(query) = query {
        normalized.push('?');
        normalized.push_str(query);
    }
    normalized
}
