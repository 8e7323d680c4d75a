//! Validated newtype wrappers for configuration values and credentials.
//!
//! Each wrapper validates its contents on construction. The secret-bearing
//! types ([`ClientSecret`] and [`AccessToken`]) mask their value in `Debug`
//! output and do not implement `Serialize`, so they cannot leak through logs
//! or response bodies by accident.

use crate::error::ConfigError;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A validated BigCommerce app client id.
///
/// Sent as `client_id` during the token exchange and as the `X-Auth-Client`
/// header on proxied API calls.
///
/// # Example
///
/// ```rust
/// use bigcommerce_app::ClientId;
///
/// let id = ClientId::new("abc123").unwrap();
/// assert_eq!(id.as_ref(), "abc123");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientId(String);

impl ClientId {
    /// Creates a new validated client id.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyClientId`] if the id is empty.
    pub fn new(id: impl Into<String>) -> Result<Self, ConfigError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ConfigError::EmptyClientId);
        }
        Ok(Self(id))
    }
}

impl AsRef<str> for ClientId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A validated BigCommerce app client secret.
///
/// The secret keys the signed payload HMAC and authenticates the token
/// exchange. `Debug` prints `ClientSecret(*****)`.
///
/// # Example
///
/// ```rust
/// use bigcommerce_app::ClientSecret;
///
/// let secret = ClientSecret::new("my-secret").unwrap();
/// assert_eq!(format!("{:?}", secret), "ClientSecret(*****)");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct ClientSecret(String);

impl ClientSecret {
    /// Creates a new validated client secret.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyClientSecret`] if the secret is empty.
    pub fn new(secret: impl Into<String>) -> Result<Self, ConfigError> {
        let secret = secret.into();
        if secret.is_empty() {
            return Err(ConfigError::EmptyClientSecret);
        }
        Ok(Self(secret))
    }
}

impl AsRef<str> for ClientSecret {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ClientSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ClientSecret(*****)")
    }
}

/// A store-scoped API access token.
///
/// This type has no `Serialize` implementation and masks itself in `Debug`
/// output. The raw value is only reachable through [`AccessToken::expose`],
/// which the API proxy uses to build the `X-Auth-Token` header.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    /// Creates a new access token.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyAccessToken`] if the token is empty.
    pub fn new(token: impl Into<String>) -> Result<Self, ConfigError> {
        let token = token.into();
        if token.is_empty() {
            return Err(ConfigError::EmptyAccessToken);
        }
        Ok(Self(token))
    }

    /// Returns the raw token value.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(*****)")
    }
}

/// Identifies a merchant's store on BigCommerce.
///
/// The value is the `context` string BigCommerce sends during install and
/// load, e.g. `stores/abc123`. It is spliced into upstream API URLs, so only
/// ASCII alphanumerics, `-`, `_` and `/` are accepted, and every `/`-separated
/// segment must be non-empty.
///
/// # Example
///
/// ```rust
/// use bigcommerce_app::StoreHash;
///
/// let store = StoreHash::new("stores/abc123").unwrap();
/// assert_eq!(store.as_ref(), "stores/abc123");
/// assert!(StoreHash::new("stores/../admin").is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct StoreHash(String);

impl StoreHash {
    /// Creates a new validated store hash.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidStoreHash`] if the value is empty or
    /// contains characters or segments that are not allowed.
    pub fn new(value: impl Into<String>) -> Result<Self, ConfigError> {
        let value = value.into();
        let value = value.trim().to_string();

        if !Self::is_valid(&value) {
            return Err(ConfigError::InvalidStoreHash { value });
        }
        Ok(Self(value))
    }

    fn is_valid(value: &str) -> bool {
        if value.is_empty() {
            return false;
        }
        let allowed = value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '/');
        allowed && value.split('/').all(|segment| !segment.is_empty())
    }
}

impl AsRef<str> for StoreHash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StoreHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for StoreHash {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for StoreHash {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::new(s).map_err(de::Error::custom)
    }
}

/// The public base URL of the app (`APP_URL`).
///
/// Used to build the OAuth `redirect_uri` and error page links. A trailing
/// `/` is trimmed so paths can be appended directly.
///
/// # Example
///
/// ```rust
/// use bigcommerce_app::AppUrl;
///
/// let url = AppUrl::new("https://myapp.example.com/").unwrap();
/// assert_eq!(url.as_ref(), "https://myapp.example.com");
/// assert_eq!(url.join("/auth/install"), "https://myapp.example.com/auth/install");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppUrl(String);

impl AppUrl {
    /// Creates a new validated app URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidAppUrl`] if the URL has no scheme or host.
    pub fn new(url: impl Into<String>) -> Result<Self, ConfigError> {
        let url = url.into();
        let url = url.trim().trim_end_matches('/').to_string();

        let Some(scheme_end) = url.find("://") else {
            return Err(ConfigError::InvalidAppUrl { url });
        };

        let scheme = &url[..scheme_end];
        if scheme.is_empty() || !scheme.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ConfigError::InvalidAppUrl { url });
        }

        let remainder = &url[scheme_end + 3..];
        let host_end = remainder.find([':', '/', '?', '#']).unwrap_or(remainder.len());
        if remainder[..host_end].is_empty() {
            return Err(ConfigError::InvalidAppUrl { url });
        }

        Ok(Self(url))
    }

    /// Appends `path` to the base URL.
    #[must_use]
    pub fn join(&self, path: &str) -> String {
        format!("{}/{}", self.0, path.trim_start_matches('/'))
    }
}

impl AsRef<str> for AppUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
