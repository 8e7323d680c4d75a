//! Configuration error types.
//!
//! All configuration constructors return `Result<T, ConfigError>` so that
//! invalid credentials or URLs are rejected at startup rather than on the
//! first install or load request.
//!
//! # Example
//!
//! ```rust
//! use bigcommerce_app::{ClientId, ConfigError};
//!
//! let result = ClientId::new("");
//! assert!(matches!(result, Err(ConfigError::EmptyClientId)));
//! ```

use thiserror::Error;

/// Errors that can occur while building the app configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Client id cannot be empty.
    #[error("Client id cannot be empty. Please provide the app's BigCommerce client id.")]
    EmptyClientId,

    /// Client secret cannot be empty.
    #[error("Client secret cannot be empty. Please provide the app's BigCommerce client secret.")]
    EmptyClientSecret,

    /// Access token cannot be empty.
    #[error("Access token cannot be empty.")]
    EmptyAccessToken,

    /// Store hash is invalid.
    #[error("Invalid store hash '{value}'. Expected a path such as 'stores/abc123'.")]
    InvalidStoreHash {
        /// The invalid store hash that was provided.
        value: String,
    },

    /// App URL is invalid.
    #[error("Invalid app URL '{url}'. Please provide a valid URL with scheme (e.g., 'https://myapp.example.com').")]
    InvalidAppUrl {
        /// The invalid URL that was provided.
        url: String,
    },

    /// A required field is missing.
    #[error("Missing required field: '{field}'. This field must be set before building the configuration.")]
    MissingRequiredField {
        /// The name of the missing field.
        field: &'static str,
    },

    /// A required environment variable is not set.
    #[error("Missing environment variable '{name}'.")]
    MissingEnvVar {
        /// The name of the missing variable.
        name: &'static str,
    },
}
