//! Configuration for the BigCommerce app.
//!
//! # Overview
//!
//! - [`AppConfig`]: all settings needed by the install, load and proxy flows
//! - [`AppConfigBuilder`]: a builder for constructing [`AppConfig`] instances
//! - [`AppMode`]: local (development) vs production secrets
//! - [`ClientCredentials`]: a client id / client secret pair
//! - Validated newtypes: [`ClientId`], [`ClientSecret`], [`AccessToken`],
//!   [`StoreHash`], [`AppUrl`]
//!
//! Configuration is usually loaded once at startup with
//! [`AppConfig::from_env`], which reads the same variables as the PHP
//! skeleton apps BigCommerce publishes (`APP_ENV`, `APP_URL`,
//! `BC_APP_CLIENT_ID`, ...).
//!
//! # Example
//!
//! ```rust
//! use bigcommerce_app::{AppConfig, AppMode, AppUrl, ClientCredentials, ClientId, ClientSecret};
//!
//! let config = AppConfig::builder()
//!     .app_url(AppUrl::new("https://myapp.example.com").unwrap())
//!     .app_credentials(ClientCredentials::new(
//!         ClientId::new("client-id").unwrap(),
//!         ClientSecret::new("client-secret").unwrap(),
//!     ))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.mode(), AppMode::Production);
//! assert_eq!(config.redirect_uri(), "https://myapp.example.com/auth/install");
//! ```

mod mode;
mod newtypes;

pub use mode::AppMode;
pub use newtypes::{AccessToken, AppUrl, ClientId, ClientSecret, StoreHash};

use std::sync::Arc;
use std::time::Duration;

use crate::auth::secrets::{LocalSecrets, ProductionSecrets, SecretProvider};
use crate::error::ConfigError;

/// Default BigCommerce login (OAuth) host.
pub const DEFAULT_LOGIN_URL: &str = "https://login.bigcommerce.com";

/// Default BigCommerce REST API host.
pub const DEFAULT_API_URL: &str = "https://api.bigcommerce.com";

/// Default timeout for outbound HTTPS calls.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Path of the install callback, relative to [`AppConfig::app_url`].
pub const INSTALL_PATH: &str = "/auth/install";

/// A client id and client secret issued together by BigCommerce.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientCredentials {
    client_id: ClientId,
    client_secret: ClientSecret,
}

impl ClientCredentials {
    /// Pairs a client id with its secret.
    #[must_use]
    pub const fn new(client_id: ClientId, client_secret: ClientSecret) -> Self {
        Self {
            client_id,
            client_secret,
        }
    }

    /// Returns the client id.
    #[must_use]
    pub const fn client_id(&self) -> &ClientId {
        &self.client_id
    }

    /// Returns the client secret.
    #[must_use]
    pub const fn client_secret(&self) -> &ClientSecret {
        &self.client_secret
    }
}

/// Configuration for the BigCommerce app.
///
/// `AppConfig` is `Clone`, `Send` and `Sync`; build it once and share it.
#[derive(Clone, Debug)]
pub struct AppConfig {
    mode: AppMode,
    app_url: AppUrl,
    credentials: ClientCredentials,
    local_access_token: Option<AccessToken>,
    local_store_hash: Option<StoreHash>,
    old_client_secret: Option<ClientSecret>,
    login_url: String,
    api_url: String,
    request_timeout: Duration,
}

impl AppConfig {
    /// Creates a new builder for constructing an `AppConfig`.
    #[must_use]
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::new()
    }

    /// Loads the configuration from process environment variables.
    ///
    /// See [`AppConfig::from_lookup`] for the variables that are read.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if a required variable is missing or a
    /// value fails validation.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Loads the configuration through an arbitrary variable lookup.
    ///
    /// Variables:
    ///
    /// | Variable | Meaning |
    /// |---|---|
    /// | `APP_ENV` | `local` selects [`AppMode::Local`] |
    /// | `APP_URL` | public base URL (required) |
    /// | `BC_APP_CLIENT_ID`, `BC_APP_SECRET` | production credentials |
    /// | `BC_APP_OLD_SECRET` | previous production secret, during rotation |
    /// | `BC_LOCAL_CLIENT_ID`, `BC_LOCAL_SECRET` | local credentials |
    /// | `BC_LOCAL_ACCESS_TOKEN`, `BC_LOCAL_STORE_HASH` | local overrides |
    ///
    /// Empty values are treated as unset.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvVar`] if `APP_URL` is unset, or the
    /// usual validation and builder errors otherwise.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|value| !value.is_empty());

        let mode = AppMode::from_app_env(var("APP_ENV").as_deref());
        let app_url = var("APP_URL").ok_or(ConfigError::MissingEnvVar { name: "APP_URL" })?;

        let credentials = |id_var: &str, secret_var: &str| -> Result<_, ConfigError> {
            match (var(id_var), var(secret_var)) {
                (Some(id), Some(secret)) => Ok(Some(ClientCredentials::new(
                    ClientId::new(id)?,
                    ClientSecret::new(secret)?,
                ))),
                _ => Ok(None),
            }
        };

        let mut builder = Self::builder()
            .mode(mode)
            .app_url(AppUrl::new(app_url)?);

        if let Some(creds) = credentials("BC_APP_CLIENT_ID", "BC_APP_SECRET")? {
            builder = builder.app_credentials(creds);
        }
        if let Some(creds) = credentials("BC_LOCAL_CLIENT_ID", "BC_LOCAL_SECRET")? {
            builder = builder.local_credentials(creds);
        }
        if let Some(secret) = var("BC_APP_OLD_SECRET") {
            builder = builder.old_client_secret(ClientSecret::new(secret)?);
        }
        if let Some(token) = var("BC_LOCAL_ACCESS_TOKEN") {
            builder = builder.local_access_token(AccessToken::new(token)?);
        }
        if let Some(store) = var("BC_LOCAL_STORE_HASH") {
            builder = builder.local_store_hash(StoreHash::new(store)?);
        }

        builder.build()
    }

    /// Returns the deployment mode.
    #[must_use]
    pub const fn mode(&self) -> AppMode {
        self.mode
    }

    /// Returns the public base URL of the app.
    #[must_use]
    pub const fn app_url(&self) -> &AppUrl {
        &self.app_url
    }

    /// Returns the OAuth `redirect_uri` registered for the install callback.
    #[must_use]
    pub fn redirect_uri(&self) -> String {
        self.app_url.join(INSTALL_PATH)
    }

    /// Returns the BigCommerce login host (token endpoint and install pages).
    #[must_use]
    pub fn login_url(&self) -> &str {
        &self.login_url
    }

    /// Returns the BigCommerce REST API host.
    #[must_use]
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Returns the timeout applied to outbound HTTPS calls.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Builds the [`SecretProvider`] for the configured mode.
    ///
    /// Call this once at startup and share the result; the mode is never
    /// re-checked afterwards.
    #[must_use]
    pub fn secret_provider(&self) -> Arc<dyn SecretProvider> {
        match self.mode {
            AppMode::Local => Arc::new(LocalSecrets::new(
                self.credentials.clone(),
                self.local_access_token.clone(),
                self.local_store_hash.clone(),
            )),
            AppMode::Production => Arc::new(ProductionSecrets::new(
                self.credentials.clone(),
                self.old_client_secret.clone(),
            )),
        }
    }
}

// Verify AppConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<AppConfig>();
};

/// Builder for constructing [`AppConfig`] instances.
///
/// # Defaults
///
/// - `mode`: [`AppMode::Production`]
/// - `login_url`: [`DEFAULT_LOGIN_URL`]
/// - `api_url`: [`DEFAULT_API_URL`]
/// - `request_timeout`: [`DEFAULT_REQUEST_TIMEOUT`]
///
/// `app_url` is always required, as are the credentials of the selected mode.
#[derive(Debug, Default)]
pub struct AppConfigBuilder {
    mode: Option<AppMode>,
    app_url: Option<AppUrl>,
    app_credentials: Option<ClientCredentials>,
    local_credentials: Option<ClientCredentials>,
    local_access_token: Option<AccessToken>,
    local_store_hash: Option<StoreHash>,
    old_client_secret: Option<ClientSecret>,
    login_url: Option<String>,
    api_url: Option<String>,
    request_timeout: Option<Duration>,
}

impl AppConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the deployment mode.
    #[must_use]
    pub const fn mode(mut self, mode: AppMode) -> Self {
        self.mode = Some(mode);
        self
    }

    /// Sets the public base URL (required).
    #[must_use]
    pub fn app_url(mut self, url: AppUrl) -> Self {
        self.app_url = Some(url);
        self
    }

    /// Sets the production client credentials.
    #[must_use]
    pub fn app_credentials(mut self, credentials: ClientCredentials) -> Self {
        self.app_credentials = Some(credentials);
        self
    }

    /// Sets the local (development) client credentials.
    #[must_use]
    pub fn local_credentials(mut self, credentials: ClientCredentials) -> Self {
        self.local_credentials = Some(credentials);
        self
    }

    /// Sets the static access token used in local mode.
    #[must_use]
    pub fn local_access_token(mut self, token: AccessToken) -> Self {
        self.local_access_token = Some(token);
        self
    }

    /// Sets the static store hash used in local mode.
    #[must_use]
    pub fn local_store_hash(mut self, store_hash: StoreHash) -> Self {
        self.local_store_hash = Some(store_hash);
        self
    }

    /// Sets the previous production client secret.
    ///
    /// Signed payloads that fail verification with the current secret are
    /// retried with this one, so loads keep working while a rotated secret
    /// propagates.
    #[must_use]
    pub fn old_client_secret(mut self, secret: ClientSecret) -> Self {
        self.old_client_secret = Some(secret);
        self
    }

    /// Overrides the BigCommerce login host.
    #[must_use]
    pub fn login_url(mut self, url: impl Into<String>) -> Self {
        self.login_url = Some(url.into());
        self
    }

    /// Overrides the BigCommerce REST API host.
    #[must_use]
    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = Some(url.into());
        self
    }

    /// Sets the timeout for outbound HTTPS calls.
    #[must_use]
    pub const fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Builds the [`AppConfig`], validating that required fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if `app_url` is not set,
    /// or if the credentials for the selected mode are missing
    /// (`app_credentials` in production, `local_credentials` in local mode).
    pub fn build(self) -> Result<AppConfig, ConfigError> {
        let mode = self.mode.unwrap_or_default();
        let app_url = self
            .app_url
            .ok_or(ConfigError::MissingRequiredField { field: "app_url" })?;

        let credentials = match mode {
            AppMode::Local => self.local_credentials.ok_or(ConfigError::MissingRequiredField {
                field: "local_credentials",
            })?,
            AppMode::Production => self.app_credentials.ok_or(ConfigError::MissingRequiredField {
                field: "app_credentials",
            })?,
        };

        let trim = |url: String| url.trim_end_matches('/').to_string();

        Ok(AppConfig {
            mode,
            app_url,
            credentials,
            local_access_token: self.local_access_token,
            local_store_hash: self.local_store_hash,
            old_client_secret: self.old_client_secret,
            login_url: trim(self.login_url.unwrap_or_else(|| DEFAULT_LOGIN_URL.to_string())),
            api_url: trim(self.api_url.unwrap_or_else(|| DEFAULT_API_URL.to_string())),
            request_timeout: self.request_timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT),
        })
    }
}
