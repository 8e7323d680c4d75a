//! The install, load and proxy flows of a BigCommerce app.
//!
//! [`App`] wires the configuration, the secret provider, the token exchanger,
//! the credential store, the session binder and the API proxy together. A
//! web layer maps its routes onto the three flows:
//!
//! | Route | Flow |
//! |---|---|
//! | `GET /auth/install` | [`App::install`] |
//! | `GET\|POST /load` | [`App::load`] |
//! | `ANY /bc-api/{endpoint}` | [`App::proxy`] |
//!
//! `install` and `load` never fail: every error becomes a [`Redirect`] to
//! the app's error page carrying a message safe to show to the merchant.

use std::sync::Arc;

use thiserror::Error;

use crate::auth::oauth::{InstallParams, InstallQuery, OAuthError, OAuthExchanger};
use crate::auth::secrets::SecretProvider;
use crate::auth::signed_payload::{verify_signed_payload, SignedPayload};
use crate::clients::{build_http_client, ApiProxy, HttpMethod, ProxiedResponse, ProxyError};
use crate::config::AppConfig;
use crate::credentials::{CredentialError, CredentialStore, CredentialUpdate, NewCredential};
use crate::session::{SessionBinder, SessionError, SessionId, SessionStore};

/// Path of the error page, relative to the app URL.
pub const ERROR_PATH: &str = "/error";

const MSG_INSTALL_PARAMS_MISSING: &str = "Not enough information was passed to install this app.";
const MSG_GENERIC: &str = "An error occurred.";
const MSG_PAYLOAD_EMPTY: &str = "The signed request from BigCommerce was empty.";
const MSG_PAYLOAD_INVALID: &str = "The signed request from BigCommerce could not be validated.";
const MSG_NOT_INSTALLED: &str = "This app has not been installed for this store and user.";

/// Where to send the browser after install or load.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Redirect {
    /// Target of the `Location` header.
    pub location: String,
}

impl Redirect {
    /// Redirects to `location`.
    #[must_use]
    pub fn to(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
        }
    }

    /// Redirects to the app's home page.
    #[must_use]
    pub fn home() -> Self {
        Self::to("/")
    }
}

#[derive(Debug, Error)]
enum FlowError {
    #[error(transparent)]
    OAuth(#[from] OAuthError),
    #[error(transparent)]
    Credentials(#[from] CredentialError),
    #[error(transparent)]
    Session(#[from] SessionError),
}

impl FlowError {
    /// Message for the error page. Upstream bodies are only shown for
    /// client errors the merchant can act on.
    fn user_message(&self) -> String {
        match self {
            Self::OAuth(error) if !error.is_server_error() => match error {
                OAuthError::ExchangeFailed { body, .. } => body.clone(),
                OAuthError::InvalidCallback { .. } => MSG_INSTALL_PARAMS_MISSING.to_string(),
            },
            _ => MSG_GENERIC.to_string(),
        }
    }
}

enum LoadOutcome {
    Bound,
    NotInstalled,
}

/// A BigCommerce app: the three request flows over shared collaborators.
///
/// # Example
///
/// ```rust,ignore
/// use std::sync::Arc;
/// use bigcommerce_app::{App, AppConfig};
/// use bigcommerce_app::credentials::MemoryCredentialStore;
/// use bigcommerce_app::session::{MemorySessionStore, SessionId};
///
/// let app = App::new(
///     AppConfig::from_env()?,
///     Arc::new(MemoryCredentialStore::new()),
///     Arc::new(MemorySessionStore::new()),
/// )?;
///
/// // In the /load handler:
/// let redirect = app.load(form.signed_payload.as_deref(), &session_id).await;
/// ```
#[derive(Clone)]
pub struct App {
    config: AppConfig,
    secrets: Arc<dyn SecretProvider>,
    exchanger: OAuthExchanger,
    credentials: Arc<dyn CredentialStore>,
    binder: SessionBinder,
    proxy: ApiProxy,
}

// Verify App is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<App>();
};

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("config", &self.config)
            .field("exchanger", &self.exchanger)
            .field("proxy", &self.proxy)
            .finish_non_exhaustive()
    }
}

impl App {
    /// Creates an app with a freshly built HTTP client.
    ///
    /// # Errors
    ///
    /// Returns the underlying error if the HTTP client cannot be built.
    pub fn new(
        config: AppConfig,
        credentials: Arc<dyn CredentialStore>,
        sessions: Arc<dyn SessionStore>,
    ) -> Result<Self, reqwest::Error> {
        let client = build_http_client(&config)?;
        Ok(Self::with_client(config, client, credentials, sessions))
    }

    /// Creates an app that shares an existing HTTP client.
    #[must_use]
    pub fn with_client(
        config: AppConfig,
        client: reqwest::Client,
        credentials: Arc<dyn CredentialStore>,
        sessions: Arc<dyn SessionStore>,
    ) -> Self {
        let secrets = config.secret_provider();
        let binder = SessionBinder::new(sessions);
        let exchanger = OAuthExchanger::new(client.clone(), &config);
        let proxy = ApiProxy::new(client, &config, Arc::clone(&secrets), binder.clone());

        tracing::info!(mode = %config.mode(), "BigCommerce app configured");

        Self {
            config,
            secrets,
            exchanger,
            credentials,
            binder,
            proxy,
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Returns the session binder.
    #[must_use]
    pub const fn binder(&self) -> &SessionBinder {
        &self.binder
    }

    /// Builds the error page redirect for a merchant-facing message.
    #[must_use]
    pub fn error_redirect(&self, message: &str) -> Redirect {
        Redirect::to(format!(
            "{}?error_message={}",
            self.config.app_url().join(ERROR_PATH),
            urlencoding::encode(message)
        ))
    }

    fn external_install_redirect(&self, outcome: &str) -> Redirect {
        let client_id: &str = self.secrets.client_id().as_ref();
        Redirect::to(format!(
            "{}/app/{client_id}/install/{outcome}",
            self.config.login_url()
        ))
    }

    /// Handles the install callback.
    ///
    /// Exchanges the authorization code, stores the credential for the
    /// installing user and store (refreshing token and scope on a
    /// re-install), and binds it to the session.
    ///
    /// Redirects to `/`, or for external installs to BigCommerce's
    /// install-succeeded page. On failure, redirects to the error page, or
    /// to BigCommerce's install-failed page for external installs.
    pub async fn install(&self, query: &InstallQuery, session: &SessionId) -> Redirect {
        let params = match query.params() {
            Ok(params) => params,
            Err(error) => {
                tracing::info!(%error, "rejected install callback");
                return self.error_redirect(MSG_INSTALL_PARAMS_MISSING);
            }
        };

        match self.complete_install(params, session).await {
            Ok(()) if query.is_external() => self.external_install_redirect("succeeded"),
            Ok(()) => Redirect::home(),
            Err(error) => {
                tracing::error!(%error, context = params.context, "install failed");
                if query.is_external() {
                    self.external_install_redirect("failed")
                } else {
                    self.error_redirect(&error.user_message())
                }
            }
        }
    }

    async fn complete_install(
        &self,
        params: InstallParams<'_>,
        session: &SessionId,
    ) -> Result<(), FlowError> {
        let result = self
            .exchanger
            .exchange(
                params.code,
                params.scope,
                params.context,
                &self.config.redirect_uri(),
                self.secrets.as_ref(),
            )
            .await?;

        let existing = self
            .credentials
            .find_by_identity(&result.user.email, &result.store_hash)
            .await?;

        if existing.is_some() {
            tracing::info!(store_hash = %result.store_hash, "re-install, refreshing token");
            self.credentials
                .update(
                    &result.user.email,
                    &result.store_hash,
                    CredentialUpdate {
                        scope: Some(result.scope.clone()),
                        account_uuid: result.account_uuid.clone(),
                        access_token: Some(result.access_token.clone()),
                        ..CredentialUpdate::default()
                    },
                )
                .await?;
        } else {
            tracing::info!(store_hash = %result.store_hash, "new install");
            self.credentials
                .create(
                    NewCredential::new(result.user.id, &result.user.email, result.store_hash.clone())
                        .with_scope(&result.scope)
                        .with_account_uuid(result.account_uuid.clone())
                        .with_access_token(result.access_token.clone()),
                )
                .await?;
        }

        self.binder
            .bind(session, result.store_hash, result.access_token)
            .await?;
        Ok(())
    }

    /// Handles the load callback.
    ///
    /// Verifies the signed payload, refreshes the stored user details and
    /// binds the stored token to the session. A verified load for a store
    /// without a token clears any earlier binding. A payload that fails
    /// verification changes nothing.
    pub async fn load(&self, signed_payload: Option<&str>, session: &SessionId) -> Redirect {
        let Some(signed) = signed_payload.map(str::trim).filter(|s| !s.is_empty()) else {
            tracing::info!("load called without a signed payload");
            return self.error_redirect(MSG_PAYLOAD_EMPTY);
        };

        let payload = match verify_signed_payload(signed, self.secrets.as_ref()) {
            Ok(payload) => payload,
            Err(error) => {
                if error.is_security_event() {
                    tracing::warn!(%error, "bad signed request from BigCommerce");
                } else {
                    tracing::info!(%error, "unreadable signed request");
                }
                return self.error_redirect(MSG_PAYLOAD_INVALID);
            }
        };

        match self.complete_load(&payload, session).await {
            Ok(LoadOutcome::Bound) => Redirect::home(),
            Ok(LoadOutcome::NotInstalled) => self.error_redirect(MSG_NOT_INSTALLED),
            Err(error) => {
                tracing::error!(%error, store_hash = %payload.store_hash(), "load failed");
                self.error_redirect(MSG_GENERIC)
            }
        }
    }

    async fn complete_load(
        &self,
        payload: &SignedPayload,
        session: &SessionId,
    ) -> Result<LoadOutcome, FlowError> {
        let user = payload.user();
        let owner = payload.owner();
        let store_hash = payload.store_hash();

        let Some(record) = self
            .credentials
            .find_by_identity(&user.email, store_hash)
            .await?
        else {
            tracing::info!(store_hash = %store_hash, "load for unseen user, recording");
            self.credentials
                .create(
                    NewCredential::new(user.id, &user.email, store_hash.clone())
                        .with_owner(owner.id, &owner.email)
                        .with_locale(&user.locale)
                        .with_timestamp(payload.timestamp()),
                )
                .await?;
            self.binder.unbind(session).await?;
            return Ok(LoadOutcome::NotInstalled);
        };

        self.credentials
            .update(
                &user.email,
                store_hash,
                CredentialUpdate {
                    locale: Some(user.locale.clone()),
                    owner_id: Some(owner.id),
                    owner_email: Some(owner.email.clone()),
                    timestamp: Some(payload.timestamp()),
                    ..CredentialUpdate::default()
                },
            )
            .await?;

        let Some(access_token) = record.access_token else {
            self.binder.unbind(session).await?;
            return Ok(LoadOutcome::NotInstalled);
        };

        self.binder
            .bind(session, record.store_hash, access_token)
            .await?;
        Ok(LoadOutcome::Bound)
    }

    /// Forwards a browser API call to BigCommerce.
    ///
    /// Upstream answers are relayed verbatim. A session without bound
    /// credentials gets a 401 and an unreachable upstream a 502, both with a
    /// JSON error body.
    pub async fn proxy(
        &self,
        method: HttpMethod,
        endpoint: &str,
        body: Option<String>,
        session: &SessionId,
    ) -> ProxiedResponse {
        match self.proxy.forward(method, endpoint, body, session).await {
            Ok(response) => response,
            Err(error) => {
                let status = error.status_code();
                match &error {
                    ProxyError::Unauthenticated => tracing::debug!(%error, "proxy call rejected"),
                    ProxyError::InvalidEndpoint { .. } => {
                        tracing::warn!(%error, "proxy call rejected");
                    }
                    _ => tracing::error!(%error, "proxy call failed"),
                }
                ProxiedResponse::error(status, &error.to_string())
            }
        }
    }
}
