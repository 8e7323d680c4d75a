//! Authorization code → access token exchange.
//!
//! When a merchant installs the app, BigCommerce redirects to
//! `/auth/install` with a short-lived `code`. [`OAuthExchanger::exchange`]
//! POSTs it, together with the app's client credentials, to
//! `https://login.bigcommerce.com/oauth2/token` and returns the store-scoped
//! access token. Persisting the result is left to the caller.

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::auth::oauth::OAuthError;
use crate::auth::secrets::SecretProvider;
use crate::config::{AccessToken, AppConfig, StoreHash};

/// Grant type for the authorization code flow.
const AUTHORIZATION_CODE_GRANT_TYPE: &str = "authorization_code";

/// Path of the token endpoint on the login host.
const TOKEN_PATH: &str = "/oauth2/token";

/// Request body for the token exchange.
#[derive(Debug, Serialize)]
struct TokenRequest<'a> {
    client_id: &'a str,
    client_secret: &'a str,
    redirect_uri: &'a str,
    grant_type: &'a str,
    code: &'a str,
    scope: &'a str,
    context: &'a str,
}

/// Successful response body of the token endpoint.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    scope: String,
    user: ExchangeUser,
    context: String,
    account_uuid: Option<String>,
}

/// The user who performed the install.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeUser {
    /// BigCommerce user id.
    pub id: u64,
    /// The user's email address.
    pub email: String,
}

/// Result of a successful token exchange.
#[derive(Clone, Debug)]
pub struct ExchangeResult {
    /// The installing user.
    pub user: ExchangeUser,
    /// Store-scoped access token.
    pub access_token: AccessToken,
    /// Scopes actually granted.
    pub scope: String,
    /// BigCommerce account the store belongs to.
    pub account_uuid: Option<String>,
    /// The store the token is for, from the response's `context`.
    pub store_hash: StoreHash,
}

impl TryFrom<TokenResponse> for ExchangeResult {
    type Error = String;

    fn try_from(response: TokenResponse) -> Result<Self, Self::Error> {
        Ok(Self {
            user: response.user,
            access_token: AccessToken::new(response.access_token).map_err(|e| e.to_string())?,
            scope: response.scope,
            account_uuid: response.account_uuid,
            store_hash: StoreHash::new(response.context).map_err(|e| e.to_string())?,
        })
    }
}

/// Performs token exchanges against the BigCommerce login host.
///
/// # Example
///
/// ```rust,ignore
/// use bigcommerce_app::auth::oauth::OAuthExchanger;
///
/// let exchanger = OAuthExchanger::new(http_client, &config);
/// let result = exchanger
///     .exchange("abc123", "store_v2_products", "stores/xyz789", &config.redirect_uri(), secrets.as_ref())
///     .await?;
/// println!("installed for {}", result.store_hash);
/// ```
#[derive(Clone, Debug)]
pub struct OAuthExchanger {
    client: reqwest::Client,
    token_url: String,
}

impl OAuthExchanger {
    /// Creates an exchanger that posts to the configured login host.
    ///
    /// `client` should carry the configured request timeout; see
    /// [`build_http_client`](crate::clients::build_http_client).
    #[must_use]
    pub fn new(client: reqwest::Client, config: &AppConfig) -> Self {
        Self {
            client,
            token_url: format!("{}{TOKEN_PATH}", config.login_url()),
        }
    }

    /// Returns the token endpoint URL.
    #[must_use]
    pub fn token_url(&self) -> &str {
        &self.token_url
    }

    /// Exchanges an authorization code for a store-scoped access token.
    ///
    /// # Errors
    ///
    /// Returns [`OAuthError::ExchangeFailed`] when the endpoint cannot be
    /// reached (`status` 0), answers with anything other than 200, or
    /// answers 200 with a body that lacks the expected fields.
    pub async fn exchange(
        &self,
        code: &str,
        scope: &str,
        context: &str,
        redirect_uri: &str,
        secrets: &dyn SecretProvider,
    ) -> Result<ExchangeResult, OAuthError> {
        let request_body = TokenRequest {
            client_id: secrets.client_id().as_ref(),
            client_secret: secrets.client_secret().as_ref(),
            redirect_uri,
            grant_type: AUTHORIZATION_CODE_GRANT_TYPE,
            code,
            scope,
            context,
        };

        tracing::debug!(context, "exchanging authorization code");

        let response = self
            .client
            .post(&self.token_url)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| OAuthError::ExchangeFailed {
                status: 0,
                body: format!("Network error: {e}"),
            })?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if status != StatusCode::OK {
            tracing::warn!(status = status.as_u16(), context, "token exchange rejected");
            return Err(OAuthError::ExchangeFailed {
                status: status.as_u16(),
                body,
            });
        }

        let token_response: TokenResponse =
            serde_json::from_str(&body).map_err(|e| OAuthError::ExchangeFailed {
                status: status.as_u16(),
                body: format!("Failed to parse token response: {e}"),
            })?;

        ExchangeResult::try_from(token_response).map_err(|reason| OAuthError::ExchangeFailed {
            status: status.as_u16(),
            body: format!("Invalid token response: {reason}"),
        })
    }
}
