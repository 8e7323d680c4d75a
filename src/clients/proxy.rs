//! Authenticated forwarding of browser API calls to BigCommerce.

use std::sync::Arc;

use crate::auth::secrets::SecretProvider;
use crate::clients::errors::ProxyError;
use crate::clients::http_request::{normalize_endpoint, HttpMethod};
use crate::clients::http_response::{ProxiedResponse, JSON_CONTENT_TYPE};
use crate::config::{AccessToken, AppConfig, StoreHash};
use crate::session::{SessionBinder, SessionId};

/// Crate version, reported in the `User-Agent` header.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Builds the shared HTTP client used for all outbound calls.
///
/// The client applies the configured request timeout, so a hung upstream
/// cannot hold a request task forever.
///
/// # Errors
///
/// Returns the underlying error if the TLS backend cannot be initialized.
pub fn build_http_client(config: &AppConfig) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .use_rustls_tls()
        .timeout(config.request_timeout())
        .user_agent(format!("BigCommerce App Library v{SDK_VERSION}"))
        .build()
}

/// Forwards API calls from the browser to the BigCommerce REST API.
///
/// The store hash and token come from the caller's session; the browser
/// never sees the token. In local mode, a configured token and store hash
/// replace the session values.
///
/// # Thread Safety
///
/// `ApiProxy` is `Send + Sync` and cheap to clone.
///
/// # Example
///
/// ```rust,ignore
/// use bigcommerce_app::clients::{ApiProxy, HttpMethod};
///
/// let proxy = ApiProxy::new(http_client, &config, config.secret_provider(), binder);
/// let response = proxy
///     .forward(HttpMethod::Get, "catalog/v2/products", None, &session_id)
///     .await?;
/// println!("{} {}", response.status, response.body);
/// ```
#[derive(Clone)]
pub struct ApiProxy {
    client: reqwest::Client,
    api_url: String,
    secrets: Arc<dyn SecretProvider>,
    binder: SessionBinder,
}

// Verify ApiProxy is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ApiProxy>();
};

impl std::fmt::Debug for ApiProxy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiProxy")
            .field("api_url", &self.api_url)
            .field("secrets", &self.secrets)
            .finish_non_exhaustive()
    }
}

impl ApiProxy {
    /// Creates a proxy for the configured API host.
    #[must_use]
    pub fn new(
        client: reqwest::Client,
        config: &AppConfig,
        secrets: Arc<dyn SecretProvider>,
        binder: SessionBinder,
    ) -> Self {
        Self {
            client,
            api_url: config.api_url().to_string(),
            secrets,
            binder,
        }
    }

    /// Builds the upstream URL for a store and endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ProxyError::InvalidEndpoint`] if the endpoint path has a
    /// `..` segment, which the URL parser would resolve outside the store.
    pub fn upstream_url(
        &self,
        store_hash: &StoreHash,
        endpoint: &str,
    ) -> Result<String, ProxyError> {
        if has_parent_segment(endpoint) {
            return Err(ProxyError::InvalidEndpoint {
                endpoint: endpoint.to_string(),
            });
        }

        Ok(format!(
            "{}/{}/{}",
            self.api_url,
            store_hash,
            normalize_endpoint(endpoint)
        ))
    }

    /// Forwards one API call and relays the upstream status and body.
    ///
    /// `body` is only sent for methods that carry one
    /// ([`HttpMethod::carries_body`]).
    ///
    /// # Errors
    ///
    /// - [`ProxyError::Unauthenticated`] if no store hash or token is bound
    /// - [`ProxyError::InvalidEndpoint`] if the endpoint has a `..` segment
    /// - [`ProxyError::UpstreamUnavailable`] if BigCommerce cannot be reached
    /// - [`ProxyError::Session`] if the session store fails
    pub async fn forward(
        &self,
        method: HttpMethod,
        endpoint: &str,
        body: Option<String>,
        session: &SessionId,
    ) -> Result<ProxiedResponse, ProxyError> {
        let (store_hash, access_token) = self.resolve_credentials(session).await?;
        let url = self.upstream_url(&store_hash, endpoint)?;
        let client_id: &str = self.secrets.client_id().as_ref();

        let mut request = self
            .client
            .request(method.as_reqwest(), &url)
            .header("X-Auth-Client", client_id)
            .header("X-Auth-Token", access_token.expose())
            .header("Content-Type", JSON_CONTENT_TYPE)
            .header("Accept", JSON_CONTENT_TYPE);

        if method.carries_body() {
            if let Some(body) = body {
                request = request.body(body);
            }
        }

        let response = request.send().await.map_err(|e| {
            tracing::warn!(%method, store_hash = %store_hash, error = %e, "upstream request failed");
            ProxyError::UpstreamUnavailable(e)
        })?;

        let status = response.status().as_u16();
        let body = response.text().await?;

        tracing::debug!(%method, store_hash = %store_hash, status, "relayed upstream response");

        Ok(ProxiedResponse::new(status, body))
    }

    async fn resolve_credentials(
        &self,
        session: &SessionId,
    ) -> Result<(StoreHash, AccessToken), ProxyError> {
        if let (Some(token), Some(store_hash)) = (
            self.secrets.local_access_token(),
            self.secrets.local_store_hash(),
        ) {
            return Ok((store_hash.clone(), token.clone()));
        }

        self.binder
            .current(session)
            .await?
            .map(|data| (data.store_hash, data.access_token))
            .ok_or(ProxyError::Unauthenticated)
    }
}

// The URL parser decodes `%2e` to `.` and treats `\` as `/` for http(s).
fn has_parent_segment(endpoint: &str) -> bool {
    let path = endpoint.split(['?', '#']).next().unwrap_or_default();
    path.split(['/', '\\']).any(|segment| {
        let segment = segment.to_ascii_lowercase().replace("%2e", ".");
        segment == ".."
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::secrets::{LocalSecrets, ProductionSecrets};
    use crate::config::{AppUrl, ClientCredentials, ClientId, ClientSecret};
    use crate::session::MemorySessionStore;
    use wiremock::matchers::{body_string, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn credentials() -> ClientCredentials {
        ClientCredentials::new(
            ClientId::new("client-id").unwrap(),
            ClientSecret::new("client-secret").unwrap(),
        )
    }

    fn config(api_url: &str) -> AppConfig {
        AppConfig::builder()
            .app_url(AppUrl::new("https://app.example.com").unwrap())
            .app_credentials(credentials())
            .api_url(api_url)
            .build()
            .unwrap()
    }

    fn proxy(api_url: &str, secrets: Arc<dyn SecretProvider>) -> (ApiProxy, SessionBinder) {
        let binder = SessionBinder::new(Arc::new(MemorySessionStore::new()));
        let proxy = ApiProxy::new(
            reqwest::Client::new(),
            &config(api_url),
            secrets,
            binder.clone(),
        );
        (proxy, binder)
    }

    fn production() -> Arc<dyn SecretProvider> {
        Arc::new(ProductionSecrets::new(credentials(), None))
    }

    #[tokio::test]
    async fn test_forward_adds_auth_headers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/stores/abc/v3/catalog/products"))
            .and(header("X-Auth-Client", "client-id"))
            .and(header("X-Auth-Token", "tok"))
            .and(header("Accept", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"data":[]}"#))
            .expect(1)
            .mount(&server)
            .await;

        let (proxy, binder) = proxy(&server.uri(), production());
        let session = SessionId::new("s");
        binder
            .bind(
                &session,
                StoreHash::new("stores/abc").unwrap(),
                AccessToken::new("tok").unwrap(),
            )
            .await
            .unwrap();

        let response = proxy
            .forward(HttpMethod::Get, "/v3/catalog/products", None, &session)
            .await
            .unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(response.body, r#"{"data":[]}"#);
    }

    #[tokio::test]
    async fn test_forward_without_bound_session_is_unauthenticated() {
        let (proxy, _) = proxy("http://127.0.0.1:9", production());
        let result = proxy
            .forward(HttpMethod::Get, "v3/catalog/products", None, &SessionId::new("s"))
            .await;
        assert!(matches!(result, Err(ProxyError::Unauthenticated)));
    }

    #[tokio::test]
    async fn test_forward_sends_body_for_post() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/s1/v3/catalog/products"))
            .and(body_string(r#"{"name":"Hat"}"#))
            .respond_with(ResponseTemplate::new(201).set_body_string(r#"{"id":5}"#))
            .expect(1)
            .mount(&server)
            .await;

        let (proxy, binder) = proxy(&server.uri(), production());
        let session = SessionId::new("s");
        binder
            .bind(
                &session,
                StoreHash::new("s1").unwrap(),
                AccessToken::new("tok").unwrap(),
            )
            .await
            .unwrap();

        let response = proxy
            .forward(
                HttpMethod::Post,
                "v3/catalog/products",
                Some(r#"{"name":"Hat"}"#.to_string()),
                &session,
            )
            .await
            .unwrap();
        assert_eq!(response.status, 201);
    }

    #[tokio::test]
    async fn test_local_overrides_replace_session_credentials() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/stores/dev/v3/orders"))
            .and(header("X-Auth-Token", "local-token"))
            .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
            .expect(1)
            .mount(&server)
            .await;

        let secrets: Arc<dyn SecretProvider> = Arc::new(LocalSecrets::new(
            credentials(),
            Some(AccessToken::new("local-token").unwrap()),
            Some(StoreHash::new("stores/dev").unwrap()),
        ));
        let (proxy, _) = proxy(&server.uri(), secrets);

        let response = proxy
            .forward(HttpMethod::Get, "v3/orders", None, &SessionId::new("unbound"))
            .await
            .unwrap();
        assert_eq!(response.body, "[]");
    }

    #[test]
    fn test_parent_segments_are_detected() {
        assert!(has_parent_segment("../stores/other/v3/orders"));
        assert!(has_parent_segment("v3/../../stores/other/v3/orders"));
        assert!(has_parent_segment("v3/%2E%2e/orders"));
        assert!(has_parent_segment("v3\\..\\orders"));
        assert!(!has_parent_segment("v3/catalog/products"));
        assert!(!has_parent_segment("v3/catalog/products?name=a..b"));
        assert!(!has_parent_segment("v2/files/archive..zip"));
    }

    #[tokio::test]
    async fn test_forward_rejects_parent_segments_without_calling_upstream() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
            .expect(0)
            .mount(&server)
            .await;

        let (proxy, binder) = proxy(&server.uri(), production());
        let session = SessionId::new("s");
        binder
            .bind(
                &session,
                StoreHash::new("stores/abc").unwrap(),
                AccessToken::new("tok").unwrap(),
            )
            .await
            .unwrap();

        let error = proxy
            .forward(HttpMethod::Get, "../../stores/other/v3/orders", None, &session)
            .await
            .unwrap_err();
        assert!(matches!(error, ProxyError::InvalidEndpoint { .. }));
        assert_eq!(error.status_code(), 400);
    }

    #[tokio::test]
    async fn test_unreachable_upstream_is_unavailable() {
        let (proxy, binder) = proxy("http://127.0.0.1:9", production());
        let session = SessionId::new("s");
        binder
            .bind(
                &session,
                StoreHash::new("s1").unwrap(),
                AccessToken::new("tok").unwrap(),
            )
            .await
            .unwrap();

        let error = proxy
            .forward(HttpMethod::Get, "v3/orders", None, &session)
            .await
            .unwrap_err();
        assert_eq!(error.status_code(), 502);
    }
}
