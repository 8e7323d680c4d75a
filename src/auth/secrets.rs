//! Mode-specific sources of app secrets.
//!
//! The process picks one [`SecretProvider`] at startup (see
//! [`AppConfig::secret_provider`](crate::AppConfig::secret_provider)) and
//! passes it to every component that needs the client id or secret. Test code
//! can substitute its own implementation.

use crate::config::{AccessToken, ClientCredentials, ClientId, ClientSecret, StoreHash};

/// Resolves the app's client credentials and local-mode overrides.
///
/// Implementations perform no I/O and must be cheap to call on every request.
pub trait SecretProvider: Send + Sync + std::fmt::Debug {
    /// Returns the client id sent to BigCommerce.
    fn client_id(&self) -> &ClientId;

    /// Returns the client secret used for HMAC verification and token exchange.
    fn client_secret(&self) -> &ClientSecret;

    /// Returns the previous client secret while a rotation is in progress.
    fn previous_client_secret(&self) -> Option<&ClientSecret> {
        None
    }

    /// Returns the static access token that replaces the session-bound one.
    fn local_access_token(&self) -> Option<&AccessToken>;

    /// Returns the static store hash that replaces the session-bound one.
    fn local_store_hash(&self) -> Option<&StoreHash>;
}

/// Secrets for production: real OAuth credentials, no overrides.
#[derive(Clone, Debug)]
pub struct ProductionSecrets {
    credentials: ClientCredentials,
    previous_secret: Option<ClientSecret>,
}

impl ProductionSecrets {
    /// Creates a production secret source.
    #[must_use]
    pub const fn new(credentials: ClientCredentials, previous_secret: Option<ClientSecret>) -> Self {
        Self {
            credentials,
            previous_secret,
        }
    }
}

impl SecretProvider for ProductionSecrets {
    fn client_id(&self) -> &ClientId {
        self.credentials.client_id()
    }

    fn client_secret(&self) -> &ClientSecret {
        self.credentials.client_secret()
    }

    fn previous_client_secret(&self) -> Option<&ClientSecret> {
        self.previous_secret.as_ref()
    }

    fn local_access_token(&self) -> Option<&AccessToken> {
        None
    }

    fn local_store_hash(&self) -> Option<&StoreHash> {
        None
    }
}

/// Secrets for local development.
///
/// When both the access token and store hash are set, the API proxy uses
/// them instead of the values bound to the browser session, so the app can
/// be exercised against a dev store without going through install and load.
#[derive(Clone, Debug)]
pub struct LocalSecrets {
    credentials: ClientCredentials,
    access_token: Option<AccessToken>,
    store_hash: Option<StoreHash>,
}

impl LocalSecrets {
    /// Creates a local secret source.
    #[must_use]
    pub const fn new(
        credentials: ClientCredentials,
        access_token: Option<AccessToken>,
        store_hash: Option<StoreHash>,
    ) -> Self {
        Self {
            credentials,
            access_token,
            store_hash,
        }
    }
}

impl SecretProvider for LocalSecrets {
    fn client_id(&self) -> &ClientId {
        self.credentials.client_id()
    }

    fn client_secret(&self) -> &ClientSecret {
        self.credentials.client_secret()
    }

    fn local_access_token(&self) -> Option<&AccessToken> {
        self.access_token.as_ref()
    }

    fn local_store_hash(&self) -> Option<&StoreHash> {
        self.store_hash.as_ref()
    }
}

// Verify providers are Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ProductionSecrets>();
    assert_send_sync::<LocalSecrets>();
};

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials(id: &str, secret: &str) -> ClientCredentials {
        ClientCredentials::new(ClientId::new(id).unwrap(), ClientSecret::new(secret).unwrap())
    }

    #[test]
    fn test_production_secrets_never_expose_overrides() {
        let secrets = ProductionSecrets::new(credentials("id", "secret"), None);
        assert_eq!(secrets.client_id().as_ref(), "id");
        assert_eq!(secrets.client_secret().as_ref(), "secret");
        assert!(secrets.local_access_token().is_none());
        assert!(secrets.local_store_hash().is_none());
        assert!(secrets.previous_client_secret().is_none());
    }

    #[test]
    fn test_production_secrets_carry_previous_secret() {
        let secrets = ProductionSecrets::new(
            credentials("id", "new-secret"),
            Some(ClientSecret::new("old-secret").unwrap()),
        );
        assert_eq!(
            secrets.previous_client_secret().map(<ClientSecret as AsRef<str>>::as_ref),
            Some("old-secret")
        );
    }

    #[test]
    fn test_local_secrets_expose_overrides() {
        let secrets = LocalSecrets::new(
            credentials("local-id", "local-secret"),
            Some(AccessToken::new("tok").unwrap()),
            Some(StoreHash::new("stores/dev").unwrap()),
        );
        assert_eq!(secrets.client_id().as_ref(), "local-id");
        assert_eq!(secrets.local_access_token().map(AccessToken::expose), Some("tok"));
        assert_eq!(
            secrets.local_store_hash().map(<StoreHash as AsRef<str>>::as_ref),
            Some("stores/dev")
        );
    }

    #[test]
    fn test_debug_output_masks_secrets() {
        let secrets = LocalSecrets::new(
            credentials("local-id", "local-secret"),
            Some(AccessToken::new("tok-value").unwrap()),
            None,
        );
        let debug_str = format!("{secrets:?}");
        assert!(!debug_str.contains("local-secret"));
        assert!(!debug_str.contains("tok-value"));
    }
}
