//! The persisted credential record and its create/update inputs.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::{AccessToken, StoreHash};

/// One (user, store) pairing and the access token issued for it.
///
/// The record is keyed by `(user_email, store_hash)`. Serializing it never
/// includes the access token, so a record can be returned from an endpoint
/// or written to logs as JSON without leaking credentials.
///
/// # Example
///
/// ```rust
/// use bigcommerce_app::credentials::{CredentialRecord, NewCredential};
/// use bigcommerce_app::{AccessToken, StoreHash};
///
/// let record = CredentialRecord::from_new(
///     NewCredential::new(1, "a@b.com", StoreHash::new("stores/abc").unwrap())
///         .with_access_token(AccessToken::new("tok").unwrap()),
/// );
/// let json = serde_json::to_value(&record).unwrap();
/// assert_eq!(json["store_hash"], "stores/abc");
/// assert!(json.get("access_token").is_none());
/// ```
#[derive(Clone, Debug, Serialize)]
pub struct CredentialRecord {
    /// BigCommerce user id.
    pub user_id: u64,
    /// User email; first half of the key.
    pub user_email: String,
    /// Store identifier; second half of the key.
    pub store_hash: StoreHash,
    /// Store owner's user id.
    pub owner_id: Option<u64>,
    /// Store owner's email.
    pub owner_email: Option<String>,
    /// User's control panel locale.
    pub locale: Option<String>,
    /// Granted OAuth scopes.
    pub scope: Option<String>,
    /// BigCommerce account of the store.
    pub account_uuid: Option<String>,
    /// Store-scoped API token. Absent for users who loaded the app without
    /// installing it.
    #[serde(skip_serializing)]
    pub access_token: Option<AccessToken>,
    /// Time of the last signed payload, in seconds since the epoch.
    pub timestamp: Option<i64>,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
    /// When the record was last modified.
    pub updated_at: DateTime<Utc>,
}

impl CredentialRecord {
    /// Builds a fresh record, stamping both lifecycle times with now.
    #[must_use]
    pub fn from_new(new: NewCredential) -> Self {
        let now = Utc::now();
        Self {
            user_id: new.user_id,
            user_email: new.user_email,
            store_hash: new.store_hash,
            owner_id: new.owner_id,
            owner_email: new.owner_email,
            locale: new.locale,
            scope: new.scope,
            account_uuid: new.account_uuid,
            access_token: new.access_token,
            timestamp: new.timestamp,
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns `true` if this record is addressed by the given pair.
    #[must_use]
    pub fn matches(&self, user_email: &str, store_hash: &StoreHash) -> bool {
        self.user_email == user_email && &self.store_hash == store_hash
    }

    /// Applies a partial update and bumps `updated_at`.
    ///
    /// Fields left as `None` in the update keep their current value.
    pub fn apply(&mut self, update: CredentialUpdate) {
        if let Some(locale) = update.locale {
            self.locale = Some(locale);
        }
        if let Some(owner_id) = update.owner_id {
            self.owner_id = Some(owner_id);
        }
        if let Some(owner_email) = update.owner_email {
            self.owner_email = Some(owner_email);
        }
        if let Some(timestamp) = update.timestamp {
            self.timestamp = Some(timestamp);
        }
        if let Some(scope) = update.scope {
            self.scope = Some(scope);
        }
        if let Some(account_uuid) = update.account_uuid {
            self.account_uuid = Some(account_uuid);
        }
        if let Some(token) = update.access_token {
            self.access_token = Some(token);
        }
        self.updated_at = Utc::now();
    }
}

/// Input for [`CredentialStore::create`](super::CredentialStore::create).
#[derive(Clone, Debug)]
pub struct NewCredential {
    /// BigCommerce user id.
    pub user_id: u64,
    /// User email.
    pub user_email: String,
    /// Store identifier.
    pub store_hash: StoreHash,
    /// Store owner's user id.
    pub owner_id: Option<u64>,
    /// Store owner's email.
    pub owner_email: Option<String>,
    /// User locale.
    pub locale: Option<String>,
    /// Granted scopes.
    pub scope: Option<String>,
    /// BigCommerce account.
    pub account_uuid: Option<String>,
    /// Access token, if one was issued.
    pub access_token: Option<AccessToken>,
    /// Signed payload time.
    pub timestamp: Option<i64>,
}

impl NewCredential {
    /// Starts a new record for the given user and store.
    #[must_use]
    pub fn new(user_id: u64, user_email: impl Into<String>, store_hash: StoreHash) -> Self {
        Self {
            user_id,
            user_email: user_email.into(),
            store_hash,
            owner_id: None,
            owner_email: None,
            locale: None,
            scope: None,
            account_uuid: None,
            access_token: None,
            timestamp: None,
        }
    }

    /// Sets the access token.
    #[must_use]
    pub fn with_access_token(mut self, token: AccessToken) -> Self {
        self.access_token = Some(token);
        self
    }

    /// Sets the granted scopes.
    #[must_use]
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    /// Sets the account uuid.
    #[must_use]
    pub fn with_account_uuid(mut self, account_uuid: Option<String>) -> Self {
        self.account_uuid = account_uuid;
        self
    }

    /// Sets the store owner.
    #[must_use]
    pub fn with_owner(mut self, id: u64, email: impl Into<String>) -> Self {
        self.owner_id = Some(id);
        self.owner_email = Some(email.into());
        self
    }

    /// Sets the locale.
    #[must_use]
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    /// Sets the signed payload time.
    #[must_use]
    pub const fn with_timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}

/// A partial update to an existing record.
///
/// `load` refreshes the locale, owner and timestamp; a re-install also
/// replaces the token and scope.
#[derive(Clone, Debug, Default)]
pub struct CredentialUpdate {
    /// New locale.
    pub locale: Option<String>,
    /// New owner id.
    pub owner_id: Option<u64>,
    /// New owner email.
    pub owner_email: Option<String>,
    /// New signed payload time.
    pub timestamp: Option<i64>,
    /// New scopes.
    pub scope: Option<String>,
    /// New account uuid.
    pub account_uuid: Option<String>,
    /// New access token.
    pub access_token: Option<AccessToken>,
}
