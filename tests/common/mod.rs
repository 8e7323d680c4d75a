//! Shared fixtures for the flow tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use bigcommerce_app::credentials::{
    CredentialError, CredentialRecord, CredentialStore, CredentialUpdate, MemoryCredentialStore,
    NewCredential,
};
use bigcommerce_app::session::MemorySessionStore;
use bigcommerce_app::{App, AppConfig, AppMode, AppUrl, ClientCredentials, ClientId, ClientSecret, StoreHash};

pub const CLIENT_ID: &str = "test-client-id";
pub const CLIENT_SECRET: &str = "test-client-secret";
pub const APP_URL: &str = "https://app.example.com";

/// Wraps the memory store and counts writes.
#[derive(Debug, Default)]
pub struct CountingStore {
    inner: MemoryCredentialStore,
    creates: AtomicUsize,
    updates: AtomicUsize,
}

impl CountingStore {
    pub fn creates(&self) -> usize {
        self.creates.load(Ordering::SeqCst)
    }

    pub fn updates(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }

    pub fn mutations(&self) -> usize {
        self.creates() + self.updates()
    }
}

#[async_trait]
impl CredentialStore for CountingStore {
    async fn find_by_identity(
        &self,
        user_email: &str,
        store_hash: &StoreHash,
    ) -> Result<Option<CredentialRecord>, CredentialError> {
        self.inner.find_by_identity(user_email, store_hash).await
    }

    async fn create(&self, new: NewCredential) -> Result<CredentialRecord, CredentialError> {
        self.creates.fetch_add(1, Ordering::SeqCst);
        self.inner.create(new).await
    }

    async fn update(
        &self,
        user_email: &str,
        store_hash: &StoreHash,
        update: CredentialUpdate,
    ) -> Result<(), CredentialError> {
        self.updates.fetch_add(1, Ordering::SeqCst);
        self.inner.update(user_email, store_hash, update).await
    }
}

pub fn credentials() -> ClientCredentials {
    ClientCredentials::new(
        ClientId::new(CLIENT_ID).unwrap(),
        ClientSecret::new(CLIENT_SECRET).unwrap(),
    )
}

pub fn config(server_uri: &str) -> AppConfig {
    AppConfig::builder()
        .mode(AppMode::Production)
        .app_url(AppUrl::new(APP_URL).unwrap())
        .app_credentials(credentials())
        .login_url(server_uri)
        .api_url(server_uri)
        .build()
        .unwrap()
}

pub fn app_with(config: AppConfig) -> (App, Arc<CountingStore>) {
    let store = Arc::new(CountingStore::default());
    let app = App::with_client(
        config,
        reqwest::Client::new(),
        Arc::clone(&store) as Arc<dyn CredentialStore>,
        Arc::new(MemorySessionStore::new()),
    );
    (app, store)
}

pub fn app(server_uri: &str) -> (App, Arc<CountingStore>) {
    app_with(config(server_uri))
}

pub fn store_hash(value: &str) -> StoreHash {
    StoreHash::new(value).unwrap()
}
