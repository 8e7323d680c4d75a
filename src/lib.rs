//! # BigCommerce App Rust Library
//!
//! The server-side core of a BigCommerce app: OAuth install, signed-payload
//! load, per-store credential persistence and an authenticated API proxy.
//!
//! ## Overview
//!
//! This library provides:
//! - Type-safe configuration via [`AppConfig`] and [`AppConfigBuilder`],
//!   loadable from the environment
//! - Local and production secret sources behind [`auth::secrets::SecretProvider`]
//! - HMAC-SHA256 verification of `signed_payload` via [`auth::signed_payload`]
//! - The authorization code exchange via [`auth::oauth`]
//! - Credential persistence keyed by (user email, store hash) via [`credentials`]
//! - Session binding via [`session`]
//! - An API proxy that attaches the session's store credentials via [`clients`]
//! - The install, load and proxy flows tied together in [`App`]
//!
//! ## Quick Start
//!
//! ```rust
//! use bigcommerce_app::{AppConfig, AppUrl, ClientCredentials, ClientId, ClientSecret};
//!
//! let config = AppConfig::builder()
//!     .app_url(AppUrl::new("https://myapp.example.com").unwrap())
//!     .app_credentials(ClientCredentials::new(
//!         ClientId::new("your-client-id").unwrap(),
//!         ClientSecret::new("your-client-secret").unwrap(),
//!     ))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.redirect_uri(), "https://myapp.example.com/auth/install");
//! ```
//!
//! ## Wiring the Flows
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use bigcommerce_app::{App, AppConfig, HttpMethod};
//! use bigcommerce_app::auth::oauth::InstallQuery;
//! use bigcommerce_app::credentials::MemoryCredentialStore;
//! use bigcommerce_app::session::{MemorySessionStore, SessionId};
//!
//! let app = App::new(
//!     AppConfig::from_env()?,
//!     Arc::new(MemoryCredentialStore::new()),
//!     Arc::new(MemorySessionStore::new()),
//! )?;
//!
//! // GET /auth/install?code=...&scope=...&context=...
//! let redirect = app.install(&query, &session_id).await;
//!
//! // POST /load with signed_payload
//! let redirect = app.load(Some(&signed_payload), &session_id).await;
//!
//! // ANY /bc-api/{endpoint}
//! let response = app.proxy(HttpMethod::Get, "v3/catalog/products", None, &session_id).await;
//! ```
//!
//! ## Design Principles
//!
//! - **No global state**: sessions are addressed by an explicit [`session::SessionId`]
//! - **Fail-fast validation**: all newtypes validate on construction
//! - **Thread-safe**: all types are `Send + Sync`
//! - **Async-first**: designed for use with the Tokio runtime
//! - **Secrets stay inside**: access tokens and client secrets mask themselves
//!   in `Debug` and are never serialized

pub mod app;
pub mod auth;
pub mod clients;
pub mod config;
pub mod credentials;
pub mod error;
pub mod session;

// Re-export public types at crate root for convenience
pub use app::{App, Redirect};
pub use config::{
    AccessToken, AppConfig, AppConfigBuilder, AppMode, AppUrl, ClientCredentials, ClientId,
    ClientSecret, StoreHash,
};
pub use error::ConfigError;

// Re-export proxy types
pub use clients::{ApiProxy, HttpMethod, ProxiedResponse, ProxyError};
