//! Authentication for BigCommerce apps.
//!
//! # Overview
//!
//! - [`secrets`]: where the client id, client secret and local overrides
//!   come from
//! - [`signed_payload`]: verification of the payload BigCommerce posts when
//!   a merchant opens the app
//! - [`oauth`]: the authorization code exchange performed on install
//!
//! # Flows
//!
//! BigCommerce authenticates an app in two steps:
//!
//! 1. **Install**: the merchant grants scopes and BigCommerce calls the app's
//!    `/auth/install` with an authorization `code`, which the app exchanges
//!    for a long-lived, store-scoped access token.
//! 2. **Load**: every time the merchant opens the app in the control panel,
//!    BigCommerce posts a `signed_payload` identifying the user and store.
//!    The app verifies the HMAC and looks up the stored token.

pub mod oauth;
pub mod secrets;
pub mod signed_payload;

pub use secrets::{LocalSecrets, ProductionSecrets, SecretProvider};
