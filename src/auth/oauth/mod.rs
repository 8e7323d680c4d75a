//! OAuth authorization code flow for app installs.
//!
//! - [`InstallQuery`]: the parameters BigCommerce sends to `/auth/install`
//! - [`OAuthExchanger`]: exchanges the authorization code for an access token
//! - [`ExchangeResult`]: the token and the user/store it belongs to
//! - [`OAuthError`]: what can go wrong
//!
//! The exchanger only talks to the token endpoint. Storing the credential and
//! binding it to the merchant's session is done by [`App::install`](crate::App::install).

mod error;
mod exchange;
mod install_query;

pub use error::OAuthError;
pub use exchange::{ExchangeResult, ExchangeUser, OAuthExchanger};
pub use install_query::{InstallParams, InstallQuery};
