//! Outbound HTTP: the shared client and the BigCommerce API proxy.
//!
//! # Overview
//!
//! - [`build_http_client`]: the `reqwest` client shared by the token
//!   exchange and the proxy, with the configured timeout
//! - [`ApiProxy`]: forwards a browser API call with the session's store
//!   credentials
//! - [`HttpMethod`]: methods the proxy forwards
//! - [`normalize_endpoint`]: endpoint rewriting for V2 paths
//! - [`ProxiedResponse`]: what goes back to the browser
//! - [`ProxyError`]: failures with no upstream response to relay
//!
//! # Status handling
//!
//! Upstream statuses, including 4xx and 5xx, are relayed verbatim. There is
//! no retry: each browser call maps to exactly one upstream call.

mod errors;
mod http_request;
mod http_response;
mod proxy;

pub use errors::ProxyError;
pub use http_request::{normalize_endpoint, HttpMethod, UnsupportedMethod};
pub use http_response::{ProxiedResponse, JSON_CONTENT_TYPE};
pub use proxy::{build_http_client, ApiProxy, SDK_VERSION};
