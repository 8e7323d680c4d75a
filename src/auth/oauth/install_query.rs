//! Query parameters of the install callback.

use serde::{Deserialize, Serialize};

use crate::auth::oauth::OAuthError;

/// Query parameters BigCommerce sends to `/auth/install`.
///
/// All fields are optional at the type level so a router can deserialize any
/// request; [`InstallQuery::params`] enforces the required ones.
///
/// # Example
///
/// ```rust
/// use bigcommerce_app::auth::oauth::InstallQuery;
///
/// let query = InstallQuery::new("abc123", "store_v2_products", "stores/xyz789");
/// let params = query.params().unwrap();
/// assert_eq!(params.context, "stores/xyz789");
/// assert!(!query.is_external());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallQuery {
    /// Authorization code to exchange.
    pub code: Option<String>,
    /// Space-separated scopes the merchant granted.
    pub scope: Option<String>,
    /// Store context, e.g. `stores/xyz789`.
    pub context: Option<String>,
    /// Present when the merchant installed from outside the control panel.
    pub external_install: Option<String>,
}

/// The required install parameters, borrowed from an [`InstallQuery`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InstallParams<'a> {
    /// Authorization code to exchange.
    pub code: &'a str,
    /// Granted scopes.
    pub scope: &'a str,
    /// Store context.
    pub context: &'a str,
}

impl InstallQuery {
    /// Creates a query with the three required parameters.
    #[must_use]
    pub fn new(code: impl Into<String>, scope: impl Into<String>, context: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            scope: Some(scope.into()),
            context: Some(context.into()),
            external_install: None,
        }
    }

    /// Marks the install as started from an external link.
    #[must_use]
    pub fn external(mut self) -> Self {
        self.external_install = Some("1".to_string());
        self
    }

    /// Returns `true` if the install was started from an external link.
    #[must_use]
    pub const fn is_external(&self) -> bool {
        self.external_install.is_some()
    }

    /// Returns the required parameters.
    ///
    /// # Errors
    ///
    /// Returns [`OAuthError::InvalidCallback`] naming the first parameter
    /// that is missing or empty.
    pub fn params(&self) -> Result<InstallParams<'_>, OAuthError> {
        fn required<'a>(value: Option<&'a String>, name: &str) -> Result<&'a str, OAuthError> {
            value
                .map(String::as_str)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| OAuthError::InvalidCallback {
                    reason: format!("missing '{name}'"),
                })
        }

        Ok(InstallParams {
            code: required(self.code.as_ref(), "code")?,
            scope: required(self.scope.as_ref(), "scope")?,
            context: required(self.context.as_ref(), "context")?,
        })
    }
}
