//! Deployment mode selection.

use std::fmt;
use std::str::FromStr;

/// Selects which set of app secrets the process runs with.
///
/// `Local` uses the development client credentials and may substitute a
/// static access token and store hash for the session-bound ones.
/// `Production` uses the real OAuth secrets only.
///
/// # Example
///
/// ```rust
/// use bigcommerce_app::AppMode;
///
/// assert_eq!(AppMode::from_app_env(Some("local")), AppMode::Local);
/// assert_eq!(AppMode::from_app_env(Some("production")), AppMode::Production);
/// assert_eq!(AppMode::from_app_env(None), AppMode::Production);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AppMode {
    /// Static development secrets.
    Local,
    /// Real OAuth secrets.
    #[default]
    Production,
}

impl AppMode {
    /// Maps an `APP_ENV` value to a mode.
    ///
    /// Only the exact value `local` selects [`AppMode::Local`]; anything else,
    /// including an unset variable, is production.
    #[must_use]
    pub fn from_app_env(value: Option<&str>) -> Self {
        match value {
            Some("local") => Self::Local,
            _ => Self::Production,
        }
    }

    /// Returns `true` for [`AppMode::Local`].
    #[must_use]
    pub const fn is_local(self) -> bool {
        matches!(self, Self::Local)
    }
}

impl FromStr for AppMode {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_app_env(Some(s)))
    }
}

impl fmt::Display for AppMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local => f.write_str("local"),
            Self::Production => f.write_str("production"),
        }
    }
}
