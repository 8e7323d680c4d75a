//! The verified contents of a load payload.

use serde::{de, Deserialize, Deserializer, Serialize};

use crate::auth::signed_payload::VerifyError;
use crate::config::StoreHash;

/// The BigCommerce user opening the app.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayloadUser {
    /// BigCommerce user id.
    pub id: u64,
    /// The user's email address.
    pub email: String,
    /// The user's control panel locale, e.g. `en-US`.
    pub locale: String,
}

/// The owner of the store the app was opened in.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayloadOwner {
    /// BigCommerce user id of the store owner.
    pub id: u64,
    /// The store owner's email address.
    pub email: String,
}

#[derive(Deserialize)]
struct RawPayload {
    user: PayloadUser,
    owner: PayloadOwner,
    context: Option<String>,
    store_hash: Option<String>,
    #[serde(deserialize_with = "deserialize_timestamp")]
    timestamp: i64,
    url: Option<String>,
}

/// A payload whose signature has been checked against the app's secret.
///
/// # Store identity
///
/// BigCommerce sends the store both as `context` (`stores/abc123`) and as a
/// bare `store_hash` (`abc123`). The install callback only carries `context`,
/// so `context` is the canonical identifier; when a payload lacks it,
/// `store_hash` is mapped to `stores/<store_hash>`.
#[derive(Clone, Debug, PartialEq)]
pub struct SignedPayload {
    user: PayloadUser,
    owner: PayloadOwner,
    store_hash: StoreHash,
    timestamp: i64,
    url: Option<String>,
    raw: serde_json::Value,
}

impl SignedPayload {
    pub(crate) fn from_value(raw: serde_json::Value) -> Result<Self, VerifyError> {
        let parsed: RawPayload = serde_json::from_value(raw.clone())
            .map_err(|e| VerifyError::malformed(format!("invalid payload fields: {e}")))?;

        let store = match (parsed.context, parsed.store_hash) {
            (Some(context), _) => context,
            (None, Some(hash)) => format!("stores/{hash}"),
            (None, None) => {
                return Err(VerifyError::malformed(
                    "payload has neither 'context' nor 'store_hash'",
                ))
            }
        };
        let store_hash = StoreHash::new(store)
            .map_err(|e| VerifyError::malformed(format!("invalid store identifier: {e}")))?;

        Ok(Self {
            user: parsed.user,
            owner: parsed.owner,
            store_hash,
            timestamp: parsed.timestamp,
            url: parsed.url,
            raw,
        })
    }

    /// Returns the user opening the app.
    #[must_use]
    pub const fn user(&self) -> &PayloadUser {
        &self.user
    }

    /// Returns the store owner.
    #[must_use]
    pub const fn owner(&self) -> &PayloadOwner {
        &self.owner
    }

    /// Returns the store the payload is for.
    #[must_use]
    pub const fn store_hash(&self) -> &StoreHash {
        &self.store_hash
    }

    /// Returns the platform event time in whole seconds.
    #[must_use]
    pub const fn timestamp(&self) -> i64 {
        self.timestamp
    }

    /// Returns the app-relative URL the control panel wants opened, if any.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Returns the decoded JSON exactly as it was signed.
    #[must_use]
    pub const fn raw(&self) -> &serde_json::Value {
        &self.raw
    }
}

#[allow(clippy::cast_possible_truncation)]
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let number = serde_json::Number::deserialize(deserializer)?;
    number
        .as_i64()
        .or_else(|| {
            number
                .as_f64()
                .filter(|f| f.is_finite() && f.abs() < 9.0e18)
                .map(|f| f.trunc() as i64)
        })
        .ok_or_else(|| de::Error::custom("timestamp is out of range"))
}
