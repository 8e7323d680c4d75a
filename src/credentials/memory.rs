//! In-process credential store.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::config::StoreHash;
use crate::credentials::{
    CredentialError, CredentialRecord, CredentialStore, CredentialUpdate, NewCredential,
};

/// A [`CredentialStore`] that keeps records in memory.
///
/// Each operation holds the lock for its whole read-modify-write, so
/// concurrent updates of one record are applied one after the other and the
/// last one wins. Records are lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    records: RwLock<Vec<CredentialRecord>>,
}

impl MemoryCredentialStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored records.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Returns `true` if the store holds no records.
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn find_by_identity(
        &self,
        user_email: &str,
        store_hash: &StoreHash,
    ) -> Result<Option<CredentialRecord>, CredentialError> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .find(|record| record.matches(user_email, store_hash))
            .cloned())
    }

    async fn create(&self, new: NewCredential) -> Result<CredentialRecord, CredentialError> {
        let mut records = self.records.write().await;
        if records
            .iter()
            .any(|record| record.matches(&new.user_email, &new.store_hash))
        {
            return Err(CredentialError::Backend(format!(
                "duplicate record for '{}' in store '{}'",
                new.user_email, new.store_hash
            )));
        }
        let record = CredentialRecord::from_new(new);
        records.push(record.clone());
        Ok(record)
    }

    async fn update(
        &self,
        user_email: &str,
        store_hash: &StoreHash,
        update: CredentialUpdate,
    ) -> Result<(), CredentialError> {
        let mut records = self.records.write().await;
        let record = records
            .iter_mut()
            .find(|record| record.matches(user_email, store_hash))
            .ok_or_else(|| CredentialError::NotFound {
                user_email: user_email.to_string(),
                store_hash: store_hash.to_string(),
            })?;
        record.apply(update);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AccessToken;
    use std::sync::Arc;

    fn store() -> StoreHash {
        StoreHash::new("stores/abc").unwrap()
    }

    #[tokio::test]
    async fn test_create_then_find_by_identity() {
        let credentials = MemoryCredentialStore::new();
        credentials
            .create(
                NewCredential::new(1, "a@b.com", store())
                    .with_access_token(AccessToken::new("tok").unwrap()),
            )
            .await
            .unwrap();

        let found = credentials
            .find_by_identity("a@b.com", &store())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.user_id, 1);
        assert_eq!(found.access_token.unwrap().expose(), "tok");
    }

    #[tokio::test]
    async fn test_lookup_uses_both_key_fields() {
        let credentials = MemoryCredentialStore::new();
        credentials
            .create(NewCredential::new(1, "a@b.com", store()))
            .await
            .unwrap();

        let other_store = StoreHash::new("stores/other").unwrap();
        assert!(credentials
            .find_by_identity("a@b.com", &other_store)
            .await
            .unwrap()
            .is_none());
        assert!(credentials
            .find_by_identity("x@b.com", &store())
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_identity() {
        let credentials = MemoryCredentialStore::new();
        credentials
            .create(NewCredential::new(1, "a@b.com", store()))
            .await
            .unwrap();
        let result = credentials
            .create(NewCredential::new(1, "a@b.com", store()))
            .await;
        assert!(matches!(result, Err(CredentialError::Backend(_))));
        assert_eq!(credentials.len().await, 1);
    }

    #[tokio::test]
    async fn test_update_missing_record_is_not_found() {
        let credentials = MemoryCredentialStore::new();
        let result = credentials
            .update("a@b.com", &store(), CredentialUpdate::default())
            .await;
        assert!(matches!(result, Err(CredentialError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_concurrent_updates_last_write_wins() {
        let credentials = Arc::new(MemoryCredentialStore::new());
        credentials
            .create(NewCredential::new(1, "a@b.com", store()))
            .await
            .unwrap();

        let mut handles = Vec::new();
        for i in 0..20_i64 {
            let credentials = Arc::clone(&credentials);
            handles.push(tokio::spawn(async move {
                credentials
                    .update(
                        "a@b.com",
                        &store(),
                        CredentialUpdate {
                            locale: Some(format!("locale-{i}")),
                            timestamp: Some(i),
                            ..CredentialUpdate::default()
                        },
                    )
                    .await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let record = credentials
            .find_by_identity("a@b.com", &store())
            .await
            .unwrap()
            .unwrap();
        // Locale and timestamp always come from the same update
        let i = record.timestamp.unwrap();
        assert_eq!(record.locale, Some(format!("locale-{i}")));
        assert_eq!(credentials.len().await, 1);
    }
}
