use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::domain::StoredRecord;
use crate::errors::ServiceError;

/// Repository abstraction for record persistence.
///
/// `cutoff` is the oldest `created_at` that is already expired: live records satisfy
/// `created_at > cutoff`.
#[async_trait]
pub trait RecordRepository: Send + Sync {
    /// Insert or replace the record under `key` in a single atomic step.
    async fn upsert(&self, key: &str, payload: &str, created_at: DateTime<Utc>) -> Result<(), ServiceError>;
    async fn find_live(&self, key: &str, cutoff: DateTime<Utc>) -> Result<Option<StoredRecord>, ServiceError>;
    /// Physically remove expired records; returns how many were removed.
    async fn purge_expired(&self, cutoff: DateTime<Utc>) -> Result<u64, ServiceError>;
}

/// Process-local repository, selected with `memory://` and used by tests.
pub mod memory {
    use super::*;
    use std::collections::HashMap;
    use tokio::sync::RwLock;

    #[derive(Default)]
    pub struct InMemoryRecordRepository {
        records: RwLock<HashMap<String, StoredRecord>>,
    }

    impl InMemoryRecordRepository {
        /// Number of rows held, expired or not.
        pub async fn len(&self) -> usize {
            self.records.read().await.len()
        }

        pub async fn is_empty(&self) -> bool {
            self.len().await == 0
        }
    }

    #[async_trait]
    impl RecordRepository for InMemoryRecordRepository {
        async fn upsert(&self, key: &str, payload: &str, created_at: DateTime<Utc>) -> Result<(), ServiceError> {
            let mut records = self.records.write().await;
            records.insert(
                key.to_string(),
                StoredRecord { key: key.to_string(), payload: payload.to_string(), created_at },
            );
            Ok(())
        }

        async fn find_live(&self, key: &str, cutoff: DateTime<Utc>) -> Result<Option<StoredRecord>, ServiceError> {
            let records = self.records.read().await;
            Ok(records.get(key).filter(|r| r.created_at > cutoff).cloned())
        }

        async fn purge_expired(&self, cutoff: DateTime<Utc>) -> Result<u64, ServiceError> {
            let mut records = self.records.write().await;
            let before = records.len();
            records.retain(|_, r| r.created_at > cutoff);
            Ok((before - records.len()) as u64)
        }
    }
}
