use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, instrument};

use super::repository::RecordRepository;
use crate::clock::Clock;
use crate::errors::ServiceError;

/// How long a record stays readable after its last save.
pub const RETENTION: Duration = Duration::from_secs(600);

/// Keyed, self-expiring storage of opaque payloads.
///
/// Expiry is enforced on every read through the repository cutoff, independently of
/// whether the reaper has already removed the row.
pub struct RecordStore {
    repo: Arc<dyn RecordRepository>,
    clock: Arc<dyn Clock>,
}

impl RecordStore {
    pub fn new(repo: Arc<dyn RecordRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repo, clock }
    }

    /// Oldest `created_at` that counts as expired at the current instant.
    fn cutoff(&self) -> DateTime<Utc> {
        let retention = chrono::Duration::seconds(RETENTION.as_secs() as i64);
        self.clock.now() - retention
    }

    /// Upsert `payload` under `key`, resetting its expiry clock.
    #[instrument(skip_all, fields(key = %key, payload_len = payload.len()))]
    pub async fn save(&self, key: &str, payload: &str) -> Result<(), ServiceError> {
        if key.is_empty() || payload.is_empty() {
            return Err(ServiceError::Validation("key and payload required".into()));
        }
        // Postgres text columns cannot hold NUL
        if key.contains('\0') || payload.contains('\0') {
            return Err(ServiceError::Validation("Key and Data must not contain NUL characters".into()));
        }
        self.repo.upsert(key, payload, self.clock.now()).await?;
        common::observability::RECORDS_SAVED_TOTAL.inc();
        debug!("record_saved");
        Ok(())
    }

    /// Payload of the live record under `key`. Reading never extends expiry.
    #[instrument(skip_all, fields(key = %key))]
    pub async fn fetch(&self, key: &str) -> Result<String, ServiceError> {
        match self.repo.find_live(key, self.cutoff()).await? {
            Some(record) => Ok(record.payload),
            None => Err(ServiceError::not_found("record")),
        }
    }

    /// Remove expired rows. Called periodically by the reaper task.
    pub async fn purge_expired(&self) -> Result<u64, ServiceError> {
        let purged = self.repo.purge_expired(self.cutoff()).await?;
        if purged > 0 {
            common::observability::RECORDS_PURGED_TOTAL.inc_by(purged);
        }
        Ok(purged)
    }
}
