use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::DatabaseConnection;

use crate::errors::ServiceError;
use crate::records::domain::StoredRecord;
use crate::records::repository::RecordRepository;

/// SeaORM-backed repository implementation.
pub struct SeaOrmRecordRepository {
    pub db: DatabaseConnection,
}

#[async_trait]
impl RecordRepository for SeaOrmRecordRepository {
    async fn upsert(&self, key: &str, payload: &str, created_at: DateTime<Utc>) -> Result<(), ServiceError> {
        models::stored_record::upsert(&self.db, key, payload, created_at.into()).await?;
        Ok(())
    }

    async fn find_live(&self, key: &str, cutoff: DateTime<Utc>) -> Result<Option<StoredRecord>, ServiceError> {
        let found = models::stored_record::find_live(&self.db, key, cutoff.into()).await?;
        Ok(found.map(|m| StoredRecord {
            key: m.key,
            payload: m.payload,
            created_at: m.created_at.with_timezone(&Utc),
        }))
    }

    async fn purge_expired(&self, cutoff: DateTime<Utc>) -> Result<u64, ServiceError> {
        Ok(models::stored_record::purge_expired(&self.db, cutoff.into()).await?)
    }
}
