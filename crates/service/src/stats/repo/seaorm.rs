use async_trait::async_trait;
use sea_orm::DatabaseConnection;

use crate::errors::ServiceError;
use crate::stats::domain::{CounterDelta, GlobalStats};
use crate::stats::repository::StatsRepository;

/// SeaORM-backed repository implementation.
pub struct SeaOrmStatsRepository {
    pub db: DatabaseConnection,
}

fn to_db(n: u64) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

fn from_db(n: i64) -> u64 {
    u64::try_from(n).unwrap_or(0)
}

#[async_trait]
impl StatsRepository for SeaOrmStatsRepository {
    async fn load(&self) -> Result<Option<GlobalStats>, ServiceError> {
        let found = models::global_stats::find(&self.db).await?;
        Ok(found.map(|m| GlobalStats {
            all_time_get: from_db(m.all_time_get),
            all_time_post: from_db(m.all_time_post),
            today_date: m.today_date,
            today_get: from_db(m.today_get),
            today_post: from_db(m.today_post),
        }))
    }

    async fn merge(&self, delta: CounterDelta, today: &str) -> Result<(), ServiceError> {
        models::global_stats::ensure(&self.db, today).await?;
        let updated =
            models::global_stats::merge_delta(&self.db, to_db(delta.get), to_db(delta.post), today).await?;
        if updated == 0 {
            return Err(ServiceError::Storage("global stats row missing after ensure".into()));
        }
        Ok(())
    }
}
