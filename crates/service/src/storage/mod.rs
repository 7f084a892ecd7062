//! Storage backend selection.
//!
//! `postgres://` URLs get the SeaORM repositories (migrations applied at connect),
//! `memory://` the process-local ones.

use std::sync::Arc;

use migration::MigratorTrait;
use tracing::{info, warn};

use crate::records::repo::seaorm::SeaOrmRecordRepository;
use crate::records::repository::{memory::InMemoryRecordRepository, RecordRepository};
use crate::stats::repo::seaorm::SeaOrmStatsRepository;
use crate::stats::repository::{memory::InMemoryStatsRepository, StatsRepository};

#[derive(Clone)]
pub struct Storage {
    pub records: Arc<dyn RecordRepository>,
    pub stats: Arc<dyn StatsRepository>,
}

impl Storage {
    pub fn in_memory() -> Self {
        Self {
            records: Arc::new(InMemoryRecordRepository::default()),
            stats: Arc::new(InMemoryStatsRepository::default()),
        }
    }

    /// Open the configured backend. Fails if the database is unreachable or migrations fail.
    pub async fn connect(cfg: &configs::DatabaseConfig) -> anyhow::Result<Self> {
        if cfg.is_memory() {
            warn!(event = "storage_memory", "using in-memory storage; data is lost on restart");
            return Ok(Self::in_memory());
        }
        let db = models::db::connect(cfg).await?;
        migration::Migrator::up(&db, None).await?;
        info!(event = "migrations_applied", "database schema up to date");
        Ok(Self {
            records: Arc::new(SeaOrmRecordRepository { db: db.clone() }),
            stats: Arc::new(SeaOrmStatsRepository { db }),
        })
    }
}
