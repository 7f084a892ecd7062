use std::sync::Arc;
use std::time::Duration;

use service::clock::Clock;
use service::records::RecordStore;
use service::stats::StatsService;
use service::storage::Storage;

/// Shared handler state. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub records: Arc<RecordStore>,
    pub stats: Arc<StatsService>,
    pub api_key: Arc<str>,
}

impl AppState {
    pub fn new(storage: Storage, clock: Arc<dyn Clock>, cfg: &configs::AppConfig) -> Self {
        let records = RecordStore::new(storage.records, clock.clone());
        let stats = StatsService::new(storage.stats, clock)
            .with_flush_timeout(Duration::from_secs(cfg.stats.flush_timeout_secs))
            .with_failure_policy(cfg.stats.on_flush_failure);
        Self::from_parts(Arc::new(records), Arc::new(stats), &cfg.auth.api_key)
    }

    pub fn from_parts(records: Arc<RecordStore>, stats: Arc<StatsService>, api_key: &str) -> Self {
        Self { records, stats, api_key: Arc::from(api_key) }
    }
}
