use async_trait::async_trait;

use super::domain::{CounterDelta, GlobalStats};
use crate::errors::ServiceError;

/// Persistence of the singleton stats document.
#[async_trait]
pub trait StatsRepository: Send + Sync {
    async fn load(&self) -> Result<Option<GlobalStats>, ServiceError>;

    /// Add `delta` to the stored counters, creating the document for `today` if absent and
    /// rolling the day counters over when the stored date differs. Implementations must
    /// apply the delta in place so independent writers cannot lose each other's updates.
    async fn merge(&self, delta: CounterDelta, today: &str) -> Result<(), ServiceError>;
}

pub mod memory {
    use super::*;
    use tokio::sync::Mutex;

    #[derive(Default)]
    pub struct InMemoryStatsRepository {
        doc: Mutex<Option<GlobalStats>>,
    }

    impl InMemoryStatsRepository {
        /// Seed the stored document, e.g. with a previous day's counters.
        pub fn with_stats(stats: GlobalStats) -> Self {
            Self { doc: Mutex::new(Some(stats)) }
        }
    }

    #[async_trait]
    impl StatsRepository for InMemoryStatsRepository {
        async fn load(&self) -> Result<Option<GlobalStats>, ServiceError> {
            Ok(self.doc.lock().await.clone())
        }

        async fn merge(&self, delta: CounterDelta, today: &str) -> Result<(), ServiceError> {
            let mut doc = self.doc.lock().await;
            doc.get_or_insert_with(|| GlobalStats::empty(today)).apply(delta, today);
            Ok(())
        }
    }
}
