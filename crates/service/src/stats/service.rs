use std::sync::Arc;
use std::time::Duration;

use configs::FlushFailurePolicy;
use tokio::sync::Mutex;
use tracing::{debug, instrument, warn};

use super::buffer::CounterBuffer;
use super::domain::{CounterDelta, FormattedStats};
use super::repository::StatsRepository;
use crate::clock::Clock;
use crate::errors::ServiceError;
use common::observability::{REQUESTS_TRACKED_TOTAL, STATS_FLUSHES_TOTAL, STATS_FLUSH_FAILURES_TOTAL};

pub const DEFAULT_FLUSH_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushOutcome {
    /// Buffer was empty; storage was not touched.
    Skipped,
    Flushed(CounterDelta),
}

/// Owns the counter buffer and the handle to durable stats.
///
/// Requests call [`StatsService::track`]; the aggregator task calls
/// [`StatsService::flush`]; the status view calls [`StatsService::formatted_stats`].
pub struct StatsService {
    repo: Arc<dyn StatsRepository>,
    clock: Arc<dyn Clock>,
    buffer: CounterBuffer,
    // single-flight guard: one drain-then-persist at a time
    flush_lock: Mutex<()>,
    flush_timeout: Duration,
    on_failure: FlushFailurePolicy,
}

impl StatsService {
    pub fn new(repo: Arc<dyn StatsRepository>, clock: Arc<dyn Clock>) -> Self {
        Self {
            repo,
            clock,
            buffer: CounterBuffer::new(),
            flush_lock: Mutex::new(()),
            flush_timeout: DEFAULT_FLUSH_TIMEOUT,
            on_failure: FlushFailurePolicy::default(),
        }
    }

    pub fn with_flush_timeout(mut self, timeout: Duration) -> Self {
        self.flush_timeout = timeout;
        self
    }

    pub fn with_failure_policy(mut self, policy: FlushFailurePolicy) -> Self {
        self.on_failure = policy;
        self
    }

    pub fn buffer(&self) -> &CounterBuffer {
        &self.buffer
    }

    /// Current UTC date as used for day counters.
    pub fn today(&self) -> String {
        self.clock.today()
    }

    /// Count a request. Never touches storage.
    pub fn track(&self, method: &str) {
        if self.buffer.increment(method) {
            REQUESTS_TRACKED_TOTAL.with_label_values(&[method]).inc();
        }
    }

    /// Drain the buffer and merge it into durable stats.
    ///
    /// On failure the drained delta is dropped or requeued according to the configured
    /// policy and the error is returned for the caller to log.
    #[instrument(skip_all)]
    pub async fn flush(&self) -> Result<FlushOutcome, ServiceError> {
        let _guard = self.flush_lock.lock().await;

        let delta = self.buffer.drain();
        if delta.is_empty() {
            return Ok(FlushOutcome::Skipped);
        }
        let today = self.clock.today();

        let res = match tokio::time::timeout(self.flush_timeout, self.repo.merge(delta, &today)).await {
            Ok(res) => res,
            Err(_) => Err(ServiceError::Timeout(format!("stats merge exceeded {:?}", self.flush_timeout))),
        };

        match res {
            Ok(()) => {
                STATS_FLUSHES_TOTAL.inc();
                debug!(get = delta.get, post = delta.post, %today, "stats_flushed");
                Ok(FlushOutcome::Flushed(delta))
            }
            Err(e) => {
                STATS_FLUSH_FAILURES_TOTAL.inc();
                match self.on_failure {
                    FlushFailurePolicy::Requeue => {
                        self.buffer.restore(delta);
                        warn!(get = delta.get, post = delta.post, "stats_flush_failed_requeued");
                    }
                    FlushFailurePolicy::Discard => {
                        warn!(get = delta.get, post = delta.post, "stats_flush_failed_dropped");
                    }
                }
                Err(e)
            }
        }
    }

    /// Durable counters plus whatever is still buffered, as of now.
    pub async fn formatted_stats(&self) -> Result<FormattedStats, ServiceError> {
        let date = self.clock.today();
        let durable = self.repo.load().await?;
        let live = self.buffer.snapshot();

        let (all_time, today) = match durable {
            Some(stats) => {
                let day = stats.day_counts(&date);
                (
                    CounterDelta { get: stats.all_time_get + live.get, post: stats.all_time_post + live.post },
                    CounterDelta { get: day.get + live.get, post: day.post + live.post },
                )
            }
            // no document yet: nothing durable, both views are the buffer
            None => (live, live),
        };
        Ok(FormattedStats::new(all_time, today, date))
    }
}
