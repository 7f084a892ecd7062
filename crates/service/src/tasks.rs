//! Background jobs: the stats aggregator and the expired-record reaper.
//!
//! Both run on a fixed tokio interval and stop when the shutdown channel flips. The
//! aggregator performs one last flush on the way out.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{error, info, warn};

use crate::records::RecordStore;
use crate::stats::{FlushOutcome, StatsService};

/// Sender side flips to `true` once on shutdown.
pub fn shutdown_channel() -> (watch::Sender<bool>, watch::Receiver<bool>) {
    watch::channel(false)
}

async fn wait_for_shutdown(rx: &mut watch::Receiver<bool>) {
    // a dropped sender also means shutdown
    while !*rx.borrow_and_update() {
        if rx.changed().await.is_err() {
            return;
        }
    }
}

async fn flush_once(stats: &StatsService) {
    match stats.flush().await {
        Ok(FlushOutcome::Flushed(delta)) => {
            info!(event = "stats_flush", get = delta.get, post = delta.post, "stats buffer merged");
        }
        Ok(FlushOutcome::Skipped) => {}
        Err(e) => {
            error!(event = "stats_flush_failed", error = %e, "stats flush failed; retrying next tick");
        }
    }
}

/// Periodically merge the counter buffer into durable stats.
pub fn spawn_aggregator(
    stats: Arc<StatsService>,
    every: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!(event = "aggregator_start", interval_secs = every.as_secs(), "stats aggregator started");
        loop {
            tokio::select! {
                _ = ticker.tick() => flush_once(&stats).await,
                _ = wait_for_shutdown(&mut shutdown) => break,
            }
        }
        flush_once(&stats).await;
        info!(event = "aggregator_stop", "stats aggregator stopped after final flush");
    })
}

/// Periodically delete expired records.
pub fn spawn_reaper(
    store: Arc<RecordStore>,
    every: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                _ = ticker.tick() => match store.purge_expired().await {
                    Ok(0) => {}
                    Ok(purged) => info!(event = "records_reaped", purged, "expired records removed"),
                    Err(e) => warn!(event = "reap_failed", error = %e, "expired record purge failed"),
                },
                _ = wait_for_shutdown(&mut shutdown) => break,
            }
        }
        info!(event = "reaper_stop", "record reaper stopped");
    })
}
