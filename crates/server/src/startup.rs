use std::{sync::Arc, time::Duration};

use axum::Router;
use configs::AppConfig;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::errors::StartupError;
use crate::routes;
use crate::state::AppState;
use service::{clock::SystemClock, storage::Storage, tasks};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "cannot listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!(event = "shutdown_signal", "shutdown signal received");
}

/// Connect storage, start background tasks and serve until a shutdown signal arrives.
pub async fn run_with_config(cfg: AppConfig) -> anyhow::Result<()> {
    let storage = Storage::connect(&cfg.database)
        .await
        .map_err(|e| StartupError::Storage(e.to_string()))?;
    let state = AppState::new(storage, Arc::new(SystemClock), &cfg);

    let (stop_tx, stop_rx) = tasks::shutdown_channel();
    let aggregator = tasks::spawn_aggregator(
        state.stats.clone(),
        Duration::from_secs(cfg.stats.flush_interval_secs),
        stop_rx.clone(),
    );
    let reaper = tasks::spawn_reaper(
        state.records.clone(),
        Duration::from_secs(cfg.store.reap_interval_secs),
        stop_rx,
    );

    let app: Router = routes::build_router(state, build_cors());

    let listener = tokio::net::TcpListener::bind((cfg.server.host.as_str(), cfg.server.port))
        .await
        .map_err(|e| StartupError::InvalidConfig(format!("bind {}:{}: {e}", cfg.server.host, cfg.server.port)))?;
    let addr = listener.local_addr()?;
    info!(event = "listening", %addr, "tempstore server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // stop background work; the aggregator flushes what is still buffered
    let _ = stop_tx.send(true);
    let (agg, reap) = tokio::join!(aggregator, reaper);
    if let Err(e) = agg.and(reap) {
        warn!(event = "task_join_error", error = %e, "background task ended abnormally");
    }
    info!(event = "stopped", "tempstore server stopped");
    Ok(())
}
