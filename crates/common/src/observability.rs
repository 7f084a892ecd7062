use once_cell::sync::Lazy;
use prometheus::{
    register_int_counter, register_int_counter_vec, Encoder, IntCounter, IntCounterVec, TextEncoder,
};

// Prometheus metrics (default registry)
pub static REQUESTS_TRACKED_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "tempstore_requests_tracked_total",
        "Requests counted into the stats buffer, by verb",
        &["verb"]
    )
    .expect("register requests_tracked_total")
});

pub static RECORDS_SAVED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!("tempstore_records_saved_total", "Total successful record upserts")
        .expect("register records_saved_total")
});

pub static RECORDS_PURGED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "tempstore_records_purged_total",
        "Expired records physically removed by the reaper"
    )
    .expect("register records_purged_total")
});

pub static STATS_FLUSHES_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!("tempstore_stats_flushes_total", "Successful stats buffer flushes")
        .expect("register stats_flushes_total")
});

pub static STATS_FLUSH_FAILURES_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "tempstore_stats_flush_failures_total",
        "Stats flushes that failed or timed out"
    )
    .expect("register stats_flush_failures_total")
});

pub fn encode_metrics() -> (axum::http::StatusCode, String) {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        return (
            axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            format!("metrics encode error: {e}"),
        );
    }
    (
        axum::http::StatusCode::OK,
        String::from_utf8(buffer).unwrap_or_default(),
    )
}
