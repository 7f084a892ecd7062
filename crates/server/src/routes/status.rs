use axum::{extract::State, http::StatusCode, response::Html, Json};
use common::types::Health;
use service::stats::FormattedStats;
use tracing::error;

use crate::state::AppState;

pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

pub async fn metrics() -> (StatusCode, String) {
    common::observability::encode_metrics()
}

/// HTML status page. Always 200; if durable stats cannot be read only the buffer is shown.
pub async fn index(State(state): State<AppState>) -> Html<String> {
    let stats = match state.stats.formatted_stats().await {
        Ok(stats) => stats,
        Err(e) => {
            error!(event = "status_stats_failed", error = %e, "status page stats unavailable");
            let live = state.stats.buffer().snapshot();
            FormattedStats::new(live, live, state.stats.today())
        }
    };
    Html(render_status(&stats))
}

fn render_status(stats: &FormattedStats) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>tempstore status</title>
<style>
body {{ font-family: system-ui, sans-serif; margin: 2rem; color: #222; }}
table {{ border-collapse: collapse; }}
th, td {{ border: 1px solid #ccc; padding: .4rem .9rem; text-align: right; }}
th:first-child, td:first-child {{ text-align: left; }}
</style>
</head>
<body>
<h1>tempstore is running</h1>
<p>Records expire 10 minutes after their last save.</p>
<table>
<tr><th></th><th>GET</th><th>POST</th><th>Total</th></tr>
<tr><td>Today ({date})</td><td>{tg}</td><td>{tp}</td><td>{tt}</td></tr>
<tr><td>All time</td><td>{ag}</td><td>{ap}</td><td>{at}</td></tr>
</table>
</body>
</html>
"#,
        date = stats.today.date,
        tg = stats.today.get,
        tp = stats.today.post,
        tt = stats.today.total,
        ag = stats.all_time.get,
        ap = stats.all_time.post,
        at = stats.all_time.total,
    )
}
