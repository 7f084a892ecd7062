use axum::{extract::State, Json};
use serde::Serialize;
use service::stats::FormattedStats;

use crate::errors::JsonApiError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct StatsOutput {
    pub status: bool,
    pub stats: FormattedStats,
}

/// Live request counters as JSON.
pub async fn get_stats(State(state): State<AppState>) -> Result<Json<StatsOutput>, JsonApiError> {
    let stats = state.stats.formatted_stats().await?;
    Ok(Json(StatsOutput { status: true, stats }))
}
