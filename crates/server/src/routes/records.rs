use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use common::types::StatusMessage;
use serde::{Deserialize, Serialize};

use crate::errors::{JsonApiError, MISSING_FIELDS};
use crate::state::AppState;

/// Request body of `/api/save`. `data` must be a JSON string; other types are rejected.
#[derive(Debug, Deserialize)]
pub struct SaveInput {
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub data: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FetchOutput {
    pub status: bool,
    pub data: String,
}

/// Store `data` under `key`, replacing any previous value and restarting its expiry.
pub async fn save(
    State(state): State<AppState>,
    input: Result<Json<SaveInput>, JsonRejection>,
) -> Result<Json<StatusMessage>, JsonApiError> {
    let Ok(Json(input)) = input else {
        return Err(JsonApiError::BadRequest(MISSING_FIELDS.into()));
    };
    let (key, data) = match (input.key, input.data) {
        (Some(k), Some(d)) if !k.is_empty() && !d.is_empty() => (k, d),
        _ => return Err(JsonApiError::BadRequest(MISSING_FIELDS.into())),
    };

    state.records.save(&key, &data).await?;
    Ok(Json(StatusMessage::ok("Data Secured")))
}

/// Return the live payload stored under `key`.
pub async fn fetch(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<FetchOutput>, JsonApiError> {
    let data = state.records.fetch(&key).await?;
    Ok(Json(FetchOutput { status: true, data }))
}
