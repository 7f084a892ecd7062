use std::collections::HashMap;

use axum::extract::{Query, Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tracing::warn;

use crate::errors::JsonApiError;
use crate::state::AppState;

pub const API_KEY_HEADER: &str = "x-api-key";
pub const API_KEY_QUERY: &str = "apikey";

/// Credential presented by the client: the `x-api-key` header, else the `apikey` query param.
fn presented_key(req: &Request) -> Option<String> {
    let from_header = req
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    from_header.or_else(|| {
        Query::<HashMap<String, String>>::try_from_uri(req.uri())
            .ok()
            .and_then(|Query(q)| q.get(API_KEY_QUERY).cloned())
            .filter(|s| !s.is_empty())
    })
}

/// Middleware: reject `/api/*` requests without the shared secret before any handler runs.
pub async fn require_api_key(State(state): State<AppState>, req: Request, next: Next) -> Response {
    match presented_key(&req) {
        Some(key) if key.as_str() == &*state.api_key => next.run(req).await,
        presented => {
            warn!(
                event = "auth_denied",
                method = %req.method(),
                path = %req.uri().path(),
                credential_present = presented.is_some(),
                "access denied"
            );
            JsonApiError::Forbidden.into_response()
        }
    }
}

/// Middleware: count the request into the stats buffer. Never waits on storage.
pub async fn track_request(State(state): State<AppState>, req: Request, next: Next) -> Response {
    state.stats.track(req.method().as_str());
    next.run(req).await
}
