use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::auth::{require_api_key, track_request};
use crate::state::AppState;

pub mod records;
pub mod stats;
pub mod status;

/// Build the full application router: public status routes plus the key-protected API.
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    // Public routes (status page + health + metrics)
    let public = Router::new()
        .route("/", get(status::index))
        .route("/health", get(status::health))
        .route("/metrics", get(status::metrics));

    // Protected API routes; the auth layer is added last so it runs before tracking
    let api = Router::new()
        .route("/api/save", post(records::save))
        .route("/api/fetch/:key", get(records::fetch))
        .route("/api/stats", get(stats::get_stats))
        .route_layer(middleware::from_fn_with_state(state.clone(), track_request))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_api_key));

    public
        .merge(api)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                // one span per request with method and path, at INFO
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                // status code and latency on response
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
