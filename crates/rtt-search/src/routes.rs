//! Search-service routes.

use axum::middleware;
use axum::routing::get;
use axum::Router;

use crate::handlers::collections::collections;
use crate::handlers::frames::frame;
use crate::handlers::health::{health, ready};
use crate::handlers::search::search;
use crate::handlers::segments::segments;
use crate::handlers::video::{resolve, video};
use crate::middleware::{cors_layer, request_id, request_logging, security_headers};
use crate::state::SearchState;

/// Create the search-service router.
pub fn create_router(state: SearchState) -> Router {
    let api_routes = Router::new()
        .route("/search", get(search))
        .route("/segments", get(segments))
        .route("/collections", get(collections))
        .route("/video/:video_id", get(video))
        .route("/video/:video_id/resolve", get(resolve));

    let static_routes = Router::new().route("/static/frames/:video_id/:filename", get(frame));

    let health_routes = Router::new().route("/health", get(health)).route("/healthz", get(health)).route("/ready", get(ready));

    Router::new()
        .merge(api_routes)
        .merge(static_routes)
        .merge(health_routes)
        .layer(middleware::from_fn(security_headers))
        .layer(middleware::from_fn(request_id))
        .layer(middleware::from_fn(request_logging))
        .layer(cors_layer(&state.config.cors_origins))
        .with_state(state)
}
