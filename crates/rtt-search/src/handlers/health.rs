//! Liveness/readiness probes, trimmed from the teacher's health handler:
//! no external services to probe at request time since the index is
//! loaded once at boot and held in memory.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::state::SearchState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

#[derive(Serialize)]
pub struct ReadinessResponse {
    pub status: &'static str,
    pub videos_loaded: usize,
    pub segments_indexed: usize,
}

pub async fn ready(State(state): State<SearchState>) -> Json<ReadinessResponse> {
    Json(ReadinessResponse {
        status: if state.index.is_empty() { "empty" } else { "ok" },
        videos_loaded: state.videos.len(),
        segments_indexed: state.index.len(),
    })
}
