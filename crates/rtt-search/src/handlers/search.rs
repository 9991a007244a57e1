//! `GET /search` (`spec.md` §6, §8 scenarios S2–S4), grounded on
//! `server.py`'s `/search` handler.

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use rtt_adapters::Embedder;

use crate::error::{SearchError, SearchResult};
use crate::result::{to_result, SearchResponse};
use crate::state::SearchState;
use crate::util::parse_collections;

const DEFAULT_N: usize = 50;
const MAX_N: usize = 200;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
    pub segment_id: Option<String>,
    pub collections: Option<String>,
    pub n: Option<usize>,
}

pub async fn search(State(state): State<SearchState>, Query(params): Query<SearchQuery>) -> SearchResult<Json<SearchResponse>> {
    let n = params.n.unwrap_or(DEFAULT_N).clamp(1, MAX_N);
    let collections = parse_collections(params.collections.as_deref());

    let (query_label, query_vector) = if let Some(segment_id) = params.segment_id.as_deref() {
        let (_, embedding) = state
            .index
            .get_segment(segment_id)
            .ok_or_else(|| SearchError::not_found(format!("segment {segment_id} not found")))?;
        (format!("similar:{segment_id}"), embedding)
    } else {
        let q = params.q.unwrap_or_default();
        let trimmed = q.trim();
        if trimmed.is_empty() {
            return Err(SearchError::input_invalid("q or segment_id is required"));
        }
        let embedding = state.embedder.embed(trimmed).await?;
        (trimmed.to_string(), embedding)
    };

    let hits = state.index.closest(&query_vector, n, collections.as_deref());
    let results = hits
        .iter()
        .map(|hit| to_result(&hit.row, hit.distance, state.videos.get(&hit.row.video_id)))
        .collect();

    Ok(Json(SearchResponse { query: query_label, results }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_n_is_ten() {
        assert_eq!(DEFAULT_N, 10);
    }
}
