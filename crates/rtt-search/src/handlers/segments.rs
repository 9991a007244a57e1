//! `GET /segments` (`spec.md` §6: `0 ≤ offset`, `1 ≤ limit ≤ 200`).

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use crate::error::{SearchError, SearchResult};
use crate::result::{to_result, SegmentsResponse};
use crate::state::SearchState;
use crate::util::parse_collections;

const MAX_LIMIT: usize = 200;
const DEFAULT_LIMIT: usize = 50;

#[derive(Debug, Deserialize)]
pub struct SegmentsQuery {
    pub offset: Option<usize>,
    pub limit: Option<usize>,
    pub collections: Option<String>,
}

pub async fn segments(State(state): State<SearchState>, Query(params): Query<SegmentsQuery>) -> SearchResult<Json<SegmentsResponse>> {
    let offset = params.offset.unwrap_or(0);
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT);
    if limit < 1 || limit > MAX_LIMIT {
        return Err(SearchError::input_invalid(format!("limit must be between 1 and {MAX_LIMIT}")));
    }

    let collections = parse_collections(params.collections.as_deref());
    let total = state.index.count(collections.as_deref());
    let rows = state.index.list_segments(offset, limit, collections.as_deref());
    let segments = rows.iter().map(|row| to_result(row, 0.0, state.videos.get(&row.video_id))).collect();

    Ok(Json(SegmentsResponse { segments, total, offset, limit }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_limit_within_bounds() {
        assert!(DEFAULT_LIMIT <= MAX_LIMIT);
    }
}
