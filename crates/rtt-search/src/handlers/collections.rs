//! `GET /collections`, grounded on `server.py`'s `/collections` handler:
//! groups loaded videos by collection, counting segments per collection
//! through the index rather than re-scanning archives.

use axum::extract::State;
use axum::Json;

use crate::error::SearchResult;
use crate::result::{CollectionInfo, CollectionsResponse};
use crate::state::SearchState;

pub async fn collections(State(state): State<SearchState>) -> SearchResult<Json<CollectionsResponse>> {
    let mut video_counts: std::collections::HashMap<String, usize> = std::collections::HashMap::new();
    for video in state.videos.values() {
        *video_counts.entry(video.collection.clone()).or_insert(0) += 1;
    }

    let mut collections: Vec<CollectionInfo> = video_counts
        .into_iter()
        .map(|(id, video_count)| {
            let segment_count = state.index.count(Some(&[id.clone()]));
            CollectionInfo { id, video_count, segment_count }
        })
        .collect();
    collections.sort_by(|a, b| a.id.cmp(&b.id));

    Ok(Json(CollectionsResponse { collections }))
}
