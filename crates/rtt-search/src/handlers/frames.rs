//! `GET /static/frames/{video_id}/{filename}` (`spec.md` §6), grounded on
//! `server.py`'s frame handler: reads the JPEG out of the archive on
//! demand and serves it with cache-forever headers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use rtt_archive::ArchiveReader;

use crate::error::{SearchError, SearchResult};
use crate::state::SearchState;

pub async fn frame(
    State(state): State<SearchState>,
    Path((video_id, filename)): Path<(String, String)>,
) -> SearchResult<Response> {
    let archive_path = state
        .rtt_paths_by_video
        .get(&video_id)
        .ok_or_else(|| SearchError::not_found(format!("video {video_id} not found")))?
        .clone();

    let bytes = tokio::task::spawn_blocking(move || -> SearchResult<Vec<u8>> {
        let reader = ArchiveReader::open_metadata(&archive_path)?;
        Ok(reader.read_frame(&filename)?)
    })
    .await
    .map_err(|e| SearchError::Internal(format!("frame read task panicked: {e}")))??;

    Ok((
        StatusCode::OK,
        [
            (axum::http::header::CONTENT_TYPE, "image/jpeg"),
            (axum::http::header::CACHE_CONTROL, "public, max-age=31536000, immutable"),
        ],
        bytes,
    )
        .into_response())
}
