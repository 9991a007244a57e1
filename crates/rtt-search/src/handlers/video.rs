//! `GET /video/{video_id}` and `GET /video/{video_id}/resolve`
//! (`spec.md` §6), grounded on `server.py`'s `video`/`resolve_video`
//! handlers: local file first, then a range-proxy of the remote URL.

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::error::{SearchError, SearchResult};
use crate::state::SearchState;

const LOCAL_EXTENSIONS: [&str; 3] = ["mp4", "webm", "mkv"];

fn local_video_path(state: &SearchState, video_id: &str) -> Option<(std::path::PathBuf, &'static str)> {
    let info = state.videos.get(video_id)?;
    for ext in LOCAL_EXTENSIONS {
        let candidate = info.local_dir.join(format!("{video_id}.{ext}"));
        if candidate.exists() {
            let content_type = match ext {
                "mp4" => "video/mp4",
                "webm" => "video/webm",
                _ => "video/x-matroska",
            };
            return Some((candidate, content_type));
        }
    }
    None
}

pub async fn video(
    State(state): State<SearchState>,
    Path(video_id): Path<String>,
    headers: HeaderMap,
) -> SearchResult<Response> {
    let info = state
        .videos
        .get(&video_id)
        .ok_or_else(|| SearchError::not_found(format!("video {video_id} not found")))?;

    if let Some((path, content_type)) = local_video_path(&state, &video_id) {
        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|e| SearchError::Internal(format!("failed to read local video file: {e}")))?;
        return Ok((
            StatusCode::OK,
            [(axum::http::header::CONTENT_TYPE, content_type)],
            bytes,
        )
            .into_response());
    }

    let Some(remote_url) = &info.remote_url else {
        return Err(SearchError::not_found("video file not found"));
    };

    let mut upstream_req = state.http_client.get(remote_url);
    if let Some(range) = headers.get(axum::http::header::RANGE) {
        upstream_req = upstream_req.header(axum::http::header::RANGE, range);
    }

    let upstream = upstream_req
        .send()
        .await
        .map_err(|e| SearchError::Internal(format!("failed to reach remote video: {e}")))?;

    let status = StatusCode::from_u16(upstream.status().as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);
    let content_type = upstream
        .headers()
        .get(axum::http::header::CONTENT_TYPE)
        .cloned()
        .unwrap_or_else(|| HeaderValue::from_static("video/mp4"));

    let mut builder = Response::builder().status(status).header(axum::http::header::CONTENT_TYPE, content_type);
    for header in ["content-length", "content-range", "accept-ranges"] {
        if let Some(value) = upstream.headers().get(header) {
            builder = builder.header(header, value);
        }
    }

    let body = Body::from_stream(upstream.bytes_stream());
    builder
        .body(body)
        .map_err(|e| SearchError::Internal(format!("failed to build proxy response: {e}")))
}

#[derive(Serialize)]
pub struct ResolveResponse {
    pub url: String,
}

pub async fn resolve(State(state): State<SearchState>, Path(video_id): Path<String>) -> SearchResult<Json<ResolveResponse>> {
    let info = state
        .videos
        .get(&video_id)
        .ok_or_else(|| SearchError::not_found(format!("video {video_id} not found")))?;

    if let Some(cached) = state.resolved_urls.read().await.get(&video_id) {
        return Ok(Json(ResolveResponse { url: cached.clone() }));
    }

    let Some(remote_url) = &info.remote_url else {
        return Ok(Json(ResolveResponse { url: format!("/video/{video_id}") }));
    };

    let resolved = state
        .http_client
        .head(remote_url)
        .timeout(std::time::Duration::from_secs(10))
        .send()
        .await
        .map(|resp| resp.url().to_string());

    let url = match resolved {
        Ok(url) => {
            state.resolved_urls.write().await.insert(video_id.clone(), url.clone());
            url
        }
        Err(_) => format!("/video/{video_id}"),
    };

    Ok(Json(ResolveResponse { url }))
}
