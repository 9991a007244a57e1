//! End-to-end router tests over a real in-memory `SearchState`, no
//! archives on disk required — grounded on `spec.md` §8 scenarios
//! S2-S4, in the teacher's `oneshot`-based integration-test idiom.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

use rtt_adapters::{AdapterResult, Embedder};
use rtt_index::VectorIndex;
use rtt_models::segment::EMBEDDING_DIM;
use rtt_search::{create_router, SearchConfig, SearchState, VideoInfo};

struct StubEmbedder;

#[async_trait::async_trait]
impl Embedder for StubEmbedder {
    async fn embed(&self, _text: &str) -> AdapterResult<Vec<f32>> {
        let mut v = vec![0.0f32; EMBEDDING_DIM];
        v[0] = 1.0;
        Ok(v)
    }
}

fn hot(index: usize) -> Vec<f32> {
    let mut v = vec![0.0f32; EMBEDDING_DIM];
    v[index] = 1.0;
    v
}

fn test_state() -> SearchState {
    let mut index = VectorIndex::new();
    index
        .add_table(
            vec![
                rtt_index::SegmentRow {
                    segment_id: "nuclear_bomb_00000".into(),
                    video_id: "v1".into(),
                    start_seconds: 0.0,
                    end_seconds: 1.0,
                    transcript_raw: "nuclear bomb test footage".into(),
                    transcript_enriched: "nuclear bomb test footage".into(),
                    frame_path: "frames/000000.jpg".into(),
                    has_speech: true,
                    source: "transcript".into(),
                    collection: "prelinger".into(),
                },
                rtt_index::SegmentRow {
                    segment_id: "cake_00000".into(),
                    video_id: "v2".into(),
                    start_seconds: 0.0,
                    end_seconds: 1.0,
                    transcript_raw: "how to bake a cake".into(),
                    transcript_enriched: "how to bake a cake".into(),
                    frame_path: String::new(),
                    has_speech: true,
                    source: "transcript".into(),
                    collection: "youtube".into(),
                },
            ],
            vec![hot(0), hot(1)],
        )
        .unwrap();
    index.ensure_merged();
    index.compact();

    let mut videos = HashMap::new();
    videos.insert(
        "v1".to_string(),
        VideoInfo {
            title: "Duck and Cover".into(),
            remote_url: Some("https://example.com/v1.mp4".into()),
            page_url: None,
            collection: "prelinger".into(),
            context: String::new(),
            local_dir: PathBuf::from("."),
        },
    );
    videos.insert(
        "v2".to_string(),
        VideoInfo {
            title: "Cake Tutorial".into(),
            remote_url: None,
            page_url: None,
            collection: "youtube".into(),
            context: String::new(),
            local_dir: PathBuf::from("."),
        },
    );

    SearchState {
        index: Arc::new(index),
        videos: Arc::new(videos),
        rtt_paths_by_video: Arc::new(HashMap::new()),
        embedder: Arc::new(StubEmbedder),
        http_client: reqwest::Client::new(),
        resolved_urls: Arc::new(tokio::sync::RwLock::new(HashMap::new())),
        config: SearchConfig::from_env(vec![]),
    }
}

#[tokio::test]
async fn health_endpoint_returns_ok() {
    let app = create_router(test_state());
    let resp = app.oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap()).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn empty_query_returns_400() {
    let app = create_router(test_state());
    let resp = app.oneshot(Request::builder().uri("/search?q=").body(Body::empty()).unwrap()).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_segment_id_returns_404() {
    let app = create_router(test_state());
    let resp = app
        .oneshot(Request::builder().uri("/search?segment_id=nonexistent").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn search_respects_collection_filter() {
    let app = create_router(test_state());
    let resp = app
        .oneshot(Request::builder().uri("/search?q=nuclear+bomb&collections=prelinger").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    let results = body["results"].as_array().unwrap();
    assert!(results.iter().all(|r| r["collection"] == "prelinger"));
}

#[tokio::test]
async fn collections_endpoint_lists_both_sorted() {
    let app = create_router(test_state());
    let resp = app.oneshot(Request::builder().uri("/collections").body(Body::empty()).unwrap()).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    let collections = body["collections"].as_array().unwrap();
    assert_eq!(collections.len(), 2);
    assert_eq!(collections[0]["id"], "prelinger");
    assert_eq!(collections[1]["id"], "youtube");
}

#[tokio::test]
async fn segments_rejects_limit_over_200() {
    let app = create_router(test_state());
    let resp = app.oneshot(Request::builder().uri("/segments?limit=500").body(Body::empty()).unwrap()).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
