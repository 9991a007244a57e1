//! Shared application state for the search service (`spec.md` §4.6).

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use rtt_adapters::Embedder;
use rtt_index::VectorIndex;
use tokio::sync::RwLock;

use crate::config::SearchConfig;

/// Per-video metadata needed to answer `/video/{id}`, `/video/{id}/resolve`,
/// and the `/collections` rollup, grounded on `server.py`'s `videos` dict.
#[derive(Debug, Clone)]
pub struct VideoInfo {
    pub title: String,
    pub remote_url: Option<String>,
    pub page_url: Option<String>,
    pub collection: String,
    pub context: String,
    /// Directory the archive's frames (and any locally-downloaded video
    /// file) live under, keyed off the archive's own path.
    pub local_dir: PathBuf,
}

/// Shared state handed to every handler. Built once at boot by `loader`
/// and never mutated except for the resolved-URL cache.
#[derive(Clone)]
pub struct SearchState {
    pub index: Arc<VectorIndex>,
    pub videos: Arc<HashMap<String, VideoInfo>>,
    pub rtt_paths_by_video: Arc<HashMap<String, PathBuf>>,
    pub embedder: Arc<dyn Embedder>,
    pub http_client: reqwest::Client,
    /// Cache of `video_id -> resolved final URL`, populated by
    /// `/video/{id}/resolve` the way `server.py`'s `_resolved_urls` dict is.
    pub resolved_urls: Arc<RwLock<HashMap<String, String>>>,
    pub config: SearchConfig,
}
