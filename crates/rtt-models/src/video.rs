//! Per-archive header describing the source video.

use serde::{Deserialize, Serialize};

/// Pipeline status; advances only forward through this sequence
/// (`spec.md` §3 invariant 5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VideoStatus {
    New,
    Downloaded,
    Transcribed,
    Enriched,
    Embedded,
    Ready,
}

impl VideoStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VideoStatus::New => "new",
            VideoStatus::Downloaded => "downloaded",
            VideoStatus::Transcribed => "transcribed",
            VideoStatus::Enriched => "enriched",
            VideoStatus::Embedded => "embedded",
            VideoStatus::Ready => "ready",
        }
    }
}

impl Default for VideoStatus {
    fn default() -> Self {
        VideoStatus::New
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Video {
    pub video_id: String,
    pub title: String,
    #[serde(default)]
    pub source_url: String,
    #[serde(default)]
    pub page_url: String,
    #[serde(default)]
    pub context: String,
    #[serde(default)]
    pub collection: String,
    pub duration_seconds: f64,
    #[serde(default)]
    pub status: VideoStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_serializes_snake_case() {
        assert_eq!(serde_json::to_string(&VideoStatus::Transcribed).unwrap(), "\"transcribed\"");
        assert_eq!(VideoStatus::Ready.as_str(), "ready");
    }

    #[test]
    fn defaults_to_new() {
        assert_eq!(VideoStatus::default(), VideoStatus::New);
    }
}
