//! Wire shapes for search/segments/collections responses, and the
//! row-to-result shaping helper (`spec.md` §6), grounded on `server.py`'s
//! `_to_result`.

use std::path::Path;

use rtt_index::SegmentRow;
use serde::Serialize;

use crate::state::VideoInfo;

#[derive(Debug, Serialize)]
pub struct SegmentResult {
    pub video_id: String,
    pub segment_id: String,
    pub start_seconds: f64,
    pub end_seconds: f64,
    pub source_url: String,
    pub title: String,
    pub transcript_raw: String,
    pub transcript_enriched: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frame_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_url: Option<String>,
    pub collection: String,
    pub context: String,
    pub score: f32,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub results: Vec<SegmentResult>,
}

#[derive(Debug, Serialize)]
pub struct SegmentsResponse {
    pub segments: Vec<SegmentResult>,
    pub total: usize,
    pub offset: usize,
    pub limit: usize,
}

#[derive(Debug, Serialize)]
pub struct CollectionInfo {
    pub id: String,
    pub video_count: usize,
    pub segment_count: usize,
}

#[derive(Debug, Serialize)]
pub struct CollectionsResponse {
    pub collections: Vec<CollectionInfo>,
}

/// Shapes a `SegmentRow` plus its score/distance into the public result
/// shape, filling `title`/`source_url`/`page_url` from the video lookup.
pub fn to_result(row: &SegmentRow, score: f32, video: Option<&VideoInfo>) -> SegmentResult {
    let frame_url = (!row.frame_path.is_empty()).then(|| {
        let filename = Path::new(&row.frame_path)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(&row.frame_path);
        format!("/static/frames/{}/{}", row.video_id, filename)
    });

    let (title, source_url, page_url, collection, context) = match video {
        Some(v) => (
            v.title.clone(),
            v.remote_url.clone().unwrap_or_else(|| format!("/video/{}", row.video_id)),
            v.page_url.clone(),
            v.collection.clone(),
            v.context.clone(),
        ),
        None => (String::new(), format!("/video/{}", row.video_id), None, row.collection.clone(), String::new()),
    };

    SegmentResult {
        video_id: row.video_id.clone(),
        segment_id: row.segment_id.clone(),
        start_seconds: row.start_seconds,
        end_seconds: row.end_seconds,
        source_url,
        title,
        transcript_raw: row.transcript_raw.clone(),
        transcript_enriched: row.transcript_enriched.clone(),
        frame_url,
        page_url,
        collection,
        context,
        score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(frame_path: &str) -> SegmentRow {
        SegmentRow {
            segment_id: "s1".into(),
            video_id: "v1".into(),
            start_seconds: 0.0,
            end_seconds: 1.0,
            transcript_raw: "hi".into(),
            transcript_enriched: "hi".into(),
            frame_path: frame_path.into(),
            has_speech: true,
            source: "transcript".into(),
            collection: "prelinger".into(),
        }
    }

    #[test]
    fn frame_url_none_when_frame_path_empty() {
        let r = to_result(&row(""), 0.9, None);
        assert!(r.frame_url.is_none());
    }

    #[test]
    fn frame_url_uses_basename() {
        let r = to_result(&row("frames/subdir/000001.jpg"), 0.9, None);
        assert_eq!(r.frame_url.unwrap(), "/static/frames/v1/000001.jpg");
    }

    #[test]
    fn source_url_falls_back_to_local_route_without_video_info() {
        let r = to_result(&row(""), 0.9, None);
        assert_eq!(r.source_url, "/video/v1");
    }

    #[test]
    fn source_url_uses_remote_url_when_present() {
        let video = VideoInfo {
            title: "Title".into(),
            remote_url: Some("https://example.com/v.mp4".into()),
            page_url: None,
            collection: "prelinger".into(),
            context: String::new(),
            local_dir: std::path::PathBuf::from("."),
        };
        let r = to_result(&row(""), 0.9, Some(&video));
        assert_eq!(r.source_url, "https://example.com/v.mp4");
    }
}
