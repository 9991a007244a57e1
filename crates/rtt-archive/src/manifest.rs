//! `manifest.json` shape: video metadata plus every segment field except
//! the embedding vector (`spec.md` §4.1).

use rtt_models::{Segment, Video, VideoStatus};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestSegment {
    pub segment_id: String,
    pub start_seconds: f64,
    pub end_seconds: f64,
    pub source: String,
    pub transcript_raw: String,
    pub transcript_enriched: String,
    pub frame_path: String,
    pub has_speech: bool,
    pub collection: String,
}

impl From<&Segment> for ManifestSegment {
    fn from(s: &Segment) -> Self {
        Self {
            segment_id: s.segment_id.clone(),
            start_seconds: s.start_seconds,
            end_seconds: s.end_seconds,
            source: s.source.clone(),
            transcript_raw: s.transcript_raw.clone(),
            transcript_enriched: s.transcript_enriched.clone(),
            frame_path: s.frame_path.clone(),
            has_speech: s.has_speech,
            collection: s.collection.clone(),
        }
    }
}

impl ManifestSegment {
    /// Reconstructs a `Segment` without its embedding vector (the read
    /// contract in `spec.md` §4.1 never materializes embeddings from the
    /// manifest; callers that need them use the columnar handle).
    pub fn into_segment(self, video_id: &str) -> Segment {
        Segment {
            segment_id: self.segment_id,
            video_id: video_id.to_string(),
            start_seconds: self.start_seconds,
            end_seconds: self.end_seconds,
            transcript_raw: self.transcript_raw,
            transcript_enriched: self.transcript_enriched,
            text_embedding: Vec::new(),
            frame_path: self.frame_path,
            has_speech: self.has_speech,
            source: self.source,
            collection: self.collection,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
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
    pub status: VideoStatus,
    pub segments: Vec<ManifestSegment>,
}

impl Manifest {
    pub fn from_video_and_segments(video: &Video, segments: &[Segment]) -> Self {
        Self {
            video_id: video.video_id.clone(),
            title: video.title.clone(),
            source_url: video.source_url.clone(),
            page_url: video.page_url.clone(),
            context: video.context.clone(),
            collection: video.collection.clone(),
            duration_seconds: video.duration_seconds,
            status: video.status,
            segments: segments.iter().map(ManifestSegment::from).collect(),
        }
    }

    pub fn video(&self) -> Video {
        Video {
            video_id: self.video_id.clone(),
            title: self.title.clone(),
            source_url: self.source_url.clone(),
            page_url: self.page_url.clone(),
            context: self.context.clone(),
            collection: self.collection.clone(),
            duration_seconds: self.duration_seconds,
            status: self.status,
        }
    }

    pub fn segments_without_embeddings(&self) -> Vec<Segment> {
        self.segments
            .iter()
            .cloned()
            .map(|s| s.into_segment(&self.video_id))
            .collect()
    }
}
