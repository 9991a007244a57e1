//! The atomic unit of retrieval: a time-bounded slice of a video's transcript.

use serde::{Deserialize, Serialize};

/// Length of every `text_embedding` vector. Any adapter that returns a
/// different width has produced a `DataShapeError`, never a short write.
pub const EMBEDDING_DIM: usize = 768;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub segment_id: String,
    pub video_id: String,
    pub start_seconds: f64,
    pub end_seconds: f64,
    pub transcript_raw: String,
    #[serde(default)]
    pub transcript_enriched: String,
    #[serde(default)]
    pub text_embedding: Vec<f32>,
    #[serde(default)]
    pub frame_path: String,
    #[serde(default = "default_has_speech")]
    pub has_speech: bool,
    #[serde(default = "default_source")]
    pub source: String,
    #[serde(default)]
    pub collection: String,
}

fn default_has_speech() -> bool {
    true
}

fn default_source() -> String {
    "transcript".to_string()
}

impl Segment {
    /// `segment_id` convention: `{video_id}_{5-digit-ordinal}`.
    pub fn make_id(video_id: &str, ordinal: usize) -> String {
        format!("{video_id}_{ordinal:05}")
    }

    pub fn new(video_id: impl Into<String>, ordinal: usize, start_seconds: f64, end_seconds: f64, transcript_raw: impl Into<String>) -> Self {
        let video_id = video_id.into();
        let segment_id = Self::make_id(&video_id, ordinal);
        Self {
            segment_id,
            video_id,
            start_seconds,
            end_seconds,
            transcript_raw: transcript_raw.into(),
            transcript_enriched: String::new(),
            text_embedding: Vec::new(),
            frame_path: String::new(),
            has_speech: true,
            source: "transcript".to_string(),
            collection: String::new(),
        }
    }

    pub fn has_valid_embedding(&self) -> bool {
        self.text_embedding.len() == EMBEDDING_DIM
    }

    pub fn is_well_formed(&self) -> bool {
        self.start_seconds < self.end_seconds && !self.transcript_raw.trim().is_empty()
    }
}
