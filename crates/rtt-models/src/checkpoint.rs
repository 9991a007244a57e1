//! Per-video resume record (`{video_id}.rtt.json`).
//!
//! Modeled as an internally-tagged enum keyed by `status`, each variant
//! carrying only the fields valid at that stage (`SPEC_FULL.md` §3,
//! resolving the "dynamic typing in checkpoints" design note in `spec.md`
//! §9). `#[serde(tag = "status")]` gives the exact on-disk shape described
//! in `spec.md` §6: a JSON object whose `status` key selects which of
//! `segments`/`enriched`/`embeddings`/`transcript_source` are present.

use serde::{Deserialize, Serialize};

/// A segment in its minimal persisted form: just enough to resume a stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedSegment {
    pub segment_id: String,
    pub start: f64,
    pub end: f64,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Checkpoint {
    New,
    Downloaded,
    Transcribed {
        segments: Vec<PersistedSegment>,
        transcript_source: String,
    },
    Enriched {
        segments: Vec<PersistedSegment>,
        enriched: Vec<String>,
        transcript_source: String,
    },
    Embedded {
        segments: Vec<PersistedSegment>,
        enriched: Vec<String>,
        embeddings: Vec<Vec<f32>>,
        transcript_source: String,
    },
}

impl Default for Checkpoint {
    fn default() -> Self {
        Checkpoint::New
    }
}

impl Checkpoint {
    pub fn status_str(&self) -> &'static str {
        match self {
            Checkpoint::New => "new",
            Checkpoint::Downloaded => "downloaded",
            Checkpoint::Transcribed { .. } => "transcribed",
            Checkpoint::Enriched { .. } => "enriched",
            Checkpoint::Embedded { .. } => "embedded",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_checkpoint_is_new() {
        assert_eq!(Checkpoint::default(), Checkpoint::New);
    }

    #[test]
    fn serializes_with_status_discriminator() {
        let cp = Checkpoint::Transcribed {
            segments: vec![PersistedSegment {
                segment_id: "v1_00000".into(),
                start: 0.0,
                end: 1.0,
                text: "hi".into(),
            }],
            transcript_source: "asr".into(),
        };
        let json = serde_json::to_value(&cp).unwrap();
        assert_eq!(json["status"], "transcribed");
        assert_eq!(json["segments"][0]["segment_id"], "v1_00000");

        let back: Checkpoint = serde_json::from_value(json).unwrap();
        assert_eq!(cp, back);
    }

    #[test]
    fn status_str_matches_variant() {
        assert_eq!(Checkpoint::New.status_str(), "new");
        assert_eq!(
            Checkpoint::Enriched {
                segments: vec![],
                enriched: vec![],
                transcript_source: "asr".into(),
            }
            .status_str(),
            "enriched"
        );
    }
}
