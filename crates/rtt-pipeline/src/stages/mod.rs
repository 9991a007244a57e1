//! Per-stage behavior (`spec.md` §4.4.4): transcribe, enrich, embed,
//! frames+package. Each stage function takes ownership of a
//! [`PipelineJob`](crate::job::PipelineJob) and returns it (ready for the
//! next queue) or hands it back alongside the error that killed it, so
//! the orchestrator can log a `failures.jsonl` record without having
//! cloned anything up front.

pub mod embed;
pub mod enrich;
pub mod frames_package;
pub mod transcribe;

use rtt_models::checkpoint::PersistedSegment;
use rtt_models::{Checkpoint, Segment};

pub(crate) fn to_persisted(segment: &Segment) -> PersistedSegment {
    PersistedSegment {
        segment_id: segment.segment_id.clone(),
        start: segment.start_seconds,
        end: segment.end_seconds,
        text: segment.transcript_raw.clone(),
    }
}

/// Every checkpoint variant past `Transcribed` carries the
/// `transcript_source` tag forward; this reads it back out regardless of
/// which variant the job is currently in.
pub(crate) fn transcript_source_of(checkpoint: &Checkpoint) -> String {
    match checkpoint {
        Checkpoint::Transcribed { transcript_source, .. }
        | Checkpoint::Enriched { transcript_source, .. }
        | Checkpoint::Embedded { transcript_source, .. } => transcript_source.clone(),
        _ => "asr".to_string(),
    }
}
