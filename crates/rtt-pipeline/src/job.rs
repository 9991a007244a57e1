//! The job state object that moves through the four stage queues
//! (`spec.md` §4.4.2): the immutable input job, the mutable checkpoint,
//! the current segment list, and an optional terminal error. Moved by
//! value between stages (never cloned), so only one stage ever holds it
//! at a time.

use std::time::Instant;

use rtt_models::{Checkpoint, Segment, VideoJob};

use crate::error::PipelineError;

#[derive(Debug)]
pub struct PipelineJob {
    pub job: VideoJob,
    pub checkpoint: Checkpoint,
    pub segments: Vec<Segment>,
    /// When this job was placed on its current stage's queue, used for
    /// wait-time logging at the top of each stage.
    pub enqueued_at: Instant,
    pub error: Option<PipelineError>,
}

impl PipelineJob {
    pub fn new(job: VideoJob, checkpoint: Checkpoint) -> Self {
        Self { job, checkpoint, segments: Vec::new(), enqueued_at: Instant::now(), error: None }
    }

    pub fn with_segments(mut self, segments: Vec<Segment>) -> Self {
        self.segments = segments;
        self
    }

    /// Resets the enqueue clock; called by the orchestrator every time a
    /// job is handed off to a new stage's channel.
    pub fn mark_enqueued(&mut self) {
        self.enqueued_at = Instant::now();
    }

    pub fn wait_time(&self) -> std::time::Duration {
        self.enqueued_at.elapsed()
    }
}
