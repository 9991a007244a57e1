//! Structured per-video logging, adapted from the teacher's job logger:
//! same start/progress/warning/error/completion shape, keyed by
//! `video_id` + stage name rather than a job-queue `JobId`.

use tracing::{error, info, warn, Span};

#[derive(Debug, Clone)]
pub struct VideoLogger {
    video_id: String,
    stage: String,
}

impl VideoLogger {
    pub fn new(video_id: impl Into<String>, stage: impl Into<String>) -> Self {
        Self { video_id: video_id.into(), stage: stage.into() }
    }

    pub fn log_start(&self) {
        info!(video_id = %self.video_id, stage = %self.stage, "stage started");
    }

    pub fn log_progress(&self, message: &str) {
        info!(video_id = %self.video_id, stage = %self.stage, "{}", message);
    }

    pub fn log_warning(&self, message: &str) {
        warn!(video_id = %self.video_id, stage = %self.stage, "{}", message);
    }

    pub fn log_error(&self, message: &str) {
        error!(video_id = %self.video_id, stage = %self.stage, "{}", message);
    }

    pub fn log_completion(&self, message: &str) {
        info!(video_id = %self.video_id, stage = %self.stage, "{}", message);
    }

    pub fn video_id(&self) -> &str {
        &self.video_id
    }

    pub fn create_span(&self) -> Span {
        tracing::info_span!("pipeline_stage", video_id = %self.video_id, stage = %self.stage)
    }
}
