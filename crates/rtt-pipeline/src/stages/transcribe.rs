//! Transcribe stage: subtitle track first, ASR fallback
//! (`spec.md` §4.4.4 "Transcribe").

use rtt_models::{Checkpoint, Segment, VideoJob};

use crate::context::PipelineContext;
use crate::error::PipelineError;
use crate::job::PipelineJob;
use crate::logging::VideoLogger;
use crate::stages::to_persisted;

pub async fn run(ctx: &PipelineContext, mut job: PipelineJob) -> Result<PipelineJob, (PipelineJob, PipelineError)> {
    let logger = VideoLogger::new(job.job.video_id.clone(), "transcribe");
    logger.log_start();
    let video_id = job.job.video_id.clone();

    let (segments, source) = match transcribe_segments(ctx, &job.job).await {
        Ok(result) => result,
        Err(e) => return Err((job, e)),
    };

    if segments.is_empty() {
        return Err((job, PipelineError::input_invalid("transcript was empty")));
    }

    job.segments = segments;
    job.checkpoint = Checkpoint::Transcribed {
        segments: job.segments.iter().map(to_persisted).collect(),
        transcript_source: source.clone(),
    };

    if let Err(e) = ctx.checkpoints.save(&video_id, &job.checkpoint).await {
        return Err((job, e.into()));
    }

    logger.log_completion(&format!("{} segments via {source}", job.segments.len()));
    Ok(job)
}

async fn transcribe_segments(ctx: &PipelineContext, job: &VideoJob) -> Result<(Vec<Segment>, String), PipelineError> {
    if !job.page_url.trim().is_empty() {
        if let Some(segments) = ctx.adapters.subtitles.fetch(&job.page_url, &job.video_id).await? {
            if !segments.is_empty() {
                return Ok((segments, "subtitle".to_string()));
            }
        }
    }
    let segments = ctx.adapters.transcriber.transcribe(&job.source_url, &job.video_id).await?;
    Ok((segments, "asr".to_string()))
}
