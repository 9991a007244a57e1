//! Embed stage: one embedding vector per segment's enriched text
//! (`spec.md` §4.4.4 "Embed").

use rtt_models::Checkpoint;

use crate::context::PipelineContext;
use crate::error::PipelineError;
use crate::job::PipelineJob;
use crate::logging::VideoLogger;
use crate::stages::{to_persisted, transcript_source_of};

pub async fn run(ctx: &PipelineContext, mut job: PipelineJob) -> Result<PipelineJob, (PipelineJob, PipelineError)> {
    let logger = VideoLogger::new(job.job.video_id.clone(), "embed");
    logger.log_start();
    let video_id = job.job.video_id.clone();

    let enriched_texts: Vec<String> = job.segments.iter().map(|s| s.transcript_enriched.clone()).collect();

    let mut embeddings = Vec::with_capacity(enriched_texts.len());
    for text in &enriched_texts {
        match ctx.adapters.embedder.embed(text).await {
            Ok(vector) => embeddings.push(vector),
            Err(e) => return Err((job, e.into())),
        }
    }

    if embeddings.len() != job.segments.len() {
        return Err((job, PipelineError::data_shape("embedder returned a mismatched segment count")));
    }

    for (segment, embedding) in job.segments.iter_mut().zip(embeddings.iter()) {
        segment.text_embedding = embedding.clone();
    }

    let transcript_source = transcript_source_of(&job.checkpoint);
    job.checkpoint = Checkpoint::Embedded {
        segments: job.segments.iter().map(to_persisted).collect(),
        enriched: enriched_texts,
        embeddings,
        transcript_source,
    };

    if let Err(e) = ctx.checkpoints.save(&video_id, &job.checkpoint).await {
        return Err((job, e.into()));
    }

    logger.log_completion("embedding complete");
    Ok(job)
}
