//! Enrich stage: LLM-based transcript enrichment, or a passthrough copy
//! of the raw transcript when disabled (`spec.md` §4.4.4 "Enrich").

use rtt_models::Checkpoint;

use crate::context::PipelineContext;
use crate::error::PipelineError;
use crate::job::PipelineJob;
use crate::logging::VideoLogger;
use crate::stages::{to_persisted, transcript_source_of};

pub async fn run(ctx: &PipelineContext, mut job: PipelineJob) -> Result<PipelineJob, (PipelineJob, PipelineError)> {
    let logger = VideoLogger::new(job.job.video_id.clone(), "enrich");
    logger.log_start();
    let video_id = job.job.video_id.clone();
    let enrichment_context = job.job.enrichment_context().to_string();

    let raw_texts: Vec<String> = job.segments.iter().map(|s| s.transcript_raw.clone()).collect();

    let enriched_texts = if ctx.config.skip_enrich {
        raw_texts
    } else {
        let mut out = Vec::with_capacity(raw_texts.len());
        for text in &raw_texts {
            match ctx.adapters.enricher.enrich(text, &enrichment_context).await {
                Ok(enriched) => out.push(enriched),
                Err(e) => return Err((job, e.into())),
            }
        }
        out
    };

    if enriched_texts.len() != job.segments.len() {
        return Err((job, PipelineError::data_shape("enricher returned a mismatched segment count")));
    }

    for (segment, enriched) in job.segments.iter_mut().zip(enriched_texts.iter()) {
        segment.transcript_enriched = enriched.clone();
    }

    let transcript_source = transcript_source_of(&job.checkpoint);
    job.checkpoint = Checkpoint::Enriched {
        segments: job.segments.iter().map(to_persisted).collect(),
        enriched: enriched_texts,
        transcript_source,
    };

    if let Err(e) = ctx.checkpoints.save(&video_id, &job.checkpoint).await {
        return Err((job, e.into()));
    }

    logger.log_completion("enrichment complete");
    Ok(job)
}
