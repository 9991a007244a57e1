//! Frames+Package stage: extract one still frame per segment, assemble
//! the `.rtt` archive, and clear the checkpoint and scratch files on
//! success (`spec.md` §4.4.4 "Frames+Package").

use std::path::PathBuf;

use rtt_checkpoint::ScratchScope;
use rtt_models::{Video, VideoStatus};

use crate::context::PipelineContext;
use crate::error::PipelineError;
use crate::job::PipelineJob;
use crate::logging::VideoLogger;

pub async fn run(ctx: &PipelineContext, mut job: PipelineJob) -> Result<PathBuf, (PipelineJob, PipelineError)> {
    let logger = VideoLogger::new(job.job.video_id.clone(), "frames_package");
    logger.log_start();
    let video_id = job.job.video_id.clone();

    let mut scratch = ScratchScope::new();
    let frames_dir = ctx.scratch_frames_dir(&video_id);
    if let Err(e) = tokio::fs::create_dir_all(&frames_dir).await {
        return Err((job, e.into()));
    }
    scratch.track_dir(&frames_dir);

    let timestamps: Vec<f64> = job.segments.iter().map(|s| s.start_seconds).collect();
    let source_url = job.job.source_url.clone();

    let extracted = if ctx.adapters.downloader.supports(&source_url) {
        let video_path = ctx.scratch_video_path(&video_id);
        scratch.track_file(&video_path);
        if let Err(e) = ctx.adapters.downloader.download(&source_url, &video_path).await {
            return Err((job, e.into()));
        }
        ctx.adapters
            .frames_local
            .extract(&video_path.to_string_lossy(), &timestamps, &frames_dir)
            .await
    } else {
        ctx.adapters.frames_remote.extract(&source_url, &timestamps, &frames_dir).await
    };

    for (segment, frame) in job.segments.iter_mut().zip(extracted.iter()) {
        segment.frame_path = match frame {
            Some(path) => path
                .file_name()
                .and_then(|n| n.to_str())
                .map(|n| format!("frames/{n}"))
                .unwrap_or_default(),
            None => String::new(),
        };
    }

    let duration_seconds = job.segments.iter().map(|s| s.end_seconds).fold(0.0_f64, f64::max);
    let video = Video {
        video_id: video_id.clone(),
        title: job.job.title.clone(),
        source_url: job.job.source_url.clone(),
        page_url: job.job.page_url.clone(),
        context: job.job.context.clone(),
        collection: job.job.collection.clone(),
        duration_seconds,
        status: VideoStatus::Ready,
    };

    let archive_path = ctx.checkpoints.archive_path(&video_id);

    let segments_for_write = job.segments.clone();
    let frames_dir_for_write = frames_dir.clone();
    let archive_path_for_write = archive_path.clone();
    let write_result = tokio::task::spawn_blocking(move || {
        rtt_archive::write_archive(&video, &segments_for_write, &frames_dir_for_write, &archive_path_for_write)
    })
    .await;

    match write_result {
        Ok(Ok(())) => {}
        Ok(Err(e)) => return Err((job, e.into())),
        Err(join_err) => return Err((job, PipelineError::ExternalServiceError(join_err.to_string()))),
    }

    if let Err(e) = ctx.checkpoints.delete(&video_id).await {
        return Err((job, e.into()));
    }

    scratch.cleanup();
    logger.log_completion(&format!("archive written: {}", archive_path.display()));
    Ok(archive_path)
}
