//! The four-stage ingestion DAG (`spec.md` §4.4): Transcribe → Enrich →
//! Embed → Frames+Package, wired as bounded worker pools over `mpsc`
//! queues. Generalizes the teacher's single-queue `JobExecutor`
//! (semaphore-bounded concurrency, cooperative drain) to four queues
//! chained in series, each job moving to the next queue only once its
//! own stage has persisted a checkpoint.

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use rtt_models::checkpoint::PersistedSegment;
use rtt_models::{Checkpoint, Segment, VideoJob};
use tokio::sync::mpsc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::context::PipelineContext;
use crate::error::PipelineError;
use crate::job::PipelineJob;
use crate::stages;

type Tx = mpsc::UnboundedSender<Box<PipelineJob>>;
type Rx = mpsc::UnboundedReceiver<Box<PipelineJob>>;

#[derive(Clone, Default)]
struct QueueDepths {
    transcribe: Arc<AtomicUsize>,
    enrich: Arc<AtomicUsize>,
    embed: Arc<AtomicUsize>,
    frames: Arc<AtomicUsize>,
}

pub struct Orchestrator {
    ctx: Arc<PipelineContext>,
}

impl Orchestrator {
    pub fn new(ctx: PipelineContext) -> Self {
        Self { ctx: Arc::new(ctx) }
    }

    /// Runs every job to completion (or to a logged failure) and returns
    /// the list of archive paths produced this run, including those
    /// skipped because an archive already existed (`spec.md` §4.4.6).
    pub async fn run(&self, jobs: Vec<VideoJob>) -> Vec<PathBuf> {
        let mut results = Vec::new();
        let mut resumed: Vec<(VideoJob, Checkpoint)> = Vec::new();
        let mut deferred_new: Vec<VideoJob> = Vec::new();

        for job in jobs {
            if self.ctx.checkpoints.archive_exists(&job.video_id) {
                results.push(self.ctx.checkpoints.archive_path(&job.video_id));
                continue;
            }
            let checkpoint = match self.ctx.checkpoints.load(&job.video_id).await {
                Ok(cp) => cp,
                Err(e) => {
                    tracing::warn!(video_id = %job.video_id, error = %e, "failed to read checkpoint, treating as new");
                    Checkpoint::New
                }
            };
            match &checkpoint {
                Checkpoint::New | Checkpoint::Downloaded => deferred_new.push(job),
                _ => resumed.push((job, checkpoint)),
            }
        }

        let (transcribe_tx, transcribe_rx): (Tx, Rx) = mpsc::unbounded_channel();
        let (enrich_tx, enrich_rx): (Tx, Rx) = mpsc::unbounded_channel();
        let (embed_tx, embed_rx): (Tx, Rx) = mpsc::unbounded_channel();
        let (frames_tx, frames_rx): (Tx, Rx) = mpsc::unbounded_channel();

        let depths = QueueDepths::default();
        let results = Arc::new(std::sync::Mutex::new(results));
        let start = Instant::now();

        let transcribe_handle = tokio::spawn(run_transcribe_stage(
            self.ctx.clone(),
            transcribe_rx,
            enrich_tx.clone(),
            self.ctx.config.pool_transcribe,
            depths.transcribe.clone(),
            depths.enrich.clone(),
        ));
        let enrich_handle = tokio::spawn(run_enrich_stage(
            self.ctx.clone(),
            enrich_rx,
            embed_tx.clone(),
            self.ctx.config.pool_enrich,
            depths.enrich.clone(),
            depths.embed.clone(),
        ));
        let embed_handle = tokio::spawn(run_embed_stage(
            self.ctx.clone(),
            embed_rx,
            frames_tx.clone(),
            self.ctx.config.pool_embed,
            depths.embed.clone(),
            depths.frames.clone(),
        ));
        let frames_handle = tokio::spawn(run_frames_stage(
            self.ctx.clone(),
            frames_rx,
            results.clone(),
            self.ctx.config.pool_frames,
            depths.frames.clone(),
        ));

        // Resumed work is admitted first so it flows downstream ahead of
        // brand-new jobs (`spec.md` §4.4.3 "deferred new" second pass).
        for (job, checkpoint) in resumed {
            admit(job, checkpoint, &transcribe_tx, &enrich_tx, &embed_tx, &frames_tx, &depths);
        }
        for job in deferred_new {
            admit(job, Checkpoint::New, &transcribe_tx, &enrich_tx, &embed_tx, &frames_tx, &depths);
        }

        // Drop the orchestrator's own handles so each stage's channel
        // closes once every in-flight forwarder has also dropped its
        // clone, letting `rx.recv()` return `None` naturally.
        drop(transcribe_tx);
        drop(enrich_tx);
        drop(embed_tx);
        drop(frames_tx);

        let status_handle = spawn_status_printer(depths, self.ctx.config.status_interval_secs, start);

        let _ = transcribe_handle.await;
        let _ = enrich_handle.await;
        let _ = embed_handle.await;
        let _ = frames_handle.await;
        status_handle.abort();

        Arc::try_unwrap(results)
            .map(|m| m.into_inner().unwrap_or_default())
            .unwrap_or_default()
    }
}

fn admit(
    job: VideoJob,
    checkpoint: Checkpoint,
    transcribe_tx: &Tx,
    enrich_tx: &Tx,
    embed_tx: &Tx,
    frames_tx: &Tx,
    depths: &QueueDepths,
) {
    let segments = hydrate_segments(&job, &checkpoint);
    let mut pjob = PipelineJob::new(job, checkpoint.clone()).with_segments(segments);
    pjob.mark_enqueued();
    let pjob = Box::new(pjob);

    let (tx, counter) = match checkpoint {
        Checkpoint::Transcribed { .. } => (enrich_tx, &depths.enrich),
        Checkpoint::Enriched { .. } => (embed_tx, &depths.embed),
        Checkpoint::Embedded { .. } => (frames_tx, &depths.frames),
        _ => (transcribe_tx, &depths.transcribe),
    };
    counter.fetch_add(1, Ordering::Relaxed);
    let _ = tx.send(pjob);
}

fn hydrate_segments(job: &VideoJob, checkpoint: &Checkpoint) -> Vec<Segment> {
    match checkpoint {
        Checkpoint::Transcribed { segments, transcript_source } => segments
            .iter()
            .map(|p| persisted_to_segment(job, p, transcript_source, None, None))
            .collect(),
        Checkpoint::Enriched { segments, enriched, transcript_source } => segments
            .iter()
            .zip(enriched)
            .map(|(p, e)| persisted_to_segment(job, p, transcript_source, Some(e), None))
            .collect(),
        Checkpoint::Embedded { segments, enriched, embeddings, transcript_source } => segments
            .iter()
            .zip(enriched)
            .zip(embeddings)
            .map(|((p, e), emb)| persisted_to_segment(job, p, transcript_source, Some(e), Some(emb)))
            .collect(),
        _ => Vec::new(),
    }
}

fn persisted_to_segment(
    job: &VideoJob,
    persisted: &PersistedSegment,
    transcript_source: &str,
    enriched: Option<&String>,
    embedding: Option<&Vec<f32>>,
) -> Segment {
    Segment {
        segment_id: persisted.segment_id.clone(),
        video_id: job.video_id.clone(),
        start_seconds: persisted.start,
        end_seconds: persisted.end,
        transcript_raw: persisted.text.clone(),
        transcript_enriched: enriched.cloned().unwrap_or_default(),
        text_embedding: embedding.cloned().unwrap_or_default(),
        frame_path: String::new(),
        has_speech: true,
        source: transcript_source.to_string(),
        collection: job.collection.clone(),
    }
}

async fn record_failure(ctx: &PipelineContext, job: &PipelineJob, error: &PipelineError) {
    tracing::error!(video_id = %job.job.video_id, error = %error, "stage failed, dropping job");
    if let Err(e) = ctx.failures.append(&job.job.video_id, &job.job.source_url, &job.job.title, &error.to_string()).await {
        tracing::error!(video_id = %job.job.video_id, error = %e, "failed to write failures.jsonl");
    }
}

async fn run_transcribe_stage(
    ctx: Arc<PipelineContext>,
    mut rx: Rx,
    forward_tx: Tx,
    pool_size: usize,
    own_depth: Arc<AtomicUsize>,
    next_depth: Arc<AtomicUsize>,
) {
    let semaphore = Arc::new(Semaphore::new(pool_size.max(1)));
    let mut tasks = JoinSet::new();
    while let Some(job) = rx.recv().await {
        own_depth.fetch_sub(1, Ordering::Relaxed);
        let permit = semaphore.clone().acquire_owned().await.expect("semaphore never closed");
        let ctx = ctx.clone();
        let forward_tx = forward_tx.clone();
        let next_depth = next_depth.clone();
        tasks.spawn(async move {
            let _permit = permit;
            match stages::transcribe::run(&ctx, *job).await {
                Ok(job) => {
                    next_depth.fetch_add(1, Ordering::Relaxed);
                    let _ = forward_tx.send(Box::new(job));
                }
                Err((job, error)) => record_failure(&ctx, &job, &error).await,
            }
        });
    }
    while tasks.join_next().await.is_some() {}
}

async fn run_enrich_stage(
    ctx: Arc<PipelineContext>,
    mut rx: Rx,
    forward_tx: Tx,
    pool_size: usize,
    own_depth: Arc<AtomicUsize>,
    next_depth: Arc<AtomicUsize>,
) {
    let semaphore = Arc::new(Semaphore::new(pool_size.max(1)));
    let mut tasks = JoinSet::new();
    while let Some(job) = rx.recv().await {
        own_depth.fetch_sub(1, Ordering::Relaxed);
        let permit = semaphore.clone().acquire_owned().await.expect("semaphore never closed");
        let ctx = ctx.clone();
        let forward_tx = forward_tx.clone();
        let next_depth = next_depth.clone();
        tasks.spawn(async move {
            let _permit = permit;
            match stages::enrich::run(&ctx, *job).await {
                Ok(job) => {
                    next_depth.fetch_add(1, Ordering::Relaxed);
                    let _ = forward_tx.send(Box::new(job));
                }
                Err((job, error)) => record_failure(&ctx, &job, &error).await,
            }
        });
    }
    while tasks.join_next().await.is_some() {}
}

async fn run_embed_stage(
    ctx: Arc<PipelineContext>,
    mut rx: Rx,
    forward_tx: Tx,
    pool_size: usize,
    own_depth: Arc<AtomicUsize>,
    next_depth: Arc<AtomicUsize>,
) {
    let semaphore = Arc::new(Semaphore::new(pool_size.max(1)));
    let mut tasks = JoinSet::new();
    while let Some(job) = rx.recv().await {
        own_depth.fetch_sub(1, Ordering::Relaxed);
        let permit = semaphore.clone().acquire_owned().await.expect("semaphore never closed");
        let ctx = ctx.clone();
        let forward_tx = forward_tx.clone();
        let next_depth = next_depth.clone();
        tasks.spawn(async move {
            let _permit = permit;
            match stages::embed::run(&ctx, *job).await {
                Ok(job) => {
                    next_depth.fetch_add(1, Ordering::Relaxed);
                    let _ = forward_tx.send(Box::new(job));
                }
                Err((job, error)) => record_failure(&ctx, &job, &error).await,
            }
        });
    }
    while tasks.join_next().await.is_some() {}
}

async fn run_frames_stage(
    ctx: Arc<PipelineContext>,
    mut rx: Rx,
    results: Arc<std::sync::Mutex<Vec<PathBuf>>>,
    pool_size: usize,
    own_depth: Arc<AtomicUsize>,
) {
    let semaphore = Arc::new(Semaphore::new(pool_size.max(1)));
    let mut tasks = JoinSet::new();
    while let Some(job) = rx.recv().await {
        own_depth.fetch_sub(1, Ordering::Relaxed);
        let permit = semaphore.clone().acquire_owned().await.expect("semaphore never closed");
        let ctx = ctx.clone();
        let results = results.clone();
        tasks.spawn(async move {
            let _permit = permit;
            match stages::frames_package::run(&ctx, *job).await {
                Ok(path) => {
                    results.lock().expect("results mutex poisoned").push(path);
                }
                Err((job, error)) => record_failure(&ctx, &job, &error).await,
            }
        });
    }
    while tasks.join_next().await.is_some() {}
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_job() -> VideoJob {
        VideoJob::new("v1", "Duck and Cover", "https://example.com/v.mp4").with_collection("prelinger")
    }

    fn persisted(id: &str, start: f64, end: f64, text: &str) -> PersistedSegment {
        PersistedSegment { segment_id: id.to_string(), start, end, text: text.to_string() }
    }

    #[test]
    fn hydrate_segments_empty_for_new_and_downloaded() {
        let job = sample_job();
        assert!(hydrate_segments(&job, &Checkpoint::New).is_empty());
        assert!(hydrate_segments(&job, &Checkpoint::Downloaded).is_empty());
    }

    #[test]
    fn hydrate_segments_from_transcribed_checkpoint_has_no_enrichment_or_embedding() {
        let job = sample_job();
        let checkpoint = Checkpoint::Transcribed {
            segments: vec![persisted("v1_00000", 0.0, 1.0, "hello")],
            transcript_source: "asr".into(),
        };
        let segments = hydrate_segments(&job, &checkpoint);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].transcript_raw, "hello");
        assert!(segments[0].transcript_enriched.is_empty());
        assert!(segments[0].text_embedding.is_empty());
        assert_eq!(segments[0].collection, "prelinger");
    }

    #[test]
    fn hydrate_segments_from_embedded_checkpoint_carries_everything() {
        let job = sample_job();
        let checkpoint = Checkpoint::Embedded {
            segments: vec![persisted("v1_00000", 0.0, 1.0, "hello")],
            enriched: vec!["Hello, clearly enunciated.".to_string()],
            embeddings: vec![vec![0.1f32; rtt_models::segment::EMBEDDING_DIM]],
            transcript_source: "asr".into(),
        };
        let segments = hydrate_segments(&job, &checkpoint);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].transcript_enriched, "Hello, clearly enunciated.");
        assert_eq!(segments[0].text_embedding.len(), rtt_models::segment::EMBEDDING_DIM);
    }

    #[test]
    fn admit_routes_by_checkpoint_stage() {
        let (transcribe_tx, mut transcribe_rx): (Tx, Rx) = mpsc::unbounded_channel();
        let (enrich_tx, mut enrich_rx): (Tx, Rx) = mpsc::unbounded_channel();
        let (embed_tx, mut embed_rx): (Tx, Rx) = mpsc::unbounded_channel();
        let (frames_tx, mut frames_rx): (Tx, Rx) = mpsc::unbounded_channel();
        let depths = QueueDepths::default();

        admit(sample_job(), Checkpoint::New, &transcribe_tx, &enrich_tx, &embed_tx, &frames_tx, &depths);
        admit(
            sample_job(),
            Checkpoint::Transcribed { segments: vec![], transcript_source: "asr".into() },
            &transcribe_tx,
            &enrich_tx,
            &embed_tx,
            &frames_tx,
            &depths,
        );
        admit(
            sample_job(),
            Checkpoint::Enriched { segments: vec![], enriched: vec![], transcript_source: "asr".into() },
            &transcribe_tx,
            &enrich_tx,
            &embed_tx,
            &frames_tx,
            &depths,
        );
        admit(
            sample_job(),
            Checkpoint::Embedded { segments: vec![], enriched: vec![], embeddings: vec![], transcript_source: "asr".into() },
            &transcribe_tx,
            &enrich_tx,
            &embed_tx,
            &frames_tx,
            &depths,
        );

        assert!(transcribe_rx.try_recv().is_ok());
        assert!(enrich_rx.try_recv().is_ok());
        assert!(embed_rx.try_recv().is_ok());
        assert!(frames_rx.try_recv().is_ok());
    }
}

fn spawn_status_printer(depths: QueueDepths, interval_secs: u64, start: Instant) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs.max(1)));
        loop {
            ticker.tick().await;
            tracing::info!(
                elapsed_secs = start.elapsed().as_secs(),
                transcribe = depths.transcribe.load(Ordering::Relaxed),
                enrich = depths.enrich.load(Ordering::Relaxed),
                embed = depths.embed.load(Ordering::Relaxed),
                frames = depths.frames.load(Ordering::Relaxed),
                "pipeline status"
            );
        }
    })
}
