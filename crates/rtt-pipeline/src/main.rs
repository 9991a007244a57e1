//! `rtt-batch`: runs the ingestion pipeline over a list of video jobs
//! read from a JSON file (`spec.md` §4.4, §4.8).

use std::path::PathBuf;
use std::sync::Arc;

use rtt_adapters::{
    AssemblyAiTranscriber, ClaudeEnricher, FfmpegFrameExtractor, OllamaEmbedder, PlatformSubtitleFetcher, YtDlpDownloader,
};
use rtt_checkpoint::CheckpointStore;
use rtt_cli::Requirements;
use rtt_models::VideoJob;
use rtt_pipeline::{Adapters, FailuresLog, Orchestrator, PipelineConfig, PipelineContext};
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() {
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("failed to install rustls crypto provider");

    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(fmt::layer().json())
        .with(EnvFilter::from_default_env().add_directive("rtt=info".parse().unwrap()))
        .init();

    let config = PipelineConfig::from_env();
    info!(?config, "starting rtt-batch");

    rtt_cli::require(Requirements {
        needs_ffmpeg: true,
        needs_ytdlp: true,
        needs_ollama: true,
        needs_anthropic: !config.skip_enrich,
        needs_assemblyai: true,
    })
    .await;

    let jobs_path = std::env::args().nth(1).unwrap_or_else(|| "jobs.json".to_string());
    let jobs = match load_jobs(&jobs_path).await {
        Ok(jobs) => jobs,
        Err(e) => {
            error!(path = %jobs_path, error = %e, "failed to load job list");
            std::process::exit(1);
        }
    };

    if jobs.is_empty() {
        error!(path = %jobs_path, "job list is empty");
        std::process::exit(1);
    }

    let ollama_url = std::env::var("RTT_OLLAMA_URL").unwrap_or_else(|_| rtt_cli::readiness::DEFAULT_OLLAMA_URL.to_string());
    let assemblyai_key = std::env::var("ASSEMBLYAI_API_KEY").unwrap_or_default();
    let anthropic_key = std::env::var("ANTHROPIC_API_KEY").unwrap_or_default();

    let adapters = Adapters {
        transcriber: Arc::new(AssemblyAiTranscriber::new(assemblyai_key)),
        subtitles: Arc::new(PlatformSubtitleFetcher::new()),
        enricher: Arc::new(ClaudeEnricher::new(anthropic_key)),
        embedder: Arc::new(OllamaEmbedder::new(ollama_url)),
        downloader: Arc::new(YtDlpDownloader),
        frames_local: Arc::new(FfmpegFrameExtractor::local()),
        frames_remote: Arc::new(FfmpegFrameExtractor::remote()),
    };

    let cache_dir = PathBuf::from(&config.cache_dir);
    let scratch_dir = cache_dir.join("scratch");
    let checkpoints = CheckpointStore::new(&cache_dir);
    let failures = FailuresLog::new(cache_dir.join("failures.jsonl"));

    let ctx = PipelineContext { adapters, checkpoints, scratch_dir, failures, config };
    let orchestrator = Orchestrator::new(ctx);

    let shutdown = tokio::spawn(async {
        tokio::signal::ctrl_c().await.ok();
        info!("received shutdown signal, draining in-flight work");
    });

    let archives = orchestrator.run(jobs).await;
    shutdown.abort();

    info!(count = archives.len(), "batch complete");
    for path in &archives {
        println!("{}", path.display());
    }
}

async fn load_jobs(path: &str) -> std::io::Result<Vec<VideoJob>> {
    let bytes = tokio::fs::read(path).await?;
    serde_json::from_slice(&bytes).map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
}
