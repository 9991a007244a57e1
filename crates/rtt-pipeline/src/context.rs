//! Shared, read-only state every stage worker needs: the adapter set,
//! the checkpoint store, scratch/output directories, and the
//! failures-log writer. Held behind an `Arc` and cloned cheaply into
//! every spawned stage task.

use std::path::PathBuf;
use std::sync::Arc;

use rtt_adapters::{Embedder, Enricher, FrameExtractor, PlatformDownloader, SubtitleFetcher, Transcriber};
use rtt_checkpoint::CheckpointStore;

use crate::config::PipelineConfig;
use crate::failures::FailuresLog;

/// The full external-service adapter set, each behind a trait object so
/// tests can substitute fakes (`spec.md` §4.2: the pipeline never
/// depends on a concrete vendor).
pub struct Adapters {
    pub transcriber: Arc<dyn Transcriber>,
    pub subtitles: Arc<dyn SubtitleFetcher>,
    pub enricher: Arc<dyn Enricher>,
    pub embedder: Arc<dyn Embedder>,
    pub downloader: Arc<dyn PlatformDownloader>,
    /// Extracts frames from a file already on local disk.
    pub frames_local: Arc<dyn FrameExtractor>,
    /// Extracts frames directly from a remote URL, with its own internal
    /// concurrency bound (`spec.md` §4.4.4: "others stream from the URL
    /// with internal concurrency").
    pub frames_remote: Arc<dyn FrameExtractor>,
}

pub struct PipelineContext {
    pub adapters: Adapters,
    pub checkpoints: CheckpointStore,
    pub scratch_dir: PathBuf,
    pub failures: FailuresLog,
    pub config: PipelineConfig,
}

impl PipelineContext {
    pub fn scratch_audio_path(&self, video_id: &str) -> PathBuf {
        self.scratch_dir.join(format!("{video_id}.audio"))
    }

    pub fn scratch_video_path(&self, video_id: &str) -> PathBuf {
        self.scratch_dir.join(format!("{video_id}.video"))
    }

    pub fn scratch_frames_dir(&self, video_id: &str) -> PathBuf {
        self.scratch_dir.join(format!("{video_id}.frames"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PipelineConfig;
    use crate::failures::FailuresLog;
    use rtt_adapters::{
        AssemblyAiTranscriber, ClaudeEnricher, FfmpegFrameExtractor, OllamaEmbedder, PlatformSubtitleFetcher, YtDlpDownloader,
    };
    use rtt_checkpoint::CheckpointStore;

    fn sample_context(scratch_dir: PathBuf) -> PipelineContext {
        PipelineContext {
            adapters: Adapters {
                transcriber: Arc::new(AssemblyAiTranscriber::new("key")),
                subtitles: Arc::new(PlatformSubtitleFetcher::new()),
                enricher: Arc::new(ClaudeEnricher::new("key")),
                embedder: Arc::new(OllamaEmbedder::new("http://localhost:11434")),
                downloader: Arc::new(YtDlpDownloader),
                frames_local: Arc::new(FfmpegFrameExtractor::local()),
                frames_remote: Arc::new(FfmpegFrameExtractor::remote()),
            },
            checkpoints: CheckpointStore::new(scratch_dir.join("checkpoints")),
            scratch_dir: scratch_dir.clone(),
            failures: FailuresLog::new(scratch_dir.join("failures.jsonl")),
            config: PipelineConfig::default(),
        }
    }

    #[test]
    fn scratch_paths_are_namespaced_by_video_id() {
        let ctx = sample_context(PathBuf::from("/tmp/rtt-scratch"));
        assert_eq!(ctx.scratch_audio_path("v1"), PathBuf::from("/tmp/rtt-scratch/v1.audio"));
        assert_eq!(ctx.scratch_video_path("v1"), PathBuf::from("/tmp/rtt-scratch/v1.video"));
        assert_eq!(ctx.scratch_frames_dir("v1"), PathBuf::from("/tmp/rtt-scratch/v1.frames"));
    }
}
