//! Fake adapter implementations shared by the `stages::*` unit tests.
//! Kept in one place so each stage test only has to name the behavior it
//! needs, not re-implement the trait boilerplate.

use std::path::{Path, PathBuf};

use rtt_adapters::{AdapterError, AdapterResult, Embedder, Enricher, FrameExtractor, PlatformDownloader, SubtitleFetcher, Transcriber};
use rtt_models::{Segment, EMBEDDING_DIM};

pub fn sample_segment(video_id: &str, ordinal: usize) -> Segment {
    Segment::new(video_id, ordinal, ordinal as f64 * 2.0, ordinal as f64 * 2.0 + 2.0, "hello world")
}

pub struct StubTranscriber {
    segments: Vec<Segment>,
}

impl StubTranscriber {
    pub fn with_segments(segments: Vec<Segment>) -> Self {
        Self { segments }
    }
}

#[async_trait::async_trait]
impl Transcriber for StubTranscriber {
    async fn transcribe(&self, _source_url: &str, _video_id: &str) -> AdapterResult<Vec<Segment>> {
        Ok(self.segments.clone())
    }
}

pub struct NoSubtitles;

#[async_trait::async_trait]
impl SubtitleFetcher for NoSubtitles {
    async fn fetch(&self, _page_url: &str, _video_id: &str) -> AdapterResult<Option<Vec<Segment>>> {
        Ok(None)
    }
}

pub struct StaticSubtitles {
    segments: Vec<Segment>,
}

impl StaticSubtitles {
    pub fn with_segments(segments: Vec<Segment>) -> Self {
        Self { segments }
    }
}

#[async_trait::async_trait]
impl SubtitleFetcher for StaticSubtitles {
    async fn fetch(&self, _page_url: &str, _video_id: &str) -> AdapterResult<Option<Vec<Segment>>> {
        Ok(Some(self.segments.clone()))
    }
}

pub struct FakeEnricher;

#[async_trait::async_trait]
impl Enricher for FakeEnricher {
    async fn enrich(&self, segment_text: &str, _context: &str) -> AdapterResult<String> {
        Ok(format!("{segment_text} (enriched)"))
    }
}

pub struct FailingEnricher;

#[async_trait::async_trait]
impl Enricher for FailingEnricher {
    async fn enrich(&self, _segment_text: &str, _context: &str) -> AdapterResult<String> {
        Err(AdapterError::ServiceError { service: "claude", message: "rate limited".into() })
    }
}

pub struct SilentEmbedder;

#[async_trait::async_trait]
impl Embedder for SilentEmbedder {
    async fn embed(&self, _text: &str) -> AdapterResult<Vec<f32>> {
        Ok(vec![0.1; EMBEDDING_DIM])
    }
}

pub struct ShortEmbedder;

#[async_trait::async_trait]
impl Embedder for ShortEmbedder {
    async fn embed(&self, _text: &str) -> AdapterResult<Vec<f32>> {
        Ok(vec![0.1; 4])
    }
}

pub struct FakePlatformDownloader {
    supported: bool,
}

impl FakePlatformDownloader {
    pub fn supported() -> Self {
        Self { supported: true }
    }

    pub fn unsupported() -> Self {
        Self { supported: false }
    }
}

#[async_trait::async_trait]
impl PlatformDownloader for FakePlatformDownloader {
    fn supports(&self, _url: &str) -> bool {
        self.supported
    }

    async fn download(&self, _url: &str, output_path: &Path) -> AdapterResult<()> {
        tokio::fs::write(output_path, b"fake video bytes").await.map_err(|e| AdapterError::ServiceError { service: "yt-dlp", message: e.to_string() })
    }
}

pub struct FakeFrameExtractor;

#[async_trait::async_trait]
impl FrameExtractor for FakeFrameExtractor {
    async fn extract(&self, _source: &str, timestamps: &[f64], output_dir: &Path) -> Vec<Option<PathBuf>> {
        let mut out = Vec::with_capacity(timestamps.len());
        for (i, _) in timestamps.iter().enumerate() {
            let path = output_dir.join(format!("frame_{i:05}.jpg"));
            let _ = tokio::fs::write(&path, b"fake jpeg bytes").await;
            out.push(Some(path));
        }
        out
    }
}
