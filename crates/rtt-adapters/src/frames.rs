//! Frame extractor adapter (`spec.md` §4.2 "Frame extractor
//! (local/remote)"), wrapping `rtt_media::extract_local`/`extract_remote`.

use std::path::{Path, PathBuf};

#[async_trait::async_trait]
pub trait FrameExtractor: Send + Sync {
    /// One JPEG path per timestamp; `None` marks an extraction that
    /// failed for that single timestamp (never fatal to the caller).
    async fn extract(&self, source: &str, timestamps: &[f64], output_dir: &Path) -> Vec<Option<PathBuf>>;
}

pub struct FfmpegFrameExtractor {
    remote: bool,
}

impl FfmpegFrameExtractor {
    pub fn local() -> Self {
        Self { remote: false }
    }

    pub fn remote() -> Self {
        Self { remote: true }
    }
}

#[async_trait::async_trait]
impl FrameExtractor for FfmpegFrameExtractor {
    async fn extract(&self, source: &str, timestamps: &[f64], output_dir: &Path) -> Vec<Option<PathBuf>> {
        if self.remote {
            rtt_media::extract_remote(source, timestamps, output_dir).await
        } else {
            rtt_media::extract_local(Path::new(source), timestamps, output_dir).await
        }
    }
}
