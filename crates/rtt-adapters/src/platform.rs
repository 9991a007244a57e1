//! Platform video downloader adapter (`spec.md` §4.2 "Platform
//! downloader"), wrapping `rtt_media::download_video`/`is_supported_url`.

use std::path::Path;

use crate::error::{AdapterError, AdapterResult};

#[async_trait::async_trait]
pub trait PlatformDownloader: Send + Sync {
    fn supports(&self, url: &str) -> bool;
    async fn download(&self, url: &str, output_path: &Path) -> AdapterResult<()>;
}

#[derive(Default)]
pub struct YtDlpDownloader;

#[async_trait::async_trait]
impl PlatformDownloader for YtDlpDownloader {
    fn supports(&self, url: &str) -> bool {
        rtt_media::is_supported_url(url)
    }

    async fn download(&self, url: &str, output_path: &Path) -> AdapterResult<()> {
        if !self.supports(url) {
            return Err(AdapterError::UnsupportedUrl(url.to_string()));
        }
        rtt_media::download_video(url, output_path).await.map_err(AdapterError::from)
    }
}
