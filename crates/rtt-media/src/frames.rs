//! Representative-still extraction: one JPEG per segment at its start
//! timestamp (`spec.md` §4.2 "Frame extractor (local/remote)"). Grounded
//! on the original implementation's `rtt.frames` module, translated from
//! synchronous subprocess calls to `tokio::process::Command` built on
//! this crate's `FfmpegCommand`/`FfmpegRunner`.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::Semaphore;
use tracing::warn;

use crate::command::{FfmpegCommand, FfmpegRunner};

/// Internal concurrency used by the remote extractor, matching the
/// original implementation's `REMOTE_CONCURRENCY`.
pub const REMOTE_CONCURRENCY: usize = 20;

fn frame_filename(timestamp: f64) -> String {
    format!("{:06}.jpg", timestamp as i64)
}

async fn extract_one(input: &str, timestamp: f64, output_dir: &Path) -> Option<PathBuf> {
    let filename = frame_filename(timestamp);
    let out_path = output_dir.join(&filename);

    let cmd = FfmpegCommand::new(input, &out_path).seek(timestamp).single_frame().output_arg("-q:v").output_arg("2");

    let runner = FfmpegRunner::new();
    match runner.run(&cmd).await {
        Ok(()) => match tokio::fs::metadata(&out_path).await {
            Ok(meta) if meta.len() > 0 => Some(out_path),
            _ => {
                let _ = tokio::fs::remove_file(&out_path).await;
                None
            }
        },
        Err(e) => {
            warn!(input, timestamp, error = %e, "frame extraction failed");
            let _ = tokio::fs::remove_file(&out_path).await;
            None
        }
    }
}

/// Extracts one frame per timestamp from a local file, sequentially (the
/// local path is disk-bound, not network-bound, so no extra concurrency
/// is warranted). `None` entries mark extraction failures, which are
/// never fatal (`spec.md` §4.2: "none fatal").
pub async fn extract_local(video_path: &Path, timestamps: &[f64], output_dir: &Path) -> Vec<Option<PathBuf>> {
    tokio::fs::create_dir_all(output_dir).await.ok();
    let input = video_path.to_string_lossy().to_string();

    let mut out = Vec::with_capacity(timestamps.len());
    for &ts in timestamps {
        out.push(extract_one(&input, ts, output_dir).await);
    }
    out
}

/// Extracts one frame per timestamp directly from a remote URL, with
/// bounded internal concurrency so a long segment list doesn't spawn
/// hundreds of simultaneous ffmpeg processes against the same host.
pub async fn extract_remote(source_url: &str, timestamps: &[f64], output_dir: &Path) -> Vec<Option<PathBuf>> {
    tokio::fs::create_dir_all(output_dir).await.ok();
    let semaphore = Arc::new(Semaphore::new(REMOTE_CONCURRENCY));
    let url = source_url.to_string();

    let mut tasks = Vec::with_capacity(timestamps.len());
    for &ts in timestamps {
        let semaphore = semaphore.clone();
        let url = url.clone();
        let output_dir = output_dir.to_path_buf();
        tasks.push(tokio::spawn(async move {
            let _permit = semaphore.acquire_owned().await.expect("semaphore closed");
            extract_one(&url, ts, &output_dir).await
        }));
    }

    let mut out = Vec::with_capacity(tasks.len());
    for task in tasks {
        out.push(task.await.unwrap_or(None));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_filename_is_zero_padded_seconds() {
        assert_eq!(frame_filename(0.5), "000000.jpg");
        assert_eq!(frame_filename(42.9), "000042.jpg");
        assert_eq!(frame_filename(123456.0), "123456.jpg");
    }
}
