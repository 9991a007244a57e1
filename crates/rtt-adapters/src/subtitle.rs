//! Platform subtitle-track fetch, attempted before falling through to ASR
//! (`spec.md` §4.2, grounded on `youtube.py`'s manual-then-automatic
//! caption lookup via yt-dlp's `--write-subs`/`--write-auto-subs`). A
//! missing subtitle track is `Ok(None)`, never an error.

use std::process::Stdio;

use rtt_models::Segment;
use tokio::process::Command;

use crate::error::{AdapterError, AdapterResult};

const SERVICE: &str = "yt-dlp-subtitles";

#[async_trait::async_trait]
pub trait SubtitleFetcher: Send + Sync {
    /// Returns `None` when the platform has no caption track for this
    /// video — the caller should fall through to ASR, not treat it as a
    /// failure.
    async fn fetch(&self, page_url: &str, video_id: &str) -> AdapterResult<Option<Vec<Segment>>>;
}

pub struct PlatformSubtitleFetcher {
    client: reqwest::Client,
}

impl Default for PlatformSubtitleFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl PlatformSubtitleFetcher {
    pub fn new() -> Self {
        Self { client: reqwest::Client::new() }
    }

    /// Asks yt-dlp for the manual (preferred) or automatic caption track
    /// URL, in VTT format, without downloading video.
    async fn subtitle_vtt_url(&self, page_url: &str) -> AdapterResult<Option<String>> {
        let output = Command::new("yt-dlp")
            .args(["--skip-download", "--sub-lang", "en", "--write-subs", "--write-auto-subs", "-J"])
            .arg(page_url)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| AdapterError::service(SERVICE, e.to_string()))?;

        if !output.status.success() {
            return Ok(None);
        }

        let info: serde_json::Value = serde_json::from_slice(&output.stdout)?;
        let pick = |key: &str| -> Option<String> {
            info.get(key)?.get("en")?.as_array()?.iter().find_map(|entry| {
                if entry.get("ext")?.as_str()? == "vtt" {
                    entry.get("url")?.as_str().map(|s| s.to_string())
                } else {
                    None
                }
            })
        };
        Ok(pick("subtitles").or_else(|| pick("automatic_captions")))
    }
}

#[async_trait::async_trait]
impl SubtitleFetcher for PlatformSubtitleFetcher {
    async fn fetch(&self, page_url: &str, video_id: &str) -> AdapterResult<Option<Vec<Segment>>> {
        let Some(vtt_url) = self.subtitle_vtt_url(page_url).await? else {
            return Ok(None);
        };

        let vtt_text = self.client.get(&vtt_url).send().await?.text().await?;
        let cues = parse_vtt(&vtt_text);
        if cues.is_empty() {
            return Ok(None);
        }

        let segments = cues
            .into_iter()
            .enumerate()
            .filter_map(|(i, cue)| {
                let text = cue.text.trim();
                if text.is_empty() {
                    return None;
                }
                Some(Segment::new(video_id, i, cue.start, cue.end, text))
            })
            .collect();
        Ok(Some(segments))
    }
}

struct Cue {
    start: f64,
    end: f64,
    text: String,
}

/// Minimal WebVTT parser: enough to pull `start --> end` cue timings and
/// their text lines, matching the shape `youtube.py` consumes from
/// `webvtt-py`.
fn parse_vtt(text: &str) -> Vec<Cue> {
    let mut cues = Vec::new();
    let mut lines = text.lines().peekable();
    while let Some(line) = lines.next() {
        let Some((start_str, end_str)) = line.split_once("-->") else { continue };
        let Some(start) = parse_vtt_timestamp(start_str.trim()) else { continue };
        let end_str = end_str.trim().split_whitespace().next().unwrap_or("");
        let Some(end) = parse_vtt_timestamp(end_str) else { continue };

        let mut text_lines = Vec::new();
        while let Some(next) = lines.peek() {
            if next.trim().is_empty() {
                break;
            }
            text_lines.push(lines.next().unwrap().trim().to_string());
        }
        cues.push(Cue { start, end, text: text_lines.join(" ") });
    }
    cues
}

fn parse_vtt_timestamp(s: &str) -> Option<f64> {
    let (main, millis) = s.split_once('.')?;
    let millis: f64 = millis.parse().ok()?;
    let parts: Vec<&str> = main.split(':').collect();
    let mut seconds = 0.0;
    for part in &parts {
        seconds = seconds * 60.0 + part.parse::<f64>().ok()?;
    }
    Some(seconds + millis / 1000.0)
}
