//! Automatic speech recognition adapter (`spec.md` §4.2 "ASR").

use std::time::Duration;

use rtt_models::Segment;
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{AdapterError, AdapterResult};
use crate::merge::{segments_from_words, SegmentMergeConfig, TimedWord};

const SERVICE: &str = "assemblyai";
const POLL_INTERVAL: Duration = Duration::from_secs(3);

/// Converts a remote video URL (or an already-uploaded audio URL) into
/// timed transcript segments.
#[async_trait::async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(&self, source_url: &str, video_id: &str) -> AdapterResult<Vec<Segment>>;
}

pub struct AssemblyAiTranscriber {
    client: reqwest::Client,
    api_key: String,
    merge_config: SegmentMergeConfig,
}

impl AssemblyAiTranscriber {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            merge_config: SegmentMergeConfig::default(),
        }
    }

    pub fn with_merge_config(mut self, config: SegmentMergeConfig) -> Self {
        self.merge_config = config;
        self
    }

    async fn submit(&self, audio_url: &str) -> AdapterResult<String> {
        #[derive(Deserialize)]
        struct SubmitResponse {
            id: String,
        }
        let resp = self
            .client
            .post("https://api.assemblyai.com/v2/transcript")
            .header("authorization", &self.api_key)
            .json(&serde_json::json!({
                "audio_url": audio_url,
                "speaker_labels": false,
                "auto_chapters": false,
                "entity_detection": false,
                "sentiment_analysis": false,
            }))
            .send()
            .await?
            .error_for_status()
            .map_err(|e| AdapterError::service(SERVICE, e.to_string()))?
            .json::<SubmitResponse>()
            .await?;
        Ok(resp.id)
    }

    async fn poll(&self, transcript_id: &str) -> AdapterResult<TranscriptResult> {
        let url = format!("https://api.assemblyai.com/v2/transcript/{transcript_id}");
        loop {
            let result: TranscriptResult = self
                .client
                .get(&url)
                .header("authorization", &self.api_key)
                .send()
                .await?
                .json()
                .await?;

            match result.status.as_str() {
                "completed" => return Ok(result),
                "error" => {
                    let message = result.error.unwrap_or_else(|| "unknown error".to_string());
                    return Err(AdapterError::service(SERVICE, message));
                }
                _ => {
                    debug!(transcript_id, status = %result.status, "waiting on assemblyai transcript");
                    tokio::time::sleep(POLL_INTERVAL).await;
                }
            }
        }
    }
}

#[derive(Deserialize)]
struct TranscriptResult {
    status: String,
    error: Option<String>,
    #[serde(default)]
    utterances: Option<Vec<Utterance>>,
    #[serde(default)]
    words: Option<Vec<Word>>,
}

#[derive(Deserialize)]
struct Utterance {
    text: String,
    start: u64,
    end: u64,
}

#[derive(Deserialize)]
struct Word {
    text: String,
    start: u64,
    end: u64,
}

#[async_trait::async_trait]
impl Transcriber for AssemblyAiTranscriber {
    async fn transcribe(&self, source_url: &str, video_id: &str) -> AdapterResult<Vec<Segment>> {
        let transcript_id = self.submit(source_url).await?;
        info!(video_id, transcript_id, "submitted assemblyai transcription");
        let result = self.poll(&transcript_id).await?;

        if let Some(utterances) = result.utterances.filter(|u| !u.is_empty()) {
            let segments = utterances
                .into_iter()
                .enumerate()
                .filter_map(|(i, u)| {
                    let text = u.text.trim();
                    if text.is_empty() {
                        return None;
                    }
                    Some(Segment::new(video_id, i, u.start as f64 / 1000.0, u.end as f64 / 1000.0, text))
                })
                .collect();
            return Ok(segments);
        }

        let words: Vec<TimedWord> = result
            .words
            .unwrap_or_default()
            .into_iter()
            .map(|w| TimedWord { text: w.text, start_ms: w.start, end_ms: w.end })
            .collect();
        Ok(segments_from_words(&words, video_id, self.merge_config))
    }
}
