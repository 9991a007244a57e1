//! `rtt-transcribe`: standalone debug tool mirroring the subtitle-then-
//! ASR flow of the transcribe stage, grounded on `src/rtt/transcribe.py`'s
//! single-video driver. Reads `{"video_id", "source_url", "page_url"}`
//! from stdin, writes the resulting segment list to stdout.

use std::io::Read;

use rtt_adapters::{AssemblyAiTranscriber, PlatformSubtitleFetcher, SubtitleFetcher, Transcriber};
use rtt_models::Segment;
use serde::Deserialize;

#[derive(Deserialize)]
struct Input {
    video_id: String,
    source_url: String,
    #[serde(default)]
    page_url: String,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt().with_env_filter(tracing_subscriber::EnvFilter::from_default_env()).init();

    let mut buf = String::new();
    std::io::stdin().read_to_string(&mut buf).expect("failed to read stdin");
    let input: Input = serde_json::from_str(&buf).expect("stdin must be valid JSON");

    let segments: Vec<Segment> = if !input.page_url.trim().is_empty() {
        match PlatformSubtitleFetcher::new().fetch(&input.page_url, &input.video_id).await {
            Ok(Some(segments)) if !segments.is_empty() => segments,
            _ => run_asr(&input).await,
        }
    } else {
        run_asr(&input).await
    };

    println!("{}", serde_json::to_string_pretty(&segments).expect("segments always serialize"));
}

async fn run_asr(input: &Input) -> Vec<Segment> {
    let api_key = std::env::var("ASSEMBLYAI_API_KEY").unwrap_or_default();
    match AssemblyAiTranscriber::new(api_key).transcribe(&input.source_url, &input.video_id).await {
        Ok(segments) => segments,
        Err(e) => {
            eprintln!("transcription failed: {e}");
            std::process::exit(1);
        }
    }
}
