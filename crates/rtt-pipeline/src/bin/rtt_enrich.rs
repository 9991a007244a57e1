//! `rtt-enrich`: standalone debug tool mirroring `scripts/enrich_stdin.py`.
//! Reads `{"context", "texts"}` from stdin, writes a JSON array of
//! enriched strings to stdout.

use std::io::Read;

use rtt_adapters::{ClaudeEnricher, Enricher};
use serde::Deserialize;

#[derive(Deserialize)]
struct Input {
    context: String,
    texts: Vec<String>,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt().with_env_filter(tracing_subscriber::EnvFilter::from_default_env()).init();

    let mut buf = String::new();
    std::io::stdin().read_to_string(&mut buf).expect("failed to read stdin");
    let input: Input = serde_json::from_str(&buf).expect("stdin must be valid JSON");

    let api_key = std::env::var("ANTHROPIC_API_KEY").unwrap_or_default();
    let enricher = ClaudeEnricher::new(api_key);

    let mut enriched = Vec::with_capacity(input.texts.len());
    for text in &input.texts {
        match enricher.enrich(text, &input.context).await {
            Ok(text) => enriched.push(text),
            Err(e) => {
                eprintln!("enrichment failed: {e}");
                std::process::exit(1);
            }
        }
    }

    println!("{}", serde_json::to_string_pretty(&enriched).expect("strings always serialize"));
}
