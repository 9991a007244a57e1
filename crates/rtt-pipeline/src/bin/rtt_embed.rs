//! `rtt-embed`: standalone debug tool mirroring `scripts/embed_stdin.py`.
//! Reads `{"texts"}` from stdin, writes a JSON array of 768-wide
//! embedding vectors to stdout.

use std::io::Read;

use rtt_adapters::{Embedder, OllamaEmbedder};
use serde::Deserialize;

#[derive(Deserialize)]
struct Input {
    texts: Vec<String>,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt().with_env_filter(tracing_subscriber::EnvFilter::from_default_env()).init();

    let mut buf = String::new();
    std::io::stdin().read_to_string(&mut buf).expect("failed to read stdin");
    let input: Input = serde_json::from_str(&buf).expect("stdin must be valid JSON");

    let base_url = std::env::var("RTT_OLLAMA_URL").unwrap_or_else(|_| rtt_cli::readiness::DEFAULT_OLLAMA_URL.to_string());
    let embedder = OllamaEmbedder::new(base_url);

    let mut embeddings = Vec::with_capacity(input.texts.len());
    for text in &input.texts {
        match embedder.embed(text).await {
            Ok(vector) => embeddings.push(vector),
            Err(e) => {
                eprintln!("embedding failed: {e}");
                std::process::exit(1);
            }
        }
    }

    println!("{}", serde_json::to_string_pretty(&embeddings).expect("vectors always serialize"));
}
