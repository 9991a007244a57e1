//! Readiness gate (`spec.md` §6, exit code 1 on failure): collects every
//! missing prerequisite before starting work instead of failing on the
//! first one, grounded on `original_source/src/rtt/runtime.py`'s
//! `check()`/`require()` pair.

pub const OLLAMA_MODEL: &str = "nomic-embed-text";
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";

#[derive(Debug, Clone, Copy, Default)]
pub struct Requirements {
    pub needs_ffmpeg: bool,
    pub needs_ytdlp: bool,
    pub needs_ollama: bool,
    pub needs_anthropic: bool,
    pub needs_assemblyai: bool,
}

impl Requirements {
    pub fn all() -> Self {
        Self { needs_ffmpeg: true, needs_ytdlp: true, needs_ollama: true, needs_anthropic: true, needs_assemblyai: true }
    }
}

fn check_binary(name: &str) -> bool {
    which::which(name).is_ok()
}

async fn check_ollama_running(base_url: &str) -> bool {
    reqwest::Client::new()
        .get(format!("{}/api/tags", base_url.trim_end_matches('/')))
        .timeout(std::time::Duration::from_secs(5))
        .send()
        .await
        .is_ok()
}

async fn check_ollama_model(base_url: &str, model: &str) -> bool {
    reqwest::Client::new()
        .post(format!("{}/api/show", base_url.trim_end_matches('/')))
        .timeout(std::time::Duration::from_secs(5))
        .json(&serde_json::json!({ "model": model }))
        .send()
        .await
        .map(|resp| resp.status().is_success())
        .unwrap_or(false)
}

fn check_anthropic_key() -> bool {
    std::env::var("ANTHROPIC_API_KEY").map(|v| !v.is_empty()).unwrap_or(false)
}

fn check_assemblyai_key() -> bool {
    std::env::var("ASSEMBLYAI_API_KEY").map(|v| !v.is_empty()).unwrap_or(false)
}

/// Returns every missing requirement as a human-readable message.
/// Never panics or exits; `require()` is the exit-on-failure wrapper.
pub async fn check(requirements: Requirements) -> Vec<String> {
    let mut errors = Vec::new();
    let ollama_url = std::env::var("RTT_OLLAMA_URL").unwrap_or_else(|_| DEFAULT_OLLAMA_URL.to_string());

    if requirements.needs_ffmpeg && !check_binary("ffmpeg") {
        errors.push("ffmpeg not found in PATH — install from https://ffmpeg.org/".to_string());
    }

    if requirements.needs_ytdlp && !check_binary("yt-dlp") {
        errors.push("yt-dlp not found in PATH — install with: pip install yt-dlp".to_string());
    }

    if requirements.needs_ollama {
        if !check_ollama_running(&ollama_url).await {
            errors.push(format!("Ollama not running at {ollama_url} — start with: ollama serve"));
        } else if !check_ollama_model(&ollama_url, OLLAMA_MODEL).await {
            errors.push(format!("Ollama model '{OLLAMA_MODEL}' not found — pull with: ollama pull {OLLAMA_MODEL}"));
        }
    }

    if requirements.needs_anthropic && !check_anthropic_key() {
        errors.push("ANTHROPIC_API_KEY not set — add it to .env or export it".to_string());
    }

    if requirements.needs_assemblyai && !check_assemblyai_key() {
        errors.push("ASSEMBLYAI_API_KEY not set — add it to .env or export it".to_string());
    }

    errors
}

/// Prints every missing requirement to stderr and exits with code 1 if
/// any are missing (`spec.md` §6 exit codes).
pub async fn require(requirements: Requirements) {
    let errors = check(requirements).await;
    if !errors.is_empty() {
        eprintln!("Missing requirements:");
        for e in &errors {
            eprintln!("  - {e}");
        }
        std::process::exit(1);
    }
}
