//! LLM-based transcript enrichment (`spec.md` §4.2 "Enricher"), grounded
//! on `scripts/enrich_stdin.py`'s Claude prompt.

use serde::Deserialize;

use crate::error::{AdapterError, AdapterResult};

const SERVICE: &str = "anthropic";
const MODEL: &str = "claude-sonnet-4-5-20250929";
const MAX_TOKENS: u32 = 512;

const PROMPT_TEMPLATE: &str = "You are an indexing assistant. Produce a short enriched version of the following transcript segment that adds related concepts, synonyms, and themes to make it more findable via semantic search. Preserve the original meaning. Output ONLY the enriched version, nothing else.\n\nContext: {context}\n\nSegment: {segment}";

#[async_trait::async_trait]
pub trait Enricher: Send + Sync {
    async fn enrich(&self, segment_text: &str, context: &str) -> AdapterResult<String>;
}

pub struct ClaudeEnricher {
    client: reqwest::Client,
    api_key: String,
}

impl ClaudeEnricher {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self { client: reqwest::Client::new(), api_key: api_key.into() }
    }
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    text: String,
}

#[async_trait::async_trait]
impl Enricher for ClaudeEnricher {
    async fn enrich(&self, segment_text: &str, context: &str) -> AdapterResult<String> {
        let prompt = PROMPT_TEMPLATE.replace("{context}", context).replace("{segment}", segment_text);

        let resp = self
            .client
            .post("https://api.anthropic.com/v1/messages")
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .json(&serde_json::json!({
                "model": MODEL,
                "max_tokens": MAX_TOKENS,
                "messages": [{"role": "user", "content": prompt}],
            }))
            .send()
            .await?
            .error_for_status()
            .map_err(|e| AdapterError::service(SERVICE, e.to_string()))?
            .json::<MessagesResponse>()
            .await?;

        resp.content
            .into_iter()
            .next()
            .map(|block| block.text.trim().to_string())
            .ok_or_else(|| AdapterError::data_shape(SERVICE, "empty content in response"))
    }
}
