//! Embedding adapter over a local/remote Ollama `/api/embed` endpoint
//! (`spec.md` §4.2 "Embedder"), grounded on `scripts/embed_stdin.py`.

use rtt_models::EMBEDDING_DIM;
use serde::Deserialize;

use crate::error::{AdapterError, AdapterResult};

const SERVICE: &str = "ollama";
pub const MODEL: &str = "nomic-embed-text";

#[async_trait::async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> AdapterResult<Vec<f32>>;
}

pub struct OllamaEmbedder {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl OllamaEmbedder {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { client: reqwest::Client::new(), base_url: base_url.into(), model: MODEL.to_string() }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

#[derive(Deserialize)]
struct EmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

#[async_trait::async_trait]
impl Embedder for OllamaEmbedder {
    async fn embed(&self, text: &str) -> AdapterResult<Vec<f32>> {
        let url = format!("{}/api/embed", self.base_url.trim_end_matches('/'));
        let resp: EmbedResponse = self
            .client
            .post(&url)
            .json(&serde_json::json!({ "model": self.model, "input": [text] }))
            .send()
            .await?
            .error_for_status()
            .map_err(|e| AdapterError::service(SERVICE, e.to_string()))?
            .json()
            .await?;

        let embedding = resp
            .embeddings
            .into_iter()
            .next()
            .ok_or_else(|| AdapterError::data_shape(SERVICE, "no embeddings returned"))?;

        if embedding.len() != EMBEDDING_DIM {
            return Err(AdapterError::data_shape(
                SERVICE,
                format!("expected {EMBEDDING_DIM}-wide embedding, got {}", embedding.len()),
            ));
        }
        Ok(embedding)
    }
}
