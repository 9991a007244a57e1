//! Input to the pipeline orchestrator: one video to ingest.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoJob {
    pub video_id: String,
    pub title: String,
    pub source_url: String,
    #[serde(default)]
    pub page_url: String,
    #[serde(default)]
    pub context: String,
    #[serde(default)]
    pub collection: String,
}

impl VideoJob {
    pub fn new(video_id: impl Into<String>, title: impl Into<String>, source_url: impl Into<String>) -> Self {
        Self {
            video_id: video_id.into(),
            title: title.into(),
            source_url: source_url.into(),
            page_url: String::new(),
            context: String::new(),
            collection: String::new(),
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = context.into();
        self
    }

    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }

    pub fn with_page_url(mut self, page_url: impl Into<String>) -> Self {
        self.page_url = page_url.into();
        self
    }

    /// Context used by the enricher: `context`, falling back to `title`
    /// (`spec.md` §4.4.4 "Enrich").
    pub fn enrichment_context(&self) -> &str {
        if self.context.trim().is_empty() {
            &self.title
        } else {
            &self.context
        }
    }
}
