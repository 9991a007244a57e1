//! Error types for external-service adapters.

use thiserror::Error;

pub type AdapterResult<T> = Result<T, AdapterError>;

/// Errors raised by ASR, enrichment, embedding, frame, and platform-download
/// adapters. Maps onto `spec.md` §7's `ExternalServiceError`/`DataShapeError`
/// kinds once inside the pipeline orchestrator.
#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("{service} request failed: {message}")]
    ServiceError { service: &'static str, message: String },

    #[error("{service} returned malformed data: {message}")]
    DataShape { service: &'static str, message: String },

    #[error("unsupported platform URL: {0}")]
    UnsupportedUrl(String),

    #[error("media error: {0}")]
    Media(#[from] rtt_media::MediaError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AdapterError {
    pub fn service(service: &'static str, message: impl Into<String>) -> Self {
        Self::ServiceError { service, message: message.into() }
    }

    pub fn data_shape(service: &'static str, message: impl Into<String>) -> Self {
        Self::DataShape { service, message: message.into() }
    }
}
