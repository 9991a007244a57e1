//! Search-service error types, mapped to HTTP statuses per `spec.md` §7:
//! `InputInvalid` → 400, `NotFound` → 404, anything else → 500.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

pub type SearchResult<T> = Result<T, SearchError>;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("invalid input: {0}")]
    InputInvalid(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("internal error: {0}")]
    Internal(String),

    #[error("adapter error: {0}")]
    Adapter(#[from] rtt_adapters::AdapterError),

    #[error("archive error: {0}")]
    Archive(#[from] rtt_archive::ArchiveError),
}

impl SearchError {
    pub fn input_invalid(msg: impl Into<String>) -> Self {
        Self::InputInvalid(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    fn status_code(&self) -> StatusCode {
        match self {
            SearchError::InputInvalid(_) => StatusCode::BAD_REQUEST,
            SearchError::NotFound(_) => StatusCode::NOT_FOUND,
            SearchError::Internal(_) | SearchError::Adapter(_) | SearchError::Archive(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    detail: String,
}

impl IntoResponse for SearchError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let detail = match &self {
            SearchError::Internal(_) | SearchError::Adapter(_) | SearchError::Archive(_) => {
                "An internal error occurred".to_string()
            }
            _ => self.to_string(),
        };
        (status, Json(ErrorResponse { detail })).into_response()
    }
}
