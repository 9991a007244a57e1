//! Pipeline error types (`spec.md` §7's error kinds).

use thiserror::Error;

pub type PipelineResult<T> = Result<T, PipelineError>;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("prerequisite missing: {0}")]
    PrerequisiteMissing(String),

    #[error("invalid input: {0}")]
    InputInvalid(String),

    #[error("external service error: {0}")]
    ExternalServiceError(String),

    #[error("data shape error: {0}")]
    DataShapeError(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("cancelled")]
    Cancelled,

    #[error("adapter error: {0}")]
    Adapter(#[from] rtt_adapters::AdapterError),

    #[error("archive error: {0}")]
    Archive(#[from] rtt_archive::ArchiveError),

    #[error("checkpoint error: {0}")]
    Checkpoint(#[from] rtt_checkpoint::CheckpointError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl PipelineError {
    pub fn prerequisite_missing(msg: impl Into<String>) -> Self {
        Self::PrerequisiteMissing(msg.into())
    }

    pub fn input_invalid(msg: impl Into<String>) -> Self {
        Self::InputInvalid(msg.into())
    }

    pub fn data_shape(msg: impl Into<String>) -> Self {
        Self::DataShapeError(msg.into())
    }

    /// Whether re-running the batch (which resumes from checkpoints)
    /// stands a chance of succeeding where this one-off call didn't.
    /// `spec.md` §7: nothing auto-retries inside a single run, but the
    /// classification still matters for the status line a failed job
    /// logs to `failures.jsonl`.
    pub fn is_retryable(&self) -> bool {
        match self {
            PipelineError::ExternalServiceError(_) => true,
            PipelineError::Adapter(rtt_adapters::AdapterError::ServiceError { .. }) => true,
            PipelineError::Adapter(rtt_adapters::AdapterError::Http(_)) => true,
            _ => false,
        }
    }

    /// Errors that will never succeed on resume no matter how many times
    /// the batch is re-run (malformed input, unsupported URL).
    pub fn is_permanent(&self) -> bool {
        matches!(
            self,
            PipelineError::InputInvalid(_)
                | PipelineError::DataShapeError(_)
                | PipelineError::Adapter(rtt_adapters::AdapterError::UnsupportedUrl(_))
        )
    }
}
