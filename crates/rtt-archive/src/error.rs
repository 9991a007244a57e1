use std::path::PathBuf;
use thiserror::Error;

pub type ArchiveResult<T> = Result<T, ArchiveError>;

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("manifest is not valid JSON: {0}")]
    Manifest(#[from] serde_json::Error),

    #[error("archive is missing required entry {0}")]
    MissingEntry(&'static str),

    #[error("archive data shape error: {0}")]
    DataShape(String),
}

impl ArchiveError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }

    pub fn data_shape(message: impl Into<String>) -> Self {
        Self::DataShape(message.into())
    }
}
