use thiserror::Error;

pub type IndexResult<T> = Result<T, IndexError>;

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("table has {rows} rows but {embeddings} embedding vectors")]
    RowEmbeddingMismatch { rows: usize, embeddings: usize },

    #[error("embedding at row {row} has width {width}, expected {expected}")]
    WrongEmbeddingWidth { row: usize, width: usize, expected: usize },
}
