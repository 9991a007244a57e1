//! In-memory cosine-similarity vector index over archive segments (C6).

pub mod error;
pub mod index;
pub mod row;

pub use error::{IndexError, IndexResult};
pub use index::VectorIndex;
pub use row::{ScoredRow, SegmentRow};
