//! The `.rtt` archive codec (C2): a zip container holding `manifest.json`,
//! `segments.parquet`, and `frames/*.jpg` (`spec.md` §4.1).

pub mod error;
pub mod manifest;
pub mod read;
pub mod schema;
pub mod write;

pub use error::{ArchiveError, ArchiveResult};
pub use manifest::{Manifest, ManifestSegment};
pub use read::ArchiveReader;
pub use write::write_archive;
