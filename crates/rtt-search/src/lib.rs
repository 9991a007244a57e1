//! Archive-backed semantic search HTTP service (C7, `spec.md` §4.6).
//!
//! Loads every `.rtt` archive under the given roots into an in-memory
//! `VectorIndex` at boot, then serves search, listing, collection-rollup,
//! and video/frame delivery over HTTP.

pub mod config;
pub mod error;
pub mod handlers;
pub mod loader;
pub mod middleware;
pub mod result;
pub mod routes;
pub mod state;
pub mod util;

pub use config::SearchConfig;
pub use error::{SearchError, SearchResult};
pub use loader::{load_sync, LoadedArchives};
pub use routes::create_router;
pub use state::{SearchState, VideoInfo};
