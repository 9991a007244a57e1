//! Staged concurrent ingestion pipeline orchestrator (C5): Transcribe →
//! Enrich → Embed → Frames+Package, wired over bounded worker pools with
//! checkpoint-driven resume (`spec.md` §4.4).

pub mod config;
pub mod context;
pub mod error;
pub mod failures;
pub mod job;
pub mod logging;
pub mod orchestrator;
pub mod retry;
pub mod stages;
#[cfg(test)]
pub(crate) mod test_support;

pub use config::PipelineConfig;
pub use context::{Adapters, PipelineContext};
pub use error::{PipelineError, PipelineResult};
pub use failures::FailuresLog;
pub use job::PipelineJob;
pub use logging::VideoLogger;
pub use orchestrator::Orchestrator;
