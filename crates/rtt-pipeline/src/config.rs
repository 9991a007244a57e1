//! Pipeline configuration.

/// Orchestrator configuration: per-stage worker pool sizes plus the
/// knobs `spec.md` §4.4.1/§4.4.4 calls out by name.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Concurrent transcribe-stage jobs (subtitle fetch + ASR).
    pub pool_transcribe: usize,
    /// Concurrent enrich-stage jobs (LLM calls).
    pub pool_enrich: usize,
    /// Concurrent embed-stage jobs.
    pub pool_embed: usize,
    /// Concurrent frames+package-stage jobs.
    pub pool_frames: usize,
    /// How often the status printer reports queue depths.
    pub status_interval_secs: u64,
    /// Skip the enrich stage entirely, copying raw transcript text
    /// through unchanged (`spec.md` §4.4.4 "Enrich, if disabled").
    pub skip_enrich: bool,
    /// Root directory for checkpoints, archives, and scratch files.
    pub cache_dir: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            pool_transcribe: 20,
            pool_enrich: 10,
            pool_embed: 3,
            pool_frames: 3,
            status_interval_secs: 10,
            skip_enrich: false,
            cache_dir: "./cache".to_string(),
        }
    }
}

impl PipelineConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            pool_transcribe: std::env::var("RTT_POOL_TRANSCRIBE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(20),
            pool_enrich: std::env::var("RTT_POOL_ENRICH")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10),
            pool_embed: std::env::var("RTT_POOL_EMBED")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(3),
            pool_frames: std::env::var("RTT_POOL_FRAMES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(3),
            status_interval_secs: std::env::var("RTT_STATUS_INTERVAL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10),
            skip_enrich: std::env::var("RTT_SKIP_ENRICH")
                .ok()
                .map(|s| s == "1" || s.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
            cache_dir: std::env::var("RTT_CACHE_DIR").unwrap_or_else(|_| "./cache".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_spec_pool_sizes() {
        let config = PipelineConfig::default();
        assert_eq!(config.pool_transcribe, 20);
        assert_eq!(config.pool_enrich, 10);
        assert_eq!(config.pool_embed, 3);
        assert_eq!(config.pool_frames, 3);
    }
}
