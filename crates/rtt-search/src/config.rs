//! Search-service configuration.

use std::path::PathBuf;
use std::time::Duration;

/// Search server configuration, built from environment variables and the
/// archive-root paths passed on the command line (`rtt-serve <path>...`).
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Bind address, e.g. "0.0.0.0:8000".
    pub bind: String,
    /// CORS origins.
    pub cors_origins: Vec<String>,
    /// Request timeout.
    pub request_timeout: Duration,
    /// Max request body size.
    pub max_body_size: usize,
    /// Environment (development/production).
    pub environment: String,
    /// Ollama base URL used for query embedding.
    pub ollama_url: String,
    /// One or more archive roots (directories scanned recursively for
    /// `.rtt` files, or direct `.rtt` file paths) given on the command line.
    pub archive_roots: Vec<PathBuf>,
}

const DEFAULT_BIND: &str = "0.0.0.0:8000";

impl SearchConfig {
    /// Builds config from environment variables plus the archive-root args
    /// collected from the command line.
    pub fn from_env(archive_roots: Vec<PathBuf>) -> Self {
        Self {
            bind: std::env::var("RTT_SEARCH_BIND").unwrap_or_else(|_| DEFAULT_BIND.to_string()),
            cors_origins: std::env::var("CORS_ORIGINS")
                .map(|s| s.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or_else(|_| vec!["*".to_string()]),
            request_timeout: Duration::from_secs(
                std::env::var("REQUEST_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(30),
            ),
            max_body_size: std::env::var("MAX_BODY_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10 * 1024 * 1024),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            ollama_url: std::env::var("RTT_OLLAMA_URL")
                .unwrap_or_else(|_| rtt_cli::readiness::DEFAULT_OLLAMA_URL.to_string()),
            archive_roots,
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment.to_lowercase() == "production"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_bind_when_unset() {
        std::env::remove_var("RTT_SEARCH_BIND");
        let cfg = SearchConfig::from_env(vec![]);
        assert_eq!(cfg.bind, DEFAULT_BIND);
    }

    #[test]
    fn cors_origins_split_on_comma() {
        std::env::set_var("CORS_ORIGINS", "https://a.example, https://b.example");
        let cfg = SearchConfig::from_env(vec![]);
        assert_eq!(cfg.cors_origins, vec!["https://a.example", "https://b.example"]);
        std::env::remove_var("CORS_ORIGINS");
    }
}
