//! `rtt-serve`: boots the search service over one or more archive roots
//! given as positional arguments (`SPEC_FULL.md` §4.8).

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use rtt_adapters::{Embedder, OllamaEmbedder};
use rtt_cli::readiness::{self, Requirements};
use rtt_search::{create_router, loader, SearchConfig, SearchState};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("failed to install rustls crypto provider");

    let use_json = std::env::var("LOG_FORMAT").map(|v| v.to_lowercase() == "json").unwrap_or(false);
    let env_filter = EnvFilter::from_default_env().add_directive("rtt_search=info".parse().unwrap());

    if use_json {
        tracing_subscriber::registry().with(fmt::layer().json()).with(env_filter).init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer().with_ansi(true).with_target(true).with_thread_ids(false).with_file(false).with_line_number(false))
            .with(env_filter)
            .init();
    }

    let archive_roots: Vec<PathBuf> = std::env::args().skip(1).map(PathBuf::from).collect();
    if archive_roots.is_empty() {
        eprintln!("usage: rtt-serve <archive-root>...");
        std::process::exit(1);
    }

    readiness::require(Requirements { needs_ollama: true, ..Default::default() }).await;

    let config = SearchConfig::from_env(archive_roots.clone());
    info!(bind = %config.bind, roots = ?archive_roots, "starting rtt-serve");

    let loaded = tokio::task::spawn_blocking(move || loader::load_sync(&archive_roots))
        .await
        .unwrap_or_else(|e| {
            error!(error = %e, "archive load task panicked");
            std::process::exit(1);
        });

    if loaded.index.is_empty() {
        error!("no segments loaded from any archive root — refusing to start");
        std::process::exit(1);
    }

    let embedder: Arc<dyn Embedder> = Arc::new(OllamaEmbedder::new(config.ollama_url.clone()));

    let state = SearchState {
        index: Arc::new(loaded.index),
        videos: Arc::new(loaded.videos),
        rtt_paths_by_video: Arc::new(loaded.rtt_paths_by_video),
        embedder,
        http_client: reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .expect("failed to build HTTP client"),
        resolved_urls: Arc::new(RwLock::new(std::collections::HashMap::new())),
        config: config.clone(),
    };

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind.as_str()).await.unwrap_or_else(|e| {
        error!(bind = %config.bind, error = %e, "failed to bind");
        std::process::exit(1);
    });

    info!(bind = %config.bind, "listening");
    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await.expect("server error");
    info!("server shutdown complete");
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c().await.expect("failed to install ctrl_c handler");
    info!("received shutdown signal");
}
