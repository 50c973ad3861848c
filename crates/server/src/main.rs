use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use torrentlens_core::{
    load_config, validate_config, RedApiSearcher, SearchOrchestrator, Searcher, TitleResolver,
    TmdbResolver,
};
use torrentlens_server::api::create_router;
use torrentlens_server::metrics;
use torrentlens_server::state::AppState;

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("torrentlens {}", VERSION);

    // Determine config path
    let config_path = std::env::var("TORRENTLENS_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration
    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    info!("Configuration loaded successfully");
    info!(
        indexer = %config.indexer.url,
        timeout_secs = config.indexer.timeout_secs,
        "Indexer configured"
    );

    let searcher: Arc<dyn Searcher> = Arc::new(
        RedApiSearcher::new(config.indexer.clone()).context("Failed to create indexer client")?,
    );

    let mut orchestrator = SearchOrchestrator::new(searcher, config.search.clone());

    match &config.tmdb {
        Some(tmdb_config) => {
            info!("Initializing TMDB title resolver");
            let resolver: Arc<dyn TitleResolver> = Arc::new(
                TmdbResolver::new(tmdb_config.clone())
                    .context("Failed to create TMDB resolver")?,
            );
            orchestrator = orchestrator.with_resolver(resolver);
        }
        None => {
            warn!("TMDB not configured, id searches will query the raw identifier");
        }
    }

    metrics::init();

    let state = Arc::new(AppState::new(config.clone(), Arc::new(orchestrator)));

    // Create router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(config.server.host, config.server.port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
