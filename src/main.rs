use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use tokio::signal;
use tracing::info;
use tracing_subscriber::EnvFilter;

use fluxo::config::FluxoConfig;
use fluxo::http::{AppState, HttpServer};
use fluxo::ratelimit::RateLimiter;
use fluxo::store::{InMemoryMovementStore, MovementStore};

/// Cash-flow projection service with per-caller request throttling.
#[derive(Parser, Debug)]
#[command(name = "fluxo", version, about)]
struct Args {
    /// Path to a YAML configuration file
    #[arg(long)]
    config: Option<String>,

    /// Override the configured listen address
    #[arg(long)]
    listen: Option<SocketAddr>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = Args::parse();

    info!("Starting Fluxo Projection Service");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let mut config = match &args.config {
        Some(path) => FluxoConfig::from_file(path)?,
        None => FluxoConfig::default(),
    };
    if let Some(listen) = args.listen {
        config.server.http_addr = listen;
    }
    info!(http_addr = %config.server.http_addr, "Configuration loaded");

    // Build the movement store collaborator
    let store: Arc<dyn MovementStore> = match &config.store.seed_path {
        Some(path) => Arc::new(InMemoryMovementStore::from_seed_file(path)?),
        None => Arc::new(InMemoryMovementStore::new()),
    };

    // Initialize the rate limiter
    let limiter = Arc::new(RateLimiter::with_sweep_threshold(
        config.rate_limiting.sweep_threshold,
    ));
    info!("Rate limiter initialized");

    // Create and start the HTTP server
    let addr = config.server.http_addr;
    let state = AppState {
        limiter,
        store,
        config: Arc::new(config),
    };
    let server = HttpServer::new(addr, state);

    // Run the server with graceful shutdown on Ctrl+C
    server.serve_with_shutdown(shutdown_signal()).await?;

    info!("Fluxo Projection Service stopped");
    Ok(())
}

/// Wait for a shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
