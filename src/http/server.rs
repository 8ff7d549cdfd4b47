//! HTTP server implementation.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::config::FluxoConfig;
use crate::error::{FluxoError, Result};
use crate::ratelimit::RateLimiter;
use crate::store::MovementStore;

use super::{handlers, throttle};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    /// The process-wide rate limiter
    pub limiter: Arc<RateLimiter>,
    /// The movement store collaborator
    pub store: Arc<dyn MovementStore>,
    /// Service configuration
    pub config: Arc<FluxoConfig>,
}

/// HTTP server for the projection service.
pub struct HttpServer {
    /// Address to bind to
    addr: SocketAddr,
    /// Shared handler state
    state: AppState,
}

impl HttpServer {
    /// Create a new HTTP server.
    pub fn new(addr: SocketAddr, state: AppState) -> Self {
        Self { addr, state }
    }

    /// Build the router. Throttling covers the projection route only;
    /// the liveness probe stays un-throttled.
    fn router(state: AppState) -> Router {
        Router::new()
            .route("/projections/cashflow", post(handlers::project_cashflow))
            .route_layer(middleware::from_fn_with_state(
                state.clone(),
                throttle::throttle,
            ))
            .route("/healthz", get(handlers::healthz))
            .with_state(state)
    }

    /// Start the HTTP server.
    ///
    /// This method will block until the server is shut down.
    pub async fn serve(self) -> Result<()> {
        self.serve_with_shutdown(std::future::pending()).await
    }

    /// Start the HTTP server with graceful shutdown.
    ///
    /// The server will shut down when the provided signal resolves.
    pub async fn serve_with_shutdown<F>(self, signal: F) -> Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let listener = TcpListener::bind(self.addr).await?;

        info!(
            addr = %self.addr,
            "Starting HTTP server"
        );

        let router = Self::router(self.state);
        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(signal)
        .await
        .map_err(|e| {
            error!(error = %e, "HTTP server failed");
            FluxoError::Io(e)
        })
    }
}
