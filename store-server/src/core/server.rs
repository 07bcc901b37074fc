//! Server Implementation
//!
//! HTTP server startup and shutdown

use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::api;
use crate::core::{Config, ServerState};
use crate::utils::{AppError, AppResult};

/// HTTP Server
pub struct Server {
    config: Config,
    state: ServerState,
}

impl Server {
    pub fn new(config: Config, state: ServerState) -> Self {
        Self { config, state }
    }

    pub async fn run(&self) -> AppResult<()> {
        // Production sits behind the gateway and serves no browsers
        // directly; permissive CORS is for local tooling only.
        let cors = if self.config.is_production() {
            CorsLayer::new()
        } else {
            CorsLayer::permissive()
        };

        let app = api::router(self.state.clone())
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::new(Duration::from_millis(
                self.config.request_timeout_ms,
            )))
            .layer(cors)
            .layer(CompressionLayer::new());

        let addr = std::net::SocketAddr::from(([0, 0, 0, 0], self.config.http_port));
        tracing::info!("Store server listening on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

        let draining = Arc::new(Notify::new());
        let notify = draining.clone();
        let server = axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = tokio::signal::ctrl_c().await;
                tracing::info!("Shutdown signal received, draining connections...");
                notify.notify_one();
            })
            .into_future();

        // Bound the drain: in-flight requests get shutdown_timeout_ms,
        // then the process exits regardless.
        let shutdown_timeout = Duration::from_millis(self.config.shutdown_timeout_ms);
        tokio::select! {
            result = server => {
                result.map_err(|e| AppError::internal(format!("Server error: {e}")))?;
            }
            _ = async {
                draining.notified().await;
                tokio::time::sleep(shutdown_timeout).await;
            } => {
                tracing::warn!("Drain exceeded {}ms, aborting", shutdown_timeout.as_millis());
            }
        }

        Ok(())
    }
}
