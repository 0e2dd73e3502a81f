//! Server setup and lifecycle for the R&D gateway.

use config::GatewayConfig;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;

use crate::error::{GatewayError, Result};
use crate::routes::create_router;
use crate::state::AppState;
use crate::telemetry;

pub struct GatewayServer {
    state: Arc<AppState>,
    addr: String
}

impl GatewayServer {
    /// Builds the shared state and, when enabled, installs the Prometheus
    /// recorder.
    pub fn new(config: &GatewayConfig) -> Result<Self> {
        let mut state = AppState::from_config(config)?;
        if config.observability.metrics_enabled {
            state = state.with_metrics(telemetry::install_metrics_recorder()?);
        }

        Ok(Self::with_state(
            Arc::new(state),
            config.server.bind_address()
        ))
    }

    pub fn with_state(state: Arc<AppState>, addr: impl Into<String>) -> Self {
        Self {
            state,
            addr: addr.into()
        }
    }

    /// Runs the HTTP server until Ctrl+C or SIGTERM.
    pub async fn run(self) -> Result<()> {
        let addr: SocketAddr = self.addr.parse().map_err(|e| GatewayError::Server {
            reason: format!("Invalid address {}: {e}", self.addr)
        })?;

        let router = create_router(self.state.clone());

        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| GatewayError::Server {
                reason: format!("Failed to bind to {addr}: {e}")
            })?;

        tracing::info!(%addr, "R&D gateway starting");

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| GatewayError::Server {
                reason: format!("Server error: {e}")
            })?;

        tracing::info!("R&D gateway stopped");
        Ok(())
    }

    #[must_use]
    pub fn state(&self) -> &Arc<AppState> {
        &self.state
    }
}

/// Signal handler for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        },
        () = terminate => {
            tracing::info!("Received terminate signal, initiating graceful shutdown");
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_invalid_bind_address() {
        let state = AppState::from_config(&GatewayConfig::default()).unwrap();
        let server = GatewayServer::with_state(Arc::new(state), "not an address");

        let err = server.run().await.unwrap_err();
        assert!(matches!(err, GatewayError::Server { .. }));
    }
}
