//! Server setup and lifecycle.

use anyhow::{Context, Result};
use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::routes::build_router;
use crate::state::ApiState;

pub struct ApiServer {
    config: ServerConfig,
    state: ApiState,
}

impl ApiServer {
    /// Seed the registry and prepare shared state.
    pub fn new(config: ServerConfig) -> Result<Self> {
        let registry = config.load_registry().context("Failed to seed template registry")?;
        let state = ApiState::new(registry, config.provisioner());
        Ok(Self { config, state })
    }

    pub fn state(&self) -> &ApiState {
        &self.state
    }

    /// Serve until Ctrl+C or SIGTERM.
    pub async fn run(self) -> Result<()> {
        let addr = self.config.listen_addr;
        let app = build_router(self.state);

        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind {addr}"))?;

        tracing::info!("Provisioner API listening on {}", addr);
        if self.config.lock_identifiers {
            tracing::info!("Identifier overrides are locked");
        }

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("API server failed")?;

        tracing::info!("Provisioner API shutting down");
        Ok(())
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received terminate signal, initiating graceful shutdown");
        }
    }
}
