//! Server Implementation
//!
//! HTTP server startup and shutdown

use tokio::net::TcpListener;

use crate::api;
use crate::core::{Config, Result, ServerState};

/// HTTP Server
pub struct Server {
    state: ServerState,
}

impl Server {
    pub fn new(config: Config) -> Result<Self> {
        Ok(Self {
            state: ServerState::new(config)?,
        })
    }

    pub async fn run(&self) -> Result<()> {
        let config = &self.state.config;
        let listener = TcpListener::bind(config.bind_addr()).await?;

        tracing::info!(
            addr = %listener.local_addr()?,
            path = %config.webhook_path,
            printer = %self.state.printer,
            "🧾 Webhook server listening"
        );

        let app = api::router(self.state.clone());

        let shutdown = async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down...");
        };

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;

        Ok(())
    }
}
