//! HTTP server bootstrap

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::{Config, ServerState};
use crate::api;

/// Ledger HTTP server
pub struct Server {
    config: Config,
    state: ServerState,
}

impl Server {
    pub fn with_state(config: Config, state: ServerState) -> Self {
        Self { config, state }
    }

    /// Bind and serve until the process is stopped.
    pub async fn run(self) -> anyhow::Result<()> {
        let router = api::router()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive())
            .with_state(self.state);

        let addr = format!("0.0.0.0:{}", self.config.http_port);
        let listener = tokio::net::TcpListener::bind(&addr).await?;
        tracing::info!("Ledger server listening on {addr}");

        axum::serve(listener, router).await?;
        Ok(())
    }
}
