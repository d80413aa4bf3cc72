//! HTTP server exposing the tree, list and catalog views

pub mod error;
pub mod handlers;
pub mod router;

use std::net::SocketAddr;
use std::sync::Arc;

use gitrat_core::SnapshotStore;
use tokio::net::TcpListener;

pub use error::ApiError;
pub use router::create_router;

/// State shared by every handler.
pub struct ServerState {
    pub store: Arc<dyn SnapshotStore>,
    /// Dataset served by the API.
    pub dataset: String,
}

impl ServerState {
    pub fn new(store: Arc<dyn SnapshotStore>, dataset: impl Into<String>) -> Self {
        ServerState {
            store,
            dataset: dataset.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

pub struct GitratServer {
    state: Arc<ServerState>,
    config: ServerConfig,
}

impl GitratServer {
    pub fn new(store: Arc<dyn SnapshotStore>, dataset: impl Into<String>, config: ServerConfig) -> Self {
        GitratServer {
            state: Arc::new(ServerState::new(store, dataset)),
            config,
        }
    }

    pub fn state(&self) -> Arc<ServerState> {
        Arc::clone(&self.state)
    }

    /// Bind the listener. Port 0 lets the OS pick one.
    pub async fn bind(&self) -> anyhow::Result<TcpListener> {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        let listener = TcpListener::bind(&addr).await?;
        Ok(listener)
    }

    /// Serve on an already bound listener until the process stops.
    pub async fn serve(self, listener: TcpListener) -> anyhow::Result<()> {
        let addr: SocketAddr = listener.local_addr()?;
        tracing::info!("Serving dataset `{}` on http://{}", self.state.dataset, addr);
        axum::serve(listener, create_router(self.state)).await?;
        Ok(())
    }

    pub async fn start(self) -> anyhow::Result<()> {
        let listener = self.bind().await?;
        self.serve(listener).await
    }
}
