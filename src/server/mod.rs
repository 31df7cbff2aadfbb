//! HTTP API for media discovery and source vetting.
//!
//! A thin JSON layer over the discovery service and the source repository:
//! run a search (optionally storing the results), list known and new
//! sources, verify, promote and sync.

mod handlers;
mod routes;

pub use routes::create_router;

use std::net::SocketAddr;
use std::sync::Arc;

use crate::config::Config;
use crate::repository::{DieselSourceRepository, SqlitePool};
use crate::services::DiscoveryService;

/// Shared state for the web server.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<DieselSourceRepository>,
    pub discovery: Arc<DiscoveryService>,
}

impl AppState {
    pub async fn new(config: &Config) -> anyhow::Result<Self> {
        let repo = Arc::new(DieselSourceRepository::new(SqlitePool::new(
            &config.database_url(),
        )));
        let discovery = DiscoveryService::from_config(config, repo.clone()).await?;

        Ok(Self {
            repo,
            discovery: Arc::new(discovery),
        })
    }
}

/// Start the web server. Returns after Ctrl+C, once the browser session is closed.
pub async fn serve(config: &Config, host: &str, port: u16) -> anyhow::Result<()> {
    let state = AppState::new(config).await?;
    let discovery = state.discovery.clone();
    let status = discovery.status().await;
    tracing::info!(
        "Analyzer {}, browser {}",
        if status.analyzer { "enabled" } else { "off (heuristic classification)" },
        if status.browser { "running" } else { "unavailable" }
    );
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    tracing::info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let result = axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await;

    discovery.shutdown().await;
    result?;
    Ok(())
}
