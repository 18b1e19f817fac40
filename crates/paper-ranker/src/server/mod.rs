//! HTTP server.
//!
//! Owns the cache handle for the process lifetime: requests share it through
//! the pipeline, and it is flushed once more after graceful shutdown.

pub mod routes;

use std::net::SocketAddr;
use std::sync::Arc;

use crate::cache::CacheStore;
use crate::client::{ArxivClient, CitationClient};
use crate::config::Config;
use crate::pipeline::{PaperService, Ranker};

/// Paper ranking HTTP server.
pub struct PaperServer {
    service: PaperService,
    cache: Arc<CacheStore>,
}

impl PaperServer {
    /// Wire clients, cache and pipeline from configuration.
    ///
    /// # Errors
    ///
    /// Returns error if an HTTP client cannot be built.
    pub async fn from_config(config: &Config) -> anyhow::Result<Self> {
        let cache = Arc::new(CacheStore::open(config.cache_path.clone()).await);
        let citations = Arc::new(CitationClient::new(config)?);
        let search = Arc::new(ArxivClient::new(config)?);

        let ranker = Ranker::from_config(config, Arc::clone(&cache), citations);
        Ok(Self::new(PaperService::new(search, ranker)))
    }

    #[must_use]
    pub fn new(service: PaperService) -> Self {
        let cache = Arc::clone(service.ranker().cache());
        Self { service, cache }
    }

    /// Serve until Ctrl+C, then flush the cache.
    ///
    /// # Errors
    ///
    /// Returns error on bind or server failure.
    pub async fn run_http(self, addr: SocketAddr) -> anyhow::Result<()> {
        let router = routes::create_router(self.service);

        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("HTTP server listening on http://{}", addr);

        let served = axum::serve(listener, router).with_graceful_shutdown(shutdown_signal()).await;
        tracing::info!("HTTP server shut down");

        if let Err(e) = self.cache.flush().await {
            tracing::error!(error = %e, "Final cache flush failed");
        }

        served?;
        Ok(())
    }
}

impl std::fmt::Debug for PaperServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaperServer").field("cache", &self.cache).finish()
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install CTRL+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Received shutdown signal");
}
