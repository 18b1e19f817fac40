//! Paper Ranker
//!
//! A small HTTP backend that lists arXiv papers for a category and date range,
//! ranked by Semantic Scholar citation counts or by publication date.
//!
//! # Features
//!
//! - **One endpoint**: `GET /papers?category&start_date_str&end_date_str&sort_by&limit`
//! - **Durable cache**: title -> citation lookups persist across restarts
//! - **Polite**: fixed pause after every uncached citation lookup
//!
//! # Example
//!
//! ```no_run
//! use paper_ranker::{config::Config, server::PaperServer};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let server = PaperServer::from_config(&config).await?;
//!
//!     server.run_http(([127, 0, 0, 1], 8000).into()).await
//! }
//! ```

pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod formatters;
pub mod models;
pub mod pipeline;
pub mod server;

pub use cache::{CacheEntry, CacheStore};
pub use client::{ArxivClient, CitationClient, CitationLookup, PaperSearch};
pub use config::Config;
pub use error::{ApiError, CacheError, ClientError};
pub use pipeline::{PaperService, Ranker};
