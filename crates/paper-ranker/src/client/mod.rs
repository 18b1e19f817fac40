//! Provider API clients.
//!
//! - [`ArxivClient`]: paginated category/date search over the arXiv Atom API
//! - [`CitationClient`]: single best-match title lookup on the Semantic Scholar Graph API
//!
//! The pipeline depends on the [`PaperSearch`] and [`CitationLookup`] traits
//! so either provider can be replaced in tests.

mod arxiv;
mod semantic_scholar;

pub use arxiv::{ArxivClient, build_search_query};
pub use semantic_scholar::CitationClient;

use chrono::NaiveDate;
use reqwest::Client;

use crate::config::{Config, api};
use crate::error::{ClientError, ClientResult};
use crate::models::{CitationRecord, RawPaperResult};

/// Source of raw preprint results.
#[async_trait::async_trait]
pub trait PaperSearch: Send + Sync {
    /// All results for `category_query` submitted between `start` and `end`,
    /// in provider order.
    async fn search(
        &self,
        category_query: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> ClientResult<Vec<RawPaperResult>>;
}

/// Source of citation metadata.
#[async_trait::async_trait]
pub trait CitationLookup: Send + Sync {
    /// Best match for `title` (and `author`, if given), or `None`.
    async fn lookup(&self, title: &str, author: Option<&str>)
    -> ClientResult<Option<CitationRecord>>;
}

/// Build a reqwest client with the configured timeouts and pool limits.
fn build_http_client(config: &Config, api_key: Option<&str>) -> anyhow::Result<Client> {
    let mut headers = reqwest::header::HeaderMap::new();
    if let Some(key) = api_key {
        headers.insert("x-api-key", key.parse()?);
    }

    let client = Client::builder()
        .default_headers(headers)
        .user_agent(concat!("paper-ranker/", env!("CARGO_PKG_VERSION")))
        .timeout(config.request_timeout)
        .connect_timeout(config.connect_timeout)
        .pool_max_idle_per_host(api::MAX_KEEPALIVE)
        .pool_idle_timeout(api::KEEPALIVE_EXPIRY)
        .gzip(true)
        .build()?;

    Ok(client)
}

/// Build a request URL with encoded query parameters.
fn request_url(base: &str, params: &[(&str, String)]) -> ClientResult<url::Url> {
    url::Url::parse_with_params(base, params)
        .map_err(|e| ClientError::bad_request(format!("invalid URL '{base}': {e}")))
}

/// Handle API response status codes.
async fn handle_response(response: reqwest::Response) -> ClientResult<reqwest::Response> {
    let status = response.status();

    if status.is_success() {
        return Ok(response);
    }

    match status.as_u16() {
        429 => {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok())
                .unwrap_or(60);

            Err(ClientError::rate_limited(retry_after))
        }
        404 => {
            let text = response.text().await.unwrap_or_default();
            Err(ClientError::not_found(text))
        }
        400 => {
            let text = response.text().await.unwrap_or_default();
            Err(ClientError::bad_request(text))
        }
        500..=599 => {
            let text = response.text().await.unwrap_or_default();
            Err(ClientError::server(status.as_u16(), text))
        }
        _ => {
            let text = response.text().await.unwrap_or_default();
            Err(ClientError::UnexpectedStatus { status: status.as_u16(), message: text })
        }
    }
}
