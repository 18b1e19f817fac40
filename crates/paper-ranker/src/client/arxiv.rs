//! arXiv search client.

use std::time::Duration;

use async_stream::try_stream;
use chrono::{Days, NaiveDate};
use futures::{Stream, TryStreamExt};
use reqwest::Client;

use super::{PaperSearch, build_http_client, handle_response, request_url};
use crate::config::Config;
use crate::error::ClientResult;
use crate::models::{RawPaperResult, parse_feed};

/// Provider query combining a category filter with a submitted-date range.
///
/// arXiv excludes the lower bound of `submittedDate` ranges, so the start is
/// moved back one day.
#[must_use]
pub fn build_search_query(category_query: &str, start: NaiveDate, end: NaiveDate) -> String {
    let widened = start.checked_sub_days(Days::new(1)).unwrap_or(start);
    format!(
        "{} AND submittedDate:[{} TO {}]",
        category_query,
        widened.format("%Y%m%d"),
        end.format("%Y%m%d")
    )
}

/// arXiv Atom API client.
#[derive(Clone)]
pub struct ArxivClient {
    client: Client,

    /// Query endpoint.
    api_url: String,

    /// Upper bound on results per search.
    max_results: usize,

    /// Results requested per page.
    page_size: usize,

    /// Pause between page requests.
    page_delay: Duration,
}

impl ArxivClient {
    /// Create a new client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        Ok(Self {
            client: build_http_client(config, None)?,
            api_url: config.arxiv_api_url.clone(),
            max_results: config.max_results,
            page_size: config.page_size.max(1),
            page_delay: config.page_delay,
        })
    }

    /// Fetch one page of results.
    ///
    /// # Errors
    ///
    /// Returns error on transport failure, non-success status or an undecodable feed.
    pub async fn fetch_page(
        &self,
        search_query: &str,
        start: usize,
        max_results: usize,
    ) -> ClientResult<Vec<RawPaperResult>> {
        let url = request_url(
            &self.api_url,
            &[
                ("search_query", search_query.to_string()),
                ("id_list", String::new()),
                ("sortBy", "submittedDate".to_string()),
                ("sortOrder", "descending".to_string()),
                ("start", start.to_string()),
                ("max_results", max_results.to_string()),
            ],
        )?;

        tracing::debug!(%url, "Requesting arXiv page");
        let response = self.client.get(url).send().await?;
        let response = handle_response(response).await?;
        let body = response.text().await?;

        let feed = parse_feed(&body)?;
        tracing::debug!(start, total = ?feed.total_results, entries = feed.entries.len(), "Decoded arXiv page");
        feed.entries.into_iter().map(RawPaperResult::try_from).collect()
    }

    /// Results for `search_query`, page by page, up to the configured maximum.
    ///
    /// The stream ends after a short or empty page. It is single-use.
    pub fn results<'a>(
        &'a self,
        search_query: &'a str,
    ) -> impl Stream<Item = ClientResult<RawPaperResult>> + Send + 'a {
        try_stream! {
            let mut offset = 0;
            while offset < self.max_results {
                if offset > 0 && !self.page_delay.is_zero() {
                    tokio::time::sleep(self.page_delay).await;
                }

                let wanted = self.page_size.min(self.max_results - offset);
                let page = self.fetch_page(search_query, offset, wanted).await?;
                let received = page.len();

                for paper in page {
                    yield paper;
                }

                offset += received;
                if received < wanted {
                    break;
                }
            }
        }
    }
}

#[async_trait::async_trait]
impl PaperSearch for ArxivClient {
    async fn search(
        &self,
        category_query: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> ClientResult<Vec<RawPaperResult>> {
        let query = build_search_query(category_query, start, end);
        tracing::info!(query = %query, "Searching arXiv");

        let papers: Vec<RawPaperResult> = self.results(&query).try_collect().await?;

        tracing::info!(count = papers.len(), "arXiv search complete");
        Ok(papers)
    }
}

impl std::fmt::Debug for ArxivClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArxivClient")
            .field("api_url", &self.api_url)
            .field("max_results", &self.max_results)
            .finish()
    }
}
