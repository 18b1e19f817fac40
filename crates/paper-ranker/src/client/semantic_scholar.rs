//! Semantic Scholar title lookup.

use reqwest::Client;

use super::{CitationLookup, build_http_client, handle_response, request_url};
use crate::config::{Config, fields};
use crate::error::{ClientError, ClientResult};
use crate::models::{CitationRecord, PaperSearchResponse};

/// Semantic Scholar Graph API client for citation counts.
#[derive(Clone)]
pub struct CitationClient {
    client: Client,

    /// API key (optional).
    api_key: Option<String>,

    /// Graph API base URL.
    graph_api_url: String,
}

impl CitationClient {
    /// Create a new client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let client = build_http_client(config, config.api_key.as_deref())?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            graph_api_url: config.graph_api_url.clone(),
        })
    }

    /// Check if an API key is configured.
    #[must_use]
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Raw `paper/search` call returning at most one match.
    ///
    /// # Errors
    ///
    /// Returns error on transport failure, non-success status or malformed JSON.
    pub async fn search_top_match(&self, query: &str) -> ClientResult<PaperSearchResponse> {
        let url = request_url(
            &format!("{}/paper/search", self.graph_api_url),
            &[
                ("query", query.to_string()),
                ("fields", fields::CITATION_LOOKUP.join(",")),
                ("limit", "1".to_string()),
            ],
        )?;

        let response = self.client.get(url).send().await?;
        let response = handle_response(response).await?;
        let body = response.text().await?;

        serde_json::from_str(&body).map_err(ClientError::from)
    }
}

/// Query string sent for a title, with the author appended as an extra token.
fn lookup_query(title: &str, author: Option<&str>) -> String {
    match author {
        Some(author) => format!("{title} {author}"),
        None => title.to_string(),
    }
}

#[async_trait::async_trait]
impl CitationLookup for CitationClient {
    async fn lookup(
        &self,
        title: &str,
        author: Option<&str>,
    ) -> ClientResult<Option<CitationRecord>> {
        let query = lookup_query(title, author);

        let response = match self.search_top_match(&query).await {
            Ok(response) => response,
            Err(ClientError::Http(e)) => return Err(ClientError::Http(e)),
            Err(e) => {
                tracing::warn!(title, error = %e, "Citation lookup returned no usable result");
                return Ok(None);
            }
        };

        let record = response.data.into_iter().next().and_then(|p| p.into_citation_record());
        match &record {
            Some(r) => tracing::debug!(title, citations = r.citation_count, s2id = %r.external_id, "Citation match"),
            None => tracing::debug!(title, "No citation match"),
        }

        Ok(record)
    }
}

impl std::fmt::Debug for CitationClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CitationClient").field("has_api_key", &self.has_api_key()).finish()
    }
}
