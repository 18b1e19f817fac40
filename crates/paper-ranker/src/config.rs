//! Configuration for the paper ranking backend.

use std::path::PathBuf;
use std::time::Duration;

/// API configuration constants.
pub mod api {
    use std::time::Duration;

    /// arXiv query API endpoint.
    pub const ARXIV_API: &str = "http://export.arxiv.org/api/query";

    /// Semantic Scholar Graph API endpoint.
    pub const GRAPH_API: &str = "https://api.semanticscholar.org/graph/v1";

    /// Request timeout.
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

    /// Connection timeout.
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Pause after each uncached citation lookup.
    pub const LOOKUP_DELAY: Duration = Duration::from_millis(500);

    /// Pause between arXiv result pages (arXiv asks for one request every 3s).
    pub const PAGE_DELAY: Duration = Duration::from_secs(3);

    /// Maximum raw results fetched per search.
    pub const MAX_RESULTS: usize = 100;

    /// Results requested per arXiv page.
    pub const PAGE_SIZE: usize = 100;

    /// Default number of papers returned by `/papers`.
    pub const DEFAULT_LIMIT: usize = 30;

    /// Default location of the citation cache file.
    pub const CACHE_PATH: &str = "cache.json";

    /// Default HTTP port.
    pub const DEFAULT_PORT: u16 = 8000;

    /// Maximum keepalive connections.
    pub const MAX_KEEPALIVE: usize = 10;

    /// Keepalive expiry.
    pub const KEEPALIVE_EXPIRY: Duration = Duration::from_secs(30);
}

/// Field sets for provider requests and response pruning.
pub mod fields {
    /// Fields requested from the citation provider for a title lookup.
    pub const CITATION_LOOKUP: &[&str] =
        &["title", "authors", "externalIds", "corpusId", "citationCount"];

    /// Verbose record fields removed from responses when pruning is enabled.
    pub const PRUNED: &[&str] = &[
        "summary",
        "summary_detail",
        "updated_parsed",
        "published_parsed",
        "title_detail",
        "author_detail",
        "links",
        "authors",
        "tags",
    ];
}

/// Backend configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Semantic Scholar API key (optional).
    pub api_key: Option<String>,

    /// arXiv query URL (for testing with mock servers).
    pub arxiv_api_url: String,

    /// Base URL for Graph API (for testing with mock servers).
    pub graph_api_url: String,

    /// Request timeout.
    pub request_timeout: Duration,

    /// Connection timeout.
    pub connect_timeout: Duration,

    /// Delay after each uncached citation lookup.
    pub lookup_delay: Duration,

    /// Delay between arXiv page requests.
    pub page_delay: Duration,

    /// Maximum raw results per search.
    pub max_results: usize,

    /// Results per arXiv page.
    pub page_size: usize,

    /// Path of the durable citation cache.
    pub cache_path: PathBuf,

    /// Strip verbose fields from returned records.
    pub prune: bool,
}

impl Config {
    /// Create a new configuration with optional API key.
    #[must_use]
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key,
            arxiv_api_url: api::ARXIV_API.to_string(),
            graph_api_url: api::GRAPH_API.to_string(),
            request_timeout: api::REQUEST_TIMEOUT,
            connect_timeout: api::CONNECT_TIMEOUT,
            lookup_delay: api::LOOKUP_DELAY,
            page_delay: api::PAGE_DELAY,
            max_results: api::MAX_RESULTS,
            page_size: api::PAGE_SIZE,
            cache_path: PathBuf::from(api::CACHE_PATH),
            prune: true,
        }
    }

    /// Create a test configuration with custom URLs for mock servers.
    #[must_use]
    pub fn for_testing(base_url: &str) -> Self {
        Self {
            api_key: None,
            arxiv_api_url: format!("{}/api/query", base_url),
            graph_api_url: format!("{}/graph/v1", base_url),
            request_timeout: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(2),
            lookup_delay: Duration::ZERO, // No delay in tests
            page_delay: Duration::ZERO,
            max_results: api::MAX_RESULTS,
            page_size: api::PAGE_SIZE,
            cache_path: PathBuf::from(api::CACHE_PATH),
            prune: true,
        }
    }

    /// Create configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns error if environment variables are invalid.
    pub fn from_env() -> anyhow::Result<Self> {
        let api_key = std::env::var("SEMANTIC_SCHOLAR_API_KEY").ok();
        let mut config = Self::new(api_key);

        if let Ok(path) = std::env::var("PAPER_CACHE_PATH") {
            config.cache_path = PathBuf::from(path);
        }

        if let Ok(prune) = std::env::var("PRUNE_RESULTS") {
            config.prune = prune
                .parse()
                .map_err(|_| anyhow::anyhow!("PRUNE_RESULTS must be 'true' or 'false', got '{prune}'"))?;
        }

        Ok(config)
    }

    /// Check if an API key is configured.
    #[must_use]
    pub const fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(None)
    }
}
