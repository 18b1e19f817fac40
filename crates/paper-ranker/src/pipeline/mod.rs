//! Aggregation and ranking.
//!
//! Search results are enriched with citation data (cache first, provider on a
//! miss), ordered by the requested [`SortMode`], truncated and pruned.

use std::sync::Arc;
use std::time::Duration;

use crate::cache::{CacheEntry, CacheStore};
use crate::client::{CitationLookup, PaperSearch};
use crate::config::Config;
use crate::error::{ApiResult, ClientResult};
use crate::formatters;
use crate::models::{CitationRecord, PaperRecord, RawPaperResult, SearchQuery, SortMode};

/// Ranks raw search results.
///
/// This is the only component that writes to the cache or sleeps.
#[derive(Clone)]
pub struct Ranker {
    cache: Arc<CacheStore>,
    citations: Arc<dyn CitationLookup>,
    lookup_delay: Duration,
    prune: bool,
}

impl Ranker {
    /// Ranker over `cache` and `citations`, sleeping `lookup_delay` after each stored lookup.
    /// With `prune` set, records drop the fields listed in `fields::PRUNED`.
    #[must_use]
    pub fn new(
        cache: Arc<CacheStore>,
        citations: Arc<dyn CitationLookup>,
        lookup_delay: Duration,
        prune: bool,
    ) -> Self {
        Self { cache, citations, lookup_delay, prune }
    }

    /// Build from configuration.
    #[must_use]
    pub fn from_config(
        config: &Config,
        cache: Arc<CacheStore>,
        citations: Arc<dyn CitationLookup>,
    ) -> Self {
        Self::new(cache, citations, config.lookup_delay, config.prune)
    }

    #[must_use]
    pub fn cache(&self) -> &Arc<CacheStore> {
        &self.cache
    }

    /// Rank `results` by `sort`, returning at most `limit` records.
    ///
    /// # Errors
    ///
    /// Propagates citation provider transport failures.
    pub async fn rank(
        &self,
        results: Vec<RawPaperResult>,
        sort: SortMode,
        limit: usize,
    ) -> ClientResult<Vec<PaperRecord>> {
        match sort {
            SortMode::Citations => self.rank_by_citations(results, limit).await,
            SortMode::Recency => Ok(self.rank_by_recency(results, limit)),
        }
    }

    /// Citation data for `paper`, from the cache or the provider.
    ///
    /// A fresh provider match is cached and followed by the lookup delay.
    async fn citation_for(&self, paper: &RawPaperResult) -> ClientResult<Option<CitationRecord>> {
        if let Some(cached) = self.cache.get(&paper.title).await {
            tracing::debug!(title = %paper.title, "Citation cache hit");
            return Ok(Some(cached));
        }

        let Some(record) = self.citations.lookup(&paper.title, None).await? else {
            return Ok(None);
        };

        let entry = CacheEntry::new(formatters::paper_record(paper), &record);
        if let Err(e) = self.cache.put(paper.title.clone(), entry).await {
            tracing::warn!(title = %paper.title, error = %e, "Failed to persist citation cache");
        }

        if !self.lookup_delay.is_zero() {
            tokio::time::sleep(self.lookup_delay).await;
        }

        Ok(Some(record))
    }

    async fn rank_by_citations(
        &self,
        results: Vec<RawPaperResult>,
        limit: usize,
    ) -> ClientResult<Vec<PaperRecord>> {
        let total = results.len();
        let mut enriched: Vec<(CitationRecord, RawPaperResult)> = Vec::with_capacity(total);

        for paper in results {
            match self.citation_for(&paper).await? {
                Some(record) => enriched.push((record, paper)),
                None => tracing::debug!(title = %paper.title, "Dropping paper without citation match"),
            }
        }

        // Stable: equal counts keep provider order
        enriched.sort_by(|a, b| b.0.citation_count.cmp(&a.0.citation_count));
        enriched.truncate(limit);

        tracing::info!(total, matched = enriched.len(), limit, "Ranked by citations");

        Ok(enriched
            .iter()
            .map(|(citation, paper)| {
                let mut record = formatters::paper_record(paper);
                formatters::enrich(&mut record, citation);
                if self.prune {
                    formatters::prune(&mut record);
                }
                record
            })
            .collect())
    }

    fn rank_by_recency(&self, mut results: Vec<RawPaperResult>, limit: usize) -> Vec<PaperRecord> {
        results.sort_by_key(RawPaperResult::published_date);
        results.truncate(limit);

        tracing::info!(returned = results.len(), limit, "Ranked by recency");

        results
            .iter()
            .map(|paper| {
                let mut record = formatters::paper_record(paper);
                if self.prune {
                    formatters::prune(&mut record);
                }
                record
            })
            .collect()
    }
}

impl std::fmt::Debug for Ranker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ranker")
            .field("cache", &self.cache)
            .field("lookup_delay", &self.lookup_delay)
            .field("prune", &self.prune)
            .finish()
    }
}

/// Search followed by ranking: the work behind one `/papers` request.
#[derive(Clone)]
pub struct PaperService {
    search: Arc<dyn PaperSearch>,
    ranker: Ranker,
}

impl PaperService {
    /// Service that searches with `search` and orders results with `ranker`.
    #[must_use]
    pub fn new(search: Arc<dyn PaperSearch>, ranker: Ranker) -> Self {
        Self { search, ranker }
    }

    #[must_use]
    pub const fn ranker(&self) -> &Ranker {
        &self.ranker
    }

    /// Ranked papers for `query`.
    ///
    /// # Errors
    ///
    /// Propagates provider failures.
    pub async fn papers(&self, query: &SearchQuery) -> ApiResult<Vec<PaperRecord>> {
        let results =
            self.search.search(&query.category_query(), query.start_date, query.end_date).await?;
        Ok(self.ranker.rank(results, query.sort, query.limit).await?)
    }
}

impl std::fmt::Debug for PaperService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaperService").field("ranker", &self.ranker).finish()
    }
}
