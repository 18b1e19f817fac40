//! Ranking pipeline tests with in-memory providers.

mod common;

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::NaiveDate;
use tempfile::TempDir;

use paper_ranker::cache::{CacheEntry, CacheStore};
use paper_ranker::error::{ApiError, ClientError};
use paper_ranker::formatters::paper_record;
use paper_ranker::models::{CitationRecord, PaperRecord, SearchQuery, SortMode};
use paper_ranker::pipeline::{PaperService, Ranker};

use common::{FailingCitations, FailingSearch, FakeCitations, FakeSearch, raw_paper};

const PRUNED_KEYS: &[&str] = &[
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

async fn open_cache(dir: &TempDir) -> Arc<CacheStore> {
    Arc::new(CacheStore::open(dir.path().join("cache.json")).await)
}

fn ranker(cache: Arc<CacheStore>, citations: Arc<FakeCitations>, prune: bool) -> Ranker {
    Ranker::new(cache, citations, Duration::ZERO, prune)
}

fn titles(records: &[PaperRecord]) -> Vec<&str> {
    records.iter().map(|r| r["title"].as_str().unwrap()).collect()
}

// =============================================================================
// Citation ranking
// =============================================================================

#[tokio::test]
async fn test_citations_sorted_descending() {
    let dir = tempfile::tempdir().unwrap();
    let citations = Arc::new(FakeCitations::new(&[("Low", 1), ("High", 100), ("Mid", 10)]));
    let ranker = ranker(open_cache(&dir).await, citations, true);

    let results = vec![
        raw_paper("Low", 2024, 1, 1),
        raw_paper("High", 2024, 1, 1),
        raw_paper("Mid", 2024, 1, 1),
    ];
    let ranked = ranker.rank(results, SortMode::Citations, 10).await.unwrap();

    assert_eq!(titles(&ranked), vec!["High", "Mid", "Low"]);
    assert_eq!(ranked[0]["citationCount"], 100);
    assert_eq!(ranked[0]["s2id"], "s2-High");
}

#[tokio::test]
async fn test_ties_keep_provider_order() {
    let dir = tempfile::tempdir().unwrap();
    let citations = Arc::new(FakeCitations::new(&[("A", 5), ("B", 5), ("C", 9), ("D", 5)]));
    let ranker = ranker(open_cache(&dir).await, citations, true);

    let results = vec![
        raw_paper("A", 2024, 1, 1),
        raw_paper("B", 2024, 1, 1),
        raw_paper("C", 2024, 1, 1),
        raw_paper("D", 2024, 1, 1),
    ];
    let ranked = ranker.rank(results, SortMode::Citations, 10).await.unwrap();

    assert_eq!(titles(&ranked), vec!["C", "A", "B", "D"]);
}

#[tokio::test]
async fn test_unmatched_papers_are_dropped() {
    let dir = tempfile::tempdir().unwrap();
    let citations = Arc::new(FakeCitations::new(&[("Known", 3)]));
    let ranker = ranker(open_cache(&dir).await, citations, true);

    let results = vec![raw_paper("Unknown", 2024, 1, 1), raw_paper("Known", 2024, 1, 1)];
    let ranked = ranker.rank(results, SortMode::Citations, 10).await.unwrap();

    assert_eq!(titles(&ranked), vec!["Known"]);
}

#[tokio::test]
async fn test_limit_truncates_after_sorting() {
    let dir = tempfile::tempdir().unwrap();
    let citations = Arc::new(FakeCitations::new(&[("A", 1), ("B", 2), ("C", 3), ("D", 4)]));
    let ranker = ranker(open_cache(&dir).await, citations, true);

    let results = ["A", "B", "C", "D"].iter().map(|t| raw_paper(t, 2024, 1, 1)).collect();
    let ranked = ranker.rank(results, SortMode::Citations, 2).await.unwrap();

    assert_eq!(titles(&ranked), vec!["D", "C"]);
}

#[tokio::test]
async fn test_empty_results() {
    let dir = tempfile::tempdir().unwrap();
    let citations = Arc::new(FakeCitations::default());
    let ranker = ranker(open_cache(&dir).await, Arc::clone(&citations), true);

    assert!(ranker.rank(Vec::new(), SortMode::Citations, 10).await.unwrap().is_empty());
    assert!(ranker.rank(Vec::new(), SortMode::Recency, 10).await.unwrap().is_empty());
    assert!(citations.calls().is_empty());
}

// =============================================================================
// Cache interaction
// =============================================================================

#[tokio::test]
async fn test_lookup_result_is_cached() {
    let dir = tempfile::tempdir().unwrap();
    let cache = open_cache(&dir).await;
    let citations = Arc::new(FakeCitations::new(&[("Fresh", 12)]));
    let ranker = ranker(Arc::clone(&cache), citations, true);

    ranker.rank(vec![raw_paper("Fresh", 2024, 1, 1)], SortMode::Citations, 10).await.unwrap();

    let entry = cache.entry("Fresh").await.unwrap();
    assert_eq!(entry.citation_count, 12);
    assert_eq!(entry.external_id, "s2-Fresh");
    // The cached record is the full, unpruned mapping
    assert!(entry.result.contains_key("authors"));
    assert!(entry.result.contains_key("summary"));
}

#[tokio::test]
async fn test_unmatched_titles_are_not_cached() {
    let dir = tempfile::tempdir().unwrap();
    let cache = open_cache(&dir).await;
    let citations = Arc::new(FakeCitations::default());
    let ranker = ranker(Arc::clone(&cache), Arc::clone(&citations), true);

    ranker.rank(vec![raw_paper("Nobody", 2024, 1, 1)], SortMode::Citations, 10).await.unwrap();
    ranker.rank(vec![raw_paper("Nobody", 2024, 1, 1)], SortMode::Citations, 10).await.unwrap();

    assert!(cache.is_empty().await);
    assert_eq!(citations.calls(), vec!["Nobody", "Nobody"]);
}

#[tokio::test]
async fn test_cache_hit_skips_provider() {
    let dir = tempfile::tempdir().unwrap();
    let cache = open_cache(&dir).await;

    let paper = raw_paper("Cached", 2024, 1, 1);
    let stored = CitationRecord {
        citation_count: 77,
        external_id: "cached-id".to_string(),
        title: "Cached".to_string(),
    };
    cache.put("Cached", CacheEntry::new(paper_record(&paper), &stored)).await.unwrap();

    // The provider would disagree; the cached value must win
    let citations = Arc::new(FakeCitations::new(&[("Cached", 1)]));
    let ranker = ranker(Arc::clone(&cache), Arc::clone(&citations), true);

    let ranked = ranker.rank(vec![paper], SortMode::Citations, 10).await.unwrap();

    assert!(citations.calls().is_empty());
    assert_eq!(ranked[0]["citationCount"], 77);
    assert_eq!(ranked[0]["s2id"], "cached-id");
}

#[tokio::test]
async fn test_second_request_is_served_from_cache() {
    let dir = tempfile::tempdir().unwrap();
    let citations = Arc::new(FakeCitations::new(&[("Repeat", 4)]));
    let ranker = ranker(open_cache(&dir).await, Arc::clone(&citations), true);

    for _ in 0..3 {
        let ranked =
            ranker.rank(vec![raw_paper("Repeat", 2024, 1, 1)], SortMode::Citations, 10).await.unwrap();
        assert_eq!(ranked[0]["citationCount"], 4);
    }

    assert_eq!(citations.calls(), vec!["Repeat"]);
}

#[tokio::test]
async fn test_delay_follows_uncached_lookups_only() {
    let dir = tempfile::tempdir().unwrap();
    let delay = Duration::from_millis(100);
    let citations = Arc::new(FakeCitations::new(&[("A", 1), ("B", 2)]));
    let ranker = Ranker::new(open_cache(&dir).await, citations, delay, true);

    let results = || vec![raw_paper("A", 2024, 1, 1), raw_paper("B", 2024, 1, 1)];

    let started = Instant::now();
    ranker.rank(results(), SortMode::Citations, 10).await.unwrap();
    assert!(started.elapsed() >= delay * 2);

    let started = Instant::now();
    ranker.rank(results(), SortMode::Citations, 10).await.unwrap();
    assert!(started.elapsed() < delay);
}

#[tokio::test]
async fn test_provider_failure_propagates() {
    let dir = tempfile::tempdir().unwrap();
    let ranker =
        Ranker::new(open_cache(&dir).await, Arc::new(FailingCitations), Duration::ZERO, true);

    let err = ranker
        .rank(vec![raw_paper("Any", 2024, 1, 1)], SortMode::Citations, 10)
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Server { status: 503, .. }));
}

// =============================================================================
// Recency ranking
// =============================================================================

#[tokio::test]
async fn test_recency_orders_by_publication_date() {
    let dir = tempfile::tempdir().unwrap();
    let citations = Arc::new(FakeCitations::default());
    let ranker = ranker(open_cache(&dir).await, Arc::clone(&citations), true);

    let results = vec![
        raw_paper("Third", 2024, 1, 3),
        raw_paper("First", 2024, 1, 1),
        raw_paper("Second", 2024, 1, 2),
    ];
    let ranked = ranker.rank(results, SortMode::Recency, 10).await.unwrap();

    assert_eq!(titles(&ranked), vec!["First", "Second", "Third"]);
    assert!(ranked.iter().all(|r| !r.contains_key("citationCount")));
    assert!(citations.calls().is_empty());
}

#[tokio::test]
async fn test_recency_same_day_keeps_provider_order() {
    let dir = tempfile::tempdir().unwrap();
    let ranker = ranker(open_cache(&dir).await, Arc::new(FakeCitations::default()), true);

    let results = vec![
        raw_paper("Later", 2024, 1, 2),
        raw_paper("Same B", 2024, 1, 1),
        raw_paper("Same A", 2024, 1, 1),
    ];
    let ranked = ranker.rank(results, SortMode::Recency, 2).await.unwrap();

    assert_eq!(titles(&ranked), vec!["Same B", "Same A"]);
}

// =============================================================================
// Pruning
// =============================================================================

#[tokio::test]
async fn test_pruned_records_omit_verbose_fields() {
    let dir = tempfile::tempdir().unwrap();
    let citations = Arc::new(FakeCitations::new(&[("Paper", 1)]));
    let ranker = ranker(open_cache(&dir).await, citations, true);

    let ranked = ranker.rank(vec![raw_paper("Paper", 2024, 1, 1)], SortMode::Citations, 10).await.unwrap();
    let record = &ranked[0];

    for key in PRUNED_KEYS {
        assert!(!record.contains_key(*key), "{key} should be pruned");
    }
    for key in ["id", "link", "title", "published", "updated", "author", "citationCount", "s2id"] {
        assert!(record.contains_key(key), "{key} should be kept");
    }
}

#[tokio::test]
async fn test_unpruned_records_keep_everything() {
    let dir = tempfile::tempdir().unwrap();
    let citations = Arc::new(FakeCitations::new(&[("Paper", 1)]));
    let ranker = ranker(open_cache(&dir).await, citations, false);

    let ranked = ranker.rank(vec![raw_paper("Paper", 2024, 1, 1)], SortMode::Citations, 10).await.unwrap();
    for key in PRUNED_KEYS {
        assert!(ranked[0].contains_key(*key), "{key} should be present");
    }
    assert_eq!(ranked[0]["published_parsed"], serde_json::json!([2024, 1, 1, 0, 0, 0, 0, 1, 0]));
}

// =============================================================================
// Service
// =============================================================================

fn query(sort: SortMode, limit: usize) -> SearchQuery {
    SearchQuery::new(
        "cs.AI".to_string(),
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
        sort,
        limit,
    )
    .unwrap()
}

#[tokio::test]
async fn test_service_searches_then_ranks() {
    let dir = tempfile::tempdir().unwrap();
    let citations = Arc::new(FakeCitations::new(&[("A", 1), ("B", 2)]));
    let search = Arc::new(FakeSearch {
        results: vec![raw_paper("A", 2024, 1, 1), raw_paper("B", 2024, 1, 2)],
    });
    let service = PaperService::new(search, ranker(open_cache(&dir).await, citations, true));

    let ranked = service.papers(&query(SortMode::Citations, 5)).await.unwrap();
    assert_eq!(titles(&ranked), vec!["B", "A"]);
}

#[tokio::test]
async fn test_service_search_failure_is_client_error() {
    let dir = tempfile::tempdir().unwrap();
    let service = PaperService::new(
        Arc::new(FailingSearch),
        ranker(open_cache(&dir).await, Arc::new(FakeCitations::default()), true),
    );

    let err = service.papers(&query(SortMode::Recency, 5)).await.unwrap_err();
    assert!(matches!(err, ApiError::Client(ClientError::Server { status: 500, .. })));
    assert_eq!(err.status(), axum::http::StatusCode::BAD_GATEWAY);
}
