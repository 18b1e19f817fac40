//! Shared fixtures for integration tests.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{TimeZone, Utc};

use paper_ranker::client::{CitationLookup, PaperSearch};
use paper_ranker::error::{ClientError, ClientResult};
use paper_ranker::models::{CitationRecord, PaperAuthor, PaperLink, RawPaperResult};

/// One arXiv Atom `<entry>`.
pub fn atom_entry(id: &str, title: &str, published: &str) -> String {
    format!(
        r#"<entry>
    <id>http://arxiv.org/abs/{id}v1</id>
    <updated>{published}</updated>
    <published>{published}</published>
    <title>{title}</title>
    <summary>Abstract of {title}.</summary>
    <author><name>First Author</name></author>
    <author><name>Second Author</name></author>
    <link href="http://arxiv.org/abs/{id}v1" rel="alternate" type="text/html"/>
    <link title="pdf" href="http://arxiv.org/pdf/{id}v1" rel="related" type="application/pdf"/>
    <arxiv:primary_category xmlns:arxiv="http://arxiv.org/schemas/atom" term="cs.AI" scheme="http://arxiv.org/schemas/atom"/>
    <category term="cs.AI" scheme="http://arxiv.org/schemas/atom"/>
  </entry>"#
    )
}

/// A complete Atom feed around `entries`.
pub fn atom_feed(entries: &[String]) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title type="html">ArXiv Query</title>
  <id>http://arxiv.org/api/test</id>
  <updated>2024-01-03T00:00:00-05:00</updated>
  {}
</feed>"#,
        entries.join("\n  ")
    )
}

/// arXiv's error response shape.
pub fn atom_error_feed(message: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title type="html">ArXiv Query</title>
  <entry>
    <id>http://arxiv.org/api/errors#malformed_query</id>
    <title>Error</title>
    <summary>{message}</summary>
    <updated>2024-01-03T00:00:00-05:00</updated>
  </entry>
</feed>"#
    )
}

/// Semantic Scholar `paper/search` body with one match.
pub fn s2_match(title: &str, corpus_id: u64, citations: u64) -> serde_json::Value {
    serde_json::json!({
        "total": 1,
        "offset": 0,
        "data": [{
            "paperId": format!("pid{corpus_id}"),
            "corpusId": corpus_id,
            "title": title,
            "authors": [{"authorId": "1", "name": "Test Author"}],
            "externalIds": {"CorpusId": corpus_id},
            "citationCount": citations
        }]
    })
}

/// Semantic Scholar `paper/search` body with no match.
pub fn s2_empty() -> serde_json::Value {
    serde_json::json!({"total": 0, "offset": 0, "data": []})
}

/// A raw result published at midnight UTC on the given day.
pub fn raw_paper(title: &str, year: i32, month: u32, day: u32) -> RawPaperResult {
    let published = Utc.with_ymd_and_hms(year, month, day, 0, 0, 0).unwrap();
    let slug = title.to_lowercase().replace(' ', "-");
    RawPaperResult {
        entry_id: format!("http://arxiv.org/abs/{slug}"),
        title: title.to_string(),
        summary: format!("Abstract of {title}."),
        authors: vec![PaperAuthor { name: "Test Author".to_string(), affiliation: None }],
        published,
        updated: published,
        links: vec![PaperLink {
            href: format!("http://arxiv.org/abs/{slug}"),
            rel: Some("alternate".to_string()),
            content_type: Some("text/html".to_string()),
            title: None,
        }],
        categories: vec!["cs.AI".to_string()],
        primary_category: Some("cs.AI".to_string()),
        ..Default::default()
    }
}

/// In-memory citation provider that records every lookup.
#[derive(Default)]
pub struct FakeCitations {
    counts: HashMap<String, u64>,
    calls: Mutex<Vec<String>>,
}

impl FakeCitations {
    pub fn new(counts: &[(&str, u64)]) -> Self {
        Self {
            counts: counts.iter().map(|(t, c)| ((*t).to_string(), *c)).collect(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl CitationLookup for FakeCitations {
    async fn lookup(
        &self,
        title: &str,
        _author: Option<&str>,
    ) -> ClientResult<Option<CitationRecord>> {
        self.calls.lock().unwrap().push(title.to_string());
        Ok(self.counts.get(title).map(|count| CitationRecord {
            citation_count: *count,
            external_id: format!("s2-{title}"),
            title: title.to_string(),
        }))
    }
}

/// Citation provider that always fails.
pub struct FailingCitations;

#[async_trait::async_trait]
impl CitationLookup for FailingCitations {
    async fn lookup(
        &self,
        _title: &str,
        _author: Option<&str>,
    ) -> ClientResult<Option<CitationRecord>> {
        Err(ClientError::server(503, "citation provider down"))
    }
}

/// Search provider returning a fixed result list.
pub struct FakeSearch {
    pub results: Vec<RawPaperResult>,
}

#[async_trait::async_trait]
impl PaperSearch for FakeSearch {
    async fn search(
        &self,
        _category_query: &str,
        _start: chrono::NaiveDate,
        _end: chrono::NaiveDate,
    ) -> ClientResult<Vec<RawPaperResult>> {
        Ok(self.results.clone())
    }
}

/// Search provider that always fails.
pub struct FailingSearch;

#[async_trait::async_trait]
impl PaperSearch for FailingSearch {
    async fn search(
        &self,
        _category_query: &str,
        _start: chrono::NaiveDate,
        _end: chrono::NaiveDate,
    ) -> ClientResult<Vec<RawPaperResult>> {
        Err(ClientError::server(500, "arXiv unavailable"))
    }
}
