//! Citation metadata from the Semantic Scholar Graph API.

use serde::{Deserialize, Serialize};

/// Citation data for one paper, as used for ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CitationRecord {
    /// Number of citations the paper has received.
    pub citation_count: u64,

    /// Semantic Scholar corpus id (or paper id when no corpus id is known).
    pub external_id: String,

    /// Title as reported by the provider.
    pub title: String,
}

/// Response of `GET /paper/search`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaperSearchResponse {
    /// Total matches for the query.
    #[serde(default)]
    pub total: Option<u64>,

    /// Matching papers, best first.
    #[serde(default)]
    pub data: Vec<MatchedPaper>,
}

/// Author reference inside a matched paper.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchedAuthor {
    #[serde(default)]
    pub author_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// A paper returned by the title search.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchedPaper {
    /// Semantic Scholar paper id.
    #[serde(default)]
    pub paper_id: Option<String>,

    /// S2 corpus id.
    #[serde(default)]
    pub corpus_id: Option<u64>,

    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub authors: Vec<MatchedAuthor>,

    /// External identifiers (DOI, ArXiv, ...), kept as raw JSON.
    #[serde(default)]
    pub external_ids: Option<serde_json::Value>,

    #[serde(default)]
    pub citation_count: Option<u64>,
}

impl MatchedPaper {
    /// Convert to a [`CitationRecord`].
    ///
    /// Returns `None` when the match lacks a citation count or any identifier.
    #[must_use]
    pub fn into_citation_record(self) -> Option<CitationRecord> {
        let citation_count = self.citation_count?;
        let external_id = self.corpus_id.map(|id| id.to_string()).or(self.paper_id)?;

        Some(CitationRecord {
            citation_count,
            external_id,
            title: self.title.unwrap_or_default(),
        })
    }
}
