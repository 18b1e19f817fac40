//! Data models for provider responses and ranked output.
//!
//! Provider models use `#[serde(default)]` for optional fields and match the
//! provider's own naming via `#[serde(rename = ...)]`.

mod arxiv;
mod citation;
mod query;

pub use arxiv::{
    AtomAuthor, AtomCategory, AtomEntry, AtomFeed, AtomLink, PaperAuthor, PaperLink,
    RawPaperResult, parse_feed,
};
pub use citation::{CitationRecord, MatchedAuthor, MatchedPaper, PaperSearchResponse};
pub use query::{SearchQuery, SortMode, parse_iso_date};

/// A paper as a JSON field mapping, the unit returned to callers.
pub type PaperRecord = serde_json::Map<String, serde_json::Value>;
