//! arXiv Atom feed model and the raw search result built from it.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;

use crate::error::ClientError;

/// Root `<feed>` element of an arXiv API response.
///
/// The deserializer matches local names, so namespaced elements such as
/// `<arxiv:doi>` and `<opensearch:totalResults>` are renamed without prefix.
#[derive(Debug, Default, Deserialize)]
pub struct AtomFeed {
    /// Total hits reported by the provider, when present.
    #[serde(rename = "totalResults", default)]
    pub total_results: Option<usize>,

    /// Result entries in provider order.
    #[serde(rename = "entry", default)]
    pub entries: Vec<AtomEntry>,
}

/// One `<entry>` element.
#[derive(Debug, Default, Deserialize)]
pub struct AtomEntry {
    pub id: String,
    #[serde(default)]
    pub updated: Option<String>,
    #[serde(default)]
    pub published: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub summary: String,
    #[serde(rename = "author", default)]
    pub authors: Vec<AtomAuthor>,
    #[serde(rename = "link", default)]
    pub links: Vec<AtomLink>,
    #[serde(rename = "category", default)]
    pub categories: Vec<AtomCategory>,
    #[serde(rename = "primary_category", default)]
    pub primary_category: Option<AtomCategory>,
    #[serde(rename = "comment", default)]
    pub comment: Option<String>,
    #[serde(rename = "journal_ref", default)]
    pub journal_ref: Option<String>,
    #[serde(rename = "doi", default)]
    pub doi: Option<String>,
}

impl AtomEntry {
    /// arXiv reports query errors as a single entry under `/api/errors`.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.id.contains("/api/errors")
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct AtomAuthor {
    pub name: String,
    #[serde(rename = "affiliation", default)]
    pub affiliation: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AtomLink {
    #[serde(rename = "@href")]
    pub href: String,
    #[serde(rename = "@rel", default)]
    pub rel: Option<String>,
    #[serde(rename = "@type", default)]
    pub content_type: Option<String>,
    #[serde(rename = "@title", default)]
    pub title: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AtomCategory {
    #[serde(rename = "@term")]
    pub term: String,
    #[serde(rename = "@scheme", default)]
    pub scheme: Option<String>,
}

/// A link attached to a paper (abstract page, PDF, DOI).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaperLink {
    pub href: String,
    pub rel: Option<String>,
    pub content_type: Option<String>,
    pub title: Option<String>,
}

/// A paper author as reported by arXiv.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaperAuthor {
    pub name: String,
    pub affiliation: Option<String>,
}

/// Provider-native record for one preprint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawPaperResult {
    /// Entry id, e.g. `http://arxiv.org/abs/2401.00001v1`.
    pub entry_id: String,
    pub title: String,
    /// Abstract.
    pub summary: String,
    pub authors: Vec<PaperAuthor>,
    pub published: DateTime<Utc>,
    pub updated: DateTime<Utc>,
    pub links: Vec<PaperLink>,
    /// Category terms in feed order.
    pub categories: Vec<String>,
    pub primary_category: Option<String>,
    pub comment: Option<String>,
    pub journal_ref: Option<String>,
    pub doi: Option<String>,
}

impl RawPaperResult {
    /// Calendar date of first publication (UTC).
    #[must_use]
    pub fn published_date(&self) -> NaiveDate {
        self.published.date_naive()
    }

    /// Abstract page URL (`rel="alternate"`), falling back to the entry id.
    #[must_use]
    pub fn abs_url(&self) -> &str {
        self.links
            .iter()
            .find(|l| l.rel.as_deref() == Some("alternate"))
            .map(|l| l.href.as_str())
            .unwrap_or(&self.entry_id)
    }
}

/// Atom text wraps long titles across lines; fold every whitespace run to one space.
fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn parse_timestamp(field: &str, value: Option<&str>) -> Result<DateTime<Utc>, ClientError> {
    let value = value.ok_or_else(|| ClientError::feed(format!("entry is missing <{field}>")))?;
    DateTime::parse_from_rfc3339(value.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| ClientError::feed(format!("invalid <{field}> '{value}': {e}")))
}

impl TryFrom<AtomEntry> for RawPaperResult {
    type Error = ClientError;

    fn try_from(entry: AtomEntry) -> Result<Self, Self::Error> {
        if entry.is_error() {
            return Err(ClientError::bad_request(entry.summary.trim().to_string()));
        }

        let published = parse_timestamp("published", entry.published.as_deref())?;
        let updated = parse_timestamp("updated", entry.updated.as_deref())?;

        Ok(Self {
            entry_id: entry.id.trim().to_string(),
            title: collapse_whitespace(&entry.title),
            summary: entry.summary.trim().to_string(),
            authors: entry
                .authors
                .into_iter()
                .map(|a| PaperAuthor {
                    name: a.name.trim().to_string(),
                    affiliation: a.affiliation.map(|s| s.trim().to_string()),
                })
                .collect(),
            published,
            updated,
            links: entry
                .links
                .into_iter()
                .map(|l| PaperLink {
                    href: l.href,
                    rel: l.rel,
                    content_type: l.content_type,
                    title: l.title,
                })
                .collect(),
            categories: entry.categories.into_iter().map(|c| c.term).collect(),
            primary_category: entry.primary_category.map(|c| c.term),
            comment: entry.comment,
            journal_ref: entry.journal_ref,
            doi: entry.doi,
        })
    }
}

/// Decode an arXiv Atom response body.
///
/// # Errors
///
/// Returns [`ClientError::Feed`] if the XML does not match the Atom shape.
pub fn parse_feed(xml: &str) -> Result<AtomFeed, ClientError> {
    Ok(quick_xml::de::from_str(xml)?)
}
