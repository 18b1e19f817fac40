//! Validated search parameters for the `/papers` endpoint.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// arXiv category identifiers: archive, optionally followed by `.SUBJECT`.
static CATEGORY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z][a-z\-]*(\.[A-Za-z][A-Za-z\-]*)?$").expect("valid regex"));

/// Ranking criterion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    /// Most cited first.
    #[default]
    Citations,
    /// Oldest publication first.
    Recency,
}

impl SortMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Citations => "citations",
            Self::Recency => "recency",
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortMode {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "citations" => Ok(Self::Citations),
            "recency" => Ok(Self::Recency),
            other => Err(ApiError::validation(
                "sort_by",
                format!("unknown sort mode '{other}', expected 'citations' or 'recency'"),
            )),
        }
    }
}

/// Parse an ISO-8601 calendar date. A full date-time is accepted and truncated.
///
/// # Errors
///
/// Returns a validation error naming `field` if the value is not ISO-8601.
pub fn parse_iso_date(field: &str, value: &str) -> Result<NaiveDate, ApiError> {
    let value = value.trim();
    value
        .parse::<NaiveDate>()
        .or_else(|_| value.parse::<NaiveDateTime>().map(|dt| dt.date()))
        .map_err(|_| ApiError::validation(field, format!("invalid isoformat string: '{value}'")))
}

/// A validated paper search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub category: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub sort: SortMode,
    pub limit: usize,
}

impl SearchQuery {
    /// Build a query, checking every invariant.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a malformed category, an inverted date
    /// range or a zero limit.
    pub fn new(
        category: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
        sort: SortMode,
        limit: usize,
    ) -> Result<Self, ApiError> {
        let category = category.into();
        if !CATEGORY_RE.is_match(&category) {
            return Err(ApiError::validation(
                "category",
                format!("'{category}' is not an arXiv category (e.g. 'cs.AI')"),
            ));
        }
        if start_date > end_date {
            return Err(ApiError::validation(
                "start_date_str",
                format!("start date {start_date} is after end date {end_date}"),
            ));
        }
        if limit == 0 {
            return Err(ApiError::validation("limit", "must be greater than 0"));
        }

        Ok(Self { category, start_date, end_date, sort, limit })
    }

    /// Provider category filter, e.g. `cat:cs.AI`.
    #[must_use]
    pub fn category_query(&self) -> String {
        format!("cat:{}", self.category)
    }
}
