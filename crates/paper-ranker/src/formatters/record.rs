//! JSON field mappings for papers.
//!
//! Records keep the key layout of a generic Atom feed parser (`title_detail`,
//! `published_parsed`, `tags`, ...) so existing frontends can read them.

use chrono::{DateTime, Datelike, SecondsFormat, Timelike, Utc};
use serde_json::{Value, json};

use crate::config::fields;
use crate::models::{CitationRecord, PaperRecord, RawPaperResult};

const ARXIV_SCHEME: &str = "http://arxiv.org/schemas/atom";

/// Nine-element time tuple: `[year, month, day, hour, minute, second, weekday, yearday, isdst]`.
///
/// Weekday counts from Monday = 0, yearday from January 1st = 1.
#[must_use]
pub fn time_tuple(dt: &DateTime<Utc>) -> Value {
    json!([
        dt.year(),
        dt.month(),
        dt.day(),
        dt.hour(),
        dt.minute(),
        dt.second(),
        dt.weekday().num_days_from_monday(),
        dt.ordinal(),
        0
    ])
}

fn text_detail(value: &str) -> Value {
    json!({
        "type": "text/plain",
        "language": null,
        "base": "",
        "value": value,
    })
}

/// Build the full field mapping for a raw result.
#[must_use]
pub fn paper_record(paper: &RawPaperResult) -> PaperRecord {
    let mut obj = PaperRecord::new();
    let mut set = |key: &str, value: Value| {
        obj.insert(key.to_string(), value);
    };

    set("id", json!(paper.entry_id));
    set("link", json!(paper.abs_url()));
    set("updated", json!(paper.updated.to_rfc3339_opts(SecondsFormat::Secs, true)));
    set("updated_parsed", time_tuple(&paper.updated));
    set("published", json!(paper.published.to_rfc3339_opts(SecondsFormat::Secs, true)));
    set("published_parsed", time_tuple(&paper.published));
    set("title", json!(paper.title));
    set("title_detail", text_detail(&paper.title));
    set("summary", json!(paper.summary));
    set("summary_detail", text_detail(&paper.summary));
    set(
        "authors",
        json!(paper.authors.iter().map(|a| json!({"name": a.name})).collect::<Vec<_>>()),
    );

    // The last <author> element wins for the singular fields
    if let Some(author) = paper.authors.last() {
        set("author", json!(author.name));
        set("author_detail", json!({"name": author.name}));
    }

    let links: Vec<Value> = paper
        .links
        .iter()
        .map(|l| {
            let mut link = json!({"href": l.href, "rel": l.rel, "type": l.content_type});
            if let Some(title) = &l.title {
                link["title"] = json!(title);
            }
            link
        })
        .collect();
    set("links", json!(links));

    let tags: Vec<Value> = paper
        .categories
        .iter()
        .map(|term| json!({"term": term, "scheme": ARXIV_SCHEME, "label": null}))
        .collect();
    set("tags", json!(tags));

    if let Some(primary) = &paper.primary_category {
        set("arxiv_primary_category", json!({"term": primary, "scheme": ARXIV_SCHEME}));
    }

    if let Some(comment) = &paper.comment {
        set("arxiv_comment", json!(comment));
    }

    if let Some(journal_ref) = &paper.journal_ref {
        set("arxiv_journal_ref", json!(journal_ref));
    }

    if let Some(doi) = &paper.doi {
        set("arxiv_doi", json!(doi));
    }

    obj
}

/// Merge citation data into a record.
pub fn enrich(record: &mut PaperRecord, citation: &CitationRecord) {
    record.insert("citationCount".to_string(), json!(citation.citation_count));
    record.insert("s2id".to_string(), json!(citation.external_id));
}

/// Remove verbose fields. Missing keys are ignored.
pub fn prune(record: &mut PaperRecord) {
    for key in fields::PRUNED {
        record.remove(*key);
    }
}
