//! Durable title -> citation cache.
//!
//! The whole map lives in memory and is rewritten to a single JSON file on
//! every mutation. Writes go to a sibling temp file that is then renamed over
//! the cache file, so a crash mid-write leaves the previous contents intact.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::error::{CacheError, CacheResult};
use crate::models::{CitationRecord, PaperRecord};

/// Cached value for one paper title.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Full record of the search result at the time of the first lookup.
    pub result: PaperRecord,

    /// Citation count reported when the entry was stored.
    #[serde(rename = "citationCount")]
    pub citation_count: u64,

    /// Semantic Scholar id.
    #[serde(rename = "s2id")]
    pub external_id: String,
}

impl CacheEntry {
    /// Pair a formatted paper record with its citation lookup.
    #[must_use]
    pub fn new(result: PaperRecord, citation: &CitationRecord) -> Self {
        Self {
            result,
            citation_count: citation.citation_count,
            external_id: citation.external_id.clone(),
        }
    }

    /// Citation view of this entry, keyed by `title`.
    #[must_use]
    pub fn to_citation_record(&self, title: &str) -> CitationRecord {
        CitationRecord {
            citation_count: self.citation_count,
            external_id: self.external_id.clone(),
            title: title.to_string(),
        }
    }
}

/// Persistent citation cache keyed by exact paper title.
pub struct CacheStore {
    path: PathBuf,
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl CacheStore {
    /// Load the store from `path`.
    ///
    /// A missing file yields an empty store. A file that cannot be read or
    /// decoded is logged and also yields an empty store; it is replaced on the
    /// next write.
    pub async fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();

        let entries = match tokio::fs::read(&path).await {
            Ok(bytes) => match serde_json::from_slice::<HashMap<String, CacheEntry>>(&bytes) {
                Ok(entries) => {
                    tracing::info!(path = %path.display(), entries = entries.len(), "Loaded citation cache");
                    entries
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Citation cache is corrupt, starting empty");
                    HashMap::new()
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "No citation cache found, starting empty");
                HashMap::new()
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Citation cache is unreadable, starting empty");
                HashMap::new()
            }
        };

        Self { path, entries: RwLock::new(entries) }
    }

    /// Location of the durable file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Citation data for `title`, if cached.
    pub async fn get(&self, title: &str) -> Option<CitationRecord> {
        self.entries.read().await.get(title).map(|e| e.to_citation_record(title))
    }

    /// Full cached value for `title`.
    pub async fn entry(&self, title: &str) -> Option<CacheEntry> {
        self.entries.read().await.get(title).cloned()
    }

    /// Whether `title` has a stored entry.
    pub async fn contains(&self, title: &str) -> bool {
        self.entries.read().await.contains_key(title)
    }

    /// Number of cached titles.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether no titles are cached yet.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Insert or overwrite `title`, then persist the whole store.
    ///
    /// The in-memory entry is kept even if persisting fails.
    pub async fn put(&self, title: impl Into<String>, entry: CacheEntry) -> CacheResult<()> {
        let mut entries = self.entries.write().await;
        entries.insert(title.into(), entry);
        self.persist(&entries).await
    }

    /// Remove `title` and persist.
    pub async fn delete(&self, title: &str) -> CacheResult<()> {
        let mut entries = self.entries.write().await;
        if entries.remove(title).is_none() {
            return Err(CacheError::not_found(title));
        }
        self.persist(&entries).await
    }

    /// Persist the current contents.
    pub async fn flush(&self) -> CacheResult<()> {
        let entries = self.entries.read().await;
        self.persist(&entries).await?;
        tracing::info!(path = %self.path.display(), entries = entries.len(), "Flushed citation cache");
        Ok(())
    }

    async fn persist(&self, entries: &HashMap<String, CacheEntry>) -> CacheResult<()> {
        let bytes = serde_json::to_vec_pretty(entries)?;

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&tmp, &bytes).await?;
        tokio::fs::rename(&tmp, &self.path).await?;

        tracing::debug!(path = %self.path.display(), entries = entries.len(), "Persisted citation cache");
        Ok(())
    }
}

impl std::fmt::Debug for CacheStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheStore").field("path", &self.path).finish()
    }
}
