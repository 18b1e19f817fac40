//! Fuzzing library for paper-ranker.
//!
//! Targets cover the untrusted inputs the backend decodes: arXiv Atom
//! feeds, Semantic Scholar search responses and the on-disk citation cache.
//!
//! # Usage
//!
//! ```bash
//! cd crates/ranker-fuzz
//! cargo +nightly fuzz run fuzz_feed_parse -- -max_total_time=60
//! ```

pub use paper_ranker::{cache, models};
