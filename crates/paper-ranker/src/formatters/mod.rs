//! Output formatting for ranked papers.

pub mod record;

pub use record::{enrich, paper_record, prune, time_tuple};
