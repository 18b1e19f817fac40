#![no_main]

use std::collections::HashMap;

use libfuzzer_sys::fuzz_target;
use paper_ranker::cache::CacheEntry;

fuzz_target!(|data: &[u8]| {
    // Same decoding the store applies to its file on startup
    let _ = serde_json::from_slice::<HashMap<String, CacheEntry>>(data);
});
