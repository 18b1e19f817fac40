#![no_main]

use libfuzzer_sys::fuzz_target;
use paper_ranker::models::PaperSearchResponse;

fuzz_target!(|data: &[u8]| {
    if let Ok(response) = serde_json::from_slice::<PaperSearchResponse>(data) {
        let _ = response.data.into_iter().next().and_then(|p| p.into_citation_record());
    }
});
