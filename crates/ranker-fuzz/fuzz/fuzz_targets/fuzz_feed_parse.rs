#![no_main]

use libfuzzer_sys::fuzz_target;
use paper_ranker::formatters::paper_record;
use paper_ranker::models::{RawPaperResult, parse_feed};

fuzz_target!(|data: &[u8]| {
    let Ok(xml) = std::str::from_utf8(data) else {
        return;
    };

    // Decoding, conversion and record shaping must fail with errors, never panic
    if let Ok(feed) = parse_feed(xml) {
        for entry in feed.entries {
            if let Ok(paper) = RawPaperResult::try_from(entry) {
                let _ = paper_record(&paper);
            }
        }
    }
});
