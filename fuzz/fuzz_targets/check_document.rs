#![no_main]
use libfuzzer_sys::fuzz_target;
use sdpoker::{Config, Document};

fuzz_target!(|data: &[u8]| {
    let Ok(document) = Document::from_bytes(data.to_vec()) else {
        return;
    };
    let config = Config {
        should: true,
        whitespace: true,
        check_endings: true,
        duplicate: true,
        channel_order: true,
        shaping: true,
        ..Default::default()
    };
    let _ = sdpoker::rules::all_sections(&document, &config);
});
