#![no_main]

use libfuzzer_sys::fuzz_target;

use jobsweep::extractor::extract;
use jobsweep::sites;

fuzz_target!(|data: &[u8]| {
    // Reader output is text; invalid UTF-8 never reaches the extractor
    let content = String::from_utf8_lossy(data);

    let Ok(all) = sites::all() else {
        return;
    };

    // The extractor should never panic regardless of input
    for site in &all {
        let records = extract(&content, site.rules());
        if let Some(cap) = site.rules().max_results() {
            assert!(records.len() <= cap);
        }
    }
});
