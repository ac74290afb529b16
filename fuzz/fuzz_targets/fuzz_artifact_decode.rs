#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Corrupt artifacts must be rejected with an error, never a panic
    let _ = hubindex::index::SearchIndex::restore(data);
});
