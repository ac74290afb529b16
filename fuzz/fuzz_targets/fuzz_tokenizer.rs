#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    for token in hubindex::utils::tokenize(data) {
        assert!(!token.is_empty());
    }
});
