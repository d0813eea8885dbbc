//! Fuzz target for the new-violation JSON input.
//!
//! Goal: malformed extractor output is an error, never a panic.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_new_violations
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        let _ = packguard_repo::parse_new_violations(text);
    }
});
