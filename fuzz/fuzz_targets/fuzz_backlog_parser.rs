//! Fuzz target for ledger and rule TODO parsing.
//!
//! Goal: `package_todo.yml` parsing may fail but must **never panic**;
//! rule TODO merging must tolerate anything.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_backlog_parser
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;
use packguard_domain::RuleTodo;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        let _ = packguard_repo::parse_ledger(text);

        let mut todo = RuleTodo::new();
        packguard_repo::merge_rule_todo(text, &mut todo);
    }
});
