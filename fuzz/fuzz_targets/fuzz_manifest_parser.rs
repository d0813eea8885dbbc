//! Fuzz target for `package.yml` parsing and rewriting.
//!
//! Goal: parsing should **never panic**, and any manifest that parses must render
//! back to YAML that parses to the same manifest.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_manifest_parser
//! ```

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use packguard_types::RepoPath;

#[derive(Arbitrary, Debug)]
struct ManifestInput {
    /// Directory of the package, e.g. "packs/apples".
    directory: String,
    /// Raw manifest text.
    text: String,
}

fuzz_target!(|input: ManifestInput| {
    if input.directory.len() > 128 || input.text.len() > 4096 {
        return;
    }

    let path = RepoPath::new(format!("{}/package.yml", input.directory));
    let Ok(manifest) = packguard_repo::parse_manifest(&path, &input.text) else {
        return;
    };

    let rendered = packguard_repo::render_manifest(&manifest).expect("render parsed manifest");
    let reparsed = packguard_repo::parse_manifest(&path, &rendered).expect("reparse rendered");
    assert_eq!(reparsed.enforce_dependencies, manifest.enforce_dependencies);
    assert_eq!(reparsed.enforce_privacy, manifest.enforce_privacy);
    assert_eq!(reparsed.dependencies, manifest.dependencies);
});
