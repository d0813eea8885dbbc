//! Repository adapters: discover packages, read and write manifests, load the backlog.
//!
//! This crate is allowed to do filesystem IO. It never runs the reference extractor or
//! the rule engine; their outputs are read from files.

#![forbid(unsafe_code)]

mod backlog;
mod discover;
mod manifest;
mod violations;

use anyhow::Context;
use camino::Utf8Path;
use packguard_domain::PackageManifest;

pub use backlog::{load_backlog, merge_rule_todo, parse_ledger, read_ledger};
pub use discover::discover_manifests;
pub use manifest::{parse_manifest, read_manifest, render_manifest, write_manifest};
pub use violations::{parse_new_violations, read_new_violations};

/// Discover and parse every package under `repo_root`, ordered by manifest path.
pub fn load_packages(repo_root: &Utf8Path) -> anyhow::Result<Vec<PackageManifest>> {
    let paths = discover_manifests(repo_root).context("discover packages")?;
    paths
        .iter()
        .map(|path| read_manifest(repo_root, path))
        .collect()
}
