use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use globset::{Glob, GlobSet, GlobSetBuilder};
use packguard_types::{RepoPath, ids};
use serde::Deserialize;
use std::path::PathBuf;
use walkdir::{DirEntry, WalkDir};

/// Directories never searched for packages.
const SKIPPED_DIRS: [&str; 5] = [".git", "node_modules", "vendor", "tmp", ".bundle"];

/// The parts of `packwerk.yml` that shape package discovery.
#[derive(Clone, Debug, Default, Deserialize)]
struct PackwerkConfig {
    #[serde(default)]
    package_paths: Option<StringOrList>,
    #[serde(default)]
    exclude: Option<StringOrList>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
enum StringOrList {
    One(String),
    Many(Vec<String>),
}

impl StringOrList {
    fn into_vec(self) -> Vec<String> {
        match self {
            StringOrList::One(s) => vec![s],
            StringOrList::Many(v) => v,
        }
    }
}

/// Discover every `package.yml` under `repo_root`, as repo-relative paths in sorted order.
///
/// Behavior:
/// - Without `packwerk.yml` (or without `package_paths`), every directory is a candidate.
/// - `package_paths` globs select package directories; `exclude` globs drop files or directories.
/// - The root `package.yml`, when present, is always included.
pub fn discover_manifests(repo_root: &Utf8Path) -> anyhow::Result<Vec<RepoPath>> {
    let config = read_packwerk_config(repo_root)?;
    let package_paths: Vec<String> = config
        .package_paths
        .map(StringOrList::into_vec)
        .unwrap_or_default()
        .into_iter()
        .map(|p| p.trim_end_matches('/').to_string())
        .collect();
    let excludes: Vec<String> = config
        .exclude
        .map(StringOrList::into_vec)
        .unwrap_or_default();

    let package_set = build_globset(&package_paths).context("compile package_paths globset")?;
    let exclude_set = build_globset(&excludes).context("compile exclude globset")?;

    let mut out = Vec::new();
    for abs in WalkDir::new(repo_root)
        .into_iter()
        .filter_entry(|e| !is_skipped_dir(e))
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file() && e.file_name() == ids::MANIFEST_FILE)
        .filter_map(|e| pathbuf_to_utf8(e.path().to_path_buf()))
    {
        let rel = RepoPath::new(abs.strip_prefix(repo_root).unwrap_or(&abs).as_str());
        let dir = rel.parent();
        if dir.is_root() {
            out.push(rel);
            continue;
        }

        let is_package = package_paths.is_empty() || package_set.is_match(dir.as_str());
        let is_excluded =
            exclude_set.is_match(rel.as_str()) || exclude_set.is_match(dir.as_str());
        if is_package && !is_excluded {
            out.push(rel);
        }
    }

    out.sort();
    out.dedup();
    tracing::debug!(count = out.len(), root = %repo_root, "discovered package manifests");
    Ok(out)
}

fn read_packwerk_config(repo_root: &Utf8Path) -> anyhow::Result<PackwerkConfig> {
    let path = repo_root.join(ids::PACKWERK_CONFIG_FILE);
    if !path.is_file() {
        return Ok(PackwerkConfig::default());
    }
    let text = std::fs::read_to_string(&path).with_context(|| format!("read {path}"))?;
    let config: Option<PackwerkConfig> =
        serde_yaml_ng::from_str(&text).with_context(|| format!("parse {path}"))?;
    Ok(config.unwrap_or_default())
}

fn is_skipped_dir(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| SKIPPED_DIRS.contains(&name))
}

fn build_globset(patterns: &[String]) -> anyhow::Result<GlobSet> {
    let mut b = GlobSetBuilder::new();
    for p in patterns {
        b.add(Glob::new(p)?);
    }
    Ok(b.build()?)
}

fn pathbuf_to_utf8(path: PathBuf) -> Option<Utf8PathBuf> {
    Utf8PathBuf::from_path_buf(path).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn utf8_root(tmp: &TempDir) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf8 path")
    }

    fn write_file(path: &Utf8Path, contents: &str) {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent");
        }
        std::fs::write(path, contents).expect("write file");
    }

    fn discovered(root: &Utf8Path) -> Vec<String> {
        discover_manifests(root)
            .expect("discover")
            .iter()
            .map(|p| p.as_str().to_string())
            .collect()
    }

    #[test]
    fn discovers_every_manifest_without_packwerk_config() {
        let tmp = TempDir::new().expect("temp dir");
        let root = utf8_root(&tmp);

        write_file(&root.join("package.yml"), "enforce_dependencies: true\n");
        write_file(&root.join("packs/apples/package.yml"), "");
        write_file(&root.join("packs/fruits/pears/package.yml"), "");

        assert_eq!(
            discovered(&root),
            vec![
                "package.yml",
                "packs/apples/package.yml",
                "packs/fruits/pears/package.yml"
            ]
        );
    }

    #[test]
    fn honors_package_paths_and_exclude() {
        let tmp = TempDir::new().expect("temp dir");
        let root = utf8_root(&tmp);

        write_file(
            &root.join("packwerk.yml"),
            "package_paths:\n  - packs/*\n  - components/*/\nexclude:\n  - packs/legacy*\n",
        );
        write_file(&root.join("packs/apples/package.yml"), "");
        write_file(&root.join("packs/legacy_pears/package.yml"), "");
        write_file(&root.join("components/trees/package.yml"), "");
        write_file(&root.join("elsewhere/thing/package.yml"), "");

        assert_eq!(
            discovered(&root),
            vec!["components/trees/package.yml", "packs/apples/package.yml"]
        );
    }

    #[test]
    fn skips_vendored_and_tooling_directories() {
        let tmp = TempDir::new().expect("temp dir");
        let root = utf8_root(&tmp);

        write_file(&root.join("packs/apples/package.yml"), "");
        write_file(&root.join("vendor/bundle/gems/x/package.yml"), "");
        write_file(&root.join("node_modules/y/package.yml"), "");

        assert_eq!(discovered(&root), vec!["packs/apples/package.yml"]);
    }

    #[test]
    fn single_package_path_string_is_accepted() {
        let tmp = TempDir::new().expect("temp dir");
        let root = utf8_root(&tmp);

        write_file(&root.join("packwerk.yml"), "package_paths: packs/*\n");
        write_file(&root.join("packs/apples/package.yml"), "");
        write_file(&root.join("gems/trees/package.yml"), "");

        assert_eq!(discovered(&root), vec!["packs/apples/package.yml"]);
    }

    #[test]
    fn invalid_glob_returns_error() {
        let tmp = TempDir::new().expect("temp dir");
        let root = utf8_root(&tmp);

        write_file(&root.join("packwerk.yml"), "package_paths:\n  - \"[\"\n");

        let err = discover_manifests(&root).unwrap_err();
        assert!(err.to_string().contains("compile package_paths globset"));
    }
}
