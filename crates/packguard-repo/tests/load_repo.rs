//! Integration tests for loading a repository from disk.

use camino::{Utf8Path, Utf8PathBuf};
use packguard_repo::{load_backlog, load_packages, read_manifest, write_manifest};
use packguard_types::RepoPath;
use serde_json::json;
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

fn fruit_repo() -> (TempDir, Utf8PathBuf) {
    let tmp = TempDir::new().expect("temp dir");
    let root = utf8_root(&tmp);

    write_file(&root.join("package.yml"), "enforce_dependencies: false\n");
    write_file(
        &root.join("packs/apples/package.yml"),
        r#"enforce_dependencies: true
enforce_privacy: true
dependencies:
  - packs/trees
metadata:
  protections:
    prevent_this_package_from_exposing_an_untyped_api: fail_on_any
"#,
    );
    write_file(&root.join("packs/apples/README.md"), "# Apples\n");
    write_file(
        &root.join("packs/trees/package.yml"),
        "enforce_privacy: strict\nowner: Tree Team\n",
    );
    (tmp, root)
}

#[test]
fn packages_are_named_after_their_directories() {
    let (_tmp, root) = fruit_repo();
    let packages = load_packages(&root).expect("load packages");

    let names: Vec<&str> = packages.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec![".", "packs/apples", "packs/trees"]);

    let apples = &packages[1];
    assert!(apples.has_readme);
    assert_eq!(apples.dependencies, vec!["packs/trees"]);
    assert_eq!(apples.manifest_path.as_str(), "packs/apples/package.yml");

    let trees = &packages[2];
    assert!(!trees.has_readme);
    assert!(trees.enforce_privacy);
    assert_eq!(trees.extra["owner"], json!("Tree Team"));
}

#[test]
fn ledgers_fall_back_to_the_legacy_file() {
    let (_tmp, root) = fruit_repo();
    write_file(
        &root.join("packs/apples/package_todo.yml"),
        r#"---
packs/trees:
  "::Tree":
    violations:
    - dependency
    files:
    - packs/apples/app/models/apple.rb
"#,
    );
    write_file(
        &root.join("packs/trees/deprecated_references.yml"),
        r#"---
packs/apples:
  "::Apple":
    violations:
    - privacy
    files:
    - packs/trees/app/models/tree.rb
"#,
    );

    let packages = load_packages(&root).expect("load packages");
    let backlog = load_backlog(&root, &packages).expect("load backlog");

    assert_eq!(backlog.ledger_for("packs/apples")[0].to_package, "packs/trees");
    assert_eq!(backlog.ledger_for("packs/trees")[0].class_name, "::Apple");
    assert!(backlog.ledger_for(".").is_empty());
}

#[test]
fn rule_todo_merges_root_and_package_files_and_drops_missing_files() {
    let (_tmp, root) = fruit_repo();
    write_file(&root.join("packs/apples/app/public/tool.rb"), "");
    write_file(&root.join("packs/trees/app/public/branch.rb"), "");
    write_file(
        &root.join(".rubocop_todo.yml"),
        r#"PackageProtections/TypedPublicApi:
  Exclude:
    - packs/apples/app/public/tool.rb
    - packs/apples/app/public/deleted.rb
"#,
    );
    write_file(
        &root.join("packs/trees/.rubocop_todo.yml"),
        r#"PackageProtections/TypedPublicApi:
  Exclude:
    - packs/trees/app/public/branch.rb
"#,
    );
    write_file(&root.join("packs/apples/.rubocop_todo.yml"), "");

    let packages = load_packages(&root).expect("load packages");
    let backlog = load_backlog(&root, &packages).expect("load backlog");

    let flagged: Vec<&str> = backlog
        .flagged_files("PackageProtections/TypedPublicApi")
        .expect("rule present")
        .iter()
        .map(String::as_str)
        .collect();
    assert_eq!(
        flagged,
        vec![
            "packs/apples/app/public/tool.rb",
            "packs/trees/app/public/branch.rb"
        ]
    );
}

#[test]
fn malformed_ledger_is_an_error() {
    let (_tmp, root) = fruit_repo();
    write_file(&root.join("packs/apples/package_todo.yml"), "packs/trees: [oops\n");

    let packages = load_packages(&root).expect("load packages");
    let err = load_backlog(&root, &packages).unwrap_err();
    assert!(format!("{err:#}").contains("package_todo.yml"));
}

#[test]
fn rewritten_manifest_preserves_unknown_keys() {
    let (_tmp, root) = fruit_repo();
    let path = RepoPath::new("packs/trees/package.yml");

    let mut trees = read_manifest(&root, &path).expect("read trees");
    trees.enforce_dependencies = true;
    trees
        .metadata
        .insert("protections".to_string(), json!({ "a": "fail_on_new" }));
    write_manifest(&root, &trees).expect("write trees");

    let reread = read_manifest(&root, &path).expect("reread trees");
    assert_eq!(reread, trees);
    assert_eq!(reread.extra["owner"], json!("Tree Team"));
}
