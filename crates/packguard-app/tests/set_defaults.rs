//! Integration tests for writing default protections back to disk.

use camino::{Utf8Path, Utf8PathBuf};
use packguard_app::{EvaluationContext, SetDefaultsInput, run_check, run_set_defaults, run_validate};
use packguard_settings::Overrides;
use packguard_types::ids;
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

fn unprotected_repo() -> (TempDir, Utf8PathBuf) {
    let tmp = TempDir::new().expect("temp dir");
    let root = utf8_root(&tmp);
    write_file(
        &root.join("packs/apples/package.yml"),
        "enforce_dependencies: false\ndependencies:\n  - packs/trees\nowner: Fruit Team\n",
    );
    write_file(
        &root.join("packs/trees/package.yml"),
        &format!(
            "metadata:\n  protections:\n    {}: fail_on_any\n",
            ids::PROTECTION_TYPED_API
        ),
    );
    (tmp, root)
}

#[test]
fn defaults_make_an_invalid_repo_valid() {
    let (_tmp, root) = unprotected_repo();
    let mut ctx = EvaluationContext::new(&root, "", Overrides::default());
    assert_eq!(run_validate(&mut ctx).expect("validate").len(), 2);

    let output = run_set_defaults(
        &mut ctx,
        SetDefaultsInput {
            verbose: true,
            ..SetDefaultsInput::default()
        },
    )
    .expect("set defaults");
    assert_eq!(output.written, vec!["packs/apples", "packs/trees"]);

    assert!(run_validate(&mut ctx).expect("validate").is_empty());
    assert!(run_check(&mut ctx, &[]).is_ok());
}

#[test]
fn defaults_keep_explicit_choices_and_unknown_keys() {
    let (_tmp, root) = unprotected_repo();
    let mut ctx = EvaluationContext::new(&root, "", Overrides::default());
    run_set_defaults(&mut ctx, SetDefaultsInput::default()).expect("set defaults");

    let packages = ctx.packages().expect("packages");
    let apples = &packages[0];
    assert!(apples.enforce_dependencies);
    assert!(apples.enforce_privacy);
    assert_eq!(apples.dependencies, vec!["packs/trees"]);
    assert_eq!(apples.extra["owner"], "Fruit Team");
    assert_eq!(
        apples.metadata["protections"][ids::PROTECTION_NAMESPACE],
        "fail_on_new"
    );
    assert!(
        apples.metadata["protections"]
            .get(ids::PROTECTION_VISIBILITY)
            .is_none()
    );

    let trees = &packages[1];
    assert_eq!(
        trees.metadata["protections"][ids::PROTECTION_TYPED_API],
        "fail_on_any"
    );
}

#[test]
fn running_twice_changes_nothing() {
    let (_tmp, root) = unprotected_repo();
    let mut ctx = EvaluationContext::new(&root, "", Overrides::default());
    run_set_defaults(&mut ctx, SetDefaultsInput::default()).expect("first run");
    let first = std::fs::read_to_string(root.join("packs/apples/package.yml")).expect("read");

    run_set_defaults(&mut ctx, SetDefaultsInput::default()).expect("second run");
    let second = std::fs::read_to_string(root.join("packs/apples/package.yml")).expect("read");
    assert_eq!(first, second);
}

#[test]
fn only_selected_packages_are_written() {
    let (_tmp, root) = unprotected_repo();
    let before = std::fs::read_to_string(root.join("packs/trees/package.yml")).expect("read");

    let mut ctx = EvaluationContext::new(&root, "", Overrides::default());
    let output = run_set_defaults(
        &mut ctx,
        SetDefaultsInput {
            packages: Some(vec!["packs/apples".to_string()]),
            ..SetDefaultsInput::default()
        },
    )
    .expect("set defaults");

    assert_eq!(output.written, vec!["packs/apples"]);
    let after = std::fs::read_to_string(root.join("packs/trees/package.yml")).expect("read");
    assert_eq!(before, after);
}

#[test]
fn nothing_is_written_when_a_manifest_has_a_bad_token() {
    let (_tmp, root) = unprotected_repo();
    write_file(
        &root.join("packs/pears/package.yml"),
        &format!(
            "metadata:\n  protections:\n    {}: sometimes\n",
            ids::PROTECTION_OUTGOING_DEPENDENCY
        ),
    );
    let before = std::fs::read_to_string(root.join("packs/apples/package.yml")).expect("read");

    let mut ctx = EvaluationContext::new(&root, "", Overrides::default());
    let err = run_set_defaults(&mut ctx, SetDefaultsInput::default()).unwrap_err();
    assert!(err.to_string().contains("defaults for packs/pears are not valid"));
    assert!(format!("{err:#}").contains("sometimes"));

    let after = std::fs::read_to_string(root.join("packs/apples/package.yml")).expect("read");
    assert_eq!(before, after);
}

#[test]
fn explicit_opt_out_survives_defaulting() {
    let tmp = TempDir::new().expect("temp dir");
    let root = utf8_root(&tmp);
    write_file(
        &root.join("packs/apples/package.yml"),
        &format!(
            "enforce_dependencies: false\nenforce_privacy: true\nmetadata:\n  protections:\n    \
             {}: fail_never\n    {}: fail_on_new\n    {}: fail_on_new\n    {}: fail_on_new\n",
            ids::PROTECTION_OUTGOING_DEPENDENCY,
            ids::PROTECTION_INCOMING_PRIVACY,
            ids::PROTECTION_TYPED_API,
            ids::PROTECTION_NAMESPACE,
        ),
    );
    write_file(&root.join("packs/trees/package.yml"), "");

    let mut ctx = EvaluationContext::new(&root, "", Overrides::default());
    assert_eq!(run_validate(&mut ctx).expect("validate").len(), 1);

    let output = run_set_defaults(&mut ctx, SetDefaultsInput::default()).expect("set defaults");
    assert_eq!(output.written, vec!["packs/apples", "packs/trees"]);

    let packages = ctx.packages().expect("packages");
    assert!(!packages[0].enforce_dependencies);
    assert!(packages[0].enforce_privacy);
    assert!(packages[1].enforce_dependencies);
    assert!(run_validate(&mut ctx).expect("validate").is_empty());
}

#[test]
fn a_single_protection_can_be_defaulted_on_an_unconfigured_package() {
    let tmp = TempDir::new().expect("temp dir");
    let root = utf8_root(&tmp);
    write_file(&root.join("packs/trees/package.yml"), "");

    let mut ctx = EvaluationContext::new(&root, "", Overrides::default());
    let output = run_set_defaults(
        &mut ctx,
        SetDefaultsInput {
            packages: Some(vec!["packs/trees".to_string()]),
            identifiers: Some(vec![ids::PROTECTION_TYPED_API.to_string()]),
            verbose: false,
        },
    )
    .expect("set defaults");
    assert_eq!(output.written, vec!["packs/trees"]);

    let packages = ctx.packages().expect("packages");
    let protections = packages[0].metadata["protections"]
        .as_object()
        .expect("protections map");
    assert_eq!(protections.len(), 1);
    assert_eq!(protections[ids::PROTECTION_TYPED_API], "fail_on_new");

    let messages = run_validate(&mut ctx).expect("validate");
    assert_eq!(messages.len(), 1);
    assert!(messages[0].contains("Missing protections"));
}

#[test]
fn unknown_protection_is_rejected() {
    let (_tmp, root) = unprotected_repo();
    let mut ctx = EvaluationContext::new(&root, "", Overrides::default());
    let err = run_set_defaults(
        &mut ctx,
        SetDefaultsInput {
            identifiers: Some(vec!["prevent_everything".to_string()]),
            ..SetDefaultsInput::default()
        },
    )
    .unwrap_err();
    assert!(err.to_string().contains("unknown protection: prevent_everything"));
}
