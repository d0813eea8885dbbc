use crate::model::{Backlog, PackageManifest, PerFileViolation, ReferenceViolation, ViolationKind};
use packguard_types::ids;
use serde_json::{Map, Value, json};

pub fn manifest(name: &str, enforce_dependencies: bool, enforce_privacy: bool) -> PackageManifest {
    let mut m = PackageManifest::new(name);
    m.enforce_dependencies = enforce_dependencies;
    m.enforce_privacy = enforce_privacy;
    m
}

pub fn with_protections(mut m: PackageManifest, protections: &[(&str, &str)]) -> PackageManifest {
    let map: Map<String, Value> = protections
        .iter()
        .map(|(id, behavior)| (id.to_string(), json!(behavior)))
        .collect();
    m.metadata
        .insert(ids::METADATA_PROTECTIONS.to_string(), Value::Object(map));
    m
}

/// A package with every default-set protection at `behavior`.
pub fn protected_at(name: &str, behavior: &str) -> PackageManifest {
    let enforce = behavior != "fail_never";
    with_protections(
        manifest(name, enforce, enforce),
        &[
            (ids::PROTECTION_OUTGOING_DEPENDENCY, behavior),
            (ids::PROTECTION_INCOMING_PRIVACY, behavior),
            (ids::PROTECTION_TYPED_API, behavior),
            (ids::PROTECTION_NAMESPACE, behavior),
        ],
    )
}

pub fn fully_protected(name: &str) -> PackageManifest {
    protected_at(name, "fail_on_new")
}

/// Overrides one protection on an existing manifest.
pub fn set_protection(mut m: PackageManifest, identifier: &str, behavior: &str) -> PackageManifest {
    let entry = m
        .metadata
        .entry(ids::METADATA_PROTECTIONS.to_string())
        .or_insert_with(|| json!({}));
    entry[identifier] = json!(behavior);
    m
}

pub fn with_dependencies(mut m: PackageManifest, dependencies: &[&str]) -> PackageManifest {
    m.dependencies = dependencies.iter().map(|d| d.to_string()).collect();
    m
}

pub fn with_visible_to(mut m: PackageManifest, visible_to: &[&str]) -> PackageManifest {
    m.metadata
        .insert(ids::METADATA_VISIBLE_TO.to_string(), json!(visible_to));
    m
}

pub fn reference(to_package: &str, class_name: &str, kinds: &[ViolationKind], files: &[&str]) -> ReferenceViolation {
    ReferenceViolation {
        to_package: to_package.to_string(),
        class_name: class_name.to_string(),
        kinds: kinds.to_vec(),
        files: files.iter().map(|f| f.to_string()).collect(),
    }
}

pub fn per_file(
    kind: ViolationKind,
    from: &str,
    to: &str,
    class_name: &str,
    file: &str,
) -> PerFileViolation {
    PerFileViolation {
        class_name: class_name.to_string(),
        file_path: file.to_string(),
        kind,
        constant_source_package: to.to_string(),
        reference_source_package: from.to_string(),
    }
}

pub fn backlog_with_ledger(package: &str, ledger: Vec<ReferenceViolation>) -> Backlog {
    let mut backlog = Backlog::default();
    backlog.ledgers.insert(package.to_string(), ledger);
    backlog
}

pub fn backlog_with_rule_todo(rule: &str, files: &[&str]) -> Backlog {
    let mut backlog = Backlog::default();
    backlog.rule_todo.insert(
        rule.to_string(),
        files.iter().map(|f| f.to_string()).collect(),
    );
    backlog
}
