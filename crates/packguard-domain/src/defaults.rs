use crate::error::{ConfigurationError, ConfigurationProblem};
use crate::model::PackageManifest;
use crate::protected::resolve_protections;
use crate::registry::Registry;
use packguard_types::{ViolationBehavior, ids};
use serde_json::{Map, Value};

/// Returns `manifest` with defaults written in for the listed protections.
///
/// Only protections that are unset (absent, null, or empty) and whose default is not
/// `fail_never` are touched. Enforcement of dependencies and privacy is switched on unless
/// the package explicitly sets the matching protection to `fail_never`.
/// Applying this twice gives the same manifest as applying it once.
pub fn with_default_protections(
    manifest: &PackageManifest,
    registry: &Registry,
    identifiers: &[String],
) -> PackageManifest {
    let mut updated = manifest.clone();

    let mut protections = match updated.metadata.get(ids::METADATA_PROTECTIONS) {
        Some(Value::Object(map)) => map.clone(),
        _ => Map::new(),
    };
    let mut changed = false;

    for protection in registry
        .protections()
        .filter(|p| identifiers.iter().any(|id| id == p.identifier()))
    {
        let default = protection.default_behavior();
        if default.fails_never() {
            continue;
        }
        if is_set(protections.get(protection.identifier())) {
            continue;
        }
        protections.insert(
            protection.identifier().to_string(),
            Value::String(default.as_str().to_string()),
        );
        changed = true;
    }

    if !explicitly_off(&protections, ids::PROTECTION_OUTGOING_DEPENDENCY) {
        updated.enforce_dependencies = true;
    }
    if !explicitly_off(&protections, ids::PROTECTION_INCOMING_PRIVACY) {
        updated.enforce_privacy = true;
    }
    if changed {
        updated
            .metadata
            .insert(ids::METADATA_PROTECTIONS.to_string(), Value::Object(protections));
    }
    updated
}

/// Fails on the first problem that makes `manifest` unsafe to rewrite: a malformed
/// `protections` map, unknown keys, or a behavior token that does not parse.
///
/// Unmet preconditions and missing protections are left to `validate`.
pub fn check_rewritable(
    manifest: &PackageManifest,
    registry: &Registry,
) -> Result<(), ConfigurationError> {
    let problem = resolve_protections(manifest, registry)
        .problems
        .into_iter()
        .find(|problem| {
            matches!(
                problem,
                ConfigurationProblem::MalformedProtections { .. }
                    | ConfigurationProblem::UnknownProtectionKeys { .. }
                    | ConfigurationProblem::InvalidBehavior { .. }
            )
        });
    match problem {
        Some(problem) => Err(problem.into()),
        None => Ok(()),
    }
}

fn explicitly_off(protections: &Map<String, Value>, identifier: &str) -> bool {
    matches!(
        protections.get(identifier),
        Some(Value::String(token)) if ViolationBehavior::from_raw(token).is_ok_and(|b| b.fails_never())
    )
}

fn is_set(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    }
}
