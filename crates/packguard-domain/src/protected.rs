use crate::error::{ConfigurationError, ConfigurationProblem};
use crate::model::{Backlog, PackageManifest, PerFileViolation, ReferenceViolation};
use crate::registry::Registry;
use packguard_types::ViolationBehavior;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

/// A package whose protections have been resolved against a registry.
#[derive(Clone, Debug, PartialEq)]
pub struct ProtectedPackage {
    manifest: PackageManifest,
    protections: BTreeMap<String, ViolationBehavior>,
    violations: Vec<ReferenceViolation>,
}

/// Outcome of reading `metadata.protections` against a registry.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Resolution {
    pub behaviors: BTreeMap<String, ViolationBehavior>,
    pub problems: Vec<ConfigurationProblem>,
}

/// Resolves one behavior per registry identifier, collecting every problem found.
///
/// Problems are reported in a fixed order: key-set problems, then per-protection
/// problems in registry order, then the batched list of missing protections.
pub fn resolve_protections(manifest: &PackageManifest, registry: &Registry) -> Resolution {
    let mut resolution = Resolution::default();
    let package = manifest.name.as_str();

    let empty = serde_json::Map::new();
    let configured = match manifest.protections_metadata() {
        None => &empty,
        Some(Value::Object(map)) => map,
        Some(other) => {
            resolution
                .problems
                .push(ConfigurationProblem::MalformedProtections {
                    package: package.to_string(),
                    found: other.to_string(),
                });
            &empty
        }
    };

    let unknown: Vec<String> = configured
        .keys()
        .filter(|key| !registry.contains(key))
        .cloned()
        .collect();
    if !unknown.is_empty() {
        resolution
            .problems
            .push(ConfigurationProblem::UnknownProtectionKeys {
                package: package.to_string(),
                keys: unknown,
                valid: registry.identifiers(),
            });
    }

    let mut missing = Vec::new();
    for protection in registry.protections() {
        let identifier = protection.identifier();
        let behavior = match configured.get(identifier) {
            None => {
                if protection.default_behavior().fails_never() {
                    resolution
                        .behaviors
                        .insert(identifier.to_string(), ViolationBehavior::FailNever);
                } else {
                    missing.push(identifier.to_string());
                }
                continue;
            }
            Some(Value::Null) => protection.default_behavior(),
            Some(Value::String(token)) => match ViolationBehavior::from_raw(token) {
                Ok(behavior) => behavior,
                Err(invalid) => {
                    resolution.problems.push(ConfigurationProblem::InvalidBehavior {
                        package: package.to_string(),
                        identifier: identifier.to_string(),
                        invalid,
                    });
                    continue;
                }
            },
            Some(other) => match ViolationBehavior::from_raw(&other.to_string()) {
                Ok(behavior) => behavior,
                Err(invalid) => {
                    resolution.problems.push(ConfigurationProblem::InvalidBehavior {
                        package: package.to_string(),
                        identifier: identifier.to_string(),
                        invalid,
                    });
                    continue;
                }
            },
        };

        if let Some(explanation) = protection.unmet_preconditions_for(behavior, manifest) {
            resolution
                .problems
                .push(ConfigurationProblem::UnmetPrecondition {
                    package: package.to_string(),
                    identifier: identifier.to_string(),
                    explanation,
                });
        }
        resolution
            .behaviors
            .insert(identifier.to_string(), behavior);
    }

    if !missing.is_empty() {
        resolution
            .problems
            .push(ConfigurationProblem::MissingProtections {
                package: package.to_string(),
                identifiers: missing,
            });
    }

    resolution
}

impl ProtectedPackage {
    /// Resolves `manifest` against `registry`, failing on the first problem.
    pub fn from_manifest(
        manifest: &PackageManifest,
        registry: &Registry,
        backlog: &Backlog,
    ) -> Result<Self, ConfigurationError> {
        let resolution = resolve_protections(manifest, registry);
        if let Some(problem) = resolution.problems.into_iter().next() {
            return Err(problem.into());
        }

        Ok(Self {
            manifest: manifest.clone(),
            protections: resolution.behaviors,
            violations: backlog.ledger_for(&manifest.name).to_vec(),
        })
    }

    pub fn name(&self) -> &str {
        &self.manifest.name
    }

    pub fn manifest(&self) -> &PackageManifest {
        &self.manifest
    }

    pub fn protections(&self) -> &BTreeMap<String, ViolationBehavior> {
        &self.protections
    }

    /// Resolved behavior for `identifier`. Identifiers outside the registry are never enforced.
    pub fn violation_behavior_for(&self, identifier: &str) -> ViolationBehavior {
        self.protections
            .get(identifier)
            .copied()
            .unwrap_or(ViolationBehavior::FailNever)
    }

    pub fn dependencies(&self) -> &[String] {
        &self.manifest.dependencies
    }

    pub fn visible_to(&self) -> BTreeSet<String> {
        self.manifest.visible_to()
    }

    /// The package's ledger records.
    pub fn violations(&self) -> &[ReferenceViolation] {
        &self.violations
    }

    /// The ledger expanded to one entry per (kind, file), with this package as the referencer.
    pub fn per_file_violations(&self) -> Vec<PerFileViolation> {
        self.violations
            .iter()
            .flat_map(|raw| PerFileViolation::expand(raw, self.name()))
            .collect()
    }
}
