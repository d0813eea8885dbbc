use crate::error::ConfigurationProblem;
use crate::model::PackageManifest;
use crate::protected::resolve_protections;
use crate::registry::Registry;

/// Every configuration problem across `packages`, in package order.
pub fn configuration_problems(
    registry: &Registry,
    packages: &[PackageManifest],
) -> Vec<ConfigurationProblem> {
    packages
        .iter()
        .flat_map(|manifest| resolve_protections(manifest, registry).problems)
        .collect()
}

/// One human-readable message per configuration problem. Never fails; empty means valid.
pub fn validate(registry: &Registry, packages: &[PackageManifest]) -> Vec<String> {
    configuration_problems(registry, packages)
        .iter()
        .map(ToString::to_string)
        .collect()
}
