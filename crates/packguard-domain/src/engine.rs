use crate::error::ConfigurationError;
use crate::model::{Backlog, Offense, PackageManifest, PerFileViolation};
use crate::registry::Registry;
use crate::rule_engine::RuleConfig;
use crate::workspace::ProtectedWorkspace;

/// Evaluates every registered protection over `packages`.
///
/// Offenses come grouped by protection in registry order, each group sorted by message.
/// Any package with a configuration problem aborts the whole evaluation.
pub fn get_offenses(
    registry: &Registry,
    packages: &[PackageManifest],
    new_violations: &[PerFileViolation],
    backlog: &Backlog,
) -> Result<Vec<Offense>, ConfigurationError> {
    let workspace = ProtectedWorkspace::build(registry, packages, backlog)?;

    let mut offenses = Vec::new();
    for protection in registry.protections() {
        offenses.extend(protection.get_offenses(&workspace, new_violations)?);
    }
    Ok(offenses)
}

/// Rule-engine configuration for every rule-engine-backed protection, in registry order.
pub fn rule_configs(
    registry: &Registry,
    packages: &[PackageManifest],
    backlog: &Backlog,
) -> Result<Vec<RuleConfig>, ConfigurationError> {
    let workspace = ProtectedWorkspace::build(registry, packages, backlog)?;

    Ok(registry
        .protections()
        .filter_map(|p| p.as_rule_engine())
        .flat_map(|p| p.rule_configs(&workspace, registry))
        .collect())
}
