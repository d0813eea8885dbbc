use crate::error::ConfigurationError;
use crate::model::{Offense, PackageManifest, PerFileViolation};
use crate::protection::{Protection, fail_on_any_suffix};
use crate::workspace::ProtectedWorkspace;
use packguard_types::{ViolationBehavior, ids};
use std::collections::BTreeSet;

/// Hides a package from every package not listed in its `visible_to`.
///
/// Opt-in: the default is `fail_never`.
#[derive(Clone, Copy, Debug, Default)]
pub struct VisibilityProtection;

impl VisibilityProtection {
    fn message(violation: &PerFileViolation) -> String {
        format!(
            "`{}` references non-visible `{}` from `{}`",
            violation.file_path, violation.class_name, violation.constant_source_package
        )
    }

    fn message_for_fail_on_any(violation: &PerFileViolation) -> String {
        fail_on_any_suffix(Self::message(violation), &violation.constant_source_package)
    }

    fn offense(
        &self,
        violation: &PerFileViolation,
        message: String,
        target: &PackageManifest,
    ) -> Offense {
        Offense {
            file: violation.file_path.clone(),
            message,
            violation_type: self.identifier().to_string(),
            package: target.clone(),
        }
    }

    fn recorded_edge_offenses(
        &self,
        workspace: &ProtectedWorkspace<'_>,
    ) -> Result<Vec<Offense>, ConfigurationError> {
        // One offense per (referencer, target, constant), whatever the kinds or files.
        let mut seen = BTreeSet::new();
        let mut offenses = Vec::new();
        for package in workspace.packages() {
            for violation in package.per_file_violations() {
                let edge = (
                    violation.reference_source_package.clone(),
                    violation.constant_source_package.clone(),
                    violation.class_name.clone(),
                );
                if !seen.insert(edge) {
                    continue;
                }

                let target =
                    workspace.package(&violation.constant_source_package, &violation.file_path)?;
                if target.visible_to().contains(&violation.reference_source_package) {
                    continue;
                }
                if !target.violation_behavior_for(self.identifier()).fails_on_any() {
                    continue;
                }
                offenses.push(self.offense(
                    &violation,
                    Self::message_for_fail_on_any(&violation),
                    target.manifest(),
                ));
            }
        }
        Ok(offenses)
    }

    fn declared_dependency_offenses(
        &self,
        workspace: &ProtectedWorkspace<'_>,
    ) -> Result<Vec<Offense>, ConfigurationError> {
        let mut offenses = Vec::new();
        for package in workspace.packages() {
            let declarer = package.manifest();
            for dependency in package.dependencies() {
                let target = workspace.package(dependency, declarer.manifest_path.as_str())?;
                if target.visible_to().contains(package.name()) {
                    continue;
                }
                if target.violation_behavior_for(self.identifier()).fails_never() {
                    continue;
                }
                offenses.push(Offense {
                    file: declarer.manifest_path.as_str().to_string(),
                    message: format!(
                        "`{}` cannot state a dependency on `{}`, as it violates package visibility in `{}`",
                        package.name(),
                        target.name(),
                        target.manifest().manifest_path
                    ),
                    violation_type: self.identifier().to_string(),
                    package: target.manifest().clone(),
                });
            }
        }
        Ok(offenses)
    }
}

impl Protection for VisibilityProtection {
    fn identifier(&self) -> &str {
        ids::PROTECTION_VISIBILITY
    }

    fn humanized_name(&self) -> &str {
        "Visibility Violations"
    }

    fn humanized_description(&self) -> String {
        "These files are using a constant from a package that restricts its usage through the `visible_to` flag in its `package.yml`\n\
         To resolve these violations, work with the team who owns the package you are trying to use and to figure out the\n\
         preferred public API for the behavior you want.\n"
            .to_string()
    }

    fn default_behavior(&self) -> ViolationBehavior {
        ViolationBehavior::FailNever
    }

    fn unmet_preconditions_for(
        &self,
        behavior: ViolationBehavior,
        package: &PackageManifest,
    ) -> Option<String> {
        if behavior.enabled() && !package.enforce_privacy {
            Some(format!(
                "Package {} must have `enforce_privacy: true` to use this protection",
                package.name
            ))
        } else if !behavior.enabled() && package.has_visible_to() {
            Some(format!(
                "Invalid configuration for package `{}`. `{}` must be turned on to use `visible_to` configuration.",
                package.name,
                self.identifier()
            ))
        } else {
            None
        }
    }

    fn offenses_for_new_violations(
        &self,
        workspace: &ProtectedWorkspace<'_>,
        new_violations: &[PerFileViolation],
    ) -> Result<Vec<Offense>, ConfigurationError> {
        let mut offenses = Vec::new();
        for violation in new_violations {
            let target =
                workspace.package(&violation.constant_source_package, &violation.file_path)?;
            if target.visible_to().contains(&violation.reference_source_package) {
                continue;
            }
            let message = match target.violation_behavior_for(self.identifier()) {
                ViolationBehavior::FailNever => continue,
                ViolationBehavior::FailOnNew => Self::message(violation),
                ViolationBehavior::FailOnAny => Self::message_for_fail_on_any(violation),
            };
            offenses.push(self.offense(violation, message, target.manifest()));
        }
        Ok(offenses)
    }

    fn offenses_for_existing_violations(
        &self,
        workspace: &ProtectedWorkspace<'_>,
    ) -> Result<Vec<Offense>, ConfigurationError> {
        let mut offenses = self.recorded_edge_offenses(workspace)?;
        offenses.extend(self.declared_dependency_offenses(workspace)?);
        Ok(offenses)
    }
}
