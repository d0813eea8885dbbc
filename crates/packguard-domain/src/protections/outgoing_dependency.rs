use crate::error::ConfigurationError;
use crate::model::{Offense, PackageManifest, PerFileViolation};
use crate::protection::{Protection, fail_on_any_suffix};
use crate::workspace::ProtectedWorkspace;
use packguard_types::{ViolationBehavior, ids};

/// Stops a package from reaching into packages it has not declared as dependencies.
///
/// Governed by the referencing package's behavior.
#[derive(Clone, Copy, Debug, Default)]
pub struct OutgoingDependencyProtection;

impl OutgoingDependencyProtection {
    fn message(violation: &PerFileViolation) -> String {
        format!(
            "`{}` depends on `{}` from `{}`",
            violation.file_path, violation.class_name, violation.constant_source_package
        )
    }

    fn message_for_fail_on_any(violation: &PerFileViolation) -> String {
        fail_on_any_suffix(
            Self::message(violation),
            &violation.reference_source_package,
        )
    }
}

impl Protection for OutgoingDependencyProtection {
    fn identifier(&self) -> &str {
        ids::PROTECTION_OUTGOING_DEPENDENCY
    }

    fn humanized_name(&self) -> &str {
        "Dependency Violations"
    }

    fn humanized_description(&self) -> String {
        "To resolve these violations, should you add a dependency in the client's `package.yml`?\n\
         Is the code referencing the constant, and the referenced constant, in the right packages?\n"
            .to_string()
    }

    fn unmet_preconditions_for(
        &self,
        behavior: ViolationBehavior,
        package: &PackageManifest,
    ) -> Option<String> {
        match (behavior.enabled(), package.enforce_dependencies) {
            (true, false) => Some(format!(
                "Package {} must have `enforce_dependencies: true` to use this protection",
                package.name
            )),
            (false, true) => Some(format!(
                "Package {} must have `enforce_dependencies: false` to turn this protection off",
                package.name
            )),
            _ => None,
        }
    }

    fn offenses_for_new_violations(
        &self,
        workspace: &ProtectedWorkspace<'_>,
        new_violations: &[PerFileViolation],
    ) -> Result<Vec<Offense>, ConfigurationError> {
        let mut offenses = Vec::new();
        for violation in new_violations.iter().filter(|v| v.is_dependency()) {
            let referencing =
                workspace.package(&violation.reference_source_package, &violation.file_path)?;
            let message = match referencing.violation_behavior_for(self.identifier()) {
                ViolationBehavior::FailNever => continue,
                ViolationBehavior::FailOnNew => Self::message(violation),
                ViolationBehavior::FailOnAny => Self::message_for_fail_on_any(violation),
            };
            offenses.push(Offense {
                file: violation.file_path.clone(),
                message,
                violation_type: self.identifier().to_string(),
                package: referencing.manifest().clone(),
            });
        }
        Ok(offenses)
    }

    fn offenses_for_existing_violations(
        &self,
        workspace: &ProtectedWorkspace<'_>,
    ) -> Result<Vec<Offense>, ConfigurationError> {
        let mut offenses = Vec::new();
        for package in workspace.packages() {
            if !package.violation_behavior_for(self.identifier()).fails_on_any() {
                continue;
            }
            for violation in package
                .per_file_violations()
                .iter()
                .filter(|v| v.is_dependency())
            {
                offenses.push(Offense {
                    file: violation.file_path.clone(),
                    message: Self::message_for_fail_on_any(violation),
                    violation_type: self.identifier().to_string(),
                    package: package.manifest().clone(),
                });
            }
        }
        Ok(offenses)
    }
}
