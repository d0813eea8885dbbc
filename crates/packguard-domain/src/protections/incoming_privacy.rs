use crate::error::ConfigurationError;
use crate::model::{Offense, PackageManifest, PerFileViolation};
use crate::protection::{Protection, fail_on_any_suffix};
use crate::workspace::ProtectedWorkspace;
use packguard_types::{ViolationBehavior, ids};

/// Stops other packages from using a package's private constants.
///
/// Governed by the referenced package's behavior; offenses are attributed to it.
#[derive(Clone, Copy, Debug, Default)]
pub struct IncomingPrivacyProtection;

impl IncomingPrivacyProtection {
    fn message(violation: &PerFileViolation) -> String {
        format!(
            "`{}` references private `{}` from `{}`",
            violation.file_path, violation.class_name, violation.constant_source_package
        )
    }

    fn message_for_fail_on_any(violation: &PerFileViolation) -> String {
        fail_on_any_suffix(Self::message(violation), &violation.constant_source_package)
    }
}

impl Protection for IncomingPrivacyProtection {
    fn identifier(&self) -> &str {
        ids::PROTECTION_INCOMING_PRIVACY
    }

    fn humanized_name(&self) -> &str {
        "Privacy Violations"
    }

    fn humanized_description(&self) -> String {
        "To resolve these violations, check the `public/` folder in each pack for public constants and APIs.\n\
         If you need help or can't find what you need to meet your use case, reach out to the owning team.\n"
            .to_string()
    }

    fn unmet_preconditions_for(
        &self,
        behavior: ViolationBehavior,
        package: &PackageManifest,
    ) -> Option<String> {
        match (behavior.enabled(), package.enforce_privacy) {
            (true, false) => Some(format!(
                "Package {} must have `enforce_privacy: true` to use this protection",
                package.name
            )),
            (false, true) => Some(format!(
                "Package {} must have `enforce_privacy: false` to turn this protection off",
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
        for violation in new_violations.iter().filter(|v| v.is_privacy()) {
            let target =
                workspace.package(&violation.constant_source_package, &violation.file_path)?;
            let message = match target.violation_behavior_for(self.identifier()) {
                ViolationBehavior::FailNever => continue,
                ViolationBehavior::FailOnNew => Self::message(violation),
                ViolationBehavior::FailOnAny => Self::message_for_fail_on_any(violation),
            };
            offenses.push(Offense {
                file: violation.file_path.clone(),
                message,
                violation_type: self.identifier().to_string(),
                package: target.manifest().clone(),
            });
        }
        Ok(offenses)
    }

    fn offenses_for_existing_violations(
        &self,
        workspace: &ProtectedWorkspace<'_>,
    ) -> Result<Vec<Offense>, ConfigurationError> {
        let recorded: Vec<PerFileViolation> = workspace
            .packages()
            .iter()
            .flat_map(|p| p.per_file_violations())
            .filter(|v| v.is_privacy())
            .collect();

        let mut offenses = Vec::new();
        for violation in &recorded {
            let target =
                workspace.package(&violation.constant_source_package, &violation.file_path)?;
            if !target.violation_behavior_for(self.identifier()).fails_on_any() {
                continue;
            }
            offenses.push(Offense {
                file: violation.file_path.clone(),
                message: Self::message_for_fail_on_any(violation),
                violation_type: self.identifier().to_string(),
                package: target.manifest().clone(),
            });
        }
        Ok(offenses)
    }
}
