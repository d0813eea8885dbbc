use crate::error::ConfigurationError;
use crate::model::{Offense, PackageManifest, PerFileViolation};
use crate::rule_engine::RuleEngineProtection;
use crate::workspace::ProtectedWorkspace;
use packguard_types::ViolationBehavior;

/// One governance rule, evaluated across every package in a workspace.
///
/// Implementations decide which package's behavior governs each violation
/// (the referencing package for outgoing rules, the referenced one for incoming
/// rules) and which package the resulting offense is attributed to.
pub trait Protection {
    /// Key under `metadata.protections`. Unique within a registry.
    fn identifier(&self) -> &str;

    fn humanized_name(&self) -> &str;

    /// Remediation guidance shown next to this protection's offenses.
    fn humanized_description(&self) -> String;

    /// Behavior assumed when a package leaves this protection unset.
    ///
    /// Only `FailNever` defaults may be left implicit; any other default must be
    /// written into the manifest explicitly.
    fn default_behavior(&self) -> ViolationBehavior {
        ViolationBehavior::FailOnNew
    }

    /// Explains why `behavior` cannot be used for `package`, or `None` if it can.
    fn unmet_preconditions_for(
        &self,
        behavior: ViolationBehavior,
        package: &PackageManifest,
    ) -> Option<String>;

    fn supports_behavior(&self, behavior: ViolationBehavior, package: &PackageManifest) -> bool {
        self.unmet_preconditions_for(behavior, package).is_none()
    }

    fn offenses_for_new_violations(
        &self,
        workspace: &ProtectedWorkspace<'_>,
        new_violations: &[PerFileViolation],
    ) -> Result<Vec<Offense>, ConfigurationError>;

    fn offenses_for_existing_violations(
        &self,
        workspace: &ProtectedWorkspace<'_>,
    ) -> Result<Vec<Offense>, ConfigurationError>;

    /// New-violation offenses followed by backlog offenses, stably sorted by message.
    fn get_offenses(
        &self,
        workspace: &ProtectedWorkspace<'_>,
        new_violations: &[PerFileViolation],
    ) -> Result<Vec<Offense>, ConfigurationError> {
        let mut offenses = self.offenses_for_new_violations(workspace, new_violations)?;
        offenses.extend(self.offenses_for_existing_violations(workspace)?);
        offenses.sort_by(|a, b| a.message.cmp(&b.message));
        Ok(offenses)
    }

    /// Access to the rule-engine half, for protections delegated to an external linter.
    fn as_rule_engine(&self) -> Option<&dyn RuleEngineProtection> {
        None
    }
}

/// Suffix appended to messages when the governing package is `fail_on_any`.
pub(crate) fn fail_on_any_suffix(message: String, governing_package: &str) -> String {
    format!("{message} (`{governing_package}` set to `fail_on_any`)")
}
