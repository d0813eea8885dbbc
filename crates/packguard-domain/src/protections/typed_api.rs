use crate::error::ConfigurationError;
use crate::model::{Offense, PackageManifest, PerFileViolation};
use crate::protection::Protection;
use crate::rule_engine::{self, RuleEngineProtection};
use crate::workspace::ProtectedWorkspace;
use packguard_types::{ViolationBehavior, ids};

/// Requires every file under `app/public` to be strictly typed.
#[derive(Clone, Copy, Debug, Default)]
pub struct TypedApiProtection;

impl Protection for TypedApiProtection {
    fn identifier(&self) -> &str {
        ids::PROTECTION_TYPED_API
    }

    fn humanized_name(&self) -> &str {
        "Typed API Violations"
    }

    fn humanized_description(&self) -> String {
        format!(
            "These files cannot have ANY Ruby files in the public API that are not typed strict or higher.\n\
             This is failing because these files are in `{}` under `{}`.\n\
             If you want to be able to ignore these files, you'll need to open the file's package's `package.yml` file and\n\
             change `{}` to `{}`\n",
            ids::RULE_TODO_FILE,
            self.rule_name(),
            self.identifier(),
            ViolationBehavior::FailOnNew
        )
    }

    fn unmet_preconditions_for(
        &self,
        _behavior: ViolationBehavior,
        _package: &PackageManifest,
    ) -> Option<String> {
        None
    }

    fn offenses_for_new_violations(
        &self,
        _workspace: &ProtectedWorkspace<'_>,
        _new_violations: &[PerFileViolation],
    ) -> Result<Vec<Offense>, ConfigurationError> {
        Ok(Vec::new())
    }

    fn offenses_for_existing_violations(
        &self,
        workspace: &ProtectedWorkspace<'_>,
    ) -> Result<Vec<Offense>, ConfigurationError> {
        rule_engine::existing_offenses(self, workspace)
    }

    fn as_rule_engine(&self) -> Option<&dyn RuleEngineProtection> {
        Some(self)
    }
}

impl RuleEngineProtection for TypedApiProtection {
    fn rule_name(&self) -> &str {
        ids::RULE_TYPED_PUBLIC_API
    }

    fn included_globs(&self) -> &[&str] {
        &["app/public/**/*"]
    }

    fn message_for_fail_on_any(&self, file: &str) -> String {
        format!("{file} should be `typed: strict`")
    }
}
