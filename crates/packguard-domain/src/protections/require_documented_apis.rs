use crate::error::ConfigurationError;
use crate::model::{Offense, PackageManifest, PerFileViolation};
use crate::protection::Protection;
use crate::rule_engine::{self, RuleEngineProtection};
use crate::workspace::ProtectedWorkspace;
use packguard_types::{ViolationBehavior, ids};

/// Every public API method needs a documentation comment.
#[derive(Clone, Copy, Debug, Default)]
pub struct RequireDocumentedApisProtection;

impl Protection for RequireDocumentedApisProtection {
    fn identifier(&self) -> &str {
        ids::PROTECTION_DOCUMENTED_APIS
    }

    fn humanized_name(&self) -> &str {
        "Documented Public APIs"
    }

    fn humanized_description(&self) -> String {
        format!(
            "All public API must have a documentation comment (between the signature and method).\n\
             This is failing because these files are in `{}` under `{}`.\n\
             If you want to be able to ignore these files, you'll need to open the file's package's `package.yml` file and\n\
             change `{}` to `{}`\n",
            ids::RULE_TODO_FILE,
            self.rule_name(),
            self.identifier(),
            ViolationBehavior::FailOnNew
        )
    }

    fn default_behavior(&self) -> ViolationBehavior {
        ViolationBehavior::FailNever
    }

    fn unmet_preconditions_for(
        &self,
        behavior: ViolationBehavior,
        package: &PackageManifest,
    ) -> Option<String> {
        if behavior.fails_never() || package.has_readme {
            return None;
        }
        Some(format!(
            "This package must have a readme at {} to use this protection",
            package.directory.join(ids::README_FILE)
        ))
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

impl RuleEngineProtection for RequireDocumentedApisProtection {
    fn rule_name(&self) -> &str {
        ids::RULE_REQUIRE_DOCUMENTED_PUBLIC_APIS
    }

    fn included_globs(&self) -> &[&str] {
        &["app/public/**/*"]
    }

    fn message_for_fail_on_any(&self, file: &str) -> String {
        format!("`{file}` must contain documentation on every method (between signature and method)")
    }
}
