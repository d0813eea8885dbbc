use crate::error::ConfigurationError;
use crate::model::{Offense, PackageManifest, PerFileViolation};
use crate::protection::Protection;
use crate::registry::Registry;
use crate::rule_engine::{self, RuleEngineProtection, string_array};
use crate::workspace::ProtectedWorkspace;
use packguard_types::{ViolationBehavior, ids};
use serde_json::{Map, Value};

/// Public API files may only expose class (or module) level methods.
#[derive(Clone, Copy, Debug, Default)]
pub struct OnlyClassMethodsProtection;

impl Protection for OnlyClassMethodsProtection {
    fn identifier(&self) -> &str {
        ids::PROTECTION_ONLY_CLASS_METHODS
    }

    fn humanized_name(&self) -> &str {
        "Class Method Public APIs"
    }

    fn humanized_description(&self) -> String {
        format!(
            "Public API methods can only be static methods.\n\
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

impl RuleEngineProtection for OnlyClassMethodsProtection {
    fn rule_name(&self) -> &str {
        ids::RULE_ONLY_CLASS_METHODS
    }

    fn included_globs(&self) -> &[&str] {
        &["app/public/**/*"]
    }

    fn message_for_fail_on_any(&self, file: &str) -> String {
        format!("`{file}` must only contain static (class or module level) methods")
    }

    fn extra_rule_metadata(
        &self,
        _workspace: &ProtectedWorkspace<'_>,
        registry: &Registry,
    ) -> Map<String, Value> {
        let mut extra = Map::new();
        extra.insert(
            "AcceptableParentClasses".to_string(),
            string_array(registry.acceptable_parent_classes()),
        );
        extra
    }
}
