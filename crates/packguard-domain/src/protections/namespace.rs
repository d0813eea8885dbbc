use crate::error::ConfigurationError;
use crate::model::{Offense, PackageManifest, PerFileViolation};
use crate::protected::ProtectedPackage;
use crate::protection::Protection;
use crate::registry::Registry;
use crate::rule_engine::{self, RuleConfig, RuleEngineProtection, include_paths_for, string_array};
use crate::workspace::ProtectedWorkspace;
use packguard_types::{ViolationBehavior, ids};
use serde_json::{Map, Value};

/// Keeps every constant a package defines under the package's own namespace.
#[derive(Clone, Copy, Debug, Default)]
pub struct NamespaceProtection;

impl Protection for NamespaceProtection {
    fn identifier(&self) -> &str {
        ids::PROTECTION_NAMESPACE
    }

    fn humanized_name(&self) -> &str {
        "Multiple Namespaces Violations"
    }

    fn humanized_description(&self) -> String {
        format!(
            "These files cannot have ANY modules/classes that are not submodules of the package's allowed namespaces.\n\
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
        behavior: ViolationBehavior,
        package: &PackageManifest,
    ) -> Option<String> {
        if !behavior.enabled() && package.has_global_namespaces() {
            return Some(format!(
                "Invalid configuration for package `{}`. `{}` must be turned on to use `global_namespaces` configuration.",
                package.name,
                self.identifier()
            ));
        }
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

impl RuleEngineProtection for NamespaceProtection {
    fn rule_name(&self) -> &str {
        ids::RULE_NAMESPACED_UNDER_PACKAGE_NAME
    }

    fn included_globs(&self) -> &[&str] {
        &["app/**/*", "lib/**/*"]
    }

    fn message_for_fail_on_any(&self, file: &str) -> String {
        format!("`{file}` should be namespaced under the package namespace")
    }

    fn extra_rule_metadata(
        &self,
        workspace: &ProtectedWorkspace<'_>,
        registry: &Registry,
    ) -> Map<String, Value> {
        let include_packs: Vec<String> = workspace
            .packages()
            .iter()
            .filter(|p| p.violation_behavior_for(self.identifier()).enabled())
            .map(|p| p.name().to_string())
            .collect();

        let mut extra = Map::new();
        extra.insert(
            "GloballyPermittedNamespaces".to_string(),
            string_array(registry.globally_permitted_namespaces()),
        );
        extra.insert("IncludePacks".to_string(), string_array(&include_packs));
        extra.insert(
            "GlobalNamespaces".to_string(),
            Value::Object(global_namespaces_by_package(workspace)),
        );
        extra
    }

    /// A namespace collision is visible from either side, so the rule covers every
    /// package once any package opts in. `IncludePacks` names the packages that did.
    fn rule_configs(
        &self,
        workspace: &ProtectedWorkspace<'_>,
        registry: &Registry,
    ) -> Vec<RuleConfig> {
        let enabled = workspace
            .packages()
            .iter()
            .any(|p| p.violation_behavior_for(self.identifier()).enabled());

        let include_paths = if enabled {
            workspace
                .packages()
                .iter()
                .flat_map(|p| include_paths_for(&p.manifest().directory, self.included_globs()))
                .collect()
        } else {
            Vec::new()
        };

        vec![RuleConfig {
            name: self.rule_name().to_string(),
            enabled,
            include_paths,
            exclude_paths: Vec::new(),
            extra_metadata: self.extra_rule_metadata(workspace, registry),
        }]
    }
}

/// Package name -> the extra namespaces it declares in `global_namespaces`.
fn global_namespaces_by_package(workspace: &ProtectedWorkspace<'_>) -> Map<String, Value> {
    workspace
        .packages()
        .iter()
        .map(ProtectedPackage::manifest)
        .filter(|m| m.has_global_namespaces())
        .map(|m| (m.name.clone(), string_array(&m.global_namespaces())))
        .collect()
}
