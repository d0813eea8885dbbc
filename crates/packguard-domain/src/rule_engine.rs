//! Protections whose per-file checks run inside an external lint-rule engine.
//!
//! The engine records known failures in TODO lists, which surface here as offenses
//! under `fail_on_any`. In the other direction, each protection emits the declarative
//! rule configuration the engine consumes.

use crate::error::{ConfigurationError, ConfigurationProblem};
use crate::model::Offense;
use crate::protection::Protection;
use crate::registry::Registry;
use crate::workspace::ProtectedWorkspace;
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use packguard_types::RepoPath;
use serde_json::{Map, Value};

/// Declarative configuration for one rule of the external engine.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RuleConfig {
    pub name: String,
    pub enabled: bool,
    pub include_paths: Vec<String>,
    pub exclude_paths: Vec<String>,
    /// Extra keys merged into the rule's block (e.g. `GloballyPermittedNamespaces`).
    pub extra_metadata: Map<String, Value>,
}

impl RuleConfig {
    /// The rule's keys in emission order: `Enabled`, `Include`, `Exclude`, then extras.
    /// `Include` and `Exclude` are omitted when empty.
    pub fn entries(&self) -> Vec<(String, Value)> {
        let mut entries = vec![("Enabled".to_string(), Value::Bool(self.enabled))];
        if !self.include_paths.is_empty() {
            entries.push(("Include".to_string(), string_array(&self.include_paths)));
        }
        if !self.exclude_paths.is_empty() {
            entries.push(("Exclude".to_string(), string_array(&self.exclude_paths)));
        }
        entries.extend(
            self.extra_metadata
                .iter()
                .map(|(key, value)| (key.clone(), value.clone())),
        );
        entries
    }

    /// The rule's block as a JSON object.
    pub fn to_block(&self) -> Map<String, Value> {
        self.entries().into_iter().collect()
    }
}

/// Collects every rule's block into one document keyed by rule name.
pub fn rule_config_document(configs: &[RuleConfig]) -> Map<String, Value> {
    configs
        .iter()
        .map(|config| (config.name.clone(), Value::Object(config.to_block())))
        .collect()
}

pub(crate) fn string_array(items: &[String]) -> Value {
    Value::Array(items.iter().cloned().map(Value::String).collect())
}

/// The second half of a rule-engine-backed protection.
pub trait RuleEngineProtection: Protection {
    /// Name of the rule inside the external engine.
    fn rule_name(&self) -> &str;

    /// Globs, relative to a package directory, the rule applies to.
    fn included_globs(&self) -> &[&str];

    fn message_for_fail_on_any(&self, file: &str) -> String;

    fn extra_rule_metadata(
        &self,
        _workspace: &ProtectedWorkspace<'_>,
        _registry: &Registry,
    ) -> Map<String, Value> {
        Map::new()
    }

    /// One config covering the included globs of every package with this protection enabled.
    fn rule_configs(
        &self,
        workspace: &ProtectedWorkspace<'_>,
        registry: &Registry,
    ) -> Vec<RuleConfig> {
        let include_paths: Vec<String> = workspace
            .packages()
            .iter()
            .filter(|p| p.violation_behavior_for(self.identifier()).enabled())
            .flat_map(|p| include_paths_for(&p.manifest().directory, self.included_globs()))
            .collect();

        vec![RuleConfig {
            name: self.rule_name().to_string(),
            enabled: !include_paths.is_empty(),
            include_paths,
            exclude_paths: Vec::new(),
            extra_metadata: self.extra_rule_metadata(workspace, registry),
        }]
    }
}

pub(crate) fn include_paths_for(directory: &RepoPath, globs: &[&str]) -> Vec<String> {
    globs
        .iter()
        .map(|glob| directory.join(glob).as_str().to_string())
        .collect()
}

fn build_globset(rule: &str, globs: &[&str]) -> Result<GlobSet, ConfigurationError> {
    let invalid = |glob: &str, err: globset::Error| ConfigurationProblem::InvalidGlob {
        rule: rule.to_string(),
        glob: glob.to_string(),
        reason: err.to_string(),
    };

    let mut builder = GlobSetBuilder::new();
    for glob in globs {
        let compiled = GlobBuilder::new(glob)
            .literal_separator(true)
            .build()
            .map_err(|err| invalid(glob, err))?;
        builder.add(compiled);
    }
    builder
        .build()
        .map_err(|err| invalid(&globs.join(", "), err).into())
}

/// Backlog offenses shared by every rule-engine-backed protection.
///
/// For each `fail_on_any` package, every TODO-listed file inside the package directory
/// that matches one of the included globs becomes one offense.
pub fn existing_offenses<P>(
    protection: &P,
    workspace: &ProtectedWorkspace<'_>,
) -> Result<Vec<Offense>, ConfigurationError>
where
    P: RuleEngineProtection + ?Sized,
{
    let Some(flagged) = workspace.flagged_files(protection.rule_name()) else {
        return Ok(Vec::new());
    };
    let globs = build_globset(protection.rule_name(), protection.included_globs())?;

    let mut offenses = Vec::new();
    for package in workspace.packages() {
        if !package
            .violation_behavior_for(protection.identifier())
            .fails_on_any()
        {
            continue;
        }

        let directory = &package.manifest().directory;
        for file in flagged {
            let Some(relative) = relative_to(directory, file) else {
                continue;
            };
            if !globs.is_match(relative) {
                continue;
            }
            offenses.push(Offense {
                file: file.clone(),
                message: protection.message_for_fail_on_any(file),
                violation_type: protection.identifier().to_string(),
                package: package.manifest().clone(),
            });
        }
    }
    Ok(offenses)
}

fn relative_to<'f>(directory: &RepoPath, file: &'f str) -> Option<&'f str> {
    if directory.is_root() {
        return Some(file.trim_start_matches("./"));
    }
    if !directory.contains(file) {
        return None;
    }
    file.trim_start_matches("./")
        .strip_prefix(directory.as_str())
        .and_then(|rest| rest.strip_prefix('/'))
}
