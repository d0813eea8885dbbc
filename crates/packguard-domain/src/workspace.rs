use crate::error::{ConfigurationError, ConfigurationProblem};
use crate::model::{Backlog, PackageManifest};
use crate::protected::ProtectedPackage;
use crate::registry::Registry;
use std::collections::{BTreeMap, BTreeSet};

/// Every protected package of one evaluation, indexed by name, plus the rule-engine TODO lists.
///
/// Built fresh for each evaluation; protections only ever read from it.
#[derive(Debug)]
pub struct ProtectedWorkspace<'a> {
    packages: Vec<ProtectedPackage>,
    by_name: BTreeMap<String, usize>,
    backlog: &'a Backlog,
}

impl<'a> ProtectedWorkspace<'a> {
    /// Resolves every manifest, failing on the first configuration problem.
    ///
    /// When two manifests share a name, the first one wins.
    pub fn build(
        registry: &Registry,
        manifests: &[PackageManifest],
        backlog: &'a Backlog,
    ) -> Result<Self, ConfigurationError> {
        let mut packages = Vec::with_capacity(manifests.len());
        let mut by_name = BTreeMap::new();
        for manifest in manifests {
            if by_name.contains_key(&manifest.name) {
                continue;
            }
            let protected = ProtectedPackage::from_manifest(manifest, registry, backlog)?;
            by_name.insert(manifest.name.clone(), packages.len());
            packages.push(protected);
        }

        Ok(Self {
            packages,
            by_name,
            backlog,
        })
    }

    pub fn packages(&self) -> &[ProtectedPackage] {
        &self.packages
    }

    /// Looks up a package by name. `referenced_by` names the file or package that asked.
    pub fn package(
        &self,
        name: &str,
        referenced_by: &str,
    ) -> Result<&ProtectedPackage, ConfigurationError> {
        self.by_name
            .get(name)
            .map(|&position| &self.packages[position])
            .ok_or_else(|| {
                ConfigurationProblem::UnknownPackage {
                    name: name.to_string(),
                    referenced_by: referenced_by.to_string(),
                }
                .into()
            })
    }

    /// Files the rule engine has recorded as known failures for `rule`.
    pub fn flagged_files(&self, rule: &str) -> Option<&'a BTreeSet<String>> {
        self.backlog.flagged_files(rule)
    }
}
