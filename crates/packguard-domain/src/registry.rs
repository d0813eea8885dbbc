use crate::error::{ConfigurationError, ConfigurationProblem};
use crate::protection::Protection;
use crate::protections;
use std::collections::BTreeMap;
use std::fmt;

/// The active, ordered set of protections plus the global settings they read.
pub struct Registry {
    protections: Vec<Box<dyn Protection>>,
    index: BTreeMap<String, usize>,
    globally_permitted_namespaces: Vec<String>,
    acceptable_parent_classes: Vec<String>,
}

impl Registry {
    /// Builds a registry in the given order. Identifiers must be unique.
    pub fn new(protections: Vec<Box<dyn Protection>>) -> Result<Self, ConfigurationError> {
        let mut index = BTreeMap::new();
        for (position, protection) in protections.iter().enumerate() {
            let identifier = protection.identifier().to_string();
            if index.insert(identifier.clone(), position).is_some() {
                return Err(ConfigurationProblem::DuplicateProtection { identifier }.into());
            }
        }

        Ok(Self {
            protections,
            index,
            globally_permitted_namespaces: Vec::new(),
            acceptable_parent_classes: Vec::new(),
        })
    }

    pub fn with_globally_permitted_namespaces(mut self, namespaces: Vec<String>) -> Self {
        self.globally_permitted_namespaces = namespaces;
        self
    }

    pub fn with_acceptable_parent_classes(mut self, classes: Vec<String>) -> Self {
        self.acceptable_parent_classes = classes;
        self
    }

    pub fn protections(&self) -> impl Iterator<Item = &dyn Protection> {
        self.protections.iter().map(|p| p.as_ref())
    }

    pub fn get(&self, identifier: &str) -> Option<&dyn Protection> {
        self.index
            .get(identifier)
            .map(|&position| self.protections[position].as_ref())
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.index.contains_key(identifier)
    }

    /// Identifiers in registry order.
    pub fn identifiers(&self) -> Vec<String> {
        self.protections
            .iter()
            .map(|p| p.identifier().to_string())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.protections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.protections.is_empty()
    }

    pub fn globally_permitted_namespaces(&self) -> &[String] {
        &self.globally_permitted_namespaces
    }

    pub fn acceptable_parent_classes(&self) -> &[String] {
        &self.acceptable_parent_classes
    }
}

impl Default for Registry {
    fn default() -> Self {
        let protections = protections::default_set();
        let index = protections
            .iter()
            .enumerate()
            .map(|(position, p)| (p.identifier().to_string(), position))
            .collect();
        Self {
            protections,
            index,
            globally_permitted_namespaces: Vec::new(),
            acceptable_parent_classes: Vec::new(),
        }
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("protections", &self.identifiers())
            .field(
                "globally_permitted_namespaces",
                &self.globally_permitted_namespaces,
            )
            .field("acceptable_parent_classes", &self.acceptable_parent_classes)
            .finish()
    }
}
