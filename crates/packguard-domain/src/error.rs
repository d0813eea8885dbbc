use packguard_types::InvalidBehavior;

/// Something wrong with how a package (or the registry) is configured.
///
/// Fail-fast callers surface the first problem as a [`ConfigurationError`];
/// the validator reports every problem's message.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationProblem {
    #[error(
        "Invalid configuration for package `{package}`. The metadata keys {keys:?} are not valid behaviors under the `protection` metadata namespace. Valid keys are {valid:?}. See `packguard explain` for more info"
    )]
    UnknownProtectionKeys {
        package: String,
        keys: Vec<String>,
        valid: Vec<String>,
    },

    #[error(
        "Invalid configuration for package `{package}`. `metadata.protections` must map protection identifiers to behaviors, found {found}"
    )]
    MalformedProtections { package: String, found: String },

    #[error("Invalid configuration for package `{package}`. {invalid}")]
    InvalidBehavior {
        package: String,
        identifier: String,
        invalid: InvalidBehavior,
    },

    #[error(
        "{identifier} protection does not have the valid preconditions in {package}. {explanation}. See `packguard explain {identifier}` for more info"
    )]
    UnmetPrecondition {
        package: String,
        identifier: String,
        explanation: String,
    },

    #[error(
        "Invalid configuration for package `{package}`. All protections must explicitly set unless their default behavior is `fail_never`. Missing protections: {}",
        .identifiers.join(", ")
    )]
    MissingProtections {
        package: String,
        identifiers: Vec<String>,
    },

    #[error("Unknown package `{name}` referenced by `{referenced_by}`")]
    UnknownPackage { name: String, referenced_by: String },

    #[error("Protection `{identifier}` is registered more than once")]
    DuplicateProtection { identifier: String },

    #[error("Rule `{rule}` has an invalid include glob `{glob}`: {reason}")]
    InvalidGlob {
        rule: String,
        glob: String,
        reason: String,
    },
}

impl ConfigurationProblem {
    /// The package the problem belongs to, if any.
    pub fn package(&self) -> Option<&str> {
        match self {
            ConfigurationProblem::UnknownProtectionKeys { package, .. }
            | ConfigurationProblem::MalformedProtections { package, .. }
            | ConfigurationProblem::InvalidBehavior { package, .. }
            | ConfigurationProblem::UnmetPrecondition { package, .. }
            | ConfigurationProblem::MissingProtections { package, .. } => Some(package.as_str()),
            ConfigurationProblem::UnknownPackage { .. }
            | ConfigurationProblem::DuplicateProtection { .. }
            | ConfigurationProblem::InvalidGlob { .. } => None,
        }
    }
}

/// The single error kind raised by the engine.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct ConfigurationError(ConfigurationProblem);

impl ConfigurationError {
    pub fn problem(&self) -> &ConfigurationProblem {
        &self.0
    }
}

impl From<ConfigurationProblem> for ConfigurationError {
    fn from(value: ConfigurationProblem) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_protections_are_listed_in_order() {
        let problem = ConfigurationProblem::MissingProtections {
            package: "packs/apples".to_string(),
            identifiers: vec!["a".to_string(), "b".to_string(), "c".to_string()],
        };
        let msg = problem.to_string();
        assert!(msg.contains("`packs/apples`"));
        assert!(msg.ends_with("Missing protections: a, b, c"));
    }

    #[test]
    fn unknown_keys_quote_every_key() {
        let problem = ConfigurationProblem::UnknownProtectionKeys {
            package: "packs/apples".to_string(),
            keys: vec!["prevent_a".to_string(), "prevent_b".to_string()],
            valid: vec!["prevent_c".to_string()],
        };
        assert!(
            problem
                .to_string()
                .contains("The metadata keys [\"prevent_a\", \"prevent_b\"] are not valid behaviors")
        );
    }
}
