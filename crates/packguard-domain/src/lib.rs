//! Pure protection evaluation (no IO).
//!
//! Input: package manifests, raw reference violations, and the recorded backlog,
//! all constructed elsewhere.
//! Output: offenses, validation messages, and rule-engine configuration.

#![forbid(unsafe_code)]

pub mod defaults;
pub mod error;
pub mod model;
pub mod protected;
pub mod protection;
pub mod protections;
pub mod registry;
pub mod rule_engine;
pub mod validate;
pub mod workspace;

mod engine;

pub use defaults::{check_rewritable, with_default_protections};
pub use engine::{get_offenses, rule_configs};
pub use error::{ConfigurationError, ConfigurationProblem};
pub use model::{
    Backlog, NewViolation, Offense, PackageManifest, PerFileViolation, ReferenceViolation,
    RuleTodo, ViolationKind,
};
pub use protected::ProtectedPackage;
pub use protection::Protection;
pub use registry::Registry;
pub use rule_engine::{RuleConfig, RuleEngineProtection};
pub use validate::{configuration_problems, validate};
pub use workspace::ProtectedWorkspace;

#[cfg(test)]
mod test_support;

#[cfg(test)]
mod properties;
