use serde::{Deserialize, Serialize};

/// `packguard.toml` schema v1.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PackguardConfigV1 {
    /// Optional schema string for tooling (`packguard.config.v1`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// Replaces the default protection set wholesale, in order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protections: Option<Vec<String>>,

    /// Namespaces any package may define without tripping the namespace rule.
    #[serde(default)]
    pub globally_permitted_namespaces: Vec<String>,

    /// Parent classes a public API may inherit from under the class-methods rule.
    #[serde(default)]
    pub acceptable_parent_classes: Vec<String>,
}
