//! Stable identifiers for protections, rule-engine rules, and well-known files.
//!
//! Protection identifiers are the keys package owners write under
//! `metadata.protections` in `package.yml`, so they must never change.

// Protections
pub const PROTECTION_OUTGOING_DEPENDENCY: &str =
    "prevent_this_package_from_violating_its_stated_dependencies";
pub const PROTECTION_INCOMING_PRIVACY: &str =
    "prevent_other_packages_from_using_this_packages_internals";
pub const PROTECTION_TYPED_API: &str = "prevent_this_package_from_exposing_an_untyped_api";
pub const PROTECTION_NAMESPACE: &str = "prevent_this_package_from_creating_other_namespaces";
pub const PROTECTION_VISIBILITY: &str =
    "prevent_other_packages_from_using_this_package_without_explicit_visibility";
pub const PROTECTION_ONLY_CLASS_METHODS: &str =
    "prevent_this_package_from_exposing_instance_method_public_apis";
pub const PROTECTION_DOCUMENTED_APIS: &str =
    "prevent_this_package_from_exposing_undocumented_public_apis";

// Rule-engine rule names
pub const RULE_TYPED_PUBLIC_API: &str = "PackageProtections/TypedPublicApi";
pub const RULE_NAMESPACED_UNDER_PACKAGE_NAME: &str = "PackageProtections/NamespacedUnderPackageName";
pub const RULE_ONLY_CLASS_METHODS: &str = "PackageProtections/OnlyClassMethods";
pub const RULE_REQUIRE_DOCUMENTED_PUBLIC_APIS: &str =
    "PackageProtections/RequireDocumentedPublicApis";

// Manifest metadata keys
pub const METADATA_PROTECTIONS: &str = "protections";
pub const METADATA_VISIBLE_TO: &str = "visible_to";
pub const METADATA_GLOBAL_NAMESPACES: &str = "global_namespaces";

// Files
pub const ROOT_PACKAGE_NAME: &str = ".";
pub const MANIFEST_FILE: &str = "package.yml";
pub const LEDGER_FILE: &str = "package_todo.yml";
pub const LEGACY_LEDGER_FILE: &str = "deprecated_references.yml";
pub const RULE_TODO_FILE: &str = ".rubocop_todo.yml";
pub const README_FILE: &str = "README.md";
pub const CONFIG_FILE: &str = "packguard.toml";
pub const PACKWERK_CONFIG_FILE: &str = "packwerk.yml";

// Tool-level
pub const TOOL_NAME: &str = "packguard";
