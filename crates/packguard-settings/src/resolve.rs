use crate::{SCHEMA_CONFIG_V1, model::PackguardConfigV1};
use anyhow::Context;
use packguard_domain::Registry;
use packguard_domain::protection::Protection;
use packguard_domain::protections::{self, BUILTIN_IDENTIFIERS};
use std::collections::BTreeSet;

#[derive(Clone, Debug, Default)]
pub struct Overrides {
    /// Replaces both the default set and `protections` from the config file.
    pub protections: Option<Vec<String>>,
}

#[derive(Debug)]
pub struct ResolvedConfig {
    pub registry: Registry,
}

pub fn resolve_config(
    cfg: PackguardConfigV1,
    overrides: Overrides,
) -> anyhow::Result<ResolvedConfig> {
    if let Some(schema) = cfg.schema.as_deref()
        && schema != SCHEMA_CONFIG_V1
    {
        anyhow::bail!("unsupported config schema: {schema} (expected {SCHEMA_CONFIG_V1})");
    }

    let protections = match overrides.protections.or(cfg.protections) {
        Some(identifiers) => build_protections(&identifiers)?,
        None => protections::default_set(),
    };

    let registry = Registry::new(protections)
        .context("invalid protection set")?
        .with_globally_permitted_namespaces(cfg.globally_permitted_namespaces)
        .with_acceptable_parent_classes(cfg.acceptable_parent_classes);

    Ok(ResolvedConfig { registry })
}

fn build_protections(identifiers: &[String]) -> anyhow::Result<Vec<Box<dyn Protection>>> {
    let mut seen = BTreeSet::new();
    let mut built = Vec::with_capacity(identifiers.len());
    for identifier in identifiers {
        if !seen.insert(identifier.as_str()) {
            anyhow::bail!("protection listed twice: {identifier}");
        }
        let protection = protections::builtin(identifier).with_context(|| {
            format!("unknown protection: {identifier} (expected one of {BUILTIN_IDENTIFIERS:?})")
        })?;
        built.push(protection);
    }
    Ok(built)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_config_toml;
    use packguard_types::ids;

    #[test]
    fn empty_config_resolves_to_default_registry() {
        let resolved = resolve_config(PackguardConfigV1::default(), Overrides::default()).unwrap();
        assert_eq!(resolved.registry.len(), 5);
        assert!(resolved.registry.contains(ids::PROTECTION_VISIBILITY));
        assert!(!resolved.registry.contains(ids::PROTECTION_ONLY_CLASS_METHODS));
    }

    #[test]
    fn protections_replace_default_set_in_order() {
        let cfg = parse_config_toml(
            r#"
schema = "packguard.config.v1"
protections = [
  "prevent_this_package_from_exposing_undocumented_public_apis",
  "prevent_this_package_from_violating_its_stated_dependencies",
]
globally_permitted_namespaces = ["Rails"]
acceptable_parent_classes = ["T::Struct"]
"#,
        )
        .unwrap();

        let resolved = resolve_config(cfg, Overrides::default()).unwrap();
        assert_eq!(
            resolved.registry.identifiers(),
            vec![
                ids::PROTECTION_DOCUMENTED_APIS.to_string(),
                ids::PROTECTION_OUTGOING_DEPENDENCY.to_string(),
            ]
        );
        assert_eq!(resolved.registry.globally_permitted_namespaces(), ["Rails"]);
        assert_eq!(resolved.registry.acceptable_parent_classes(), ["T::Struct"]);
    }

    #[test]
    fn overrides_win_over_config() {
        let cfg = PackguardConfigV1 {
            protections: Some(vec![ids::PROTECTION_TYPED_API.to_string()]),
            ..PackguardConfigV1::default()
        };
        let overrides = Overrides {
            protections: Some(vec![ids::PROTECTION_NAMESPACE.to_string()]),
        };
        let resolved = resolve_config(cfg, overrides).unwrap();
        assert_eq!(
            resolved.registry.identifiers(),
            vec![ids::PROTECTION_NAMESPACE.to_string()]
        );
    }

    #[test]
    fn unknown_protection_is_rejected() {
        let cfg = PackguardConfigV1 {
            protections: Some(vec!["prevent_everything".to_string()]),
            ..PackguardConfigV1::default()
        };
        let err = resolve_config(cfg, Overrides::default()).unwrap_err();
        assert!(err.to_string().contains("unknown protection: prevent_everything"));
    }

    #[test]
    fn duplicate_protection_is_rejected() {
        let cfg = PackguardConfigV1 {
            protections: Some(vec![
                ids::PROTECTION_TYPED_API.to_string(),
                ids::PROTECTION_TYPED_API.to_string(),
            ]),
            ..PackguardConfigV1::default()
        };
        let err = resolve_config(cfg, Overrides::default()).unwrap_err();
        assert!(err.to_string().contains("protection listed twice"));
    }

    #[test]
    fn unknown_schema_is_rejected() {
        let cfg = parse_config_toml(r#"schema = "packguard.config.v9""#).unwrap();
        let err = resolve_config(cfg, Overrides::default()).unwrap_err();
        assert!(err.to_string().contains("unsupported config schema"));
    }

    #[test]
    fn unknown_keys_fail_to_parse() {
        assert!(parse_config_toml("profile = \"strict\"").is_err());
    }
}
