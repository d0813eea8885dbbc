//! The `rule-config` use case: declarative configuration for the external rule engine.

use crate::context::EvaluationContext;
use anyhow::Context;
use packguard_domain::RuleConfig;
use packguard_domain::rule_engine::rule_config_document;
use serde_json::Value;

/// Rule configs for every rule-engine-backed protection in the registry.
pub fn run_rule_config(ctx: &mut EvaluationContext) -> anyhow::Result<Vec<RuleConfig>> {
    let loaded = ctx.loaded()?;
    packguard_domain::rule_configs(loaded.registry, loaded.packages, loaded.backlog)
        .context("build rule configs")
}

/// One YAML document with a block per rule, in registry order.
///
/// Keys within a block follow [`RuleConfig::entries`].
pub fn render_rule_config_yaml(configs: &[RuleConfig]) -> anyhow::Result<String> {
    use serde_yaml_ng::{Mapping, Value as Yaml};

    let mut doc = Mapping::new();
    for config in configs {
        let mut block = Mapping::new();
        for (key, value) in config.entries() {
            let value = serde_yaml_ng::to_value(&value)
                .with_context(|| format!("render {} for {}", key, config.name))?;
            block.insert(Yaml::from(key), value);
        }
        doc.insert(Yaml::from(config.name.as_str()), Yaml::Mapping(block));
    }
    if doc.is_empty() {
        return Ok(String::new());
    }
    Ok(serde_yaml_ng::to_string(&Yaml::Mapping(doc))?)
}

/// The same document as JSON, for tooling.
pub fn rule_config_json(configs: &[RuleConfig]) -> Value {
    Value::Object(rule_config_document(configs))
}
