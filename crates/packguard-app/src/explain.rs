//! The `explain` use case: look up protection documentation.

use packguard_domain::protections::{self, BUILTIN_IDENTIFIERS, DEFAULT_IDENTIFIERS};
use packguard_types::ViolationBehavior;

/// Everything `packguard explain` prints about one protection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Explanation {
    pub identifier: String,
    pub humanized_name: String,
    pub description: String,
    pub default_behavior: ViolationBehavior,
    /// Whether the protection is active without a `protections` list in `packguard.toml`.
    pub enabled_by_default: bool,
    /// Rule name inside the external rule engine, for delegated protections.
    pub rule_name: Option<String>,
}

/// Output from the explain use case.
#[derive(Clone, Debug)]
pub enum ExplainOutput {
    /// Found an explanation for the identifier.
    Found(Explanation),
    /// Unknown identifier; includes every built-in identifier.
    NotFound {
        identifier: String,
        available: &'static [&'static str],
    },
}

/// Look up a built-in protection by identifier or by rule-engine rule name.
pub fn run_explain(identifier: &str) -> ExplainOutput {
    let found = BUILTIN_IDENTIFIERS
        .iter()
        .filter_map(|id| protections::builtin(id))
        .find(|p| {
            p.identifier() == identifier
                || p.as_rule_engine().is_some_and(|r| r.rule_name() == identifier)
        });

    match found {
        Some(p) => ExplainOutput::Found(Explanation {
            identifier: p.identifier().to_string(),
            humanized_name: p.humanized_name().to_string(),
            description: p.humanized_description(),
            default_behavior: p.default_behavior(),
            enabled_by_default: DEFAULT_IDENTIFIERS.contains(&p.identifier()),
            rule_name: p.as_rule_engine().map(|r| r.rule_name().to_string()),
        }),
        None => ExplainOutput::NotFound {
            identifier: identifier.to_string(),
            available: &BUILTIN_IDENTIFIERS,
        },
    }
}

/// Format an explanation for terminal display.
pub fn format_explanation(exp: &Explanation) -> String {
    let mut out = String::new();

    out.push_str(&exp.humanized_name);
    out.push('\n');
    out.push_str(&"=".repeat(exp.humanized_name.len()));
    out.push_str("\n\n");
    out.push_str(&format!("Identifier: {}\n", exp.identifier));
    out.push_str(&format!("Default behavior: {}\n", exp.default_behavior));
    out.push_str(&format!(
        "Active by default: {}\n",
        if exp.enabled_by_default { "yes" } else { "no" }
    ));
    if let Some(rule) = &exp.rule_name {
        out.push_str(&format!("Rule: {rule}\n"));
    }
    out.push('\n');
    out.push_str(exp.description.trim_end());
    out.push_str("\n\n");
    out.push_str("Configuration\n");
    out.push_str("-------------\n");
    out.push_str("```yaml\n");
    out.push_str("metadata:\n");
    out.push_str("  protections:\n");
    out.push_str(&format!("    {}: {}\n", exp.identifier, exp.default_behavior));
    out.push_str("```\n");
    out.push_str(&format!(
        "Acceptable values are {}.\n",
        ViolationBehavior::ALL
            .iter()
            .map(|b| format!("`{b}`"))
            .collect::<Vec<_>>()
            .join(", ")
    ));

    out
}

/// Format the "not found" error message for terminal display.
pub fn format_not_found(identifier: &str, available: &[&'static str]) -> String {
    let mut out = String::new();

    out.push_str(&format!("Unknown protection: {}\n\n", identifier));
    out.push_str("Available protections:\n");
    for id in available {
        out.push_str(&format!("  - {}\n", id));
    }

    out
}
