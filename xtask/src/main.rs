//! Developer tasks for keeping the protection catalog consistent.
//!
//! Kept out of the end-user CLI.

use anyhow::{Context, bail};
use packguard_app::{ExplainOutput, run_explain};
use packguard_domain::protections::{self, BUILTIN_IDENTIFIERS, DEFAULT_IDENTIFIERS};

fn print_help() {
    eprintln!("xtask commands:");
    eprintln!("  help              Show this message");
    eprintln!("  print-ids         Print protection identifiers and rule names");
    eprintln!("  explain-coverage  Validate every protection has an explanation");
}

fn print_ids() -> anyhow::Result<()> {
    for id in BUILTIN_IDENTIFIERS {
        let protection =
            protections::builtin(id).with_context(|| format!("no built-in for {id}"))?;
        let marker = if DEFAULT_IDENTIFIERS.contains(&id) { "*" } else { " " };
        match protection.as_rule_engine() {
            Some(rule) => println!("{marker} {id} ({})", rule.rule_name()),
            None => println!("{marker} {id}"),
        }
    }
    Ok(())
}

/// Validate that every built-in protection explains itself, by identifier and by rule name.
fn explain_coverage() -> anyhow::Result<()> {
    let mut errors = Vec::new();

    for id in BUILTIN_IDENTIFIERS {
        let exp = match run_explain(id) {
            ExplainOutput::Found(exp) => exp,
            ExplainOutput::NotFound { .. } => {
                errors.push(format!("Protection '{id}' has no explanation"));
                continue;
            }
        };
        if exp.humanized_name.is_empty() {
            errors.push(format!("Protection '{id}' has empty name"));
        }
        if exp.description.trim().is_empty() {
            errors.push(format!("Protection '{id}' has empty description"));
        }
        if let Some(rule) = &exp.rule_name {
            match run_explain(rule) {
                ExplainOutput::Found(by_rule) if by_rule.identifier == exp.identifier => {}
                _ => errors.push(format!("Rule '{rule}' does not explain '{id}'")),
            }
        }
    }

    for id in DEFAULT_IDENTIFIERS {
        if !BUILTIN_IDENTIFIERS.contains(&id) {
            errors.push(format!("Default protection '{id}' is not a built-in"));
        }
    }

    if errors.is_empty() {
        println!("✓ {} protections have explanations", BUILTIN_IDENTIFIERS.len());
        println!("\n✓ All explain coverage checks passed!");
        Ok(())
    } else {
        for error in &errors {
            eprintln!("  - {}", error);
        }
        bail!(
            "Explain coverage validation failed with {} errors",
            errors.len()
        )
    }
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let cmd = args.get(1).map(|s| s.as_str()).unwrap_or("help");

    match cmd {
        "help" | "--help" | "-h" => {
            print_help();
            Ok(())
        }
        "print-ids" => print_ids(),
        "explain-coverage" => explain_coverage(),
        other => bail!("unknown xtask command: {other}\n\nRun `cargo xtask help` for usage."),
    }
    .context("xtask failed")
}
