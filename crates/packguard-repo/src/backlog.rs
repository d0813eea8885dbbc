use anyhow::Context;
use camino::Utf8Path;
use packguard_domain::{Backlog, PackageManifest, ReferenceViolation, RuleTodo, ViolationKind};
use packguard_types::{RepoPath, ids};
use serde::Deserialize;
use std::collections::BTreeMap;

/// One constant's entry in a ledger file.
#[derive(Clone, Debug, Deserialize)]
struct LedgerEntry {
    #[serde(default)]
    violations: Vec<ViolationKind>,
    #[serde(default)]
    files: Vec<String>,
}

/// `<to_package>: { <constant>: { violations, files } }`
type LedgerFile = BTreeMap<String, BTreeMap<String, LedgerEntry>>;

/// Parse one ledger file into raw reference violations, ordered by target then constant.
pub fn parse_ledger(text: &str) -> anyhow::Result<Vec<ReferenceViolation>> {
    let ledger: Option<LedgerFile> = serde_yaml_ng::from_str(text).context("parse ledger")?;
    Ok(ledger
        .unwrap_or_default()
        .into_iter()
        .flat_map(|(to_package, constants)| {
            constants.into_iter().map(move |(class_name, entry)| ReferenceViolation {
                to_package: to_package.clone(),
                class_name,
                kinds: entry.violations,
                files: entry.files,
            })
        })
        .collect())
}

/// Read a package's ledger, falling back to the legacy file name. No file means no backlog.
pub fn read_ledger(
    repo_root: &Utf8Path,
    package: &PackageManifest,
) -> anyhow::Result<Vec<ReferenceViolation>> {
    for name in [ids::LEDGER_FILE, ids::LEGACY_LEDGER_FILE] {
        let abs = repo_root.join(package.directory.join(name).as_str());
        if !abs.is_file() {
            continue;
        }
        let text = std::fs::read_to_string(&abs).with_context(|| format!("read {abs}"))?;
        return parse_ledger(&text).with_context(|| format!("parse {abs}"));
    }
    Ok(Vec::new())
}

/// Merge `<rule>: { Exclude: [..] }` entries from one rule TODO file into `into`.
///
/// Anything that is not in that shape contributes nothing.
pub fn merge_rule_todo(text: &str, into: &mut RuleTodo) {
    let doc: serde_yaml_ng::Value = match serde_yaml_ng::from_str(text) {
        Ok(doc) => doc,
        Err(err) => {
            tracing::debug!(error = %err, "ignoring unreadable rule TODO file");
            return;
        }
    };
    let Some(rules) = doc.as_mapping() else {
        return;
    };

    for (rule, config) in rules {
        let Some(rule) = rule.as_str() else {
            continue;
        };
        let Some(excluded) = config.get("Exclude").and_then(|e| e.as_sequence()) else {
            continue;
        };
        let files = into.entry(rule.to_string()).or_default();
        files.extend(
            excluded
                .iter()
                .filter_map(|f| f.as_str())
                .map(|f| RepoPath::new(f).as_str().to_string()),
        );
    }
}

/// Load every ledger plus the rule TODO lists for `packages`.
///
/// Rule TODO entries come from the root file and each package's own file, and only files
/// that still exist are kept.
pub fn load_backlog(
    repo_root: &Utf8Path,
    packages: &[PackageManifest],
) -> anyhow::Result<Backlog> {
    let mut backlog = Backlog::default();

    for package in packages {
        let ledger = read_ledger(repo_root, package)?;
        if !ledger.is_empty() {
            backlog.ledgers.insert(package.name.clone(), ledger);
        }
    }

    let mut todo_dirs = vec![RepoPath::default()];
    todo_dirs.extend(
        packages
            .iter()
            .filter(|p| !p.directory.is_root())
            .map(|p| p.directory.clone()),
    );
    for dir in todo_dirs {
        let abs = repo_root.join(dir.join(ids::RULE_TODO_FILE).as_str());
        if !abs.is_file() {
            continue;
        }
        match std::fs::read_to_string(&abs) {
            Ok(text) => merge_rule_todo(&text, &mut backlog.rule_todo),
            Err(err) => tracing::debug!(path = %abs, error = %err, "skipping rule TODO file"),
        }
    }

    for files in backlog.rule_todo.values_mut() {
        files.retain(|file| repo_root.join(file).is_file());
    }

    tracing::debug!(
        ledgers = backlog.ledgers.len(),
        rules = backlog.rule_todo.len(),
        "loaded backlog"
    );
    Ok(backlog)
}
