use anyhow::Context;
use camino::Utf8Path;
use packguard_domain::{NewViolation, PerFileViolation};

/// Parse the reference extractor's output: a JSON array of new violations, one record
/// per (referencing package, constant), expanded to one entry per (kind, file).
pub fn parse_new_violations(text: &str) -> anyhow::Result<Vec<PerFileViolation>> {
    let records: Vec<NewViolation> =
        serde_json::from_str(text).context("parse new violations")?;
    Ok(records.iter().flat_map(NewViolation::per_file).collect())
}

pub fn read_new_violations(path: &Utf8Path) -> anyhow::Result<Vec<PerFileViolation>> {
    let text = std::fs::read_to_string(path).with_context(|| format!("read {path}"))?;
    parse_new_violations(&text).with_context(|| format!("parse {path}"))
}
