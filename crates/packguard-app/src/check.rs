//! The `check` use case: evaluate every protection and produce a report.

use crate::context::EvaluationContext;
use anyhow::Context;
use packguard_domain::{Offense, PerFileViolation};
use packguard_types::{
    OffenseRecord, PackguardData, PackguardReport, ProtectionCount, RepoPath, SCHEMA_REPORT_V1,
    ToolMeta, Verdict, ids,
};
use time::OffsetDateTime;

/// Output from the check use case.
#[derive(Clone, Debug)]
pub struct CheckOutput {
    pub report: PackguardReport,
}

/// Evaluate `new_violations` and the recorded backlog against every package.
///
/// Any configuration problem aborts the check before offenses are computed.
pub fn run_check(
    ctx: &mut EvaluationContext,
    new_violations: &[PerFileViolation],
) -> anyhow::Result<CheckOutput> {
    let started_at = OffsetDateTime::now_utc();
    let loaded = ctx.loaded()?;

    let offenses = packguard_domain::get_offenses(
        loaded.registry,
        loaded.packages,
        new_violations,
        loaded.backlog,
    )
    .context("evaluate protections")?;
    tracing::debug!(offenses = offenses.len(), "evaluated protections");

    let by_protection = loaded
        .registry
        .protections()
        .map(|p| ProtectionCount {
            identifier: p.identifier().to_string(),
            offenses: count(offenses.iter().filter(|o| o.violation_type == p.identifier())),
        })
        .collect();

    let verdict = if offenses.is_empty() {
        Verdict::Pass
    } else {
        Verdict::Fail
    };

    let report = PackguardReport {
        schema: SCHEMA_REPORT_V1.to_string(),
        tool: ToolMeta {
            name: ids::TOOL_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        started_at,
        finished_at: OffsetDateTime::now_utc(),
        verdict,
        data: PackguardData {
            packages_scanned: count(loaded.packages.iter()),
            new_violations_considered: count(new_violations.iter()),
            offenses_total: count(offenses.iter()),
            by_protection,
        },
        offenses: offenses.iter().map(offense_record).collect(),
    };

    Ok(CheckOutput { report })
}

fn offense_record(offense: &Offense) -> OffenseRecord {
    OffenseRecord {
        violation_type: offense.violation_type.clone(),
        package: offense.package_name().to_string(),
        file: RepoPath::new(&offense.file),
        message: offense.message.clone(),
        fingerprint: Some(offense.fingerprint()),
    }
}

fn count<I: Iterator>(items: I) -> u32 {
    u32::try_from(items.count()).unwrap_or(u32::MAX)
}

/// Map verdict to exit code: 0 = pass, 2 = offenses found.
pub fn verdict_exit_code(verdict: Verdict) -> i32 {
    match verdict {
        Verdict::Pass => 0,
        Verdict::Fail => 2,
    }
}
