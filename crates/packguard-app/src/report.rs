use anyhow::Context;
use packguard_domain::protections;
use packguard_render::{RenderableData, RenderableOffense, RenderableReport, RenderableVerdict};
use packguard_types::{OffenseRecord, PackguardReport, SCHEMA_REPORT_V1, Verdict};

pub fn parse_report_json(text: &str) -> anyhow::Result<PackguardReport> {
    let value: serde_json::Value = serde_json::from_str(text).context("parse report json")?;

    let schema = value
        .get("schema")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();
    if schema != SCHEMA_REPORT_V1 {
        anyhow::bail!("unknown report schema: {schema}");
    }

    serde_json::from_value(value).context("parse packguard v1 report")
}

pub fn serialize_report(report: &PackguardReport) -> anyhow::Result<Vec<u8>> {
    serde_json::to_vec_pretty(report).context("serialize report")
}

pub fn to_renderable(report: &PackguardReport) -> RenderableReport {
    RenderableReport {
        verdict: match report.verdict {
            Verdict::Pass => RenderableVerdict::Pass,
            Verdict::Fail => RenderableVerdict::Fail,
        },
        offenses: report.offenses.iter().map(renderable_offense).collect(),
        data: RenderableData {
            packages_scanned: report.data.packages_scanned,
            offenses_total: report.data.offenses_total,
        },
    }
}

fn renderable_offense(o: &OffenseRecord) -> RenderableOffense {
    let group = protections::builtin(&o.violation_type)
        .map(|p| p.humanized_name().to_string())
        .unwrap_or_else(|| o.violation_type.clone());
    RenderableOffense {
        violation_type: o.violation_type.clone(),
        group,
        package: o.package.clone(),
        file: o.file.as_str().to_string(),
        message: o.message.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use packguard_types::{PackguardData, RepoPath, ToolMeta, ids};
    use time::macros::datetime;

    fn sample_report() -> PackguardReport {
        PackguardReport {
            schema: SCHEMA_REPORT_V1.to_string(),
            tool: ToolMeta {
                name: ids::TOOL_NAME.to_string(),
                version: "0.1.0".to_string(),
            },
            started_at: datetime!(2026-01-01 00:00:00 UTC),
            finished_at: datetime!(2026-01-01 00:00:01 UTC),
            verdict: Verdict::Fail,
            offenses: vec![OffenseRecord {
                violation_type: ids::PROTECTION_INCOMING_PRIVACY.to_string(),
                package: "packs/trees".to_string(),
                file: RepoPath::new("packs/apples/app/models/apple.rb"),
                message: "`packs/apples/app/models/apple.rb` references private `::Tree` from `packs/trees`"
                    .to_string(),
                fingerprint: None,
            }],
            data: PackguardData {
                packages_scanned: 2,
                new_violations_considered: 1,
                offenses_total: 1,
                by_protection: Vec::new(),
            },
        }
    }

    #[test]
    fn serialized_report_parses_back() {
        let report = sample_report();
        let bytes = serialize_report(&report).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.contains("\"schema\": \"packguard.report.v1\""));
        assert!(text.contains("\"started_at\": \"2026-01-01T00:00:00Z\""));
        assert_eq!(parse_report_json(&text).unwrap(), report);
    }

    #[test]
    fn rejects_other_schemas() {
        let err = parse_report_json(r#"{"schema": "packguard.report.v0"}"#).unwrap_err();
        assert!(err.to_string().contains("unknown report schema: packguard.report.v0"));
    }

    #[test]
    fn renderable_groups_use_humanized_names() {
        let renderable = to_renderable(&sample_report());
        assert_eq!(renderable.verdict, RenderableVerdict::Fail);
        assert_eq!(renderable.offenses[0].group, "Privacy Violations");
        assert_eq!(renderable.data.packages_scanned, 2);
    }
}
