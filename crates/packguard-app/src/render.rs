//! Render use cases: text, Markdown, and GitHub annotations from reports.

use crate::report::to_renderable;
use packguard_types::PackguardReport;

pub fn render_text(report: &PackguardReport) -> String {
    packguard_render::render_text(&to_renderable(report))
}

pub fn render_markdown(report: &PackguardReport) -> String {
    packguard_render::render_markdown(&to_renderable(report))
}

pub fn render_annotations(report: &PackguardReport, max: usize) -> Vec<String> {
    packguard_render::render_github_annotations(&to_renderable(report))
        .into_iter()
        .take(max)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use packguard_types::{
        OffenseRecord, PackguardData, RepoPath, SCHEMA_REPORT_V1, ToolMeta, Verdict, ids,
    };
    use time::OffsetDateTime;

    fn sample_report() -> PackguardReport {
        let offense = |file: &str| OffenseRecord {
            violation_type: ids::PROTECTION_OUTGOING_DEPENDENCY.to_string(),
            package: "packs/apples".to_string(),
            file: RepoPath::new(file),
            message: format!("`{file}` depends on `::Tree` from `packs/trees`"),
            fingerprint: None,
        };
        PackguardReport {
            schema: SCHEMA_REPORT_V1.to_string(),
            tool: ToolMeta {
                name: ids::TOOL_NAME.to_string(),
                version: "0.1.0".to_string(),
            },
            started_at: OffsetDateTime::UNIX_EPOCH,
            finished_at: OffsetDateTime::UNIX_EPOCH,
            verdict: Verdict::Fail,
            offenses: vec![offense("packs/apples/a.rb"), offense("packs/apples/b.rb")],
            data: PackguardData {
                packages_scanned: 2,
                new_violations_considered: 2,
                offenses_total: 2,
                by_protection: Vec::new(),
            },
        }
    }

    #[test]
    fn render_annotations_respects_max() {
        let annotations = render_annotations(&sample_report(), 1);
        assert_eq!(annotations.len(), 1);
        assert!(annotations[0].starts_with("::error file=packs/apples/a.rb::"));
    }

    #[test]
    fn render_markdown_groups_by_protection() {
        let markdown = render_markdown(&sample_report());
        assert!(markdown.contains("## Dependency Violations (2)"));
    }

    #[test]
    fn render_text_summarizes() {
        let text = render_text(&sample_report());
        assert!(text.ends_with("2 offenses detected across 2 packages.\n"));
    }
}
