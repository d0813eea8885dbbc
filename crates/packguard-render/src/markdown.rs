use crate::{RenderableReport, RenderableVerdict};

pub fn render_markdown(report: &RenderableReport) -> String {
    let mut out = String::new();

    out.push_str("# Packguard report\n\n");
    let verdict = match report.verdict {
        RenderableVerdict::Pass => "PASS",
        RenderableVerdict::Fail => "FAIL",
    };
    out.push_str(&format!(
        "- Verdict: **{}**\n- Packages scanned: {}\n- Offenses: {}\n\n",
        verdict, report.data.packages_scanned, report.data.offenses_total
    ));

    if report.offenses.is_empty() {
        out.push_str("No offenses.\n");
        return out;
    }

    for (group, offenses) in report.groups() {
        out.push_str(&format!("## {} ({})\n\n", group, offenses.len()));
        for o in offenses {
            out.push_str(&format!("- `{}`: {}\n", o.package, o.message));
        }
        out.push('\n');
    }

    out
}
