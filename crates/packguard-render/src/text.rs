use crate::{RenderableReport, RenderableVerdict};

/// Plain terminal output: one block per protection, then a summary line.
pub fn render_text(report: &RenderableReport) -> String {
    let mut out = String::new();

    for (group, offenses) in report.groups() {
        out.push_str(&format!("{group}\n"));
        for o in offenses {
            out.push_str(&format!("  {}\n", o.message));
        }
        out.push('\n');
    }

    match report.verdict {
        RenderableVerdict::Pass => out.push_str(&format!(
            "No offenses detected across {} packages.\n",
            report.data.packages_scanned
        )),
        RenderableVerdict::Fail => out.push_str(&format!(
            "{} offenses detected across {} packages.\n",
            report.data.offenses_total, report.data.packages_scanned
        )),
    }

    out
}
