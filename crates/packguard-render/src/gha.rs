use crate::RenderableReport;

/// Render offenses as GitHub Actions workflow command annotations.
///
/// Format:
/// `::error file={path}::[{violation_type}] {message}`
pub fn render_github_annotations(report: &RenderableReport) -> Vec<String> {
    report
        .offenses
        .iter()
        .map(|o| {
            let message = escape(&format!("[{}] {}", o.violation_type, o.message));
            if o.file.is_empty() {
                format!("::error::{message}")
            } else {
                format!("::error file={}::{}", escape_property(&o.file), message)
            }
        })
        .collect()
}

fn escape(data: &str) -> String {
    data.replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

fn escape_property(value: &str) -> String {
    escape(value).replace(':', "%3A").replace(',', "%2C")
}
