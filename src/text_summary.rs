//! Text summary builder for CLI output.

use crate::model::EnhancementReport;

/// Pre-formatted lines for text output.
pub(crate) struct TextSummary {
    pub lines: Vec<String>,
}

/// Build the improved resume followed by a numbered suggestion list.
pub(crate) fn build_text_summary(report: &EnhancementReport) -> TextSummary {
    let mut lines = Vec::new();

    if let Some(role) = report.target_role.as_deref() {
        lines.push(format!("Target role: {role}"));
        lines.push(String::new());
    }

    lines.push("== Improved resume ==".to_string());
    lines.extend(report.improved_text.lines().map(str::to_string));
    lines.push(String::new());

    lines.push("== Suggestions ==".to_string());
    if report.suggestions.is_empty() {
        lines.push("(none)".to_string());
    }
    for (i, s) in report.suggestions.iter().enumerate() {
        lines.push(format!("{:>2}. {}", i + 1, s));
    }

    TextSummary { lines }
}
