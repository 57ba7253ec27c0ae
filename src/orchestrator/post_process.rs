//! Post-result processing utilities.
//!
//! Builds the report for a newly shown result and runs the exports requested on the command line.

use crate::cli::Cli;
use crate::model::{EnhancementReport, EnhancementResult};
use crate::storage;

/// Result of post-processing, ready for presentation layers.
pub(crate) struct ProcessedResult {
    pub report: EnhancementReport,
    pub export_messages: Vec<String>,
}

/// Build the report and run `--export-latex` / `--export-json`. Failures become messages.
pub(crate) fn process_result(
    args: &Cli,
    base_url: &str,
    target_role: Option<&str>,
    result: &EnhancementResult,
) -> ProcessedResult {
    let report = EnhancementReport::new(base_url, target_role, result);

    let mut export_messages = Vec::new();
    if let Some(export_path) = args.export_latex.as_deref() {
        match storage::export_latex(export_path, &report.improved_text) {
            Ok(_) => export_messages.push(format!("Exported LaTeX: {}", export_path.display())),
            Err(e) => export_messages.push(format!("Export LaTeX failed: {e:#}")),
        }
    }
    if let Some(export_path) = args.export_json.as_deref() {
        match storage::export_json(export_path, &report) {
            Ok(_) => export_messages.push(format!("Exported JSON: {}", export_path.display())),
            Err(e) => export_messages.push(format!("Export JSON failed: {e:#}")),
        }
    }

    ProcessedResult {
        report,
        export_messages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn runs_requested_exports() {
        let dir = tempfile::tempdir().unwrap();
        let tex = dir.path().join("out.tex");
        let bad_json = dir.path().join("out.tex").join("report.json");
        let args = Cli::parse_from([
            "resume-refiner",
            "--export-latex",
            tex.to_str().unwrap(),
            "--export-json",
            bad_json.to_str().unwrap(),
        ]);
        let result = EnhancementResult {
            improved_text: "\\section{Skills}".into(),
            suggestions: vec!["Added a skills section".into()],
        };

        let processed = process_result(&args, "http://localhost:5000", Some(" "), &result);

        assert_eq!(processed.report.target_role, None);
        assert_eq!(std::fs::read_to_string(&tex).unwrap(), "\\section{Skills}");
        assert_eq!(processed.export_messages.len(), 2);
        assert!(processed.export_messages[0].starts_with("Exported LaTeX"));
        // The .tex file is not a directory, so the JSON export fails.
        assert!(processed.export_messages[1].starts_with("Export JSON failed"));
    }
}
