//! File exports for enhancement results.

use crate::model::EnhancementReport;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

pub const DEFAULT_LATEX_NAME: &str = "enhanced_resume.tex";

/// Write the improved resume verbatim to a `.tex` file.
pub fn export_latex(path: &Path, improved_text: &str) -> Result<()> {
    ensure_parent(path)?;
    std::fs::write(path, improved_text)
        .with_context(|| format!("write LaTeX {}", path.display()))?;
    tracing::info!(path = %path.display(), "exported latex");
    Ok(())
}

pub fn export_json(path: &Path, report: &EnhancementReport) -> Result<()> {
    ensure_parent(path)?;
    let data = serde_json::to_vec_pretty(report).context("serialize report")?;
    std::fs::write(path, data).with_context(|| format!("write JSON {}", path.display()))?;
    tracing::info!(path = %path.display(), "exported json");
    Ok(())
}

/// Absolute path of `name` in the current directory.
pub fn in_current_dir(name: &str) -> Result<PathBuf> {
    let current_dir = std::env::current_dir().context("get current directory")?;
    Ok(current_dir.join(name))
}

/// Default name for a JSON report, derived from its timestamp.
pub fn default_json_name(report: &EnhancementReport) -> String {
    format!(
        "enhanced-resume-{}.json",
        report.timestamp_utc.replace(':', "-").replace('T', "_")
    )
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create directory {}", parent.display()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> EnhancementReport {
        EnhancementReport {
            timestamp_utc: "2026-10-19T08:30:00Z".into(),
            base_url: "http://localhost:5000".into(),
            target_role: Some("Data Analyst".into()),
            improved_text: "\\section{Experience}\n\\item Led analysis".into(),
            suggestions: vec!["Quantified impact".into()],
        }
    }

    #[test]
    fn latex_is_written_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join(DEFAULT_LATEX_NAME);
        export_latex(&path, &report().improved_text).unwrap();
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "\\section{Experience}\n\\item Led analysis"
        );
    }

    #[test]
    fn json_export_contains_suggestions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        export_json(&path, &report()).unwrap();
        let v: serde_json::Value =
            serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(v["suggestions"][0], "Quantified impact");
        assert_eq!(v["target_role"], "Data Analyst");
    }

    #[test]
    fn json_name_has_no_colons() {
        let name = default_json_name(&report());
        assert_eq!(name, "enhanced-resume-2026-10-19_08-30-00Z.json");
    }
}
