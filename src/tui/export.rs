use crate::model::EnhancementReport;
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::mpsc as std_mpsc;
use std::sync::OnceLock;
use std::time::Duration;

use super::state::UiState;

// Global clipboard manager channel - initialized once on first use
static CLIPBOARD_SENDER: OnceLock<std_mpsc::Sender<String>> = OnceLock::new();

fn current_report(state: &UiState) -> Result<&EnhancementReport> {
    state
        .report
        .as_ref()
        .context("no enhanced resume to export yet")
}

/// Export the improved resume as `enhanced_resume.tex` in the current directory.
/// Returns the absolute path of the exported file.
pub fn export_latex(state: &UiState) -> Result<PathBuf> {
    let report = current_report(state)?;
    let path = crate::storage::in_current_dir(crate::storage::DEFAULT_LATEX_NAME)?;
    crate::storage::export_latex(&path, &report.improved_text)?;
    Ok(path)
}

/// Export the current result as a JSON report in the current directory.
pub fn export_json(state: &UiState) -> Result<PathBuf> {
    let report = current_report(state)?;
    let path = crate::storage::in_current_dir(&crate::storage::default_json_name(report))?;
    crate::storage::export_json(&path, report)?;
    Ok(path)
}

/// Run an export and update state.info / last_exported_path with the outcome.
pub fn export_and_show_path(
    state: &mut UiState,
    label: &str,
    export: impl FnOnce(&UiState) -> Result<PathBuf>,
) {
    match export(state) {
        Ok(p) => {
            state.last_exported_path = Some(p.to_string_lossy().to_string());
            state.info = format!("Exported {label}: {} (press 'y' to copy path)", p.display());
        }
        Err(e) => {
            state.info = format!("{label} export failed: {e:#}");
        }
    }
}

/// Initialize the clipboard manager thread if not already initialized.
/// This creates a background thread that processes clipboard operations sequentially,
/// keeping each clipboard instance alive for a sufficient duration.
fn init_clipboard_manager() -> Result<&'static std_mpsc::Sender<String>> {
    CLIPBOARD_SENDER.get_or_init(|| {
        let (tx, rx) = std_mpsc::channel::<String>();

        std::thread::spawn(move || {
            use arboard::Clipboard;

            for text in rx {
                match Clipboard::new() {
                    Ok(mut clipboard) => {
                        if clipboard.set_text(&text).is_ok() {
                            // Clipboard managers on Linux read lazily from the owner.
                            std::thread::sleep(Duration::from_secs(2));
                        }
                    }
                    Err(e) => tracing::warn!(error = %e, "clipboard unavailable"),
                }
            }
        });

        tx
    });

    CLIPBOARD_SENDER
        .get()
        .ok_or_else(|| anyhow::anyhow!("Failed to initialize clipboard manager"))
}

/// Copy text to clipboard without blocking the UI thread.
pub fn copy_to_clipboard(text: &str) -> Result<()> {
    let sender = init_clipboard_manager()?;
    sender
        .send(text.to_string())
        .map_err(|_| anyhow::anyhow!("Clipboard manager channel closed"))?;
    Ok(())
}
