use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Endpoint paths on the enhancement service.
pub const ENHANCE_PATH: &str = "/enhance_resume";
pub const EXTRACT_PDF_PATH: &str = "/extract_pdf";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    pub base_url: String,
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
    pub user_agent: String,
}

/// Body of `POST /enhance_resume`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnhancementRequest {
    pub resume_text: String,
    // Absent roles are omitted from the body, never sent as "" or null.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_role: Option<String>,
}

impl EnhancementRequest {
    /// Build a request from raw user input. Returns `None` when the resume
    /// text is empty after trimming. A blank role is treated as absent.
    pub fn from_input(resume_text: &str, target_role: Option<&str>) -> Option<Self> {
        let resume_text = resume_text.trim();
        if resume_text.is_empty() {
            return None;
        }
        let target_role = target_role
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(str::to_string);
        Some(Self {
            resume_text: resume_text.to_string(),
            target_role,
        })
    }
}

/// Response of `POST /enhance_resume`. Both fields are required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnhancementResult {
    pub improved_text: String,
    pub suggestions: Vec<String>,
}

/// Response of `POST /extract_pdf`.
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractPdfResponse {
    pub text: String,
}

/// Controller status as seen by presentation layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Status {
    #[default]
    Idle,
    Loading,
    Result,
    Error,
}

/// UI-facing projection of the enhancement controller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Presentation {
    pub status: Status,
    /// Busy indicator; re-submission is disabled while set.
    pub busy: bool,
    /// Last successful result. Kept across failures until a newer result replaces it.
    pub result: Option<EnhancementResult>,
    /// User-visible failure notice.
    pub notice: Option<String>,
    /// Bumped each time a new result is stored, so observers can tell repeats apart.
    pub generation: u64,
}

impl Presentation {
    /// Export is enabled exactly when a result is present.
    pub fn can_export(&self) -> bool {
        self.result.is_some()
    }

    pub fn result_visible(&self) -> bool {
        self.result.is_some() && self.status != Status::Loading
    }
}

/// Serializable record of one completed enhancement, used for JSON output and export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnhancementReport {
    pub timestamp_utc: String,
    pub base_url: String,
    #[serde(default)]
    pub target_role: Option<String>,
    pub improved_text: String,
    pub suggestions: Vec<String>,
}

impl EnhancementReport {
    pub fn new(base_url: &str, target_role: Option<&str>, result: &EnhancementResult) -> Self {
        Self {
            timestamp_utc: time::OffsetDateTime::now_utc()
                .format(&time::format_description::well_known::Rfc3339)
                .unwrap_or_else(|_| "now".into()),
            base_url: base_url.to_string(),
            target_role: target_role
                .map(str::trim)
                .filter(|r| !r.is_empty())
                .map(str::to_string),
            improved_text: result.improved_text.clone(),
            suggestions: result.suggestions.clone(),
        }
    }
}

/// Events emitted by the orchestrator and consumed by UI layers.
#[derive(Debug, Clone)]
pub enum UiEvent {
    /// Text extracted from an uploaded PDF.
    PdfExtracted { file_name: String, text: String },
    Info(InfoEvent),
}

/// Structured info events for UI/CLI layers.
#[derive(Debug, Clone)]
pub enum InfoEvent {
    Message(String),
    /// Submission rejected before any network call.
    EmptyResume,
    PdfFailed { reason: String },
}

impl InfoEvent {
    /// Render a human-readable message for UI/CLI layers.
    pub fn to_message(&self) -> String {
        match self {
            InfoEvent::Message(msg) => msg.clone(),
            InfoEvent::EmptyResume => "Please provide resume content first.".to_string(),
            InfoEvent::PdfFailed { reason } => {
                format!("Error processing PDF ({reason}). Please paste text manually.")
            }
        }
    }
}
