use reqwest::StatusCode;
use thiserror::Error;

/// Failures of a single call to the enhancement service.
#[derive(Debug, Error)]
pub enum EnhanceError {
    /// Empty resume text; no network call was made.
    #[error("please provide resume content first")]
    Validation,

    #[error("service returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("request timed out")]
    Timeout,

    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Superseded by a newer submission. Never shown to the user.
    #[error("request superseded")]
    Cancelled,

    #[error("file must be a PDF: {0}")]
    NotPdf(String),

    #[error("read file: {0}")]
    Io(#[from] std::io::Error),
}

impl EnhanceError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, EnhanceError::Cancelled)
    }

    /// Short notice for presentation layers.
    pub fn notice(&self) -> String {
        match self {
            EnhanceError::Validation => "Please provide resume content first.".to_string(),
            EnhanceError::Cancelled => String::new(),
            other => format!("An error occurred ({other}). Please try again."),
        }
    }
}

impl From<reqwest::Error> for EnhanceError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            EnhanceError::Timeout
        } else {
            EnhanceError::Transport(e)
        }
    }
}
