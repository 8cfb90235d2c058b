//! Error handling for the resumatch engine

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResumatchError {
    /// Empty or missing résumé / job description, rejected before any work is done
    #[error("Validation error: {0}")]
    Validation(String),

    /// The AI collaborator call failed or returned unparsable content
    #[error("AI collaborator error: {0}")]
    Collaborator(String),

    /// Persisted history is corrupt or unreadable
    #[error("Storage read error: {0}")]
    StorageRead(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF extraction error: {0}")]
    PdfExtraction(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("File format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Output formatting error: {0}")]
    OutputFormatting(String),
}

pub type Result<T> = std::result::Result<T, ResumatchError>;

/// Convert anyhow errors to our custom error type
impl From<anyhow::Error> for ResumatchError {
    fn from(err: anyhow::Error) -> Self {
        ResumatchError::Collaborator(err.to_string())
    }
}

/// Transport failures talking to the collaborator
impl From<reqwest::Error> for ResumatchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ResumatchError::Collaborator(format!("request timed out: {}", err))
        } else {
            ResumatchError::Collaborator(err.to_string())
        }
    }
}

impl ResumatchError {
    /// True for failures the caller caused (bad input), as opposed to remote or IO failures
    pub fn is_validation(&self) -> bool {
        matches!(self, ResumatchError::Validation(_))
    }
}
