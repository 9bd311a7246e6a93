use thiserror::Error;

/// Every way an upload attempt or a link action can end. Each variant's
/// message is shown to the user as-is.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorkflowError {
    #[error("Only PDF files are accepted.")]
    NotPdf,

    #[error("File too large. Maximum allowed size: 50MB.")]
    TooLarge,

    #[error("No file selected.")]
    NoFileSelected,

    #[error("Please enter a name for the file.")]
    MissingName,

    #[error("Please select the grade/series.")]
    MissingYear,

    #[error("Please select the type.")]
    MissingType,

    #[error("Upload error: {0}")]
    Storage(String),

    #[error("Failed to generate public URL")]
    UrlGeneration,

    #[error("Database error: {0}")]
    Persistence(String),

    #[error("Failed to copy link.")]
    Clipboard,

    #[error("No link available.")]
    NoLinkAvailable,
}

impl WorkflowError {
    /// Errors the user fixes locally; these never reach a remote service.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            WorkflowError::NotPdf
                | WorkflowError::TooLarge
                | WorkflowError::NoFileSelected
                | WorkflowError::MissingName
                | WorkflowError::MissingYear
                | WorkflowError::MissingType
        )
    }
}

pub type WorkflowResult<T> = Result<T, WorkflowError>;
