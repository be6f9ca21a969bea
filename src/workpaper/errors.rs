//! # Work Paper Errors

use thiserror::Error;

use super::types::WorkPaperId;

/// Result type for work paper operations
pub type WorkPaperResult<T> = Result<T, WorkPaperError>;

/// Work paper errors
#[derive(Debug, Clone, Error)]
pub enum WorkPaperError {
    #[error("Work paper title must not be blank")]
    EmptyTitle,

    #[error("Invalid form data: {0}")]
    InvalidFormData(String),

    #[error("Field '{field}' has unsupported {kind} value; only numbers, strings and booleans are accepted")]
    InvalidFieldValue { field: String, kind: &'static str },

    #[error("Too many form fields: {0} (max {1})")]
    TooManyFields(usize, usize),

    #[error("Work paper not found: {0}")]
    NotFound(WorkPaperId),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl WorkPaperError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            WorkPaperError::EmptyTitle => 400,
            WorkPaperError::InvalidFormData(_) => 400,
            WorkPaperError::InvalidFieldValue { .. } => 400,
            WorkPaperError::TooManyFields(_, _) => 400,
            WorkPaperError::NotFound(_) => 404,
            WorkPaperError::Internal(_) => 500,
        }
    }
}
