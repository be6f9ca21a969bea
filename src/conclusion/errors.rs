//! Conclusion store errors

use thiserror::Error;
use uuid::Uuid;

use crate::workpaper::WorkPaperId;

pub type ConclusionResult<T> = Result<T, ConclusionError>;

#[derive(Debug, Error)]
pub enum ConclusionError {
    #[error("Conclusion not found: {0}")]
    NotFound(Uuid),

    #[error("No conclusion for work paper {0}")]
    NotFoundForWorkPaper(WorkPaperId),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ConclusionError {
    pub fn status_code(&self) -> u16 {
        match self {
            ConclusionError::NotFound(_) | ConclusionError::NotFoundForWorkPaper(_) => 404,
            ConclusionError::Internal(_) => 500,
        }
    }
}
