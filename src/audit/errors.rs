//! # Audit Service Errors

use thiserror::Error;

use crate::attribute::{AttributeError, ConfigurationError};
use crate::conclusion::ConclusionError;
use crate::engine::EngineError;
use crate::workpaper::WorkPaperError;

use super::context::Role;

pub type AuditResult<T> = Result<T, AuditError>;

#[derive(Debug, Error)]
pub enum AuditError {
    #[error("Role '{role}' may not {action}")]
    Forbidden { action: &'static str, role: Role },

    #[error(transparent)]
    Attribute(#[from] AttributeError),

    #[error(transparent)]
    WorkPaper(#[from] WorkPaperError),

    #[error(transparent)]
    Conclusion(#[from] ConclusionError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<ConfigurationError> for AuditError {
    fn from(err: ConfigurationError) -> Self {
        AuditError::Attribute(AttributeError::Configuration(err))
    }
}

impl AuditError {
    pub fn status_code(&self) -> u16 {
        match self {
            AuditError::Forbidden { .. } => 403,
            AuditError::Attribute(e) => e.status_code(),
            AuditError::WorkPaper(e) => e.status_code(),
            AuditError::Conclusion(e) => e.status_code(),
            AuditError::Engine(e) => e.status_code(),
            AuditError::Internal(_) => 500,
        }
    }

    /// Machine-readable code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            AuditError::Forbidden { .. } => "FORBIDDEN",
            AuditError::Attribute(AttributeError::Configuration(e)) => e.code().code(),
            AuditError::Attribute(AttributeError::NotFound(_)) => "ATTRIBUTE_NOT_FOUND",
            AuditError::WorkPaper(WorkPaperError::NotFound(_)) => "WORK_PAPER_NOT_FOUND",
            AuditError::WorkPaper(WorkPaperError::Internal(_)) => "INTERNAL_ERROR",
            AuditError::WorkPaper(_) => "INVALID_WORK_PAPER",
            AuditError::Conclusion(ConclusionError::Internal(_)) => "INTERNAL_ERROR",
            AuditError::Conclusion(_) => "CONCLUSION_NOT_FOUND",
            AuditError::Engine(EngineError::Configuration { source, .. }) => source.code().code(),
            AuditError::Attribute(AttributeError::Internal(_)) | AuditError::Internal(_) => {
                "INTERNAL_ERROR"
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_and_code() {
        let err: AuditError = ConfigurationError::empty_field().into();
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.code(), "AUDIT_CONFIG_EMPTY_FIELD");

        let err: AuditError = WorkPaperError::NotFound(9).into();
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.code(), "WORK_PAPER_NOT_FOUND");

        let err: AuditError = ConclusionError::NotFoundForWorkPaper(9).into();
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.code(), "CONCLUSION_NOT_FOUND");

        assert_eq!(AuditError::Internal("x".into()).status_code(), 500);
    }
}
