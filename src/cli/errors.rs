//! CLI-specific error types
//!
//! Every CLI error ends the process with a non-zero status and a
//! `CODE: message` line on stderr.

use std::fmt;
use std::io;

use crate::attribute::AttributeError;
use crate::config::AppConfigError;
use crate::engine::EngineError;
use crate::workpaper::WorkPaperError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file missing or invalid
    ConfigError,
    /// File or stdout failure, unreadable JSON
    IoError,
    /// Attribute definitions or work paper rejected
    InvalidInput,
    /// The engine refused to run
    EvaluationFailed,
    /// HTTP server failed to start or stopped with an error
    ServeFailed,
}

impl CliErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "AUDIT_CLI_CONFIG_ERROR",
            Self::IoError => "AUDIT_CLI_IO_ERROR",
            Self::InvalidInput => "AUDIT_CLI_INVALID_INPUT",
            Self::EvaluationFailed => "AUDIT_CLI_EVALUATION_FAILED",
            Self::ServeFailed => "AUDIT_CLI_SERVE_FAILED",
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::InvalidInput, msg)
    }

    pub fn serve_failed(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ServeFailed, msg)
    }

    pub fn code(&self) -> CliErrorCode {
        self.code
    }

    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", e))
    }
}

impl From<AppConfigError> for CliError {
    fn from(e: AppConfigError) -> Self {
        Self::config_error(e.to_string())
    }
}

impl From<AttributeError> for CliError {
    fn from(e: AttributeError) -> Self {
        Self::invalid_input(e.to_string())
    }
}

impl From<WorkPaperError> for CliError {
    fn from(e: WorkPaperError) -> Self {
        Self::invalid_input(e.to_string())
    }
}

impl From<EngineError> for CliError {
    fn from(e: EngineError) -> Self {
        Self::new(CliErrorCode::EvaluationFailed, e.to_string())
    }
}

pub type CliResult<T> = Result<T, CliError>;
