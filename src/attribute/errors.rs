//! Attribute error types
//!
//! Error codes:
//! - AUDIT_CONFIG_UNKNOWN_ATTRIBUTE_TYPE (REJECT)
//! - AUDIT_CONFIG_UNKNOWN_RULE_TYPE (REJECT)
//! - AUDIT_CONFIG_MISSING_PARAMETER (REJECT)
//! - AUDIT_CONFIG_INVALID_PARAMETER (REJECT)
//! - AUDIT_CONFIG_EMPTY_FIELD (REJECT)
//! - AUDIT_CONFIG_INVALID_ATTRIBUTE (REJECT)
//!
//! Configuration errors are raised when an attribute is written, never
//! while a work paper is being evaluated.

use std::fmt;

use thiserror::Error;

use super::types::AttributeId;

/// Configuration error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigErrorCode {
    /// `attribute_type` is not one of the supported kinds
    UnknownAttributeType,
    /// `rule_type` is absent or not one of the supported rules
    UnknownRuleType,
    /// A parameter the rule needs was not supplied
    MissingParameter,
    /// A parameter was supplied with the wrong shape or value
    InvalidParameter,
    /// A `field` parameter is empty or blank
    EmptyField,
    /// Attribute-level problem (blank name, blank criteria text)
    InvalidAttribute,
}

impl ConfigErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            ConfigErrorCode::UnknownAttributeType => "AUDIT_CONFIG_UNKNOWN_ATTRIBUTE_TYPE",
            ConfigErrorCode::UnknownRuleType => "AUDIT_CONFIG_UNKNOWN_RULE_TYPE",
            ConfigErrorCode::MissingParameter => "AUDIT_CONFIG_MISSING_PARAMETER",
            ConfigErrorCode::InvalidParameter => "AUDIT_CONFIG_INVALID_PARAMETER",
            ConfigErrorCode::EmptyField => "AUDIT_CONFIG_EMPTY_FIELD",
            ConfigErrorCode::InvalidAttribute => "AUDIT_CONFIG_INVALID_ATTRIBUTE",
        }
    }
}

impl fmt::Display for ConfigErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A malformed attribute definition.
///
/// Surfaced at create/update time so the write is rejected.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigurationError {
    code: ConfigErrorCode,
    message: String,
    parameter: Option<String>,
}

impl ConfigurationError {
    /// Unsupported `attribute_type`
    pub fn unknown_attribute_type(value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            code: ConfigErrorCode::UnknownAttributeType,
            message: format!("Unknown attribute_type '{}'", value),
            parameter: Some("attribute_type".into()),
        }
    }

    /// Unsupported or absent `rule_type`
    pub fn unknown_rule_type(value: Option<&str>) -> Self {
        let message = match value {
            Some(v) => format!("Unknown rule_type '{}'", v),
            None => "Validation rule requires a rule_type".to_string(),
        };
        Self {
            code: ConfigErrorCode::UnknownRuleType,
            message,
            parameter: Some("rule_type".into()),
        }
    }

    /// Required rule parameter absent
    pub fn missing_parameter(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            code: ConfigErrorCode::MissingParameter,
            message: format!("Missing required parameter '{}'", name),
            parameter: Some(name),
        }
    }

    /// Rule parameter present but unusable
    pub fn invalid_parameter(name: impl Into<String>, reason: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            code: ConfigErrorCode::InvalidParameter,
            message: format!("Invalid parameter '{}': {}", name, reason.into()),
            parameter: Some(name),
        }
    }

    /// Blank `field` name
    pub fn empty_field() -> Self {
        Self {
            code: ConfigErrorCode::EmptyField,
            message: "Parameter 'field' must be a non-empty field name".into(),
            parameter: Some("field".into()),
        }
    }

    /// Attribute-level problem
    pub fn invalid_attribute(reason: impl Into<String>) -> Self {
        Self {
            code: ConfigErrorCode::InvalidAttribute,
            message: reason.into(),
            parameter: None,
        }
    }

    /// Returns the error code
    pub fn code(&self) -> ConfigErrorCode {
        self.code
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the offending parameter if applicable
    pub fn parameter(&self) -> Option<&str> {
        self.parameter.as_deref()
    }
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REJECT] {}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for ConfigurationError {}

/// Result type for attribute validation
pub type ConfigResult<T> = Result<T, ConfigurationError>;

/// Attribute store errors
#[derive(Debug, Clone, Error)]
pub enum AttributeError {
    #[error("{0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Attribute not found: {0}")]
    NotFound(AttributeId),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AttributeError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            AttributeError::Configuration(_) => 400,
            AttributeError::NotFound(_) => 404,
            AttributeError::Internal(_) => 500,
        }
    }
}

/// Result type for attribute store operations
pub type AttributeResult<T> = Result<T, AttributeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(ConfigErrorCode::UnknownRuleType.code(), "AUDIT_CONFIG_UNKNOWN_RULE_TYPE");
        assert_eq!(ConfigErrorCode::MissingParameter.code(), "AUDIT_CONFIG_MISSING_PARAMETER");
        assert_eq!(ConfigErrorCode::EmptyField.code(), "AUDIT_CONFIG_EMPTY_FIELD");
    }

    #[test]
    fn test_display_includes_code() {
        let err = ConfigurationError::missing_parameter("operator");
        let display = err.to_string();
        assert!(display.starts_with("[REJECT]"));
        assert!(display.contains("AUDIT_CONFIG_MISSING_PARAMETER"));
        assert!(display.contains("operator"));
        assert_eq!(err.parameter(), Some("operator"));
    }

    #[test]
    fn test_unknown_rule_type_without_value() {
        let err = ConfigurationError::unknown_rule_type(None);
        assert!(err.message().contains("requires a rule_type"));
    }

    #[test]
    fn test_status_codes() {
        let err = AttributeError::from(ConfigurationError::empty_field());
        assert_eq!(err.status_code(), 400);
        assert_eq!(AttributeError::NotFound(7).status_code(), 404);
    }
}
