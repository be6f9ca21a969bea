//! Per-attribute evaluation outcome

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::attribute::{Attribute, AttributeId};

/// Outcome of evaluating one attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FindingStatus {
    Pass,
    Fail,
    Warning,
}

impl FindingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FindingStatus::Pass => "pass",
            FindingStatus::Fail => "fail",
            FindingStatus::Warning => "warning",
        }
    }

    /// Contribution to the overall score
    pub fn weight(&self) -> f64 {
        match self {
            FindingStatus::Pass => 1.0,
            FindingStatus::Warning => 0.5,
            FindingStatus::Fail => 0.0,
        }
    }
}

impl fmt::Display for FindingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of evaluating one attribute.
///
/// `attribute_name` is a copy taken at evaluation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub attribute_id: AttributeId,
    pub attribute_name: String,
    pub status: FindingStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
}

impl Finding {
    pub fn pass(attribute: &Attribute) -> Self {
        Self {
            attribute_id: attribute.id,
            attribute_name: attribute.name.clone(),
            status: FindingStatus::Pass,
            details: None,
            recommendation: None,
        }
    }

    pub fn fail(
        attribute: &Attribute,
        details: impl Into<String>,
        recommendation: impl Into<String>,
    ) -> Self {
        Self {
            attribute_id: attribute.id,
            attribute_name: attribute.name.clone(),
            status: FindingStatus::Fail,
            details: Some(details.into()),
            recommendation: Some(recommendation.into()),
        }
    }

    pub fn warning(attribute: &Attribute, details: impl Into<String>) -> Self {
        Self {
            attribute_id: attribute.id,
            attribute_name: attribute.name.clone(),
            status: FindingStatus::Warning,
            details: Some(details.into()),
            recommendation: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn is_pass(&self) -> bool {
        self.status == FindingStatus::Pass
    }
}
