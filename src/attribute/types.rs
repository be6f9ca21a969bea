//! Attribute type definitions
//!
//! An attribute is either a machine-checkable validation rule or a
//! manually-assessed checklist criterion. The variant is closed: each rule
//! kind carries exactly the parameters it needs, so the evaluator matches
//! exhaustively and never inspects an open parameter bag.

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::errors::{ConfigResult, ConfigurationError};

/// Attribute identity, assigned by the attribute store
pub type AttributeId = u64;

/// The two attribute kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeType {
    ValidationRule,
    ChecklistCriteria,
}

impl AttributeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttributeType::ValidationRule => "validation_rule",
            AttributeType::ChecklistCriteria => "checklist_criteria",
        }
    }

    pub fn parse(value: &str) -> ConfigResult<Self> {
        match value {
            "validation_rule" => Ok(AttributeType::ValidationRule),
            "checklist_criteria" => Ok(AttributeType::ChecklistCriteria),
            other => Err(ConfigurationError::unknown_attribute_type(other)),
        }
    }
}

/// Supported validation rule kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleType {
    Threshold,
    RequiredField,
    DateRange,
}

impl RuleType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleType::Threshold => "threshold",
            RuleType::RequiredField => "required_field",
            RuleType::DateRange => "date_range",
        }
    }

    pub fn parse(value: &str) -> ConfigResult<Self> {
        match value {
            "threshold" => Ok(RuleType::Threshold),
            "required_field" => Ok(RuleType::RequiredField),
            "date_range" => Ok(RuleType::DateRange),
            other => Err(ConfigurationError::unknown_rule_type(Some(other))),
        }
    }
}

/// Threshold comparison operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = ">=")]
    Ge,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=")]
    Le,
    #[serde(rename = "==")]
    Eq,
}

impl Operator {
    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Gt => ">",
            Operator::Ge => ">=",
            Operator::Lt => "<",
            Operator::Le => "<=",
            Operator::Eq => "==",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            ">" => Some(Operator::Gt),
            ">=" => Some(Operator::Ge),
            "<" => Some(Operator::Lt),
            "<=" => Some(Operator::Le),
            "==" => Some(Operator::Eq),
            _ => None,
        }
    }

    /// Whether `actual <op> expected` holds given `actual.cmp(expected)`.
    pub fn holds(&self, ordering: Ordering) -> bool {
        match self {
            Operator::Gt => ordering == Ordering::Greater,
            Operator::Ge => ordering != Ordering::Less,
            Operator::Lt => ordering == Ordering::Less,
            Operator::Le => ordering != Ordering::Greater,
            Operator::Eq => ordering == Ordering::Equal,
        }
    }

    /// Only equality may fall back to string comparison
    pub fn requires_numeric(&self) -> bool {
        !matches!(self, Operator::Eq)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Expected value of a threshold rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ThresholdValue {
    Number(f64),
    Text(String),
}

impl ThresholdValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            ThresholdValue::Number(n) if n.is_finite() => Some(*n),
            ThresholdValue::Number(_) => None,
            ThresholdValue::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        }
    }
}

impl fmt::Display for ThresholdValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThresholdValue::Number(n) => write!(f, "{}", n),
            ThresholdValue::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Parameters of a validation rule, one case per rule kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule_type", rename_all = "snake_case")]
pub enum RuleParameters {
    Threshold {
        field: String,
        operator: Operator,
        value: ThresholdValue,
    },
    RequiredField {
        field: String,
    },
    /// Inclusive on both ends
    DateRange {
        field: String,
        start: NaiveDate,
        end: NaiveDate,
    },
}

impl RuleParameters {
    pub fn rule_type(&self) -> RuleType {
        match self {
            RuleParameters::Threshold { .. } => RuleType::Threshold,
            RuleParameters::RequiredField { .. } => RuleType::RequiredField,
            RuleParameters::DateRange { .. } => RuleType::DateRange,
        }
    }

    pub fn field(&self) -> &str {
        match self {
            RuleParameters::Threshold { field, .. }
            | RuleParameters::RequiredField { field }
            | RuleParameters::DateRange { field, .. } => field,
        }
    }

    /// Structural checks shared by write-time validation and the
    /// orchestrator's pre-run check.
    pub fn check(&self) -> ConfigResult<()> {
        if self.field().trim().is_empty() {
            return Err(ConfigurationError::empty_field());
        }
        match self {
            RuleParameters::Threshold {
                operator, value, ..
            } => {
                if operator.requires_numeric() && value.as_number().is_none() {
                    return Err(ConfigurationError::invalid_parameter(
                        "value",
                        format!("operator '{}' requires a numeric value", operator),
                    ));
                }
                if let ThresholdValue::Number(n) = value {
                    if !n.is_finite() {
                        return Err(ConfigurationError::invalid_parameter(
                            "value",
                            "must be a finite number",
                        ));
                    }
                }
            }
            RuleParameters::RequiredField { .. } => {}
            RuleParameters::DateRange { start, end, .. } => {
                if start > end {
                    return Err(ConfigurationError::invalid_parameter(
                        "end_date",
                        format!("{} is before start_date {}", end, start),
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Variant-specific part of an attribute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "attribute_type", rename_all = "snake_case")]
pub enum AttributeKind {
    ValidationRule {
        rule: RuleParameters,
    },
    ChecklistCriteria {
        criteria_text: String,
        is_required: bool,
    },
}

impl AttributeKind {
    pub fn attribute_type(&self) -> AttributeType {
        match self {
            AttributeKind::ValidationRule { .. } => AttributeType::ValidationRule,
            AttributeKind::ChecklistCriteria { .. } => AttributeType::ChecklistCriteria,
        }
    }
}

/// A manager-defined audit attribute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub id: AttributeId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub kind: AttributeKind,
    pub created_by: u64,
    pub created_at: DateTime<Utc>,
}

impl Attribute {
    pub fn attribute_type(&self) -> AttributeType {
        self.kind.attribute_type()
    }

    /// Key under which checklist evidence is looked up in submitted data.
    ///
    /// The attribute name, lower-cased, with every non-alphanumeric
    /// character removed.
    pub fn evidence_key(&self) -> String {
        normalize_key(&self.name)
    }

    /// Id-based alternative to [`Attribute::evidence_key`]
    pub fn evidence_id_key(&self) -> String {
        format!("attribute_{}", self.id)
    }

    /// Re-checks the invariants the validator enforced at write time.
    pub fn check(&self) -> ConfigResult<()> {
        check_name(&self.name)?;
        match &self.kind {
            AttributeKind::ValidationRule { rule } => rule.check(),
            AttributeKind::ChecklistCriteria { criteria_text, .. } => {
                if criteria_text.trim().is_empty() {
                    return Err(ConfigurationError::invalid_attribute(
                        "Checklist criteria_text must not be blank",
                    ));
                }
                Ok(())
            }
        }
    }
}

/// A name must be non-blank and yield a non-empty evidence key.
pub fn check_name(name: &str) -> ConfigResult<()> {
    if name.trim().is_empty() {
        return Err(ConfigurationError::invalid_attribute(
            "Attribute name must not be blank",
        ));
    }
    if normalize_key(name).is_empty() {
        return Err(ConfigurationError::invalid_attribute(format!(
            "Attribute name '{}' must contain a letter or digit",
            name.trim()
        )));
    }
    Ok(())
}

/// Lower-cases and strips every non-alphanumeric character.
pub fn normalize_key(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(|c| c.to_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checklist(name: &str) -> Attribute {
        Attribute {
            id: 3,
            name: name.into(),
            description: None,
            kind: AttributeKind::ChecklistCriteria {
                criteria_text: "Supporting documentation attached".into(),
                is_required: true,
            },
            created_by: 1,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_operator_holds() {
        assert!(Operator::Gt.holds(Ordering::Greater));
        assert!(!Operator::Gt.holds(Ordering::Equal));
        assert!(Operator::Ge.holds(Ordering::Equal));
        assert!(Operator::Le.holds(Ordering::Less));
        assert!(!Operator::Lt.holds(Ordering::Greater));
        assert!(Operator::Eq.holds(Ordering::Equal));
    }

    #[test]
    fn test_operator_parse() {
        assert_eq!(Operator::parse(">="), Some(Operator::Ge));
        assert_eq!(Operator::parse(" < "), Some(Operator::Lt));
        assert_eq!(Operator::parse("!="), None);
    }

    #[test]
    fn test_evidence_key_normalization() {
        let attr = checklist("Supporting Documentation - Attached!");
        assert_eq!(attr.evidence_key(), "supportingdocumentationattached");
        assert_eq!(attr.evidence_id_key(), "attribute_3");
    }

    #[test]
    fn test_check_rejects_punctuation_only_name() {
        assert!(checklist("!!!").check().is_err());
        assert!(check_name("--").is_err());
        assert!(check_name(" ").is_err());
        assert!(check_name("Q4 sign-off").is_ok());
    }

    #[test]
    fn test_threshold_value_coercion() {
        assert_eq!(ThresholdValue::Number(0.0).as_number(), Some(0.0));
        assert_eq!(ThresholdValue::Text(" 12.5 ".into()).as_number(), Some(12.5));
        assert_eq!(ThresholdValue::Text("abc".into()).as_number(), None);
        assert_eq!(ThresholdValue::Number(-5.0).to_string(), "-5");
    }

    #[test]
    fn test_check_rejects_ordering_on_text() {
        let rule = RuleParameters::Threshold {
            field: "grade".into(),
            operator: Operator::Gt,
            value: ThresholdValue::Text("A".into()),
        };
        assert!(rule.check().is_err());

        let rule = RuleParameters::Threshold {
            field: "grade".into(),
            operator: Operator::Eq,
            value: ThresholdValue::Text("A".into()),
        };
        assert!(rule.check().is_ok());
    }

    #[test]
    fn test_check_rejects_inverted_date_range() {
        let rule = RuleParameters::DateRange {
            field: "period_end".into(),
            start: NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
            end: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        };
        assert!(rule.check().is_err());
    }

    #[test]
    fn test_attribute_json_shape() {
        let attr = Attribute {
            id: 1,
            name: "Positive balance".into(),
            description: None,
            kind: AttributeKind::ValidationRule {
                rule: RuleParameters::Threshold {
                    field: "balance".into(),
                    operator: Operator::Gt,
                    value: ThresholdValue::Number(0.0),
                },
            },
            created_by: 1,
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&attr).unwrap();
        assert_eq!(json["attribute_type"], "validation_rule");
        assert_eq!(json["rule"]["rule_type"], "threshold");
        assert_eq!(json["rule"]["operator"], ">");

        let back: Attribute = serde_json::from_value(json).unwrap();
        assert_eq!(back, attr);
    }
}
