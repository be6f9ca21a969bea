//! Write-time attribute validation
//!
//! Converts a raw, loosely-typed attribute definition (as submitted by a
//! manager) into the closed [`AttributeKind`] form. Every malformed
//! definition is rejected here so the evaluator only ever sees well-formed
//! attributes.
//!
//! Rules:
//! - `name` must not be blank and must contain a letter or digit (it is
//!   the checklist evidence key)
//! - `validation_rule` needs a known `rule_type` and its parameters
//! - `threshold`: `field`, `operator` in {>, >=, <, <=, ==}, `value`
//!   (numeric unless the operator is `==`)
//! - `required_field`: `field`
//! - `date_range`: `field`, `start_date`, `end_date` as YYYY-MM-DD, start <= end
//! - `checklist_criteria` needs non-blank `criteria_text`
//! - fields of the inactive variant are ignored

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::errors::{ConfigResult, ConfigurationError};
use super::types::{
    check_name, Attribute, AttributeKind, AttributeType, Operator, RuleParameters, RuleType,
    ThresholdValue,
};

/// Date format accepted for `date_range` bounds
pub const RULE_DATE_FORMAT: &str = "%Y-%m-%d";

/// Raw attribute definition as submitted for create
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttributeDefinition {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub attribute_type: String,
    #[serde(default)]
    pub rule_type: Option<String>,
    #[serde(default)]
    pub rule_parameters: Option<Map<String, Value>>,
    #[serde(default)]
    pub criteria_text: Option<String>,
    #[serde(default)]
    pub is_required: Option<bool>,
}

/// Partial update; absent fields keep their current values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttributePatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub attribute_type: Option<String>,
    #[serde(default)]
    pub rule_type: Option<String>,
    #[serde(default)]
    pub rule_parameters: Option<Map<String, Value>>,
    #[serde(default)]
    pub criteria_text: Option<String>,
    #[serde(default)]
    pub is_required: Option<bool>,
}

impl AttributePatch {
    /// Merges the patch over an existing definition.
    pub fn apply(self, mut base: AttributeDefinition) -> AttributeDefinition {
        if let Some(name) = self.name {
            base.name = name;
        }
        if self.description.is_some() {
            base.description = self.description;
        }
        if let Some(attribute_type) = self.attribute_type {
            base.attribute_type = attribute_type;
        }
        if self.rule_type.is_some() {
            base.rule_type = self.rule_type;
        }
        if self.rule_parameters.is_some() {
            base.rule_parameters = self.rule_parameters;
        }
        if self.criteria_text.is_some() {
            base.criteria_text = self.criteria_text;
        }
        if self.is_required.is_some() {
            base.is_required = self.is_required;
        }
        base
    }
}

/// A definition that passed validation
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedAttribute {
    pub name: String,
    pub description: Option<String>,
    pub kind: AttributeKind,
}

/// Validates a raw definition.
///
/// # Errors
///
/// Returns the first `ConfigurationError` found.
pub fn validate_definition(definition: &AttributeDefinition) -> ConfigResult<ValidatedAttribute> {
    check_name(&definition.name)?;
    let name = definition.name.trim();

    let kind = match AttributeType::parse(definition.attribute_type.trim())? {
        AttributeType::ValidationRule => {
            let rule_type = definition
                .rule_type
                .as_deref()
                .map(str::trim)
                .ok_or_else(|| ConfigurationError::unknown_rule_type(None))?;
            let rule_type = RuleType::parse(rule_type)?;
            let empty = Map::new();
            let params = definition.rule_parameters.as_ref().unwrap_or(&empty);
            let rule = parse_rule(rule_type, params)?;
            rule.check()?;
            AttributeKind::ValidationRule { rule }
        }
        AttributeType::ChecklistCriteria => {
            let criteria_text = definition
                .criteria_text
                .as_deref()
                .map(str::trim)
                .unwrap_or_default();
            if criteria_text.is_empty() {
                return Err(ConfigurationError::invalid_attribute(
                    "Checklist criteria_text must not be blank",
                ));
            }
            AttributeKind::ChecklistCriteria {
                criteria_text: criteria_text.to_string(),
                is_required: definition.is_required.unwrap_or(true),
            }
        }
    };

    Ok(ValidatedAttribute {
        name: name.to_string(),
        description: definition
            .description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string),
        kind,
    })
}

/// Reconstructs the raw definition of a stored attribute (for patching).
pub fn to_definition(attribute: &Attribute) -> AttributeDefinition {
    let mut definition = AttributeDefinition {
        name: attribute.name.clone(),
        description: attribute.description.clone(),
        attribute_type: attribute.attribute_type().as_str().to_string(),
        ..Default::default()
    };

    match &attribute.kind {
        AttributeKind::ValidationRule { rule } => {
            let mut params = Map::new();
            params.insert("field".into(), Value::String(rule.field().to_string()));
            match rule {
                RuleParameters::Threshold {
                    operator, value, ..
                } => {
                    params.insert("operator".into(), Value::String(operator.symbol().into()));
                    let value = match value {
                        ThresholdValue::Number(n) => serde_json::Number::from_f64(*n)
                            .map(Value::Number)
                            .unwrap_or(Value::Null),
                        ThresholdValue::Text(s) => Value::String(s.clone()),
                    };
                    params.insert("value".into(), value);
                }
                RuleParameters::RequiredField { .. } => {}
                RuleParameters::DateRange { start, end, .. } => {
                    params.insert(
                        "start_date".into(),
                        Value::String(start.format(RULE_DATE_FORMAT).to_string()),
                    );
                    params.insert(
                        "end_date".into(),
                        Value::String(end.format(RULE_DATE_FORMAT).to_string()),
                    );
                }
            }
            definition.rule_type = Some(rule.rule_type().as_str().to_string());
            definition.rule_parameters = Some(params);
        }
        AttributeKind::ChecklistCriteria {
            criteria_text,
            is_required,
        } => {
            definition.criteria_text = Some(criteria_text.clone());
            definition.is_required = Some(*is_required);
        }
    }

    definition
}

fn parse_rule(rule_type: RuleType, params: &Map<String, Value>) -> ConfigResult<RuleParameters> {
    let field = string_param(params, "field")?;
    if field.trim().is_empty() {
        return Err(ConfigurationError::empty_field());
    }
    let field = field.trim().to_string();

    match rule_type {
        RuleType::Threshold => {
            let raw_operator = string_param(params, "operator")?;
            let operator = Operator::parse(raw_operator).ok_or_else(|| {
                ConfigurationError::invalid_parameter(
                    "operator",
                    format!("'{}' is not one of >, >=, <, <=, ==", raw_operator),
                )
            })?;
            let value = threshold_value(params)?;
            Ok(RuleParameters::Threshold {
                field,
                operator,
                value,
            })
        }
        RuleType::RequiredField => Ok(RuleParameters::RequiredField { field }),
        RuleType::DateRange => {
            let start = date_param(params, "start_date")?;
            let end = date_param(params, "end_date")?;
            Ok(RuleParameters::DateRange { field, start, end })
        }
    }
}

fn string_param<'a>(params: &'a Map<String, Value>, name: &str) -> ConfigResult<&'a str> {
    match params.get(name) {
        None | Some(Value::Null) => Err(ConfigurationError::missing_parameter(name)),
        Some(Value::String(s)) => Ok(s.as_str()),
        Some(_) => Err(ConfigurationError::invalid_parameter(name, "must be a string")),
    }
}

fn date_param(params: &Map<String, Value>, name: &str) -> ConfigResult<NaiveDate> {
    let raw = string_param(params, name)?;
    NaiveDate::parse_from_str(raw.trim(), RULE_DATE_FORMAT).map_err(|_| {
        ConfigurationError::invalid_parameter(name, format!("'{}' is not a YYYY-MM-DD date", raw))
    })
}

/// Numeric-looking strings are stored as numbers.
fn threshold_value(params: &Map<String, Value>) -> ConfigResult<ThresholdValue> {
    match params.get("value") {
        None | Some(Value::Null) => Err(ConfigurationError::missing_parameter("value")),
        Some(Value::Number(n)) => n
            .as_f64()
            .filter(|v| v.is_finite())
            .map(ThresholdValue::Number)
            .ok_or_else(|| ConfigurationError::invalid_parameter("value", "must be a finite number")),
        Some(Value::String(s)) => match s.trim().parse::<f64>() {
            Ok(n) if n.is_finite() => Ok(ThresholdValue::Number(n)),
            _ => Ok(ThresholdValue::Text(s.clone())),
        },
        Some(_) => Err(ConfigurationError::invalid_parameter(
            "value",
            "must be a number or a string",
        )),
    }
}
