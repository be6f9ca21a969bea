//! Rule evaluator
//!
//! Evaluates one validation-rule attribute against submitted data. Pure:
//! data problems (missing field, unparsable value, type mismatch) become
//! `fail` findings and never errors. The attribute is assumed well-formed.

use chrono::NaiveDate;

use crate::attribute::{Attribute, Operator, RuleParameters, ThresholdValue};
use crate::workpaper::FieldMap;

use super::finding::Finding;

/// Evaluates `rule` (the parameters of `attribute`) against `data`.
pub fn evaluate(
    attribute: &Attribute,
    rule: &RuleParameters,
    data: &FieldMap,
    date_format: &str,
) -> Finding {
    match rule {
        RuleParameters::Threshold {
            field,
            operator,
            value,
        } => threshold(attribute, field, *operator, value, data),
        RuleParameters::RequiredField { field } => required_field(attribute, field, data),
        RuleParameters::DateRange { field, start, end } => {
            date_range(attribute, field, *start, *end, data, date_format)
        }
    }
}

fn threshold(
    attribute: &Attribute,
    field: &str,
    operator: Operator,
    expected: &ThresholdValue,
    data: &FieldMap,
) -> Finding {
    let recommendation = format!("Review {}; expected value {} {}", field, operator, expected);

    let Some(actual) = data.get(field) else {
        return Finding::fail(attribute, missing_field(field), recommendation);
    };

    let passed = match (actual.as_number(), expected.as_number()) {
        (Some(a), Some(e)) => match a.partial_cmp(&e) {
            Some(ordering) => operator.holds(ordering),
            None => false,
        },
        _ if operator == Operator::Eq => actual.to_string().trim() == expected.to_string().trim(),
        _ => {
            return Finding::fail(
                attribute,
                format!(
                    "field '{}' value '{}' cannot be compared with {} {}: operator '{}' requires numeric operands",
                    field, actual, operator, expected, operator
                ),
                recommendation,
            );
        }
    };

    if passed {
        Finding::pass(attribute).with_details(format!(
            "{} = {}, expected {} {}",
            field, actual, operator, expected
        ))
    } else {
        Finding::fail(
            attribute,
            format!("{} = {}, expected {} {}", field, actual, operator, expected),
            recommendation,
        )
    }
}

fn required_field(attribute: &Attribute, field: &str, data: &FieldMap) -> Finding {
    match data.get(field) {
        Some(value) if !value.is_blank() => Finding::pass(attribute),
        _ => Finding::fail(
            attribute,
            format!("required field '{}' not provided", field),
            format!("Provide a value for '{}'", field),
        ),
    }
}

fn date_range(
    attribute: &Attribute,
    field: &str,
    start: NaiveDate,
    end: NaiveDate,
    data: &FieldMap,
    date_format: &str,
) -> Finding {
    let recommendation = format!(
        "Review {}; expected a date between {} and {}",
        field, start, end
    );

    let Some(actual) = data.get(field) else {
        return Finding::fail(attribute, missing_field(field), recommendation);
    };

    let Some(date) = actual.as_date(date_format) else {
        return Finding::fail(
            attribute,
            format!("unparsable date in field '{}': '{}'", field, actual),
            recommendation,
        );
    };

    if start <= date && date <= end {
        Finding::pass(attribute)
    } else {
        Finding::fail(
            attribute,
            format!(
                "{} = {}, outside the range {} to {}",
                field, date, start, end
            ),
            recommendation,
        )
    }
}

fn missing_field(field: &str) -> String {
    format!("field '{}' is missing from submitted data", field)
}
