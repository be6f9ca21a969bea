//! Checklist evaluator
//!
//! Checklist criteria describe conditions that cannot be verified from form
//! fields alone, so the engine looks for an explicit evidence marker in the
//! submitted data. The marker key is the attribute's evidence key (see
//! [`Attribute::evidence_key`]) or `attribute_<id>`; submitted keys are
//! normalized the same way before comparison.
//!
//! A required item without truthy evidence is a `fail`. Compliance is never
//! assumed.

use crate::attribute::{normalize_key, Attribute};
use crate::workpaper::{FieldMap, FieldValue};

use super::finding::Finding;

/// Evaluates one checklist attribute against `data`.
pub fn evaluate(
    attribute: &Attribute,
    criteria_text: &str,
    is_required: bool,
    data: &FieldMap,
) -> Finding {
    let confirmed = evidence(attribute, data).is_some_and(FieldValue::is_truthy);

    if confirmed {
        Finding::pass(attribute).with_details(format!(
            "checklist item '{}' confirmed by submitted evidence",
            criteria_text
        ))
    } else if is_required {
        Finding::fail(
            attribute,
            format!(
                "required checklist item '{}' has no submitted evidence",
                criteria_text
            ),
            "attach evidence or confirm manually before conclusion",
        )
    } else {
        Finding::warning(
            attribute,
            "optional checklist item not confirmed; manual review recommended",
        )
    }
}

fn evidence<'a>(attribute: &Attribute, data: &'a FieldMap) -> Option<&'a FieldValue> {
    data.get_normalized(&attribute.evidence_key())
        .or_else(|| data.get_normalized(&normalize_key(&attribute.evidence_id_key())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute::AttributeKind;
    use crate::engine::finding::FindingStatus;
    use chrono::Utc;

    const CRITERIA: &str = "Supporting documentation attached";

    fn attribute(is_required: bool) -> Attribute {
        Attribute {
            id: 12,
            name: "Supporting Documentation".into(),
            description: None,
            kind: AttributeKind::ChecklistCriteria {
                criteria_text: CRITERIA.into(),
                is_required,
            },
            created_by: 1,
            created_at: Utc::now(),
        }
    }

    fn run(is_required: bool, data: FieldMap) -> Finding {
        evaluate(&attribute(is_required), CRITERIA, is_required, &data)
    }

    #[test]
    fn test_required_without_evidence_fails() {
        let finding = run(true, FieldMap::new());
        assert_eq!(finding.status, FindingStatus::Fail);
        assert_eq!(
            finding.details.as_deref(),
            Some("required checklist item 'Supporting documentation attached' has no submitted evidence")
        );
        assert_eq!(
            finding.recommendation.as_deref(),
            Some("attach evidence or confirm manually before conclusion")
        );
    }

    #[test]
    fn test_optional_without_evidence_warns() {
        let finding = run(false, FieldMap::new());
        assert_eq!(finding.status, FindingStatus::Warning);
        assert!(finding.recommendation.is_none());
    }

    #[test]
    fn test_evidence_by_normalized_name() {
        let data: FieldMap = vec![("supporting_documentation", FieldValue::Bool(true))]
            .into_iter()
            .collect();
        assert_eq!(run(true, data).status, FindingStatus::Pass);
    }

    #[test]
    fn test_evidence_by_id() {
        let data: FieldMap = vec![("attribute_12", FieldValue::Text("yes".into()))]
            .into_iter()
            .collect();
        assert_eq!(run(true, data).status, FindingStatus::Pass);
    }

    #[test]
    fn test_falsy_evidence_is_not_confirmation() {
        let data: FieldMap = vec![("Supporting Documentation", FieldValue::Text("no".into()))]
            .into_iter()
            .collect();
        assert_eq!(run(true, data).status, FindingStatus::Fail);
    }
}
