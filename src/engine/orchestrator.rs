//! Evaluation orchestrator
//!
//! Dispatches each attribute to its evaluator in the given order, then
//! scores the findings and renders the narrative. The run is all-or-nothing:
//! a malformed attribute aborts it before any finding is produced.

use chrono::Utc;
use uuid::Uuid;

use crate::attribute::{Attribute, AttributeKind, RULE_DATE_FORMAT};
use crate::conclusion::{ComplianceSummary, Conclusion};
use crate::workpaper::{FieldMap, WorkPaper};

use super::errors::{EngineError, EngineResult};
use super::finding::Finding;
use super::{checklist, narrative, rule, scoring};

/// Engine tunables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineOptions {
    /// chrono format tried first when parsing submitted dates
    pub date_format: String,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            date_format: RULE_DATE_FORMAT.to_string(),
        }
    }
}

/// Output of one evaluation, before it is bound to a work paper
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub findings: Vec<Finding>,
    pub summary: ComplianceSummary,
    pub score: f64,
    pub narrative: String,
}

/// Pure transform from (attributes, field map) to a conclusion
#[derive(Debug, Clone, Default)]
pub struct AuditEngine {
    options: EngineOptions,
}

impl AuditEngine {
    pub fn new(options: EngineOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Evaluates `attributes` in order against `data`.
    ///
    /// Every attribute is checked before any is evaluated.
    pub fn evaluate(&self, attributes: &[Attribute], data: &FieldMap) -> EngineResult<Evaluation> {
        for attribute in attributes {
            attribute
                .check()
                .map_err(|source| EngineError::Configuration {
                    attribute_id: attribute.id,
                    source,
                })?;
        }

        let findings: Vec<Finding> = attributes
            .iter()
            .map(|attribute| self.evaluate_one(attribute, data))
            .collect();
        let (summary, score) = scoring::aggregate(&findings);
        let narrative = narrative::build(&findings, &summary, score);

        Ok(Evaluation {
            findings,
            summary,
            score,
            narrative,
        })
    }

    /// Runs a full audit of `work_paper`, producing a fresh conclusion.
    pub fn run(&self, work_paper: &WorkPaper, attributes: &[Attribute]) -> EngineResult<Conclusion> {
        let evaluation = self.evaluate(attributes, &work_paper.form_data)?;
        Ok(Conclusion {
            id: Uuid::new_v4(),
            work_paper_id: work_paper.id,
            overall_score: evaluation.score,
            compliance_summary: evaluation.summary,
            findings: evaluation.findings,
            cpa_conclusion_text: evaluation.narrative,
            generated_at: Utc::now(),
        })
    }

    fn evaluate_one(&self, attribute: &Attribute, data: &FieldMap) -> Finding {
        match &attribute.kind {
            AttributeKind::ValidationRule { rule } => {
                rule::evaluate(attribute, rule, data, &self.options.date_format)
            }
            AttributeKind::ChecklistCriteria {
                criteria_text,
                is_required,
            } => checklist::evaluate(attribute, criteria_text, *is_required, data),
        }
    }
}
