//! Conclusion record
//!
//! The wire shape consumed by the presentation layer and the export
//! facility:
//!
//! ```text
//! { id, work_paper_id, overall_score, compliance_summary: {total_attributes,
//!   passed, failed, warnings}, findings: [...], cpa_conclusion_text,
//!   generated_at }
//! ```

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::engine::{Finding, FindingStatus};
use crate::workpaper::WorkPaperId;

/// Tally of finding statuses.
///
/// `passed + failed + warnings == total_attributes` always holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceSummary {
    pub total_attributes: usize,
    pub passed: usize,
    pub failed: usize,
    pub warnings: usize,
}

impl ComplianceSummary {
    pub fn tally(findings: &[Finding]) -> Self {
        let mut summary = Self {
            total_attributes: findings.len(),
            ..Self::default()
        };
        for finding in findings {
            match finding.status {
                FindingStatus::Pass => summary.passed += 1,
                FindingStatus::Fail => summary.failed += 1,
                FindingStatus::Warning => summary.warnings += 1,
            }
        }
        summary
    }

    pub fn all_passed(&self) -> bool {
        self.total_attributes > 0 && self.passed == self.total_attributes
    }

    pub fn is_vacuous(&self) -> bool {
        self.total_attributes == 0
    }
}

/// Aggregate result of one audit run on one work paper
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conclusion {
    pub id: Uuid,
    pub work_paper_id: WorkPaperId,
    pub overall_score: f64,
    pub compliance_summary: ComplianceSummary,
    pub findings: Vec<Finding>,
    pub cpa_conclusion_text: String,
    pub generated_at: DateTime<Utc>,
}

/// The fields that define an audit outcome (everything but identity and time)
#[derive(Serialize)]
struct Outcome<'a> {
    work_paper_id: WorkPaperId,
    overall_score: f64,
    compliance_summary: &'a ComplianceSummary,
    findings: &'a [Finding],
    cpa_conclusion_text: &'a str,
}

impl Conclusion {
    /// SHA-256 over the outcome fields, URL-safe base64.
    ///
    /// Two runs with identical attributes and data yield equal fingerprints.
    pub fn fingerprint(&self) -> String {
        let outcome = Outcome {
            work_paper_id: self.work_paper_id,
            overall_score: self.overall_score,
            compliance_summary: &self.compliance_summary,
            findings: &self.findings,
            cpa_conclusion_text: &self.cpa_conclusion_text,
        };
        // Serializing plain structs of strings and numbers cannot fail.
        let bytes = serde_json::to_vec(&outcome).unwrap_or_default();
        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        URL_SAFE_NO_PAD.encode(hasher.finalize())
    }

    pub fn failed_findings(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|f| f.status == FindingStatus::Fail)
    }
}
