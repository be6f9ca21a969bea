//! Scoring and aggregation
//!
//! `overall_score = Σ weight(status) / total × 100`, rounded to one decimal,
//! with weights pass = 1.0, warning = 0.5, fail = 0.0. With no attributes
//! the score is 100.0 (vacuous compliance, flagged by the narrative).
//!
//! 100.0 is reserved for all-pass and 0.0 for all-fail: rounding never
//! reaches either bound otherwise.

use crate::conclusion::ComplianceSummary;

use super::finding::{Finding, FindingStatus};

/// Score used when no attributes were evaluated
pub const VACUOUS_SCORE: f64 = 100.0;

/// Highest score a run with any non-pass finding can get
pub const MAX_IMPERFECT_SCORE: f64 = 99.9;

/// Lowest score a run with any non-fail finding can get
pub const MIN_NONZERO_SCORE: f64 = 0.1;

/// Summary and score for a finding list
pub fn aggregate(findings: &[Finding]) -> (ComplianceSummary, f64) {
    let summary = ComplianceSummary::tally(findings);
    (summary, overall_score(&summary))
}

/// Weighted score in `[0, 100]`, one decimal place.
pub fn overall_score(summary: &ComplianceSummary) -> f64 {
    if summary.total_attributes == 0 {
        return VACUOUS_SCORE;
    }
    let weighted = summary.passed as f64 * FindingStatus::Pass.weight()
        + summary.warnings as f64 * FindingStatus::Warning.weight()
        + summary.failed as f64 * FindingStatus::Fail.weight();
    let raw = weighted / summary.total_attributes as f64 * 100.0;
    let mut score = round_one_decimal(raw.clamp(0.0, 100.0));
    if summary.passed < summary.total_attributes {
        score = score.min(MAX_IMPERFECT_SCORE);
    }
    if summary.failed < summary.total_attributes {
        score = score.max(MIN_NONZERO_SCORE);
    }
    score
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(passed: usize, failed: usize, warnings: usize) -> ComplianceSummary {
        ComplianceSummary {
            total_attributes: passed + failed + warnings,
            passed,
            failed,
            warnings,
        }
    }

    #[test]
    fn test_mixed_score() {
        // 3 × 1.0 + 1 × 0.0 + 1 × 0.5 = 3.5 / 5
        assert_eq!(overall_score(&summary(3, 1, 1)), 70.0);
    }

    #[test]
    fn test_extremes() {
        assert_eq!(overall_score(&summary(4, 0, 0)), 100.0);
        assert_eq!(overall_score(&summary(0, 4, 0)), 0.0);
        assert_eq!(overall_score(&summary(0, 0, 2)), 50.0);
    }

    #[test]
    fn test_vacuous() {
        assert_eq!(overall_score(&summary(0, 0, 0)), VACUOUS_SCORE);
    }

    #[test]
    fn test_rounding() {
        // 2 / 3 = 66.666..
        assert_eq!(overall_score(&summary(2, 1, 0)), 66.7);
        // 1 / 3 = 33.333..
        assert_eq!(overall_score(&summary(1, 2, 0)), 33.3);
    }

    #[test]
    fn test_bounds_reserved_for_unanimous_runs() {
        // 1999.5 / 2000 rounds to 100.0 and 0.5 / 2000 rounds to 0.0
        assert_eq!(overall_score(&summary(1999, 0, 1)), MAX_IMPERFECT_SCORE);
        assert_eq!(overall_score(&summary(1999, 1, 0)), MAX_IMPERFECT_SCORE);
        assert_eq!(overall_score(&summary(0, 1999, 1)), MIN_NONZERO_SCORE);
        assert_eq!(overall_score(&summary(1, 1999, 0)), MIN_NONZERO_SCORE);

        assert_eq!(overall_score(&summary(2000, 0, 0)), 100.0);
        assert_eq!(overall_score(&summary(0, 2000, 0)), 0.0);
    }

    #[test]
    fn test_aggregate_matches_findings() {
        let findings: Vec<Finding> = [FindingStatus::Pass, FindingStatus::Warning]
            .into_iter()
            .enumerate()
            .map(|(i, status)| Finding {
                attribute_id: i as u64,
                attribute_name: format!("A{}", i),
                status,
                details: None,
                recommendation: None,
            })
            .collect();
        let (summary, score) = aggregate(&findings);
        assert_eq!(summary.total_attributes, 2);
        assert_eq!(score, 75.0);
    }
}
