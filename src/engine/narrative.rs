//! Narrative builder
//!
//! Renders findings and score into deterministic, section-tagged text.
//!
//! # Header contract (format version 1)
//!
//! A section header is a line that begins and ends with [`BOLD_MARKER`]
//! and has text between the markers, e.g. `**Executive Summary**`. The
//! presentation layer strips the markers and renders the line bold. Body
//! lines are emitted so they can never match that shape: finding
//! paragraphs start with `- ` and embedded newlines are flattened.
//!
//! # Layout
//!
//! 1. `**Executive Summary**`, tallies, score, compliance tier sentence
//! 2. `**Detailed Findings**`, one paragraph per non-pass finding (fails
//!    first, then warnings, attribute order within each group), or a single
//!    full-compliance sentence
//! 3. `**Recommendations**` (only when something did not pass)

use crate::conclusion::ComplianceSummary;

use super::finding::{Finding, FindingStatus};

/// Paired marker wrapping header lines
pub const BOLD_MARKER: &str = "**";

/// Version of the header/line contract with the presentation layer
pub const NARRATIVE_FORMAT_VERSION: u32 = 1;

pub const EXECUTIVE_SUMMARY: &str = "Executive Summary";
pub const DETAILED_FINDINGS: &str = "Detailed Findings";
pub const RECOMMENDATIONS: &str = "Recommendations";

/// Compliance tier selected by score
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComplianceTier {
    Full,
    Substantial,
    Partial,
    NonCompliant,
}

impl ComplianceTier {
    /// `>= 90` full, `>= 70` substantial, `>= 50` partial, else non-compliant
    pub fn from_score(score: f64) -> Self {
        if score >= 90.0 {
            ComplianceTier::Full
        } else if score >= 70.0 {
            ComplianceTier::Substantial
        } else if score >= 50.0 {
            ComplianceTier::Partial
        } else {
            ComplianceTier::NonCompliant
        }
    }

    pub fn phrase(&self) -> &'static str {
        match self {
            ComplianceTier::Full => "fully compliant",
            ComplianceTier::Substantial => "substantially compliant",
            ComplianceTier::Partial => "partially compliant",
            ComplianceTier::NonCompliant => "non-compliant",
        }
    }
}

/// A classified narrative line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NarrativeLine<'a> {
    /// Header text with the markers stripped
    Header(&'a str),
    Text(&'a str),
    Blank,
}

/// Wraps `title` in the bold marker.
pub fn header(title: &str) -> String {
    format!("{}{}{}", BOLD_MARKER, title, BOLD_MARKER)
}

/// Whether `line` is a header under the format-version-1 contract.
pub fn is_header(line: &str) -> bool {
    line.len() > BOLD_MARKER.len() * 2
        && line.starts_with(BOLD_MARKER)
        && line.ends_with(BOLD_MARKER)
}

/// Classifies every line of a narrative.
pub fn parse_lines(text: &str) -> Vec<NarrativeLine<'_>> {
    text.lines()
        .map(|line| {
            if line.trim().is_empty() {
                NarrativeLine::Blank
            } else if is_header(line) {
                NarrativeLine::Header(&line[BOLD_MARKER.len()..line.len() - BOLD_MARKER.len()])
            } else {
                NarrativeLine::Text(line)
            }
        })
        .collect()
}

/// Renders the conclusion narrative.
pub fn build(findings: &[Finding], summary: &ComplianceSummary, score: f64) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push(header(EXECUTIVE_SUMMARY));
    if summary.is_vacuous() {
        lines.push(format!(
            "No attributes evaluated. The score of {:.1}% reflects vacuous compliance and is not an assessment of the work paper.",
            score
        ));
    } else {
        lines.push(format!(
            "This audit evaluated {} attributes: {} passed, {} failed, {} warnings. Overall compliance score: {:.1}%.",
            summary.total_attributes, summary.passed, summary.failed, summary.warnings, score
        ));
        lines.push(format!(
            "The work paper is {} with the defined audit attributes.",
            ComplianceTier::from_score(score).phrase()
        ));
    }
    lines.push(String::new());

    lines.push(header(DETAILED_FINDINGS));
    if summary.is_vacuous() {
        lines.push("No attributes evaluated.".to_string());
    } else if summary.all_passed() {
        lines.push(format!(
            "All {} attributes passed; the work paper is fully compliant with no material findings.",
            summary.total_attributes
        ));
    } else {
        let fails = findings.iter().filter(|f| f.status == FindingStatus::Fail);
        let warnings = findings.iter().filter(|f| f.status == FindingStatus::Warning);
        let mut first = true;
        for finding in fails.chain(warnings) {
            if !first {
                lines.push(String::new());
            }
            first = false;
            lines.push(paragraph(finding));
        }

        lines.push(String::new());
        lines.push(header(RECOMMENDATIONS));
        let mut step = 1;
        if summary.failed > 0 {
            lines.push(format!(
                "{}. Address all failed attributes promptly to improve compliance.",
                step
            ));
            step += 1;
        }
        if summary.warnings > 0 {
            lines.push(format!(
                "{}. Review and resolve warning conditions to enhance documentation quality.",
                step
            ));
            step += 1;
        }
        if score < 90.0 {
            lines.push(format!(
                "{}. Implement additional controls and validation procedures to prevent future non-compliance.",
                step
            ));
        }
    }

    lines.join("\n")
}

fn paragraph(finding: &Finding) -> String {
    let mut text = format!(
        "- {} ({})",
        flatten(&finding.attribute_name),
        finding.status.as_str().to_uppercase()
    );
    if let Some(details) = &finding.details {
        text.push_str(": ");
        text.push_str(&flatten(details));
    }
    if let Some(recommendation) = &finding.recommendation {
        text.push_str(". Recommendation: ");
        text.push_str(&flatten(recommendation));
    }
    text
}

fn flatten(s: &str) -> String {
    s.split(['\r', '\n'])
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::scoring::aggregate;

    fn finding(id: u64, name: &str, status: FindingStatus) -> Finding {
        Finding {
            attribute_id: id,
            attribute_name: name.into(),
            status,
            details: Some(format!("{} details", name)),
            recommendation: (status == FindingStatus::Fail).then(|| format!("fix {}", name)),
        }
    }

    fn render(findings: &[Finding]) -> String {
        let (summary, score) = aggregate(findings);
        build(findings, &summary, score)
    }

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(ComplianceTier::from_score(90.0), ComplianceTier::Full);
        assert_eq!(ComplianceTier::from_score(89.9), ComplianceTier::Substantial);
        assert_eq!(ComplianceTier::from_score(70.0), ComplianceTier::Substantial);
        assert_eq!(ComplianceTier::from_score(69.9), ComplianceTier::Partial);
        assert_eq!(ComplianceTier::from_score(50.0), ComplianceTier::Partial);
        assert_eq!(ComplianceTier::from_score(49.9), ComplianceTier::NonCompliant);
    }

    #[test]
    fn test_headers_follow_marker_contract() {
        let text = render(&[finding(1, "Balance", FindingStatus::Fail)]);
        let headers: Vec<_> = parse_lines(&text)
            .into_iter()
            .filter_map(|l| match l {
                NarrativeLine::Header(h) => Some(h),
                _ => None,
            })
            .collect();
        assert_eq!(headers, vec![EXECUTIVE_SUMMARY, DETAILED_FINDINGS, RECOMMENDATIONS]);
        assert!(text.starts_with("**Executive Summary**\n"));
    }

    #[test]
    fn test_fails_before_warnings_in_attribute_order() {
        let findings = vec![
            finding(1, "W-first", FindingStatus::Warning),
            finding(2, "F-second", FindingStatus::Fail),
            finding(3, "P-third", FindingStatus::Pass),
            finding(4, "F-fourth", FindingStatus::Fail),
        ];
        let text = render(&findings);
        let f2 = text.find("F-second").unwrap();
        let f4 = text.find("F-fourth").unwrap();
        let w1 = text.find("W-first").unwrap();
        assert!(f2 < f4 && f4 < w1);
        assert!(!text.contains("P-third"));
        assert!(text.contains("- F-second (FAIL): F-second details. Recommendation: fix F-second"));
        assert!(text.contains("- W-first (WARNING): W-first details"));
    }

    #[test]
    fn test_all_pass_closing_sentence() {
        let text = render(&[
            finding(1, "A", FindingStatus::Pass),
            finding(2, "B", FindingStatus::Pass),
        ]);
        assert!(text.contains("fully compliant with no material findings"));
        assert!(!text.contains(RECOMMENDATIONS));
    }

    #[test]
    fn test_tier_sentence() {
        // 3 pass, 1 fail, 1 warning = 70.0
        let findings = vec![
            finding(1, "A", FindingStatus::Pass),
            finding(2, "B", FindingStatus::Pass),
            finding(3, "C", FindingStatus::Pass),
            finding(4, "D", FindingStatus::Fail),
            finding(5, "E", FindingStatus::Warning),
        ];
        let text = render(&findings);
        assert!(text.contains("Overall compliance score: 70.0%"));
        assert!(text.contains("substantially compliant"));
        assert!(text.contains("1. Address all failed attributes"));
        assert!(text.contains("2. Review and resolve warning conditions"));
        assert!(text.contains("3. Implement additional controls"));
    }

    #[test]
    fn test_vacuous_is_flagged() {
        let text = render(&[]);
        assert!(text.contains("No attributes evaluated"));
        assert!(!text.contains("fully compliant"));
    }

    #[test]
    fn test_body_lines_never_look_like_headers() {
        let mut f = finding(1, "**Sneaky**", FindingStatus::Fail);
        f.recommendation = Some("line one\n**injected**".into());
        let text = render(&[f]);
        let headers = parse_lines(&text)
            .into_iter()
            .filter(|l| matches!(l, NarrativeLine::Header(_)))
            .count();
        assert_eq!(headers, 3);
    }

    #[test]
    fn test_is_header() {
        assert!(is_header("**Title**"));
        assert!(!is_header("****"));
        assert!(!is_header("**Title"));
        assert!(!is_header("- **Title**"));
    }
}
