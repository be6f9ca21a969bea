//! Audit Flow Tests
//!
//! End-to-end through `AuditService`:
//! - Only managers write attributes
//! - Rejected definitions never reach the store
//! - A run stores exactly one conclusion per work paper (upsert)
//! - Past conclusions are unaffected by later attribute edits
//! - File-backed conclusions survive a restart without leaking onto new papers

use std::sync::Arc;
use std::thread;

use serde_json::json;
use tempfile::TempDir;

use workaudit::attribute::{AttributeDefinition, AttributePatch};
use workaudit::audit::{AuditError, AuditService, RequestContext};
use workaudit::conclusion::{parse_csv, FileConclusionStore};
use workaudit::engine::{AuditEngine, FindingStatus};
use workaudit::workpaper::{WorkPaperStatus, WorkPaperStore, WorkPaperSubmission};

// =============================================================================
// Helper Functions
// =============================================================================

fn definition(value: serde_json::Value) -> AttributeDefinition {
    serde_json::from_value(value).unwrap()
}

fn balance_rule() -> AttributeDefinition {
    definition(json!({
        "name": "Positive balance",
        "attribute_type": "validation_rule",
        "rule_type": "threshold",
        "rule_parameters": {"field": "balance", "operator": ">", "value": 0}
    }))
}

fn submission(balance: i64) -> WorkPaperSubmission {
    WorkPaperSubmission {
        title: "Cash reconciliation".into(),
        form_data: json!({"balance": balance, "account_name": "Cash"}),
        ..Default::default()
    }
}

// =============================================================================
// Attribute Management
// =============================================================================

#[test]
fn test_auditor_cannot_write_attributes() {
    let service = AuditService::default();
    let auditor = RequestContext::auditor(5);

    let err = service.create_attribute(&auditor, &balance_rule()).unwrap_err();
    assert!(matches!(err, AuditError::Forbidden { .. }));
    assert_eq!(err.status_code(), 403);
    assert!(service.list_attributes(0, 100).unwrap().is_empty());
}

#[test]
fn test_malformed_definition_rejected_at_write() {
    let service = AuditService::default();
    let manager = RequestContext::manager(1);

    let err = service
        .create_attribute(
            &manager,
            &definition(json!({
                "name": "Bad",
                "attribute_type": "validation_rule",
                "rule_type": "format_validation",
                "rule_parameters": {"field": "balance"}
            })),
        )
        .unwrap_err();
    assert_eq!(err.status_code(), 400);
    assert_eq!(err.code(), "AUDIT_CONFIG_UNKNOWN_RULE_TYPE");
    assert!(service.list_attributes(0, 100).unwrap().is_empty());
}

// =============================================================================
// Audit Runs
// =============================================================================

#[test]
fn test_run_marks_audited_and_stores_conclusion() {
    let service = AuditService::default();
    let manager = RequestContext::manager(1);
    let auditor = RequestContext::auditor(2);

    service.create_attribute(&manager, &balance_rule()).unwrap();
    let paper = service.submit_work_paper(&auditor, submission(-5)).unwrap();
    assert_eq!(paper.status, WorkPaperStatus::Pending);

    let conclusion = service.run_audit(&auditor, paper.id).unwrap();
    assert_eq!(conclusion.findings[0].status, FindingStatus::Fail);
    assert_eq!(conclusion.overall_score, 0.0);

    assert_eq!(
        service.get_work_paper(paper.id).unwrap().status,
        WorkPaperStatus::Audited
    );
    assert_eq!(service.conclusion_for(paper.id).unwrap(), conclusion);
    assert_eq!(service.get_conclusion(conclusion.id).unwrap(), conclusion);
}

#[test]
fn test_rerun_replaces_conclusion_in_place() {
    let service = AuditService::default();
    let manager = RequestContext::manager(1);
    let auditor = RequestContext::auditor(2);

    let attribute = service.create_attribute(&manager, &balance_rule()).unwrap();
    let paper = service.submit_work_paper(&auditor, submission(-5)).unwrap();
    let first = service.run_audit(&auditor, paper.id).unwrap();

    // Loosen the rule; the stored conclusion only changes on the next run.
    service
        .update_attribute(
            &manager,
            attribute.id,
            AttributePatch {
                rule_parameters: json!({"field": "balance", "operator": "<", "value": 0})
                    .as_object()
                    .cloned(),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(service.conclusion_for(paper.id).unwrap().overall_score, 0.0);

    let second = service.run_audit(&auditor, paper.id).unwrap();
    assert_eq!(second.id, first.id);
    assert_eq!(second.overall_score, 100.0);
    assert_eq!(service.conclusion_for(paper.id).unwrap(), second);
}

#[test]
fn test_missing_work_paper_produces_nothing() {
    let service = AuditService::default();
    let err = service
        .run_audit(&RequestContext::auditor(2), 404)
        .unwrap_err();
    assert_eq!(err.status_code(), 404);
    assert!(service.conclusion_for(404).is_err());
}

#[test]
fn test_concurrent_runs_leave_one_conclusion() {
    let service = Arc::new(AuditService::default());
    let manager = RequestContext::manager(1);
    let auditor = RequestContext::auditor(2);

    service.create_attribute(&manager, &balance_rule()).unwrap();
    let paper = service.submit_work_paper(&auditor, submission(10)).unwrap();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let service = Arc::clone(&service);
            let ctx = auditor;
            thread::spawn(move || service.run_audit(&ctx, paper.id).unwrap())
        })
        .collect();
    let ids: Vec<_> = handles.into_iter().map(|h| h.join().unwrap().id).collect();

    assert!(ids.windows(2).all(|w| w[0] == w[1]));
    assert_eq!(service.conclusion_for(paper.id).unwrap().id, ids[0]);
}

// =============================================================================
// Export and Persistence
// =============================================================================

#[test]
fn test_export_parses_back_to_findings() {
    let service = AuditService::default();
    let manager = RequestContext::manager(1);
    let auditor = RequestContext::auditor(2);

    service.create_attribute(&manager, &balance_rule()).unwrap();
    service
        .create_attribute(
            &manager,
            &definition(json!({
                "name": "Partner \"final\" sign-off",
                "attribute_type": "checklist_criteria",
                "criteria_text": "Signed, dated and filed",
                "is_required": false
            })),
        )
        .unwrap();
    let paper = service.submit_work_paper(&auditor, submission(-1)).unwrap();
    let conclusion = service.run_audit(&auditor, paper.id).unwrap();

    let rows = parse_csv(&service.export_findings(paper.id).unwrap()).unwrap();
    assert_eq!(rows.len(), conclusion.findings.len() + 1);
    assert_eq!(rows[2][0], "Partner \"final\" sign-off");
    assert_eq!(rows[2][1], "warning");
    assert_eq!(rows[1][1], "fail");
    assert_eq!(
        rows[1][2],
        conclusion.findings[0].details.clone().unwrap_or_default()
    );
}

#[test]
fn test_file_store_survives_restart() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("conclusions.json");
    let manager = RequestContext::manager(1);
    let auditor = RequestContext::auditor(2);

    let stored = {
        let service = AuditService::new(
            AuditEngine::default(),
            WorkPaperStore::default(),
            Arc::new(FileConclusionStore::new(&path)),
        )
        .unwrap();
        service.create_attribute(&manager, &balance_rule()).unwrap();
        let paper = service.submit_work_paper(&auditor, submission(10)).unwrap();
        service.run_audit(&auditor, paper.id).unwrap()
    };

    let reopened = AuditService::new(
        AuditEngine::default(),
        WorkPaperStore::default(),
        Arc::new(FileConclusionStore::new(&path)),
    )
    .unwrap();
    assert_eq!(reopened.get_conclusion(stored.id).unwrap(), stored);
}

/// A paper submitted after a restart never inherits an earlier paper's audit.
#[test]
fn test_new_paper_after_restart_has_no_conclusion() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("conclusions.json");
    let manager = RequestContext::manager(1);
    let auditor = RequestContext::auditor(2);

    let audited = {
        let service = AuditService::new(
            AuditEngine::default(),
            WorkPaperStore::default(),
            Arc::new(FileConclusionStore::new(&path)),
        )
        .unwrap();
        service.create_attribute(&manager, &balance_rule()).unwrap();
        let paper = service.submit_work_paper(&auditor, submission(10)).unwrap();
        service.run_audit(&auditor, paper.id).unwrap();
        paper.id
    };

    let reopened = AuditService::new(
        AuditEngine::default(),
        WorkPaperStore::default(),
        Arc::new(FileConclusionStore::new(&path)),
    )
    .unwrap();
    let fresh = reopened.submit_work_paper(&auditor, submission(-5)).unwrap();

    assert!(fresh.id > audited);
    assert_eq!(fresh.status, WorkPaperStatus::Pending);
    let err = reopened.conclusion_for(fresh.id).unwrap_err();
    assert_eq!(err.code(), "CONCLUSION_NOT_FOUND");
    assert!(reopened.export_findings(fresh.id).is_err());
}
