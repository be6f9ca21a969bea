//! Audit service
//!
//! Owns the stores and runs the engine on behalf of a caller. The trigger
//! contract lives in [`AuditService::run_audit`]: on success the work paper
//! is `audited` and its conclusion replaced; on any failure both are left
//! exactly as they were.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use uuid::Uuid;

use crate::attribute::{
    Attribute, AttributeDefinition, AttributeError, AttributeId, AttributePatch, AttributeStore,
};
use crate::conclusion::{
    findings_to_csv, Conclusion, ConclusionStore, FileConclusionStore, MemoryConclusionStore,
};
use crate::config::AppConfig;
use crate::engine::AuditEngine;
use crate::observability::{log_event_with_fields, Event, ObservationScope, ScopeEvents};
use crate::workpaper::{WorkPaper, WorkPaperId, WorkPaperStore, WorkPaperSubmission};

use super::context::RequestContext;
use super::errors::{AuditError, AuditResult};

#[derive(Debug)]
pub struct AuditService {
    attributes: AttributeStore,
    work_papers: WorkPaperStore,
    conclusions: Arc<dyn ConclusionStore>,
    engine: AuditEngine,
    /// One lock per work paper, held for the whole run
    run_locks: Mutex<HashMap<WorkPaperId, Arc<Mutex<()>>>>,
}

impl Default for AuditService {
    fn default() -> Self {
        Self::assemble(
            AuditEngine::default(),
            WorkPaperStore::default(),
            Arc::new(MemoryConclusionStore::new()),
        )
    }
}

impl AuditService {
    /// Builds the service over `conclusions`.
    ///
    /// Work paper ids continue after the highest id that already has a
    /// stored conclusion, so a new paper never picks up an old audit.
    pub fn new(
        engine: AuditEngine,
        work_papers: WorkPaperStore,
        conclusions: Arc<dyn ConclusionStore>,
    ) -> AuditResult<Self> {
        let highest = conclusions
            .list()?
            .iter()
            .map(|c| c.work_paper_id)
            .max()
            .unwrap_or(0);
        work_papers.reserve_ids_through(highest)?;
        Ok(Self::assemble(engine, work_papers, conclusions))
    }

    pub fn from_config(config: &AppConfig) -> AuditResult<Self> {
        let conclusions: Arc<dyn ConclusionStore> = match &config.conclusions_path {
            Some(path) => Arc::new(FileConclusionStore::new(path)),
            None => Arc::new(MemoryConclusionStore::new()),
        };
        Self::new(
            AuditEngine::new(config.engine_options()),
            WorkPaperStore::new(config.max_form_fields),
            conclusions,
        )
    }

    fn assemble(
        engine: AuditEngine,
        work_papers: WorkPaperStore,
        conclusions: Arc<dyn ConclusionStore>,
    ) -> Self {
        Self {
            attributes: AttributeStore::new(),
            work_papers,
            conclusions,
            engine,
            run_locks: Mutex::new(HashMap::new()),
        }
    }

    // ==================
    // Attributes
    // ==================

    pub fn create_attribute(
        &self,
        ctx: &RequestContext,
        definition: &AttributeDefinition,
    ) -> AuditResult<Attribute> {
        self.guard_attribute_write(ctx, "create attributes")?;
        let attribute = self
            .attributes
            .create(definition, ctx.user_id)
            .map_err(|e| rejected_attribute(e, None))?;
        log_event_with_fields(
            Event::AttributeCreated,
            &[
                ("attribute_id", &attribute.id.to_string()),
                ("attribute_type", attribute.attribute_type().as_str()),
                ("user_id", &ctx.user_id.to_string()),
            ],
        );
        Ok(attribute)
    }

    pub fn update_attribute(
        &self,
        ctx: &RequestContext,
        id: AttributeId,
        patch: AttributePatch,
    ) -> AuditResult<Attribute> {
        self.guard_attribute_write(ctx, "update attributes")?;
        let attribute = self
            .attributes
            .update(id, patch)
            .map_err(|e| rejected_attribute(e, Some(id)))?;
        log_event_with_fields(
            Event::AttributeUpdated,
            &[
                ("attribute_id", &id.to_string()),
                ("user_id", &ctx.user_id.to_string()),
            ],
        );
        Ok(attribute)
    }

    pub fn delete_attribute(&self, ctx: &RequestContext, id: AttributeId) -> AuditResult<Attribute> {
        self.guard_attribute_write(ctx, "delete attributes")?;
        let attribute = self.attributes.delete(id)?;
        log_event_with_fields(
            Event::AttributeDeleted,
            &[
                ("attribute_id", &id.to_string()),
                ("user_id", &ctx.user_id.to_string()),
            ],
        );
        Ok(attribute)
    }

    pub fn get_attribute(&self, id: AttributeId) -> AuditResult<Attribute> {
        Ok(self.attributes.get(id)?)
    }

    pub fn list_attributes(&self, offset: usize, limit: usize) -> AuditResult<Vec<Attribute>> {
        Ok(self.attributes.list(offset, limit)?)
    }

    fn guard_attribute_write(&self, ctx: &RequestContext, action: &'static str) -> AuditResult<()> {
        ctx.require_manager(action).inspect_err(|e| {
            log_event_with_fields(
                Event::AttributeRejected,
                &[
                    ("reason", &e.to_string()),
                    ("user_id", &ctx.user_id.to_string()),
                ],
            );
        })
    }

    // ==================
    // Work papers
    // ==================

    pub fn submit_work_paper(
        &self,
        ctx: &RequestContext,
        submission: WorkPaperSubmission,
    ) -> AuditResult<WorkPaper> {
        let work_paper = self
            .work_papers
            .submit(submission, ctx.user_id)
            .inspect_err(|e| {
                log_event_with_fields(
                    Event::WorkPaperRejected,
                    &[
                        ("reason", &e.to_string()),
                        ("user_id", &ctx.user_id.to_string()),
                    ],
                );
            })?;
        log_event_with_fields(
            Event::WorkPaperSubmitted,
            &[
                ("fields", &work_paper.form_data.len().to_string()),
                ("user_id", &ctx.user_id.to_string()),
                ("work_paper_id", &work_paper.id.to_string()),
            ],
        );
        Ok(work_paper)
    }

    pub fn get_work_paper(&self, id: WorkPaperId) -> AuditResult<WorkPaper> {
        Ok(self.work_papers.get(id)?)
    }

    pub fn list_work_papers(&self, offset: usize, limit: usize) -> AuditResult<Vec<WorkPaper>> {
        Ok(self.work_papers.list(offset, limit)?)
    }

    // ==================
    // Audit runs
    // ==================

    /// Runs the audit for `work_paper_id` and stores its conclusion.
    ///
    /// Runs for the same work paper are serialized; runs for different work
    /// papers never wait on each other.
    pub fn run_audit(
        &self,
        ctx: &RequestContext,
        work_paper_id: WorkPaperId,
    ) -> AuditResult<Conclusion> {
        let id = work_paper_id.to_string();
        let user = ctx.user_id.to_string();
        let scope = ObservationScope::begin(
            ScopeEvents::AUDIT,
            &[("user_id", &user), ("work_paper_id", &id)],
        );

        match self.run_audit_serialized(work_paper_id) {
            Ok(conclusion) => {
                scope.complete(&[
                    ("conclusion_id", &conclusion.id.to_string()),
                    ("failed", &conclusion.compliance_summary.failed.to_string()),
                    ("overall_score", &format!("{:.1}", conclusion.overall_score)),
                    ("passed", &conclusion.compliance_summary.passed.to_string()),
                    ("warnings", &conclusion.compliance_summary.warnings.to_string()),
                ]);
                Ok(conclusion)
            }
            Err(e) => {
                scope.reject(&e.to_string());
                Err(e)
            }
        }
    }

    fn run_audit_serialized(&self, work_paper_id: WorkPaperId) -> AuditResult<Conclusion> {
        // Unknown ids are rejected before a lock entry exists for them.
        self.work_papers.get(work_paper_id)?;

        let lock = self.run_lock(work_paper_id)?;
        let outcome = match lock.lock() {
            Ok(_running) => self.audit_locked(work_paper_id),
            Err(_) => Err(AuditError::Internal("Lock poisoned".into())),
        };
        self.release_run_lock(work_paper_id, lock);
        outcome
    }

    fn audit_locked(&self, work_paper_id: WorkPaperId) -> AuditResult<Conclusion> {
        let work_paper = self.work_papers.get(work_paper_id)?;
        let attributes = self.attributes.snapshot()?;
        let conclusion = self.engine.run(&work_paper, &attributes)?;

        let previous = self.work_papers.mark_audited(work_paper_id)?;
        match self.conclusions.upsert(conclusion) {
            Ok(stored) => {
                log_event_with_fields(
                    Event::ConclusionUpserted,
                    &[
                        ("conclusion_id", &stored.id.to_string()),
                        ("fingerprint", &stored.fingerprint()),
                        ("work_paper_id", &work_paper_id.to_string()),
                    ],
                );
                Ok(stored)
            }
            Err(e) => {
                // Put the status back so a failed run leaves no trace.
                self.work_papers.set_status(work_paper_id, previous)?;
                Err(e.into())
            }
        }
    }

    fn run_lock(&self, work_paper_id: WorkPaperId) -> AuditResult<Arc<Mutex<()>>> {
        let mut locks = self
            .run_locks
            .lock()
            .map_err(|_| AuditError::Internal("Lock poisoned".into()))?;
        Ok(locks.entry(work_paper_id).or_default().clone())
    }

    /// Drops the map entry once no other run holds or waits on it.
    fn release_run_lock(&self, work_paper_id: WorkPaperId, lock: Arc<Mutex<()>>) {
        let Ok(mut locks) = self.run_locks.lock() else {
            return;
        };
        // Clones are only taken under `run_locks`: two owners means the map and us.
        if Arc::strong_count(&lock) == 2 {
            locks.remove(&work_paper_id);
        }
    }

    // ==================
    // Conclusions
    // ==================

    pub fn get_conclusion(&self, id: Uuid) -> AuditResult<Conclusion> {
        Ok(self.conclusions.get(id)?)
    }

    /// Conclusion for a work paper; 404 for unknown papers and for papers never audited.
    pub fn conclusion_for(&self, work_paper_id: WorkPaperId) -> AuditResult<Conclusion> {
        self.work_papers.get(work_paper_id)?;
        Ok(self.conclusions.get_by_work_paper(work_paper_id)?)
    }

    /// Findings of the work paper's conclusion as CSV
    pub fn export_findings(&self, work_paper_id: WorkPaperId) -> AuditResult<String> {
        let conclusion = self.conclusion_for(work_paper_id)?;
        Ok(findings_to_csv(&conclusion.findings))
    }
}

fn rejected_attribute(err: AttributeError, id: Option<AttributeId>) -> AuditError {
    if let AttributeError::Configuration(config) = &err {
        let id = id.map(|i| i.to_string()).unwrap_or_default();
        let mut fields = vec![("code", config.code().code()), ("reason", config.message())];
        if !id.is_empty() {
            fields.push(("attribute_id", &id));
        }
        if let Some(parameter) = config.parameter() {
            fields.push(("parameter", parameter));
        }
        log_event_with_fields(Event::AttributeRejected, &fields);
    }
    err.into()
}
