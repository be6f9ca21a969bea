//! # Work Paper Store

use std::collections::BTreeMap;
use std::sync::RwLock;

use super::errors::{WorkPaperError, WorkPaperResult};
use super::types::{WorkPaper, WorkPaperId, WorkPaperStatus, WorkPaperSubmission};

/// Default cap on form fields per submission
pub const DEFAULT_MAX_FORM_FIELDS: usize = 500;

#[derive(Debug, Default)]
struct Inner {
    next_id: WorkPaperId,
    by_id: BTreeMap<WorkPaperId, WorkPaper>,
}

/// In-memory registry of submitted work papers
#[derive(Debug)]
pub struct WorkPaperStore {
    inner: RwLock<Inner>,
    max_form_fields: usize,
}

impl Default for WorkPaperStore {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_FORM_FIELDS)
    }
}

impl WorkPaperStore {
    pub fn new(max_form_fields: usize) -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
            max_form_fields,
        }
    }

    /// Ingest a submission; the stored paper starts out `pending`.
    pub fn submit(
        &self,
        submission: WorkPaperSubmission,
        submitted_by: u64,
    ) -> WorkPaperResult<WorkPaper> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| WorkPaperError::Internal("Lock poisoned".into()))?;
        let id = inner.next_id + 1;
        let work_paper =
            WorkPaper::from_submission(id, submission, submitted_by, self.max_form_fields)?;
        inner.next_id = id;
        inner.by_id.insert(id, work_paper.clone());
        Ok(work_paper)
    }

    pub fn get(&self, id: WorkPaperId) -> WorkPaperResult<WorkPaper> {
        let inner = self
            .inner
            .read()
            .map_err(|_| WorkPaperError::Internal("Lock poisoned".into()))?;
        inner
            .by_id
            .get(&id)
            .cloned()
            .ok_or(WorkPaperError::NotFound(id))
    }

    pub fn list(&self, offset: usize, limit: usize) -> WorkPaperResult<Vec<WorkPaper>> {
        let inner = self
            .inner
            .read()
            .map_err(|_| WorkPaperError::Internal("Lock poisoned".into()))?;
        Ok(inner
            .by_id
            .values()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    /// Sets the status and returns the previous one.
    pub fn set_status(
        &self,
        id: WorkPaperId,
        status: WorkPaperStatus,
    ) -> WorkPaperResult<WorkPaperStatus> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| WorkPaperError::Internal("Lock poisoned".into()))?;
        let work_paper = inner.by_id.get_mut(&id).ok_or(WorkPaperError::NotFound(id))?;
        let previous = work_paper.status;
        work_paper.status = status;
        Ok(previous)
    }

    /// New submissions get ids strictly above `id`.
    ///
    /// Used on startup so ids already referenced by persisted conclusions
    /// are never handed out again.
    pub fn reserve_ids_through(&self, id: WorkPaperId) -> WorkPaperResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| WorkPaperError::Internal("Lock poisoned".into()))?;
        inner.next_id = inner.next_id.max(id);
        Ok(())
    }

    /// Re-running an audit keeps the paper audited.
    pub fn mark_audited(&self, id: WorkPaperId) -> WorkPaperResult<WorkPaperStatus> {
        self.set_status(id, WorkPaperStatus::Audited)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn submission(title: &str) -> WorkPaperSubmission {
        WorkPaperSubmission {
            title: title.into(),
            form_data: json!({"balance": 10}),
            ..Default::default()
        }
    }

    #[test]
    fn test_submit_and_get() {
        let store = WorkPaperStore::default();
        let wp = store.submit(submission("Cash"), 4).unwrap();
        assert_eq!(wp.id, 1);
        assert_eq!(store.get(1).unwrap(), wp);
        assert!(matches!(store.get(2), Err(WorkPaperError::NotFound(2))));
    }

    #[test]
    fn test_reserved_ids_are_skipped() {
        let store = WorkPaperStore::default();
        store.reserve_ids_through(7).unwrap();
        assert_eq!(store.submit(submission("Cash"), 1).unwrap().id, 8);

        // Never moves backwards
        store.reserve_ids_through(3).unwrap();
        assert_eq!(store.submit(submission("Bank"), 1).unwrap().id, 9);
    }

    #[test]
    fn test_rejected_submission_consumes_no_id() {
        let store = WorkPaperStore::default();
        assert!(store.submit(submission(""), 1).is_err());
        assert_eq!(store.submit(submission("Cash"), 1).unwrap().id, 1);
    }

    #[test]
    fn test_mark_audited_twice_stays_audited() {
        let store = WorkPaperStore::default();
        let wp = store.submit(submission("Cash"), 1).unwrap();
        assert_eq!(store.mark_audited(wp.id).unwrap(), WorkPaperStatus::Pending);
        assert_eq!(store.mark_audited(wp.id).unwrap(), WorkPaperStatus::Audited);
        assert_eq!(store.get(wp.id).unwrap().status, WorkPaperStatus::Audited);
    }

    #[test]
    fn test_list_is_paged() {
        let store = WorkPaperStore::new(10);
        for i in 0..3 {
            store.submit(submission(&format!("WP {}", i)), 1).unwrap();
        }
        let page = store.list(2, 10).unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].title, "WP 2");
    }
}
