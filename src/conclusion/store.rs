//! # Conclusion Store
//!
//! At most one conclusion per work paper. `upsert` replaces the stored
//! conclusion for the same work paper and keeps the id first issued for it,
//! so a re-run with unchanged inputs differs only in `generated_at`.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use uuid::Uuid;

use crate::workpaper::WorkPaperId;

use super::errors::{ConclusionError, ConclusionResult};
use super::types::Conclusion;

/// Persistence boundary for conclusions
pub trait ConclusionStore: Send + Sync + std::fmt::Debug {
    /// Insert or replace the conclusion for its work paper; returns what was stored.
    fn upsert(&self, conclusion: Conclusion) -> ConclusionResult<Conclusion>;

    fn get(&self, id: Uuid) -> ConclusionResult<Conclusion>;

    fn get_by_work_paper(&self, work_paper_id: WorkPaperId) -> ConclusionResult<Conclusion>;

    /// All conclusions, ordered by work paper id
    fn list(&self) -> ConclusionResult<Vec<Conclusion>>;
}

fn merge(existing: Option<&Conclusion>, mut incoming: Conclusion) -> Conclusion {
    if let Some(previous) = existing {
        incoming.id = previous.id;
    }
    incoming
}

/// In-memory conclusion store
#[derive(Debug, Default)]
pub struct MemoryConclusionStore {
    by_work_paper: RwLock<BTreeMap<WorkPaperId, Conclusion>>,
}

impl MemoryConclusionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(_: T) -> ConclusionError {
    ConclusionError::Internal("Lock poisoned".into())
}

impl ConclusionStore for MemoryConclusionStore {
    fn upsert(&self, conclusion: Conclusion) -> ConclusionResult<Conclusion> {
        let mut map = self.by_work_paper.write().map_err(poisoned)?;
        let stored = merge(map.get(&conclusion.work_paper_id), conclusion);
        map.insert(stored.work_paper_id, stored.clone());
        Ok(stored)
    }

    fn get(&self, id: Uuid) -> ConclusionResult<Conclusion> {
        let map = self.by_work_paper.read().map_err(poisoned)?;
        map.values()
            .find(|c| c.id == id)
            .cloned()
            .ok_or(ConclusionError::NotFound(id))
    }

    fn get_by_work_paper(&self, work_paper_id: WorkPaperId) -> ConclusionResult<Conclusion> {
        let map = self.by_work_paper.read().map_err(poisoned)?;
        map.get(&work_paper_id)
            .cloned()
            .ok_or(ConclusionError::NotFoundForWorkPaper(work_paper_id))
    }

    fn list(&self) -> ConclusionResult<Vec<Conclusion>> {
        let map = self.by_work_paper.read().map_err(poisoned)?;
        Ok(map.values().cloned().collect())
    }
}

/// JSON file-backed conclusion store.
///
/// The whole file is rewritten on every upsert. The lock serializes writers
/// within the process.
#[derive(Debug)]
pub struct FileConclusionStore {
    path: PathBuf,
    lock: RwLock<()>,
}

impl FileConclusionStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: RwLock::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load_all(&self) -> ConclusionResult<Vec<Conclusion>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&self.path).map_err(|e| {
            ConclusionError::Internal(format!("Failed to read conclusion store: {}", e))
        })?;

        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&content).map_err(|e| {
            ConclusionError::Internal(format!("Failed to parse conclusion store: {}", e))
        })
    }

    fn save_all(&self, conclusions: &[Conclusion]) -> ConclusionResult<()> {
        let content = serde_json::to_string_pretty(conclusions).map_err(|e| {
            ConclusionError::Internal(format!("Failed to serialize conclusions: {}", e))
        })?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    ConclusionError::Internal(format!(
                        "Failed to create conclusion store directory: {}",
                        e
                    ))
                })?;
            }
        }

        // Sibling file + rename: the store file is always complete.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, content).map_err(|e| {
            ConclusionError::Internal(format!("Failed to write conclusion store: {}", e))
        })?;
        fs::rename(&tmp, &self.path).map_err(|e| {
            ConclusionError::Internal(format!("Failed to replace conclusion store: {}", e))
        })
    }
}

impl ConclusionStore for FileConclusionStore {
    fn upsert(&self, conclusion: Conclusion) -> ConclusionResult<Conclusion> {
        let _guard = self.lock.write().map_err(poisoned)?;
        let mut all = self.load_all()?;

        let stored = match all
            .iter()
            .position(|c| c.work_paper_id == conclusion.work_paper_id)
        {
            Some(idx) => {
                let stored = merge(Some(&all[idx]), conclusion);
                all[idx] = stored.clone();
                stored
            }
            None => {
                all.push(conclusion.clone());
                all.sort_by_key(|c| c.work_paper_id);
                conclusion
            }
        };

        self.save_all(&all)?;
        Ok(stored)
    }

    fn get(&self, id: Uuid) -> ConclusionResult<Conclusion> {
        let _guard = self.lock.read().map_err(poisoned)?;
        self.load_all()?
            .into_iter()
            .find(|c| c.id == id)
            .ok_or(ConclusionError::NotFound(id))
    }

    fn get_by_work_paper(&self, work_paper_id: WorkPaperId) -> ConclusionResult<Conclusion> {
        let _guard = self.lock.read().map_err(poisoned)?;
        self.load_all()?
            .into_iter()
            .find(|c| c.work_paper_id == work_paper_id)
            .ok_or(ConclusionError::NotFoundForWorkPaper(work_paper_id))
    }

    fn list(&self) -> ConclusionResult<Vec<Conclusion>> {
        let _guard = self.lock.read().map_err(poisoned)?;
        self.load_all()
    }
}
