//! # Attribute Store
//!
//! In-memory registry of attribute definitions. Ids are assigned
//! sequentially and listing is in ascending id order, which is the order the
//! engine evaluates attributes in.

use std::collections::BTreeMap;
use std::sync::RwLock;

use chrono::Utc;

use super::errors::{AttributeError, AttributeResult};
use super::types::{Attribute, AttributeId};
use super::validator::{to_definition, validate_definition, AttributeDefinition, AttributePatch};

#[derive(Debug, Default)]
struct Inner {
    next_id: AttributeId,
    by_id: BTreeMap<AttributeId, Attribute>,
}

/// Registry of attribute definitions
#[derive(Debug, Default)]
pub struct AttributeStore {
    inner: RwLock<Inner>,
}

impl AttributeStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and insert a new attribute
    pub fn create(
        &self,
        definition: &AttributeDefinition,
        created_by: u64,
    ) -> AttributeResult<Attribute> {
        let validated = validate_definition(definition)?;

        let mut inner = self
            .inner
            .write()
            .map_err(|_| AttributeError::Internal("Lock poisoned".into()))?;
        inner.next_id += 1;
        let attribute = Attribute {
            id: inner.next_id,
            name: validated.name,
            description: validated.description,
            kind: validated.kind,
            created_by,
            created_at: Utc::now(),
        };
        inner.by_id.insert(attribute.id, attribute.clone());
        Ok(attribute)
    }

    /// Get attribute by id
    pub fn get(&self, id: AttributeId) -> AttributeResult<Attribute> {
        let inner = self
            .inner
            .read()
            .map_err(|_| AttributeError::Internal("Lock poisoned".into()))?;
        inner
            .by_id
            .get(&id)
            .cloned()
            .ok_or(AttributeError::NotFound(id))
    }

    /// Apply a partial update; the merged definition is re-validated and
    /// the write is rejected as a whole if it is malformed.
    pub fn update(&self, id: AttributeId, patch: AttributePatch) -> AttributeResult<Attribute> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| AttributeError::Internal("Lock poisoned".into()))?;
        let existing = inner.by_id.get(&id).ok_or(AttributeError::NotFound(id))?;

        let merged = patch.apply(to_definition(existing));
        let validated = validate_definition(&merged)?;

        let updated = Attribute {
            id,
            name: validated.name,
            description: validated.description,
            kind: validated.kind,
            created_by: existing.created_by,
            created_at: existing.created_at,
        };
        inner.by_id.insert(id, updated.clone());
        Ok(updated)
    }

    /// Remove an attribute
    pub fn delete(&self, id: AttributeId) -> AttributeResult<Attribute> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| AttributeError::Internal("Lock poisoned".into()))?;
        inner.by_id.remove(&id).ok_or(AttributeError::NotFound(id))
    }

    /// Ordered copy of every attribute, taken under one read lock so an
    /// audit run sees a consistent set.
    pub fn snapshot(&self) -> AttributeResult<Vec<Attribute>> {
        let inner = self
            .inner
            .read()
            .map_err(|_| AttributeError::Internal("Lock poisoned".into()))?;
        Ok(inner.by_id.values().cloned().collect())
    }

    /// Paged listing in evaluation order
    pub fn list(&self, offset: usize, limit: usize) -> AttributeResult<Vec<Attribute>> {
        Ok(self
            .snapshot()?
            .into_iter()
            .skip(offset)
            .take(limit)
            .collect())
    }

    /// Number of stored attributes
    pub fn len(&self) -> usize {
        self.inner.read().map(|i| i.by_id.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
