//! Work paper types
//!
//! Submitted form data is loosely typed JSON. It is coerced once, at
//! ingestion, into [`FieldValue`]s so evaluators never re-interpret raw JSON.
//!
//! Ingestion rules:
//! - numbers, strings and booleans are kept as-is
//! - `null` entries are dropped (the field counts as not provided)
//! - arrays and objects are rejected

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::attribute::normalize_key;

use super::errors::{WorkPaperError, WorkPaperResult};

/// Work paper identity, assigned by the work paper store
pub type WorkPaperId = u64;

/// A submitted scalar value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl FieldValue {
    /// Numeric view; numeric-looking strings coerce, booleans never do.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) if n.is_finite() => Some(*n),
            FieldValue::Number(_) | FieldValue::Bool(_) => None,
            FieldValue::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        }
    }

    /// Calendar date view: `date_format` first, then RFC 3339 timestamps
    /// truncated to their date.
    pub fn as_date(&self, date_format: &str) -> Option<NaiveDate> {
        let FieldValue::Text(s) = self else {
            return None;
        };
        let s = s.trim();
        NaiveDate::parse_from_str(s, date_format)
            .ok()
            .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive()))
    }

    /// Empty or whitespace-only text
    pub fn is_blank(&self) -> bool {
        matches!(self, FieldValue::Text(s) if s.trim().is_empty())
    }

    /// Evidence-marker truthiness
    pub fn is_truthy(&self) -> bool {
        match self {
            FieldValue::Bool(b) => *b,
            FieldValue::Number(n) => *n != 0.0 && !n.is_nan(),
            FieldValue::Text(s) => {
                let s = s.trim().to_lowercase();
                !s.is_empty() && !matches!(s.as_str(), "false" | "no" | "n" | "0" | "off" | "none")
            }
        }
    }

    fn from_json(field: &str, value: &Value) -> WorkPaperResult<Option<Self>> {
        match value {
            Value::Null => Ok(None),
            Value::Bool(b) => Ok(Some(FieldValue::Bool(*b))),
            Value::Number(n) => n
                .as_f64()
                .map(|n| Some(FieldValue::Number(n)))
                .ok_or_else(|| WorkPaperError::InvalidFieldValue {
                    field: field.to_string(),
                    kind: "number",
                }),
            Value::String(s) => Ok(Some(FieldValue::Text(s.clone()))),
            Value::Array(_) => Err(WorkPaperError::InvalidFieldValue {
                field: field.to_string(),
                kind: "array",
            }),
            Value::Object(_) => Err(WorkPaperError::InvalidFieldValue {
                field: field.to_string(),
                kind: "object",
            }),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Number(n) => write!(f, "{}", n),
            FieldValue::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Field name to value mapping, ordered by key
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldMap(BTreeMap<String, FieldValue>);

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Coerces a JSON object into a field map.
    ///
    /// `null` (the whole form) is an empty map.
    pub fn from_json(value: &Value, max_fields: usize) -> WorkPaperResult<Self> {
        let obj = match value {
            Value::Null => return Ok(Self::new()),
            Value::Object(obj) => obj,
            _ => {
                return Err(WorkPaperError::InvalidFormData(
                    "form_data must be a JSON object".into(),
                ))
            }
        };
        if obj.len() > max_fields {
            return Err(WorkPaperError::TooManyFields(obj.len(), max_fields));
        }

        let mut fields = BTreeMap::new();
        for (key, raw) in obj {
            if let Some(value) = FieldValue::from_json(key, raw)? {
                fields.insert(key.clone(), value);
            }
        }
        Ok(Self(fields))
    }

    pub fn insert(&mut self, key: impl Into<String>, value: FieldValue) {
        self.0.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.0.get(key)
    }

    /// Lookup where both sides are compared after [`normalize_key`].
    pub fn get_normalized(&self, normalized: &str) -> Option<&FieldValue> {
        self.0
            .iter()
            .find(|(k, _)| normalize_key(k) == normalized)
            .map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldValue)> {
        self.0.iter()
    }
}

impl<K: Into<String>> FromIterator<(K, FieldValue)> for FieldMap {
    fn from_iter<I: IntoIterator<Item = (K, FieldValue)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Work paper lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkPaperStatus {
    Pending,
    Audited,
}

impl WorkPaperStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkPaperStatus::Pending => "pending",
            WorkPaperStatus::Audited => "audited",
        }
    }
}

/// An auditor's submission as received from the outside
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkPaperSubmission {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub form_data: Value,
    /// Opaque references to uploaded files
    #[serde(default)]
    pub attachments: Vec<String>,
}

/// A stored work paper
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkPaper {
    pub id: WorkPaperId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub form_data: FieldMap,
    #[serde(default)]
    pub attachments: Vec<String>,
    pub status: WorkPaperStatus,
    pub submitted_by: u64,
    pub submitted_at: DateTime<Utc>,
}

impl WorkPaper {
    /// Builds a pending work paper from a submission.
    pub fn from_submission(
        id: WorkPaperId,
        submission: WorkPaperSubmission,
        submitted_by: u64,
        max_fields: usize,
    ) -> WorkPaperResult<Self> {
        let title = submission.title.trim();
        if title.is_empty() {
            return Err(WorkPaperError::EmptyTitle);
        }
        let form_data = FieldMap::from_json(&submission.form_data, max_fields)?;

        Ok(Self {
            id,
            title: title.to_string(),
            description: submission.description.filter(|d| !d.trim().is_empty()),
            form_data,
            attachments: submission.attachments,
            status: WorkPaperStatus::Pending,
            submitted_by,
            submitted_at: Utc::now(),
        })
    }
}
