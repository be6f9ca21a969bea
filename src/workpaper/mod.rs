//! Work paper subsystem
//!
//! Holds auditor submissions: structured key/value form data plus opaque
//! attachment references. Form data is coerced once at ingestion into
//! typed [`FieldValue`]s.

mod errors;
mod store;
mod types;

pub use errors::{WorkPaperError, WorkPaperResult};
pub use store::{WorkPaperStore, DEFAULT_MAX_FORM_FIELDS};
pub use types::{FieldMap, FieldValue, WorkPaper, WorkPaperId, WorkPaperStatus, WorkPaperSubmission};
