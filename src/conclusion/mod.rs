//! Conclusions
//!
//! The record an audit run produces, its persistence boundary and the
//! tabular export of its findings.
//!
//! # Design Principles
//!
//! - At most one conclusion per work paper (upsert by work paper id)
//! - Conclusions own their data; attribute edits never rewrite them
//! - Never partially written

mod errors;
pub mod export;
mod store;
mod types;

pub use errors::{ConclusionError, ConclusionResult};
pub use export::{findings_to_csv, parse_csv, CsvError, CSV_HEADER};
pub use store::{ConclusionStore, FileConclusionStore, MemoryConclusionStore};
pub use types::{ComplianceSummary, Conclusion};
