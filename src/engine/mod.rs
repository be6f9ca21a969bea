//! Evaluation engine
//!
//! A pure transform from an ordered attribute list and a work paper's field
//! map to a scored, narrated conclusion.
//!
//! # Design Principles
//!
//! - No I/O, no locking and no logging inside the engine
//! - Exactly one finding per attribute, in attribute order
//! - Data problems are findings, never errors
//! - Identical inputs produce identical findings, score and narrative

pub mod checklist;
mod errors;
mod finding;
pub mod narrative;
mod orchestrator;
pub mod rule;
pub mod scoring;

pub use errors::{EngineError, EngineResult};
pub use finding::{Finding, FindingStatus};
pub use narrative::{ComplianceTier, NarrativeLine, BOLD_MARKER, NARRATIVE_FORMAT_VERSION};
pub use orchestrator::{AuditEngine, EngineOptions, Evaluation};
pub use scoring::{
    aggregate, overall_score, MAX_IMPERFECT_SCORE, MIN_NONZERO_SCORE, VACUOUS_SCORE,
};
