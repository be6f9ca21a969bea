//! Audit service
//!
//! The boundary between callers (HTTP, CLI) and the pure engine: identity
//! checks, store access, per-work-paper serialization and logging.
//!
//! # Design Principles
//!
//! - Identity is an explicit [`RequestContext`], never ambient state
//! - A run writes everything or nothing
//! - Last writer wins per work paper, enforced by upsert

mod context;
mod errors;
mod service;

pub use context::{RequestContext, Role};
pub use errors::{AuditError, AuditResult};
pub use service::AuditService;
