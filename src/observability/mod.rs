//! Observability
//!
//! Structured JSON logs for the service layers. The evaluation engine never
//! logs; the audit service and HTTP handlers log around it.
//!
//! # Principles
//!
//! 1. Read-only: logging never changes an outcome
//! 2. Synchronous, no background threads
//! 3. Deterministic line layout
//!
//! # Usage
//!
//! ```ignore
//! use workaudit::observability::{log_event_with_fields, Event};
//!
//! log_event_with_fields(Event::AttributeCreated, &[("attribute_id", "3")]);
//! ```

mod events;
mod logger;
mod scope;

pub use events::Event;
pub use logger::{render, Logger, Severity};
pub use scope::{ObservationScope, ScopeEvents};

/// Log a lifecycle event at its own severity
pub fn log_event(event: Event) {
    Logger::log(event.severity(), event.as_str(), &[]);
}

/// Log a lifecycle event with fields at its own severity
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}
