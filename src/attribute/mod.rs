//! Audit attribute subsystem
//!
//! Attributes are the rules a work paper is judged against. They are
//! validated when written, so the engine only ever receives well-formed
//! definitions.
//!
//! # Design Principles
//!
//! - Closed rule variants, matched exhaustively
//! - Malformed definitions are rejected at write time
//! - Stable evaluation order (ascending id)
//! - Conclusions snapshot attribute names, so later edits never rewrite
//!   past results

mod errors;
mod store;
mod types;
mod validator;

pub use errors::{AttributeError, AttributeResult, ConfigErrorCode, ConfigResult, ConfigurationError};
pub use store::AttributeStore;
pub use types::{
    check_name, normalize_key, Attribute, AttributeId, AttributeKind, AttributeType, Operator, RuleParameters,
    RuleType, ThresholdValue,
};
pub use validator::{
    to_definition, validate_definition, AttributeDefinition, AttributePatch, ValidatedAttribute,
    RULE_DATE_FORMAT,
};
