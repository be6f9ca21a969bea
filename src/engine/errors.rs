//! Engine errors
//!
//! Data problems never surface here; they become findings. The only way a
//! run fails is an attribute that slipped past write-time validation.

use thiserror::Error;

use crate::attribute::{AttributeId, ConfigurationError};

pub type EngineResult<T> = Result<T, EngineError>;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Attribute {attribute_id} is malformed: {source}")]
    Configuration {
        attribute_id: AttributeId,
        #[source]
        source: ConfigurationError,
    },
}

impl EngineError {
    pub fn status_code(&self) -> u16 {
        match self {
            EngineError::Configuration { .. } => 400,
        }
    }
}
