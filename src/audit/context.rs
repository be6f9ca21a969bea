//! Request-scoped identity
//!
//! Passed explicitly into every service operation that depends on who is
//! calling. The engine itself never sees it.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::errors::{AuditError, AuditResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Defines attributes
    Manager,
    /// Submits work papers and runs audits
    Auditor,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Manager => "manager",
            Role::Auditor => "auditor",
        }
    }

    /// Case-insensitive parse
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "manager" => Some(Role::Manager),
            "auditor" => Some(Role::Auditor),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Who is making the current request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestContext {
    pub user_id: u64,
    pub role: Role,
}

impl RequestContext {
    pub fn new(user_id: u64, role: Role) -> Self {
        Self { user_id, role }
    }

    pub fn manager(user_id: u64) -> Self {
        Self::new(user_id, Role::Manager)
    }

    pub fn auditor(user_id: u64) -> Self {
        Self::new(user_id, Role::Auditor)
    }

    pub fn is_manager(&self) -> bool {
        self.role == Role::Manager
    }

    /// Rejects the operation unless the caller is a manager.
    pub fn require_manager(&self, action: &'static str) -> AuditResult<()> {
        if self.is_manager() {
            Ok(())
        } else {
            Err(AuditError::Forbidden {
                action,
                role: self.role,
            })
        }
    }
}
