//! Lifecycle events
//!
//! Every line the service logs names one of these.

use std::fmt;

use super::logger::Severity;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Process
    ConfigLoaded,
    Serving,
    ShutdownComplete,

    // Attributes
    AttributeCreated,
    AttributeUpdated,
    AttributeDeleted,
    /// Definition failed validation or caller lacked the role
    AttributeRejected,

    // Work papers
    WorkPaperSubmitted,
    WorkPaperRejected,

    // Audit runs
    AuditStart,
    AuditComplete,
    AuditRejected,
    /// Run scope dropped without an outcome
    AuditIncomplete,
    ConclusionUpserted,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::Serving => "SERVING",
            Event::ShutdownComplete => "SHUTDOWN_COMPLETE",

            Event::AttributeCreated => "ATTRIBUTE_CREATED",
            Event::AttributeUpdated => "ATTRIBUTE_UPDATED",
            Event::AttributeDeleted => "ATTRIBUTE_DELETED",
            Event::AttributeRejected => "ATTRIBUTE_REJECTED",

            Event::WorkPaperSubmitted => "WORK_PAPER_SUBMITTED",
            Event::WorkPaperRejected => "WORK_PAPER_REJECTED",

            Event::AuditStart => "AUDIT_START",
            Event::AuditComplete => "AUDIT_COMPLETE",
            Event::AuditRejected => "AUDIT_REJECTED",
            Event::AuditIncomplete => "AUDIT_INCOMPLETE",
            Event::ConclusionUpserted => "CONCLUSION_UPSERTED",
        }
    }

    /// Severity the event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::AttributeRejected | Event::WorkPaperRejected | Event::AuditRejected => {
                Severity::Warn
            }
            Event::AuditIncomplete => Severity::Error,
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names() {
        assert_eq!(Event::AuditStart.as_str(), "AUDIT_START");
        assert_eq!(Event::ConclusionUpserted.to_string(), "CONCLUSION_UPSERTED");
        assert_eq!(Event::WorkPaperSubmitted.as_str(), "WORK_PAPER_SUBMITTED");
    }

    #[test]
    fn test_severity() {
        assert_eq!(Event::AuditComplete.severity(), Severity::Info);
        assert_eq!(Event::AttributeRejected.severity(), Severity::Warn);
        assert_eq!(Event::AuditIncomplete.severity(), Severity::Error);
    }
}
