//! Run scope
//!
//! Brackets an operation with a start event and exactly one outcome event.
//! Dropping the scope without an outcome logs the incomplete event.

use std::time::Instant;

use super::events::Event;
use super::log_event_with_fields;

/// Events a scope emits
#[derive(Debug, Clone, Copy)]
pub struct ScopeEvents {
    pub start: Event,
    pub complete: Event,
    pub rejected: Event,
    pub incomplete: Event,
}

impl ScopeEvents {
    pub const AUDIT: ScopeEvents = ScopeEvents {
        start: Event::AuditStart,
        complete: Event::AuditComplete,
        rejected: Event::AuditRejected,
        incomplete: Event::AuditIncomplete,
    };
}

/// Logs `start` now and one of `complete` / `rejected` / `incomplete` later.
///
/// Fields given at creation are repeated on every event, and the outcome
/// events carry `duration_ms`.
pub struct ObservationScope {
    events: ScopeEvents,
    fields: Vec<(&'static str, String)>,
    started: Instant,
    finished: bool,
}

impl ObservationScope {
    pub fn begin(events: ScopeEvents, fields: &[(&'static str, &str)]) -> Self {
        let scope = Self {
            events,
            fields: fields.iter().map(|(k, v)| (*k, v.to_string())).collect(),
            started: Instant::now(),
            finished: false,
        };
        scope.emit(events.start, &[]);
        scope
    }

    pub fn complete(mut self, extra: &[(&str, &str)]) {
        self.finished = true;
        self.emit_timed(self.events.complete, extra);
    }

    pub fn reject(mut self, reason: &str) {
        self.finished = true;
        self.emit_timed(self.events.rejected, &[("reason", reason)]);
    }

    fn emit_timed(&self, event: Event, extra: &[(&str, &str)]) {
        let elapsed = self.started.elapsed().as_millis().to_string();
        let mut fields: Vec<(&str, &str)> = extra.to_vec();
        fields.push(("duration_ms", &elapsed));
        self.emit(event, &fields);
    }

    fn emit(&self, event: Event, extra: &[(&str, &str)]) {
        let mut fields: Vec<(&str, &str)> =
            self.fields.iter().map(|(k, v)| (*k, v.as_str())).collect();
        fields.extend_from_slice(extra);
        log_event_with_fields(event, &fields);
    }
}

impl Drop for ObservationScope {
    fn drop(&mut self) {
        if !self.finished {
            self.emit(
                self.events.incomplete,
                &[("reason", "scope dropped without outcome")],
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcomes_do_not_panic() {
        ObservationScope::begin(ScopeEvents::AUDIT, &[("work_paper_id", "1")]).complete(&[
            ("overall_score", "100.0"),
        ]);
        ObservationScope::begin(ScopeEvents::AUDIT, &[("work_paper_id", "2")])
            .reject("work paper not found");
        let scope = ObservationScope::begin(ScopeEvents::AUDIT, &[]);
        drop(scope);
    }
}
