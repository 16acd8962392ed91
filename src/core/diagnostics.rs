// ============================================================================
// propflow - Diagnostics
// Non-fatal error reporting for the binding layer
// ============================================================================
//
// Nothing in the binding layer throws across the render path: a bad
// selector or a garbage emission degrades the render (previous state is
// kept, passthrough children still flow) and reports once through a
// pluggable sink. The default sink logs through `tracing`; tests inject a
// capturing sink and assert on the reports.
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

use thiserror::Error;

// =============================================================================
// ERROR TAXONOMY
// =============================================================================

/// The three ways a binding can go wrong.
///
/// All are recoverable: the render cycle proceeds with whatever state
/// existed before the faulty resolution or emission.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindError {
    /// The configured selector is neither a stream nor a function.
    #[error("selector is neither a stream nor a function (got {shape})")]
    SelectorType { shape: String },

    /// A function selector returned something that does not resolve to
    /// a stream, a list of streams, or an iterator of streams.
    #[error("selector returned {shape}, expected a stream, a list of streams, or an iterator of streams")]
    SelectorResult { shape: String },

    /// An emission is neither a property map nor an update function.
    #[error("emission is neither a property map nor an update function (got {shape})")]
    MutationType { shape: String },
}

impl BindError {
    /// Stable kind tag carried on every structured report.
    pub fn kind(&self) -> &'static str {
        match self {
            BindError::SelectorType { .. } => "SelectorTypeError",
            BindError::SelectorResult { .. } => "SelectorResultError",
            BindError::MutationType { .. } => "MutationTypeError",
        }
    }
}

// =============================================================================
// DIAGNOSTIC SINK
// =============================================================================

/// Where binding errors go.
///
/// Reporting must not panic and must not interrupt rendering; the wrapper
/// calls `report` and moves on.
pub trait DiagnosticSink: 'static {
    fn report(&self, error: &BindError);
}

// =============================================================================
// TRACING SINK
// =============================================================================

/// Default sink: one structured `tracing` error event per report.
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&self, error: &BindError) {
        tracing::error!(kind = error.kind(), error = %error, "stream binding failed");
    }
}

// =============================================================================
// NULL SINK
// =============================================================================

/// A sink that drops every report.
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn report(&self, _error: &BindError) {
        // intentionally empty
    }
}

// =============================================================================
// CAPTURE SINK
// =============================================================================

/// A sink that records every report, for assertions in tests.
#[derive(Clone, Default)]
pub struct CaptureSink {
    reports: Rc<RefCell<Vec<BindError>>>,
}

impl CaptureSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of reports captured so far.
    pub fn count(&self) -> usize {
        self.reports.borrow().len()
    }

    /// Snapshot of the captured reports.
    pub fn reports(&self) -> Vec<BindError> {
        self.reports.borrow().clone()
    }
}

impl DiagnosticSink for CaptureSink {
    fn report(&self, error: &BindError) {
        self.reports.borrow_mut().push(error.clone());
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_match_taxonomy() {
        let e = BindError::SelectorType { shape: "nothing".into() };
        assert_eq!(e.kind(), "SelectorTypeError");

        let e = BindError::SelectorResult { shape: "null".into() };
        assert_eq!(e.kind(), "SelectorResultError");

        let e = BindError::MutationType { shape: "list".into() };
        assert_eq!(e.kind(), "MutationTypeError");
    }

    #[test]
    fn messages_name_the_shape() {
        let e = BindError::MutationType { shape: "list".into() };
        assert!(e.to_string().contains("list"));
    }

    #[test]
    fn capture_sink_records_in_order() {
        let sink = CaptureSink::new();
        sink.report(&BindError::SelectorType { shape: "nothing".into() });
        sink.report(&BindError::MutationType { shape: "int".into() });

        assert_eq!(sink.count(), 2);
        assert_eq!(sink.reports()[0].kind(), "SelectorTypeError");
        assert_eq!(sink.reports()[1].kind(), "MutationTypeError");
    }

    #[test]
    fn null_sink_swallows_reports() {
        NullSink.report(&BindError::SelectorType { shape: "nothing".into() });
    }
}
