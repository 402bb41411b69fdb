//! `CompileCtx`: scoped, per-call configuration threaded through the
//! compiler instead of living in globals.
//!
//! Everything here lives for exactly one compiler invocation: nothing
//! persists across calls to [`crate::compile::compile`].

use crate::pattern::VectorKind;

/// One step of the trace log: which column was chosen and how the matrix
/// shrank as a result.
#[derive(Debug, Clone)]
pub struct TraceEvent {
    pub column: usize,
    pub rows_before: usize,
    pub rows_after: usize,
}

pub struct CompileCtx {
    /// The vector kind `matchv!` is compiling for.
    pub vector_kind: VectorKind,
    /// Set the first time the "inexhaustive match" warning fires, so it's
    /// emitted at most once per call.
    warned: bool,
    /// Whether tracing is enabled for this call: a separate, globally
    /// toggled output channel, disabled by default.
    pub trace: bool,
    pub trace_log: Vec<TraceEvent>,
}

impl CompileCtx {
    pub fn new(vector_kind: VectorKind, trace: bool) -> Self {
        CompileCtx { vector_kind, warned: false, trace, trace_log: Vec::new() }
    }

    /// Emits the inexhaustive-match warning at most once; returns whether
    /// this call was the one that fired it (mostly useful for tests).
    pub fn warn_inexhaustive_once(&mut self) -> bool {
        if self.warned {
            return false;
        }
        self.warned = true;
        tracing::warn!("non-exhaustive match: consider adding an `_` catch-all row");
        true
    }

    pub fn record_trace(&mut self, column: usize, rows_before: usize, rows_after: usize) {
        if self.trace {
            tracing::trace!(column, rows_before, rows_after, "specializing column");
            self.trace_log.push(TraceEvent { column, rows_before, rows_after });
        }
    }
}
