//! Diagnostic queue for collecting faults across independent definitions.
//!
//! A single definition's processing may short-circuit at its first fault,
//! but sibling definitions continue; the queue is where their faults
//! accumulate. The overall run ends with either an elaborated result or a
//! non-empty queue.

use fen_ir::SourceRange;

use crate::Diagnostic;

/// Default cap on collected errors; past this, further pushes are dropped
/// to keep pathological inputs from flooding output.
const DEFAULT_ERROR_LIMIT: usize = 100;

/// Accumulating diagnostic collection.
#[derive(Debug, Default)]
pub struct DiagnosticQueue {
    diagnostics: Vec<Diagnostic>,
    dropped: usize,
}

impl DiagnosticQueue {
    pub fn new() -> Self {
        DiagnosticQueue::default()
    }

    /// Add a diagnostic. Errors past the limit are counted but dropped.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        if self.diagnostics.len() >= DEFAULT_ERROR_LIMIT {
            self.dropped += 1;
            return;
        }
        self.diagnostics.push(diagnostic);
    }

    /// Add several diagnostics.
    pub fn extend(&mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        for diagnostic in diagnostics {
            self.push(diagnostic);
        }
    }

    /// Check whether any error-severity diagnostic has been collected.
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    /// Number of collected diagnostics.
    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Number of diagnostics dropped past the error limit.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// View collected diagnostics in push order.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Consume the queue, yielding diagnostics sorted by source position
    /// (stable; ties keep push order).
    pub fn into_sorted(mut self) -> Vec<Diagnostic> {
        self.diagnostics
            .sort_by_key(|diagnostic| sort_key(diagnostic.range));
        self.diagnostics
    }
}

fn sort_key(range: SourceRange) -> (u32, u32) {
    (range.start.offset, range.end.offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorCode;
    use fen_ir::{Point, SourceRange};
    use pretty_assertions::assert_eq;

    fn at(offset: u32) -> SourceRange {
        SourceRange::point(Point::new(offset, 1, offset + 1))
    }

    #[test]
    fn test_collects_instead_of_aborting() {
        let mut queue = DiagnosticQueue::new();
        queue.push(Diagnostic::error(ErrorCode::E2001, "first", at(10)));
        queue.push(Diagnostic::error(ErrorCode::E3001, "second", at(2)));
        assert!(queue.has_errors());
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn test_sorted_by_position() {
        let mut queue = DiagnosticQueue::new();
        queue.push(Diagnostic::error(ErrorCode::E2001, "later", at(10)));
        queue.push(Diagnostic::error(ErrorCode::E3001, "earlier", at(2)));
        let sorted = queue.into_sorted();
        assert_eq!(sorted[0].message, "earlier");
        assert_eq!(sorted[1].message, "later");
    }

    #[test]
    fn test_error_limit() {
        let mut queue = DiagnosticQueue::new();
        for i in 0..150 {
            queue.push(Diagnostic::error(ErrorCode::E3001, "overflow", at(i)));
        }
        assert_eq!(queue.len(), 100);
        assert_eq!(queue.dropped(), 50);
    }

    #[test]
    fn test_warnings_are_not_errors() {
        let mut queue = DiagnosticQueue::new();
        queue.push(Diagnostic::warning(ErrorCode::E1006, "empty block", at(0)));
        assert!(!queue.has_errors());
        assert!(!queue.is_empty());
    }
}
