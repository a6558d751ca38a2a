//! Diagnostic reporting infrastructure.
//!
//! A [`Diagnostic`] is one message pinned to a [`SourceLocation`]; a
//! [`Handler`] collects them in emission order. The semantic analyzer
//! emits through a handler and never aborts, so a single run reports
//! every problem it finds.
//!
//! # Example
//!
//! ```
//! use vync_util::{Diagnostic, Handler, SourceLocation};
//!
//! let mut handler = Handler::new();
//! handler.error("unexpected token", SourceLocation::new("main.vyn", 1, 5));
//!
//! assert!(handler.has_errors());
//! assert_eq!(
//!     handler.iter().next().unwrap().to_string(),
//!     "main.vyn:1:5: unexpected token"
//! );
//! ```

use std::fmt;

use crate::span::SourceLocation;

/// Diagnostic severity level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    /// A violation that makes the program invalid.
    Error,
    /// A problem that does not invalidate the program.
    Warning,
    /// Additional context attached to another diagnostic.
    Note,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Error => write!(f, "error"),
            Level::Warning => write!(f, "warning"),
            Level::Note => write!(f, "note"),
        }
    }
}

/// A single diagnostic message with severity and location.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    /// Severity level.
    pub level: Level,
    /// Human-readable message.
    pub message: String,
    /// Where in the source the problem was found.
    pub location: SourceLocation,
}

impl Diagnostic {
    /// Creates a diagnostic with an explicit level.
    pub fn new(level: Level, message: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            level,
            message: message.into(),
            location,
        }
    }

    /// Creates an error diagnostic.
    pub fn error(message: impl Into<String>, location: SourceLocation) -> Self {
        Self::new(Level::Error, message, location)
    }

    /// Creates a warning diagnostic.
    pub fn warning(message: impl Into<String>, location: SourceLocation) -> Self {
        Self::new(Level::Warning, message, location)
    }
}

impl fmt::Display for Diagnostic {
    // {file}:{line}:{column}: {message} - the one format every stage uses.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.location, self.message)
    }
}

/// Ordered collector of diagnostics.
///
/// Stages append diagnostics as they find them; the driver drains the
/// handler once the pipeline finishes. Emission order is source order
/// because every stage visits its input in source order.
#[derive(Debug, Default)]
pub struct Handler {
    diagnostics: Vec<Diagnostic>,
    error_count: usize,
}

impl Handler {
    /// Creates an empty handler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a diagnostic.
    pub fn emit(&mut self, diagnostic: Diagnostic) {
        if diagnostic.level == Level::Error {
            self.error_count += 1;
        }
        self.diagnostics.push(diagnostic);
    }

    /// Records an error at the given location.
    pub fn error(&mut self, message: impl Into<String>, location: SourceLocation) {
        self.emit(Diagnostic::error(message, location));
    }

    /// Records a warning at the given location.
    pub fn warning(&mut self, message: impl Into<String>, location: SourceLocation) {
        self.emit(Diagnostic::warning(message, location));
    }

    /// Returns true if any error-level diagnostic was recorded.
    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    /// Number of error-level diagnostics recorded so far.
    pub fn error_count(&self) -> usize {
        self.error_count
    }

    /// Iterates diagnostics in emission order.
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }

    /// Drains all recorded diagnostics, leaving the handler empty.
    pub fn take(&mut self) -> Vec<Diagnostic> {
        self.error_count = 0;
        std::mem::take(&mut self.diagnostics)
    }

    /// Total number of diagnostics of any level.
    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    /// Returns true if no diagnostics were recorded.
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc(line: u32, column: u32) -> SourceLocation {
        SourceLocation::new("test.vyn", line, column)
    }

    #[test]
    fn test_display_format() {
        let diag = Diagnostic::error("something went wrong", loc(2, 3));
        assert_eq!(diag.to_string(), "test.vyn:2:3: something went wrong");
    }

    #[test]
    fn test_handler_counts_errors() {
        let mut handler = Handler::new();
        assert!(!handler.has_errors());

        handler.warning("minor", loc(1, 1));
        assert!(!handler.has_errors());
        assert_eq!(handler.len(), 1);

        handler.error("major", loc(2, 1));
        assert!(handler.has_errors());
        assert_eq!(handler.error_count(), 1);
    }

    #[test]
    fn test_handler_preserves_order() {
        let mut handler = Handler::new();
        handler.error("first", loc(1, 1));
        handler.error("second", loc(2, 1));
        handler.error("third", loc(3, 1));

        let messages: Vec<_> = handler.iter().map(|d| d.message.clone()).collect();
        assert_eq!(messages, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_take_resets() {
        let mut handler = Handler::new();
        handler.error("oops", loc(1, 1));

        let drained = handler.take();
        assert_eq!(drained.len(), 1);
        assert!(handler.is_empty());
        assert!(!handler.has_errors());
    }

    #[test]
    fn test_level_display() {
        assert_eq!(Level::Error.to_string(), "error");
        assert_eq!(Level::Warning.to_string(), "warning");
        assert_eq!(Level::Note.to_string(), "note");
    }
}
