//! Source location tracking.
//!
//! This module provides [`SourceLocation`], the `(file, line, column)`
//! triple attached to every token and every AST node. Locations are
//! 1-based and render as `file:line:column`.

use std::fmt;
use std::sync::Arc;

/// A position in a source file.
///
/// Both `line` and `column` are 1-based. The file path is shared via
/// `Arc<str>` so locations stay cheap to clone even though every token
/// and AST node carries one.
///
/// # Example
///
/// ```
/// use vync_util::SourceLocation;
///
/// let loc = SourceLocation::new("main.vyn", 3, 7);
/// assert_eq!(loc.to_string(), "main.vyn:3:7");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceLocation {
    /// Path of the source file.
    pub file: Arc<str>,

    /// Line number (1-based).
    pub line: u32,

    /// Column number (1-based).
    pub column: u32,
}

impl SourceLocation {
    /// Creates a location from a file path and 1-based line/column.
    pub fn new(file: impl Into<Arc<str>>, line: u32, column: u32) -> Self {
        Self {
            file: file.into(),
            line,
            column,
        }
    }

    /// Creates a location in the same file at a different position.
    ///
    /// Avoids re-interning the path when the lexer advances.
    pub fn at(&self, line: u32, column: u32) -> Self {
        Self {
            file: Arc::clone(&self.file),
            line,
            column,
        }
    }

    /// A placeholder location for synthesized nodes and tests.
    pub fn dummy() -> Self {
        Self::new("<unknown>", 1, 1)
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_format() {
        let loc = SourceLocation::new("lib.vyn", 12, 4);
        assert_eq!(loc.to_string(), "lib.vyn:12:4");
    }

    #[test]
    fn test_at_shares_file() {
        let loc = SourceLocation::new("lib.vyn", 1, 1);
        let moved = loc.at(2, 9);
        assert_eq!(moved.file, loc.file);
        assert_eq!(moved.line, 2);
        assert_eq!(moved.column, 9);
    }

    #[test]
    fn test_dummy() {
        let loc = SourceLocation::dummy();
        assert_eq!(loc.line, 1);
        assert_eq!(loc.column, 1);
    }
}
