//! Fatal error types shared across compiler phases.

use thiserror::Error;

use crate::span::SourceLocation;

/// A fatal parse error.
///
/// The parser raises exactly one of these per run; no partial AST
/// escapes once it is raised. The `Expected` variant renders in the
/// canonical `expected X but found Y at file:line:col` shape.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ParseError {
    /// A specific token kind was required but something else was found.
    #[error("expected {expected} but found {found} at {location}")]
    Expected {
        /// Description of the required token or construct.
        expected: String,
        /// Description of the token actually present.
        found: String,
        /// Where the mismatch occurred.
        location: SourceLocation,
    },

    /// A grammar violation that is not a simple token mismatch.
    #[error("{message} at {location}")]
    Grammar {
        /// What went wrong.
        message: String,
        /// Where it went wrong.
        location: SourceLocation,
    },

    /// The parser encountered an `Illegal` token produced by the lexer.
    #[error("lexical error: {message} at {location}")]
    Lexical {
        /// The lexer's description, carried in the token's lexeme.
        message: String,
        /// Where the bad input starts.
        location: SourceLocation,
    },
}

impl ParseError {
    /// The location the error is pinned to.
    pub fn location(&self) -> &SourceLocation {
        match self {
            ParseError::Expected { location, .. }
            | ParseError::Grammar { location, .. }
            | ParseError::Lexical { location, .. } => location,
        }
    }
}
