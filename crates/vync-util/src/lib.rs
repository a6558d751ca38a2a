//! vync-util - Shared infrastructure for the Vyn compiler.
//!
//! This crate provides the types every compiler phase depends on:
//!
//! - [`SourceLocation`] - a `(file, line, column)` triple attached to every
//!   token and AST node
//! - [`Diagnostic`], [`Level`], [`Handler`] - error and warning reporting
//! - [`ParseError`] - the fatal error type raised by the parser
//!
//! Locations are used only for diagnostics, never for identity. All phases
//! format diagnostics the same way: `{file}:{line}:{column}: {message}`.

pub mod diagnostic;
pub mod error;
pub mod span;

pub use diagnostic::{Diagnostic, Handler, Level};
pub use error::ParseError;
pub use span::SourceLocation;
