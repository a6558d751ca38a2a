//! vync-par - Parser for the Vyn language.
//!
//! A hand-written recursive-descent parser with a Pratt-style expression
//! core. The grammar is split across five cooperating roles that share
//! one mutable cursor into an immutable token vector:
//!
//! | Role | File |
//! |---|---|
//! | Cursor primitives | `lib.rs` |
//! | Expressions | `expr.rs` |
//! | Types | `types.rs` |
//! | Statements | `stmt.rs` |
//! | Declarations | `decl.rs` |
//! | Module loop | `module.rs` |
//!
//! All roles are `impl Parser` blocks, so the mutual recursion between
//! statements and declarations (and between expressions and types, needed
//! for generic arguments and array sizes) costs nothing to set up.
//!
//! Three productions use bounded backtracking: speculative construction
//! (`Type(args)`), speculative array initialization (`[T; N]()`) and the
//! choice between a type-prefixed variable declaration and an expression
//! statement. Backtracking is a saved-and-restored cursor snapshot; no
//! partial nodes escape a failed speculation.
//!
//! # Example
//!
//! ```
//! use vync_lex::lex;
//! use vync_par::parse;
//!
//! let tokens = lex("fn main() { return 0; }", "demo.vyn");
//! let module = parse(tokens, "demo.vyn").unwrap();
//! assert_eq!(module.body.len(), 1);
//! ```

pub mod ast;
mod decl;
mod expr;
mod module;
mod stmt;
mod types;

#[cfg(test)]
mod edge_cases;

use std::sync::Arc;

use vync_lex::{Token, TokenKind};
use vync_util::{ParseError, SourceLocation};

pub use ast::{
    CatchClause, Decl, DeclKind, EnumVariant, Expr, ExprKind, FieldDecl, FunDecl, GenericParam,
    MatchArm, Module, ObjectProperty, Param, Stmt, StmtKind, TypeExpr, TypeExprKind, VarDecl,
    Visitor,
};

/// Parses a token sequence into a [`Module`].
///
/// On a grammar violation the parser returns the error as the sole
/// diagnostic; any partially built nodes are dropped.
pub fn parse(tokens: Vec<Token>, file_path: &str) -> Result<Module, ParseError> {
    Parser::new(tokens, file_path).parse_module()
}

/// A saved cursor position for bounded backtracking.
///
/// Restoring rewinds the position and undoes any `>>`-into-`> >` splits
/// performed after the save, so failed speculation leaves the token
/// buffer exactly as it found it.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Snapshot {
    pos: usize,
    splits: usize,
    allow_object_literal: bool,
}

/// The shared parser state: one cursor over one token vector.
pub struct Parser {
    /// The token buffer (comments already filtered out).
    tokens: Vec<Token>,
    /// Cursor index into `tokens`.
    pos: usize,
    /// File path for synthesized locations.
    file: Arc<str>,
    /// Undo log for `>>` tokens split into two `>`.
    splits: Vec<(usize, Token)>,
    /// False while parsing a `match` scrutinee, where `name {` must not
    /// become a typed object literal. Parenthesized and bracketed
    /// subexpressions switch it back on.
    allow_object_literal: bool,
}

impl Parser {
    /// Creates a parser over `tokens`.
    ///
    /// Comment tokens are dropped here; the grammar never consults them.
    /// The buffer is normalized to end in exactly one `Eof`.
    pub fn new(tokens: Vec<Token>, file_path: impl Into<Arc<str>>) -> Self {
        let file: Arc<str> = file_path.into();
        let mut tokens: Vec<Token> = tokens
            .into_iter()
            .filter(|t| t.kind != TokenKind::Comment)
            .collect();
        if tokens.last().map(|t| t.kind) != Some(TokenKind::Eof) {
            let loc = tokens
                .last()
                .map(|t| t.location.clone())
                .unwrap_or_else(|| SourceLocation::new(Arc::clone(&file), 1, 1));
            tokens.push(Token::synthetic(TokenKind::Eof, loc));
        }
        Self {
            tokens,
            pos: 0,
            file,
            splits: Vec::new(),
            allow_object_literal: true,
        }
    }

    /// Runs `f` with object literals allowed or suppressed, restoring the
    /// previous setting afterwards.
    pub(crate) fn with_object_literals<T>(
        &mut self,
        allowed: bool,
        f: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        let saved = self.allow_object_literal;
        self.allow_object_literal = allowed;
        let result = f(self);
        self.allow_object_literal = saved;
        result
    }

    /// True when `name { ... }` may parse as a typed object literal here.
    pub(crate) fn object_literals_allowed(&self) -> bool {
        self.allow_object_literal
    }

    // =========================================================================
    // CURSOR PRIMITIVES
    // =========================================================================

    /// The current token. Always valid: the buffer ends in `Eof` and the
    /// cursor never moves past it.
    pub(crate) fn peek(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    /// The token after the current one.
    pub(crate) fn peek_next(&self) -> &Token {
        &self.tokens[(self.pos + 1).min(self.tokens.len() - 1)]
    }

    /// The most recently consumed token.
    pub(crate) fn previous(&self) -> &Token {
        &self.tokens[self.pos.saturating_sub(1)]
    }

    /// Consumes and returns the current token.
    pub(crate) fn consume(&mut self) -> Token {
        let token = self.peek().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        token
    }

    /// Steps the cursor back one token.
    pub(crate) fn put_back(&mut self) {
        self.pos = self.pos.saturating_sub(1);
    }

    /// True when the cursor rests on `Eof`.
    pub(crate) fn is_at_end(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    /// True when the current token has the given kind.
    pub(crate) fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    /// True when the current token is any of the given kinds.
    pub(crate) fn check_any(&self, kinds: &[TokenKind]) -> bool {
        kinds.contains(&self.peek().kind)
    }

    /// Consumes the current token if it has the given kind.
    pub(crate) fn match_kind(&mut self, kind: TokenKind) -> Option<Token> {
        if self.check(kind) {
            Some(self.consume())
        } else {
            None
        }
    }

    /// Consumes the current token if it is any of the given kinds.
    pub(crate) fn match_any(&mut self, kinds: &[TokenKind]) -> Option<Token> {
        if self.check_any(kinds) {
            Some(self.consume())
        } else {
            None
        }
    }

    /// Matches a clause keyword (`else`, `catch`, `finally`) that may be
    /// separated from the previous block by newlines. The newlines are
    /// consumed only when the keyword follows.
    pub(crate) fn match_clause_keyword(&mut self, kind: TokenKind) -> Option<Token> {
        let snap = self.snapshot();
        self.skip_comments_and_newlines();
        match self.match_kind(kind) {
            Some(token) => Some(token),
            None => {
                self.restore(snap);
                None
            }
        }
    }

    /// Consumes a token of the given kind or fails with the canonical
    /// `expected X but found Y` error.
    pub(crate) fn expect(&mut self, kind: TokenKind) -> Result<Token, ParseError> {
        if self.check(kind) {
            Ok(self.consume())
        } else {
            Err(self.error_expected(&kind.to_string()))
        }
    }

    /// Consumes a closing `>` in generic-argument position.
    ///
    /// A `>>` token closing two nested generic lists is split in place:
    /// the first half is returned and the second half replaces the token
    /// so the next close sees a plain `>`. The split is recorded and
    /// undone by [`Parser::restore`].
    pub(crate) fn expect_gt(&mut self) -> Result<Token, ParseError> {
        if self.check(TokenKind::Gt) {
            return Ok(self.consume());
        }
        if self.check(TokenKind::Shr) {
            let original = self.peek().clone();
            let first = Token::new(TokenKind::Gt, ">", original.location.clone());
            let rest_loc = original
                .location
                .at(original.location.line, original.location.column + 1);
            self.splits.push((self.pos, original));
            self.tokens[self.pos] = Token::new(TokenKind::Gt, ">", rest_loc);
            return Ok(first);
        }
        Err(self.error_expected("'>'"))
    }

    /// Skips `Newline` tokens (comments never reach the parser).
    pub(crate) fn skip_comments_and_newlines(&mut self) {
        while self.check(TokenKind::Newline) {
            self.pos += 1;
        }
    }

    /// Skips `Indent`/`Dedent` markers (and newlines) where the grammar
    /// does not consult them.
    pub(crate) fn skip_indents_and_dedents(&mut self) {
        while self.check_any(&[TokenKind::Indent, TokenKind::Dedent, TokenKind::Newline]) {
            self.pos += 1;
        }
    }

    /// The current token's location.
    pub(crate) fn current_location(&self) -> SourceLocation {
        self.peek().location.clone()
    }

    // =========================================================================
    // BACKTRACKING
    // =========================================================================

    /// Saves the cursor for bounded backtracking.
    pub(crate) fn snapshot(&self) -> Snapshot {
        Snapshot {
            pos: self.pos,
            splits: self.splits.len(),
            allow_object_literal: self.allow_object_literal,
        }
    }

    /// Restores a saved cursor, undoing any token splits made since.
    pub(crate) fn restore(&mut self, snapshot: Snapshot) {
        while self.splits.len() > snapshot.splits {
            let (idx, original) = self.splits.pop().expect("split log is non-empty");
            self.tokens[idx] = original;
        }
        self.pos = snapshot.pos;
        self.allow_object_literal = snapshot.allow_object_literal;
    }

    // =========================================================================
    // ERRORS
    // =========================================================================

    /// Describes the current token for error messages.
    fn found_description(&self) -> String {
        let token = self.peek();
        if token.lexeme.is_empty() {
            token.kind.to_string()
        } else {
            format!("'{}'", token.lexeme)
        }
    }

    /// Builds the canonical expected/found error at the current token.
    pub(crate) fn error_expected(&self, expected: &str) -> ParseError {
        ParseError::Expected {
            expected: expected.to_string(),
            found: self.found_description(),
            location: self.current_location(),
        }
    }

    /// Builds a free-form grammar error at the current token.
    pub(crate) fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError::Grammar {
            message: message.into(),
            location: self.current_location(),
        }
    }

    /// Converts an `Illegal` token into the fatal lexical error.
    ///
    /// Called at dispatch points; a lexical error anywhere the parser
    /// actually looks becomes fatal at that location.
    pub(crate) fn fail_on_illegal(&self) -> Result<(), ParseError> {
        if self.check(TokenKind::Illegal) {
            let token = self.peek();
            return Err(ParseError::Lexical {
                message: token.lexeme.clone(),
                location: token.location.clone(),
            });
        }
        Ok(())
    }
}
