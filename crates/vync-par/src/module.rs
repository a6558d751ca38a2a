//! Module grammar: the top-level parse loop.
//!
//! The loop prefers the declaration grammar, falls back to the statement
//! grammar (declarations are statements, but not vice versa), and
//! consumes any trailing semicolons after each item. A token that starts
//! neither production would leave the cursor stuck, so it is reported and
//! parsing halts rather than looping forever.

use vync_lex::TokenKind;
use vync_util::ParseError;

use crate::ast::{Module, Stmt, StmtKind};
use crate::Parser;

impl Parser {
    /// Parses a whole module. Empty input yields an empty module.
    pub fn parse_module(&mut self) -> Result<Module, ParseError> {
        let module_loc = self.current_location();
        let mut body = Vec::new();

        self.skip_comments_and_newlines();
        while !self.is_at_end() {
            self.skip_indents_and_dedents();
            if self.is_at_end() {
                break;
            }
            self.fail_on_illegal()?;

            let before = self.snapshot();
            let stmt = match self.parse_declaration()? {
                Some(decl) => {
                    let loc = decl.loc.clone();
                    Stmt::new(StmtKind::Decl(decl), loc)
                }
                None => {
                    // Not a declaration head; try the statement grammar.
                    if self.is_statement_start(self.peek().kind) {
                        self.parse_statement()?
                    } else {
                        return Err(self.error(format!(
                            "unexpected token {} at top level",
                            self.peek().kind
                        )));
                    }
                }
            };

            // A production that consumed nothing would loop forever.
            if self.pos == before.pos {
                self.restore(before);
                return Err(self.error(format!(
                    "no progress parsing top-level item at {}",
                    self.peek().kind
                )));
            }

            body.push(stmt);
            while self.match_kind(TokenKind::Semicolon).is_some() {}
            self.skip_comments_and_newlines();
        }

        tracing::debug!(items = body.len(), "module parsed");
        Ok(Module { body, loc: module_loc })
    }
}
