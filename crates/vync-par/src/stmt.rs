//! Statement grammar.
//!
//! Statements dispatch on their first token. Semicolons are optional
//! wherever a newline, `}`, `Dedent` or end of input follows. Blocks come
//! in two styles: `{ ... }` (inside which the lexer emits no synthetic
//! markers) and one `Indent ... Dedent` pair.
//!
//! Variable declarations accept the standard syntax (`var<T> name`,
//! `const<T> name`), the relaxed syntax (`T name`, `const T name`), the
//! binder-first forms (`let|mut|var name [: T]`) and `auto name = expr`.
//! The relaxed form is chosen by a type-then-identifier lookahead with a
//! cursor snapshot restored on failure.

use vync_lex::TokenKind;
use vync_util::ParseError;

use crate::ast::{CatchClause, Decl, DeclKind, ExprKind, MatchArm, Stmt, StmtKind, TypeExpr, VarDecl};
use crate::Parser;

/// Token kinds a variable declaration can start with.
const VAR_BINDERS: &[TokenKind] = &[
    TokenKind::KwLet,
    TokenKind::KwMut,
    TokenKind::KwVar,
    TokenKind::KwConst,
    TokenKind::KwAuto,
];

impl Parser {
    /// Parses one statement.
    pub(crate) fn parse_statement(&mut self) -> Result<Stmt, ParseError> {
        self.skip_comments_and_newlines();
        self.fail_on_illegal()?;
        let loc = self.current_location();

        // 'throw' is not in the keyword table; recognize it by lexeme.
        if self.check(TokenKind::Identifier) && self.peek().lexeme == "throw" {
            self.consume();
            let value = self.parse_expression()?;
            self.finish_statement()?;
            return Ok(Stmt::new(StmtKind::Throw(value), loc));
        }

        match self.peek().kind {
            kind if VAR_BINDERS.contains(&kind) => {
                let decl = self.parse_var_decl()?;
                Ok(Stmt::new(StmtKind::Decl(decl), loc))
            }
            TokenKind::KwAsync | TokenKind::KwFn => {
                let decl = self.parse_function()?;
                Ok(Stmt::new(StmtKind::Decl(decl), loc))
            }
            TokenKind::KwExtern => {
                let decl = self.parse_function()?;
                Ok(Stmt::new(StmtKind::Extern(Box::new(decl)), loc))
            }
            TokenKind::KwClass => {
                let decl = self.parse_class()?;
                Ok(Stmt::new(StmtKind::Decl(decl), loc))
            }
            TokenKind::KwTemplate => {
                let decl = self.parse_template()?;
                Ok(Stmt::new(StmtKind::Decl(decl), loc))
            }
            TokenKind::KwStruct => {
                let decl = self.parse_struct()?;
                Ok(Stmt::new(StmtKind::Decl(decl), loc))
            }
            TokenKind::KwEnum => {
                let decl = self.parse_enum()?;
                Ok(Stmt::new(StmtKind::Decl(decl), loc))
            }
            TokenKind::KwImpl => {
                let decl = self.parse_impl()?;
                Ok(Stmt::new(StmtKind::Decl(decl), loc))
            }
            TokenKind::KwTrait => {
                let decl = self.parse_trait()?;
                Ok(Stmt::new(StmtKind::Decl(decl), loc))
            }
            TokenKind::KwType => {
                let decl = self.parse_type_alias()?;
                Ok(Stmt::new(StmtKind::Decl(decl), loc))
            }
            TokenKind::KwImport | TokenKind::KwSmuggle => {
                let decl = self.parse_import()?;
                Ok(Stmt::new(StmtKind::Decl(decl), loc))
            }
            TokenKind::KwModule => {
                let decl = self.parse_namespace()?;
                Ok(Stmt::new(StmtKind::Decl(decl), loc))
            }
            TokenKind::KwIf => self.parse_if(),
            TokenKind::KwWhile => self.parse_while(),
            TokenKind::KwFor => self.parse_for(),
            TokenKind::KwReturn => self.parse_return(),
            TokenKind::KwBreak => {
                self.consume();
                self.finish_statement()?;
                Ok(Stmt::new(StmtKind::Break, loc))
            }
            TokenKind::KwContinue => {
                self.consume();
                self.finish_statement()?;
                Ok(Stmt::new(StmtKind::Continue, loc))
            }
            TokenKind::LBrace => self.parse_block_statement(),
            TokenKind::KwTry => self.parse_try(),
            TokenKind::KwUnsafe => self.parse_unsafe(),
            TokenKind::KwDefer => self.parse_defer(),
            TokenKind::KwAwait => self.parse_await_statement(),
            TokenKind::KwMatch => self.parse_match(),
            TokenKind::KwYield => self.parse_yield(),
            TokenKind::KwAssert => self.parse_assert(),
            TokenKind::Semicolon => {
                self.consume();
                Ok(Stmt::new(StmtKind::Empty, loc))
            }
            _ => {
                // Relaxed variable declaration: Type name. Decided by a
                // type-then-identifier lookahead with cursor restore. The
                // ownership-family keywords can head a relaxed type too.
                if self.check(TokenKind::Identifier)
                    || self.check_any(&[
                        TokenKind::KwMy,
                        TokenKind::KwOur,
                        TokenKind::KwTheir,
                        TokenKind::KwPtr,
                    ])
                {
                    let snap = self.snapshot();
                    let is_relaxed_decl = self
                        .parse_type()
                        .map(|_| self.check(TokenKind::Identifier))
                        .unwrap_or(false);
                    self.restore(snap);
                    if is_relaxed_decl {
                        let decl = self.parse_var_decl()?;
                        return Ok(Stmt::new(StmtKind::Decl(decl), loc));
                    }
                }

                if self.is_expression_start(self.peek().kind) {
                    self.parse_expression_statement()
                } else {
                    Err(self.error(format!(
                        "unexpected token {} at start of statement",
                        self.peek().kind
                    )))
                }
            }
        }
    }

    /// Parses an expression in statement position.
    pub(crate) fn parse_expression_statement(&mut self) -> Result<Stmt, ParseError> {
        let expr = self.parse_expression()?;
        let loc = expr.loc.clone();
        self.finish_statement()?;
        Ok(Stmt::new(StmtKind::Expr(expr), loc))
    }

    /// Consumes an optional statement terminator.
    ///
    /// A semicolon is consumed; a newline, `}`, `Dedent`, end of input or
    /// the start of another statement is accepted without consuming.
    pub(crate) fn finish_statement(&mut self) -> Result<(), ParseError> {
        if self.match_kind(TokenKind::Semicolon).is_some() {
            return Ok(());
        }
        if self.check_any(&[
            TokenKind::Newline,
            TokenKind::RBrace,
            TokenKind::Dedent,
            TokenKind::Eof,
            TokenKind::Comma,
            TokenKind::RParen,
        ]) || self.is_statement_start(self.peek().kind)
        {
            return Ok(());
        }
        Err(self.error_expected("';' or a newline after statement"))
    }

    /// True when a token of this kind can begin a statement.
    pub(crate) fn is_statement_start(&self, kind: TokenKind) -> bool {
        use TokenKind::*;
        matches!(
            kind,
            KwLet
                | KwMut
                | KwVar
                | KwConst
                | KwAuto
                | KwAsync
                | KwExtern
                | KwClass
                | KwTemplate
                | KwStruct
                | KwEnum
                | KwImpl
                | KwTrait
                | KwType
                | KwImport
                | KwSmuggle
                | KwModule
                | KwIf
                | KwWhile
                | KwFor
                | KwReturn
                | KwBreak
                | KwContinue
                | KwTry
                | KwUnsafe
                | KwDefer
                | KwMatch
                | KwYield
                | KwAssert
        ) || self.is_expression_start(kind)
    }

    // =========================================================================
    // BLOCKS
    // =========================================================================

    /// Parses a brace block. The lexer emits no synthetic markers inside
    /// braces, so statements separate by semicolons or by starting tokens.
    pub(crate) fn parse_block_statement(&mut self) -> Result<Stmt, ParseError> {
        let loc = self.expect(TokenKind::LBrace)?.location;
        let mut statements = Vec::new();
        loop {
            self.skip_comments_and_newlines();
            if self.check(TokenKind::RBrace) || self.is_at_end() {
                break;
            }
            statements.push(self.parse_statement()?);
        }
        self.expect(TokenKind::RBrace)?;
        Ok(Stmt::new(StmtKind::Block(statements), loc))
    }

    /// Parses one `Indent ... Dedent` block.
    pub(crate) fn parse_indented_block(&mut self) -> Result<Stmt, ParseError> {
        let loc = self.expect(TokenKind::Indent)?.location;
        let mut statements = Vec::new();
        loop {
            self.skip_comments_and_newlines();
            if self.check(TokenKind::Dedent) || self.is_at_end() {
                break;
            }
            statements.push(self.parse_statement()?);
        }
        self.match_kind(TokenKind::Dedent);
        Ok(Stmt::new(StmtKind::Block(statements), loc))
    }

    /// Parses a block in either style, skipping the newline that precedes
    /// an indented block.
    pub(crate) fn parse_block_either_style(&mut self) -> Result<Stmt, ParseError> {
        if self.check(TokenKind::LBrace) {
            return self.parse_block_statement();
        }
        self.skip_comments_and_newlines();
        if self.check(TokenKind::LBrace) {
            self.parse_block_statement()
        } else if self.check(TokenKind::Indent) {
            self.parse_indented_block()
        } else {
            Err(self.error_expected("'{' or an indented block"))
        }
    }

    // =========================================================================
    // CONTROL FLOW
    // =========================================================================

    fn parse_if(&mut self) -> Result<Stmt, ParseError> {
        let loc = self.expect(TokenKind::KwIf)?.location;
        self.expect(TokenKind::LParen)?;
        let cond = self.parse_expression()?;
        self.expect(TokenKind::RParen)?;
        let then = Box::new(self.parse_block_either_style()?);
        let mut otherwise = None;
        if self.match_clause_keyword(TokenKind::KwElse).is_some() {
            if self.check(TokenKind::KwIf) {
                otherwise = Some(Box::new(self.parse_if()?));
            } else {
                otherwise = Some(Box::new(self.parse_block_either_style()?));
            }
        }
        Ok(Stmt::new(StmtKind::If { cond, then, otherwise }, loc))
    }

    fn parse_while(&mut self) -> Result<Stmt, ParseError> {
        let loc = self.expect(TokenKind::KwWhile)?.location;
        self.expect(TokenKind::LParen)?;
        let cond = self.parse_expression()?;
        self.expect(TokenKind::RParen)?;
        let body = Box::new(self.parse_block_either_style()?);
        Ok(Stmt::new(StmtKind::While { cond, body }, loc))
    }

    fn parse_for(&mut self) -> Result<Stmt, ParseError> {
        let loc = self.expect(TokenKind::KwFor)?.location;
        self.expect(TokenKind::LParen)?;

        // Initializer: a declaration, an expression statement, or empty.
        let init = if self.check_any(VAR_BINDERS) {
            let decl_loc = self.current_location();
            let decl = self.parse_var_decl()?;
            Some(Box::new(Stmt::new(StmtKind::Decl(decl), decl_loc)))
        } else if self.match_kind(TokenKind::Semicolon).is_some() {
            None
        } else {
            let mut relaxed = false;
            if self.check(TokenKind::Identifier) {
                let snap = self.snapshot();
                relaxed = self
                    .parse_type()
                    .map(|_| self.check(TokenKind::Identifier))
                    .unwrap_or(false);
                self.restore(snap);
            }
            if relaxed {
                let decl_loc = self.current_location();
                let decl = self.parse_var_decl()?;
                Some(Box::new(Stmt::new(StmtKind::Decl(decl), decl_loc)))
            } else {
                Some(Box::new(self.parse_expression_statement()?))
            }
        };

        let cond = if self.check(TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect(TokenKind::Semicolon)?;

        let update = if self.check(TokenKind::RParen) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect(TokenKind::RParen)?;

        let body = Box::new(self.parse_block_either_style()?);
        Ok(Stmt::new(StmtKind::For { init, cond, update, body }, loc))
    }

    fn parse_return(&mut self) -> Result<Stmt, ParseError> {
        let loc = self.expect(TokenKind::KwReturn)?.location;
        let value = if self.check_any(&[
            TokenKind::Semicolon,
            TokenKind::Newline,
            TokenKind::RBrace,
            TokenKind::Dedent,
            TokenKind::Eof,
        ]) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.finish_statement()?;
        Ok(Stmt::new(StmtKind::Return(value), loc))
    }

    // =========================================================================
    // TRY / UNSAFE / DEFER / AWAIT / MATCH / YIELD / ASSERT
    // =========================================================================

    fn parse_try(&mut self) -> Result<Stmt, ParseError> {
        let loc = self.expect(TokenKind::KwTry)?.location;
        let body = Box::new(self.parse_block_either_style()?);

        // One catch clause is kept.
        let mut catch = None;
        if let Some(catch_kw) = self.match_clause_keyword(TokenKind::KwCatch) {
            let mut binding = None;
            let mut binding_type = None;
            if self.match_kind(TokenKind::LParen).is_some() {
                let ident = self.expect(TokenKind::Identifier)?;
                binding = Some(ident.lexeme);
                if self.match_kind(TokenKind::Colon).is_some() {
                    binding_type = Some(self.parse_type()?);
                }
                self.expect(TokenKind::RParen)?;
            } else if self.check(TokenKind::Identifier) {
                binding = Some(self.consume().lexeme);
            }
            let handler = Box::new(self.parse_block_either_style()?);
            catch = Some(CatchClause {
                binding,
                binding_type,
                body: handler,
                loc: catch_kw.location,
            });
        }

        // Further catch clauses are parsed for shape and discarded.
        while self.match_clause_keyword(TokenKind::KwCatch).is_some() {
            if self.match_kind(TokenKind::LParen).is_some() {
                let mut depth = 1u32;
                while depth > 0 && !self.is_at_end() {
                    match self.consume().kind {
                        TokenKind::LParen => depth += 1,
                        TokenKind::RParen => depth -= 1,
                        _ => {}
                    }
                }
            } else if self.check(TokenKind::Identifier) {
                self.consume();
            }
            let _ = self.parse_block_either_style()?;
        }

        let finally = if self.match_clause_keyword(TokenKind::KwFinally).is_some() {
            Some(Box::new(self.parse_block_either_style()?))
        } else {
            None
        };

        Ok(Stmt::new(StmtKind::Try { body, catch, finally }, loc))
    }

    fn parse_unsafe(&mut self) -> Result<Stmt, ParseError> {
        let loc = self.expect(TokenKind::KwUnsafe)?.location;
        let body = Box::new(self.parse_block_either_style()?);
        Ok(Stmt::new(StmtKind::Unsafe(body), loc))
    }

    /// `defer stmt` parses its statement and lowers to an empty node; the
    /// deferred-execution contract belongs to later phases.
    fn parse_defer(&mut self) -> Result<Stmt, ParseError> {
        let loc = self.expect(TokenKind::KwDefer)?.location;
        let _deferred = self.parse_statement()?;
        Ok(Stmt::new(StmtKind::Empty, loc))
    }

    fn parse_await_statement(&mut self) -> Result<Stmt, ParseError> {
        let loc = self.expect(TokenKind::KwAwait)?.location;
        let operand = self.parse_expression()?;
        self.finish_statement()?;
        let awaited = crate::ast::Expr::new(ExprKind::Await(Box::new(operand)), loc.clone());
        Ok(Stmt::new(StmtKind::Expr(awaited), loc))
    }

    fn parse_match(&mut self) -> Result<Stmt, ParseError> {
        let loc = self.expect(TokenKind::KwMatch)?.location;
        // The arm block's '{' must not read as a typed object literal on
        // the scrutinee.
        let scrutinee = self.with_object_literals(false, |p| p.parse_expression())?;

        let mut arms = Vec::new();
        let brace_style = if self.check(TokenKind::LBrace) {
            self.consume();
            true
        } else {
            self.skip_comments_and_newlines();
            self.expect(TokenKind::Indent)?;
            false
        };

        loop {
            self.skip_comments_and_newlines();
            let closing = if brace_style {
                self.check(TokenKind::RBrace)
            } else {
                self.check(TokenKind::Dedent)
            };
            if closing || self.is_at_end() {
                break;
            }

            let arm_loc = self.current_location();
            let pattern = self.parse_expression()?;
            let guard = if self.match_kind(TokenKind::KwIf).is_some() {
                Some(self.parse_expression()?)
            } else {
                None
            };
            self.expect(TokenKind::FatArrow)?;
            let body = if self.check(TokenKind::LBrace) {
                Box::new(self.parse_block_statement()?)
            } else {
                let body_loc = self.current_location();
                let value = self.parse_expression()?;
                Box::new(Stmt::new(StmtKind::Expr(value), body_loc))
            };
            arms.push(MatchArm { pattern, guard, body, loc: arm_loc });
            self.match_kind(TokenKind::Comma);
        }

        if brace_style {
            self.expect(TokenKind::RBrace)?;
        } else {
            self.match_kind(TokenKind::Dedent);
        }
        Ok(Stmt::new(StmtKind::Match { scrutinee, arms }, loc))
    }

    fn parse_yield(&mut self) -> Result<Stmt, ParseError> {
        let loc = self.expect(TokenKind::KwYield)?.location;
        let value = if self.check_any(&[
            TokenKind::Semicolon,
            TokenKind::Newline,
            TokenKind::RBrace,
            TokenKind::Dedent,
            TokenKind::Eof,
        ]) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.finish_statement()?;
        Ok(Stmt::new(StmtKind::Yield(value), loc))
    }

    fn parse_assert(&mut self) -> Result<Stmt, ParseError> {
        let loc = self.expect(TokenKind::KwAssert)?.location;
        let condition = self.parse_expression()?;
        let message = if self.match_kind(TokenKind::Comma).is_some() {
            Some(self.parse_expression()?)
        } else {
            None
        };
        self.finish_statement()?;
        Ok(Stmt::new(StmtKind::Assert { condition, message }, loc))
    }

    // =========================================================================
    // VARIABLE DECLARATIONS
    // =========================================================================

    /// Parses a variable declaration in any surface syntax. The leading
    /// binder (or relaxed type) is still at the cursor.
    pub(crate) fn parse_var_decl(&mut self) -> Result<Decl, ParseError> {
        let loc = self.current_location();
        let mut is_const = false;
        let ty: Option<TypeExpr>;
        let name: String;

        match self.peek().kind {
            TokenKind::KwAuto => {
                self.consume();
                name = self.expect(TokenKind::Identifier)?.lexeme;
                ty = None;
                if !self.check(TokenKind::Eq) {
                    return Err(self.error("'auto' variables must have an initializer"));
                }
            }
            TokenKind::KwVar => {
                self.consume();
                if self.match_kind(TokenKind::Lt).is_some() {
                    // Standard syntax: var<Type> name.
                    let t = self.parse_type()?;
                    self.expect_gt()?;
                    ty = Some(t);
                    name = self.expect(TokenKind::Identifier)?.lexeme;
                } else {
                    // Binder-first: var name [: Type].
                    name = self.expect(TokenKind::Identifier)?.lexeme;
                    ty = if self.match_kind(TokenKind::Colon).is_some() {
                        Some(self.parse_type()?)
                    } else {
                        None
                    };
                }
            }
            TokenKind::KwLet | TokenKind::KwMut => {
                self.consume();
                name = self.expect(TokenKind::Identifier)?.lexeme;
                ty = if self.match_kind(TokenKind::Colon).is_some() {
                    Some(self.parse_type()?)
                } else {
                    None
                };
            }
            TokenKind::KwConst => {
                self.consume();
                is_const = true;
                if self.match_kind(TokenKind::Lt).is_some() {
                    // Standard syntax: const<Type> name.
                    let t = self.parse_type()?;
                    self.expect_gt()?;
                    ty = Some(t);
                    name = self.expect(TokenKind::Identifier)?.lexeme;
                } else {
                    // Relaxed 'const Type name' or binder-first
                    // 'const name [: Type]'.
                    let snap = self.snapshot();
                    let relaxed = self
                        .parse_type()
                        .map(|_| self.check(TokenKind::Identifier))
                        .unwrap_or(false);
                    self.restore(snap);
                    if relaxed {
                        ty = Some(self.parse_type()?);
                        name = self.expect(TokenKind::Identifier)?.lexeme;
                    } else {
                        name = self.expect(TokenKind::Identifier)?.lexeme;
                        ty = if self.match_kind(TokenKind::Colon).is_some() {
                            Some(self.parse_type()?)
                        } else {
                            None
                        };
                    }
                }
            }
            _ => {
                // Relaxed syntax: Type name.
                ty = Some(self.parse_type()?);
                name = self.expect(TokenKind::Identifier)?.lexeme;
            }
        }

        let init = if self.match_kind(TokenKind::Eq).is_some() {
            Some(self.parse_expression()?)
        } else {
            None
        };
        self.finish_statement()?;

        Ok(Decl::new(
            DeclKind::Var(VarDecl { name, is_const, ty, init }),
            loc,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vync_lex::lex;

    fn parse_stmt(source: &str) -> Result<Stmt, ParseError> {
        let mut parser = Parser::new(lex(source, "stmt.vyn"), "stmt.vyn");
        parser.parse_statement()
    }

    fn var_decl(stmt: &Stmt) -> &VarDecl {
        match &stmt.kind {
            StmtKind::Decl(Decl { kind: DeclKind::Var(v), .. }) => v,
            other => panic!("expected variable declaration, got {other:?}"),
        }
    }

    #[test]
    fn test_let_with_initializer() {
        let stmt = parse_stmt("let x = 1").unwrap();
        let v = var_decl(&stmt);
        assert_eq!(v.name, "x");
        assert!(v.ty.is_none());
        assert!(v.init.is_some());
        assert!(!v.is_const);
    }

    #[test]
    fn test_var_binder_first_with_type() {
        let stmt = parse_stmt("var x: Int = 55;").unwrap();
        let v = var_decl(&stmt);
        assert_eq!(v.name, "x");
        assert_eq!(v.ty.as_ref().unwrap().to_string(), "Int");
    }

    #[test]
    fn test_var_standard_syntax() {
        let stmt = parse_stmt("var<Int> count = 3;").unwrap();
        let v = var_decl(&stmt);
        assert_eq!(v.name, "count");
        assert_eq!(v.ty.as_ref().unwrap().to_string(), "Int");
    }

    #[test]
    fn test_const_standard_syntax() {
        let stmt = parse_stmt("const<Str> name = \"vyn\";").unwrap();
        let v = var_decl(&stmt);
        assert!(v.is_const);
        assert_eq!(v.ty.as_ref().unwrap().to_string(), "Str");
    }

    #[test]
    fn test_const_relaxed_syntax() {
        let stmt = parse_stmt("const Int limit = 10;").unwrap();
        let v = var_decl(&stmt);
        assert!(v.is_const);
        assert_eq!(v.name, "limit");
        assert_eq!(v.ty.as_ref().unwrap().to_string(), "Int");
    }

    #[test]
    fn test_relaxed_declaration() {
        let stmt = parse_stmt("Int total = 0;").unwrap();
        let v = var_decl(&stmt);
        assert_eq!(v.name, "total");
        assert_eq!(v.ty.as_ref().unwrap().to_string(), "Int");
    }

    #[test]
    fn test_relaxed_with_generics() {
        let stmt = parse_stmt("Map<Str, Int> index;").unwrap();
        let v = var_decl(&stmt);
        assert_eq!(v.ty.as_ref().unwrap().to_string(), "Map<Str, Int>");
        assert!(v.init.is_none());
    }

    #[test]
    fn test_auto_requires_initializer() {
        assert!(parse_stmt("auto x = 1;").is_ok());
        assert!(parse_stmt("auto x;").is_err());
    }

    #[test]
    fn test_assignment_is_not_a_declaration() {
        let stmt = parse_stmt("x = 1").unwrap();
        assert!(matches!(stmt.kind, StmtKind::Expr(_)));
    }

    #[test]
    fn test_if_else_chain() {
        let stmt = parse_stmt("if (a) { x = 1; } else if (b) { x = 2; } else { x = 3; }").unwrap();
        match stmt.kind {
            StmtKind::If { otherwise, .. } => {
                let else_stmt = otherwise.expect("else branch");
                assert!(matches!(else_stmt.kind, StmtKind::If { .. }));
            }
            other => panic!("expected if, got {other:?}"),
        }
    }

    #[test]
    fn test_while_loop() {
        let stmt = parse_stmt("while (i < n) { i = i + 1; }").unwrap();
        assert!(matches!(stmt.kind, StmtKind::While { .. }));
    }

    #[test]
    fn test_for_loop_full_header() {
        let stmt = parse_stmt("for (let i = 0; i < 10; i = i + 1) { total = total + i; }").unwrap();
        match stmt.kind {
            StmtKind::For { init, cond, update, .. } => {
                assert!(init.is_some());
                assert!(cond.is_some());
                assert!(update.is_some());
            }
            other => panic!("expected for, got {other:?}"),
        }
    }

    #[test]
    fn test_for_loop_empty_header() {
        let stmt = parse_stmt("for (;;) { }").unwrap();
        match stmt.kind {
            StmtKind::For { init, cond, update, .. } => {
                assert!(init.is_none());
                assert!(cond.is_none());
                assert!(update.is_none());
            }
            other => panic!("expected for, got {other:?}"),
        }
    }

    #[test]
    fn test_return_with_and_without_value() {
        assert!(matches!(
            parse_stmt("return x;").unwrap().kind,
            StmtKind::Return(Some(_))
        ));
        assert!(matches!(
            parse_stmt("return;").unwrap().kind,
            StmtKind::Return(None)
        ));
    }

    #[test]
    fn test_try_catch_finally() {
        let stmt =
            parse_stmt("try { risky(); } catch (e: Error) { handle(e); } finally { done(); }")
                .unwrap();
        match stmt.kind {
            StmtKind::Try { catch, finally, .. } => {
                let clause = catch.expect("catch clause");
                assert_eq!(clause.binding.as_deref(), Some("e"));
                assert_eq!(clause.binding_type.as_ref().unwrap().to_string(), "Error");
                assert!(finally.is_some());
            }
            other => panic!("expected try, got {other:?}"),
        }
    }

    #[test]
    fn test_try_catch_bare_binder() {
        let stmt = parse_stmt("try { a(); } catch e { b(); }").unwrap();
        match stmt.kind {
            StmtKind::Try { catch, .. } => {
                assert_eq!(catch.unwrap().binding.as_deref(), Some("e"));
            }
            other => panic!("expected try, got {other:?}"),
        }
    }

    #[test]
    fn test_extra_catch_clauses_discarded() {
        let stmt = parse_stmt("try { a(); } catch (e) { b(); } catch (f) { c(); }").unwrap();
        match stmt.kind {
            StmtKind::Try { catch, .. } => {
                assert_eq!(catch.unwrap().binding.as_deref(), Some("e"));
            }
            other => panic!("expected try, got {other:?}"),
        }
    }

    #[test]
    fn test_unsafe_block() {
        let stmt = parse_stmt("unsafe { at(p) }").unwrap();
        assert!(matches!(stmt.kind, StmtKind::Unsafe(_)));
    }

    #[test]
    fn test_throw_statement() {
        let stmt = parse_stmt("throw NetworkError(42);").unwrap();
        assert!(matches!(stmt.kind, StmtKind::Throw(_)));
    }

    #[test]
    fn test_defer_lowers_to_empty() {
        let stmt = parse_stmt("defer close(file);").unwrap();
        assert!(matches!(stmt.kind, StmtKind::Empty));
    }

    #[test]
    fn test_await_statement() {
        let stmt = parse_stmt("await fetch();").unwrap();
        match stmt.kind {
            StmtKind::Expr(e) => assert!(matches!(e.kind, ExprKind::Await(_))),
            other => panic!("expected expression statement, got {other:?}"),
        }
    }

    #[test]
    fn test_match_statement() {
        let stmt = parse_stmt("match x { 1 => one(), 2 => { two(); }, other => fallback() }")
            .unwrap();
        match stmt.kind {
            StmtKind::Match { arms, .. } => assert_eq!(arms.len(), 3),
            other => panic!("expected match, got {other:?}"),
        }
    }

    #[test]
    fn test_match_with_guard() {
        let stmt = parse_stmt("match x { n if n > 0 => pos() }").unwrap();
        match stmt.kind {
            StmtKind::Match { arms, .. } => assert!(arms[0].guard.is_some()),
            other => panic!("expected match, got {other:?}"),
        }
    }

    #[test]
    fn test_yield_and_assert() {
        assert!(matches!(
            parse_stmt("yield value;").unwrap().kind,
            StmtKind::Yield(Some(_))
        ));
        match parse_stmt("assert x > 0, \"positive\";").unwrap().kind {
            StmtKind::Assert { message, .. } => assert!(message.is_some()),
            other => panic!("expected assert, got {other:?}"),
        }
    }

    #[test]
    fn test_break_continue() {
        assert!(matches!(parse_stmt("break;").unwrap().kind, StmtKind::Break));
        assert!(matches!(parse_stmt("continue;").unwrap().kind, StmtKind::Continue));
    }

    #[test]
    fn test_block_without_semicolons() {
        let stmt = parse_stmt("{ let a = 1 let b = 2 }").unwrap();
        match stmt.kind {
            StmtKind::Block(stmts) => assert_eq!(stmts.len(), 2),
            other => panic!("expected block, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_statement() {
        assert!(matches!(parse_stmt(";").unwrap().kind, StmtKind::Empty));
    }
}
