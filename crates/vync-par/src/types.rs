//! Type-expression grammar.
//!
//! A type is an atomic head (named, tuple/group, `[T; N]` array, `fn`
//! signature or structural `{field: T}`) followed by postfix operators
//! applied left to right: `<generics>`, `[]`, `*` and `?`.
//!
//! The ownership-family identifiers `my`, `our`, `their`, `ptr` and the
//! `const` keyword may begin a named type (`my<T>`, `const<T>`); their
//! semantics belong to later passes. Postfix `const` is rejected.

use vync_lex::TokenKind;
use vync_util::ParseError;

use crate::ast::{TypeExpr, TypeExprKind};
use crate::Parser;

impl Parser {
    /// Parses a complete type expression.
    pub(crate) fn parse_type(&mut self) -> Result<TypeExpr, ParseError> {
        self.skip_comments_and_newlines();
        let base = self.parse_atomic_type()?;
        self.parse_postfix_type(base)
    }

    /// Parses the atomic head of a type.
    fn parse_atomic_type(&mut self) -> Result<TypeExpr, ParseError> {
        let loc = self.current_location();

        // Named head, including the ownership family and 'const<T>'.
        if let Some(head) = self.match_any(&[
            TokenKind::Identifier,
            TokenKind::KwMy,
            TokenKind::KwOur,
            TokenKind::KwTheir,
            TokenKind::KwPtr,
            TokenKind::KwConst,
        ]) {
            let mut name = head.lexeme;
            loop {
                if self.match_kind(TokenKind::ColonColon).is_some() {
                    let seg = self.expect(TokenKind::Identifier)?;
                    name.push_str("::");
                    name.push_str(&seg.lexeme);
                } else if self.check(TokenKind::Dot)
                    && self.peek_next().kind == TokenKind::Identifier
                {
                    self.consume();
                    let seg = self.consume();
                    name.push('.');
                    name.push_str(&seg.lexeme);
                } else {
                    break;
                }
            }
            return Ok(TypeExpr::new(
                TypeExprKind::Named { name, generics: Vec::new() },
                loc,
            ));
        }

        // Tuple / grouping: (A, B) or (A).
        if self.match_kind(TokenKind::LParen).is_some() {
            let mut members = Vec::new();
            if !self.check(TokenKind::RParen) {
                loop {
                    members.push(self.parse_type()?);
                    if self.match_kind(TokenKind::Comma).is_none() {
                        break;
                    }
                }
            }
            self.expect(TokenKind::RParen)?;
            return Ok(TypeExpr::new(TypeExprKind::Tuple(members), loc));
        }

        // Bracketed array form: [T] or [T; size].
        if self.match_kind(TokenKind::LBracket).is_some() {
            let element = self.parse_type()?;
            let size = if self.match_kind(TokenKind::Semicolon).is_some() {
                if self.check(TokenKind::RBracket) {
                    return Err(self.error("expected size expression after ';' in array type"));
                }
                Some(Box::new(self.parse_expression()?))
            } else {
                None
            };
            self.expect(TokenKind::RBracket)?;
            return Ok(TypeExpr::new(
                TypeExprKind::Array { element: Box::new(element), size },
                loc,
            ));
        }

        // Function signature: fn(A, B) -> R.
        if self.match_kind(TokenKind::KwFn).is_some() {
            self.expect(TokenKind::LParen)?;
            let mut params = Vec::new();
            if !self.check(TokenKind::RParen) {
                loop {
                    params.push(self.parse_type()?);
                    if self.match_kind(TokenKind::Comma).is_none() {
                        break;
                    }
                }
            }
            self.expect(TokenKind::RParen)?;
            let ret = if self.match_kind(TokenKind::Arrow).is_some() {
                Some(Box::new(self.parse_type()?))
            } else {
                None
            };
            return Ok(TypeExpr::new(TypeExprKind::Function { params, ret }, loc));
        }

        // Structural type: { field: T, ... }.
        if self.match_kind(TokenKind::LBrace).is_some() {
            let mut fields = Vec::new();
            if !self.check(TokenKind::RBrace) {
                loop {
                    let name = self.expect(TokenKind::Identifier)?.lexeme;
                    self.expect(TokenKind::Colon)?;
                    let ty = self.parse_type()?;
                    fields.push((name, ty));
                    if self.match_kind(TokenKind::Comma).is_none() {
                        break;
                    }
                    if self.check(TokenKind::RBrace) {
                        break;
                    }
                }
            }
            self.expect(TokenKind::RBrace)?;
            return Ok(TypeExpr::new(TypeExprKind::Struct(fields), loc));
        }

        Err(self.error_expected("a type"))
    }

    /// Applies postfix type operators left to right.
    fn parse_postfix_type(&mut self, mut current: TypeExpr) -> Result<TypeExpr, ParseError> {
        loop {
            let op_loc = self.current_location();
            if self.check(TokenKind::Lt) {
                self.consume();
                let mut args = Vec::new();
                if !self.check(TokenKind::Gt) && !self.check(TokenKind::Shr) {
                    loop {
                        args.push(self.parse_type()?);
                        if self.match_kind(TokenKind::Comma).is_none() {
                            break;
                        }
                    }
                }
                self.expect_gt()?;
                match &mut current.kind {
                    TypeExprKind::Named { generics, .. } if generics.is_empty() => {
                        *generics = args;
                    }
                    TypeExprKind::Named { .. } => {
                        return Err(self.error("generic arguments already applied to this type"));
                    }
                    _ => {
                        return Err(
                            self.error("generic arguments can only be applied to named types")
                        );
                    }
                }
            } else if self.check(TokenKind::LBracket) {
                self.consume();
                if self.match_kind(TokenKind::RBracket).is_some() {
                    current = TypeExpr::new(
                        TypeExprKind::Array { element: Box::new(current), size: None },
                        op_loc,
                    );
                } else {
                    // Not a slice suffix; leave the bracket for the caller.
                    self.put_back();
                    break;
                }
            } else if self.check(TokenKind::Star) {
                self.consume();
                if matches!(current.kind, TypeExprKind::Pointer(_)) {
                    return Err(self.error("type is already a pointer"));
                }
                current = TypeExpr::new(TypeExprKind::Pointer(Box::new(current)), op_loc);
            } else if self.check(TokenKind::Question) {
                self.consume();
                if matches!(current.kind, TypeExprKind::Optional(_)) {
                    return Err(self.error("type is already optional"));
                }
                current = TypeExpr::new(TypeExprKind::Optional(Box::new(current)), op_loc);
            } else if self.check(TokenKind::KwConst) {
                return Err(self.error("'const' type qualifier is not supported here"));
            } else {
                break;
            }
        }
        Ok(current)
    }
}
