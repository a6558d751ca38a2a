//! Expression grammar: a Pratt-style precedence climber over the shared
//! cursor.
//!
//! # Precedence ladder (lowest to highest)
//!
//! | Level | Operators |
//! |---|---|
//! | assignment | `= += -= *= /= %= <<= >>= &= \|= ^= :=` (right-assoc) |
//! | logical or | `\|\|` |
//! | logical and | `&&` |
//! | bitwise or | `\|` |
//! | bitwise xor | `^` |
//! | bitwise and | `&` |
//! | equality | `== !=` |
//! | relational | `< <= > >= ..` |
//! | shift | `<< >>` |
//! | additive | `+ -` |
//! | multiplicative | `* / %` |
//! | unary | `! - ~ await borrow view` |
//! | postfix | call, `.member`, `[index]` |
//! | primary | see `parse_primary` |
//!
//! The memory intrinsics `loc`, `addr`, `at` and `from<T>` are ordinary
//! identifiers everywhere except call position, where they lower to
//! dedicated nodes with checked arity.

use vync_lex::{unescape, TokenKind};
use vync_util::ParseError;

use crate::ast::{Expr, ExprKind, ObjectProperty, Param, TypeExpr, TypeExprKind};
use crate::Parser;

/// Binding power levels for the Pratt core. Left-associative operators
/// use `(n, n + 1)`; higher binds tighter.
pub(crate) mod bp {
    /// Start of an expression.
    pub const MIN: u8 = 0;
    /// `||`
    pub const LOGICAL_OR: u8 = 2;
    /// `&&`
    pub const LOGICAL_AND: u8 = 4;
    /// `|`
    pub const BITWISE_OR: u8 = 6;
    /// `^`
    pub const BITWISE_XOR: u8 = 8;
    /// `&`
    pub const BITWISE_AND: u8 = 10;
    /// `==` `!=`
    pub const EQUALITY: u8 = 12;
    /// `<` `<=` `>` `>=` `..`
    pub const RELATIONAL: u8 = 14;
    /// `<<` `>>`
    pub const SHIFT: u8 = 16;
    /// `+` `-`
    pub const ADDITIVE: u8 = 18;
    /// `*` `/` `%`
    pub const MULTIPLICATIVE: u8 = 20;
}

/// The assignment operators, all right-associative.
const ASSIGN_OPS: &[TokenKind] = &[
    TokenKind::Eq,
    TokenKind::PlusEq,
    TokenKind::MinusEq,
    TokenKind::StarEq,
    TokenKind::SlashEq,
    TokenKind::PercentEq,
    TokenKind::ShlEq,
    TokenKind::ShrEq,
    TokenKind::AmpEq,
    TokenKind::PipeEq,
    TokenKind::CaretEq,
    TokenKind::ColonEq,
];

impl Parser {
    /// Main expression entry point: assignment level.
    pub(crate) fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        let left = self.parse_expr_bp(bp::MIN)?;
        if let Some(op) = self.match_any(ASSIGN_OPS) {
            let loc = op.location.clone();
            // Right-associative: the full assignment grammar recurses.
            let value = self.parse_expression()?;
            return Ok(Expr::new(
                ExprKind::Assign {
                    target: Box::new(left),
                    op,
                    value: Box::new(value),
                },
                loc,
            ));
        }
        Ok(left)
    }

    /// `(left bp, right bp, is short-circuiting)` for the current token.
    fn infix_binding_power(&self) -> Option<(u8, u8, bool)> {
        use TokenKind::*;
        let (lbp, logical) = match self.peek().kind {
            OrOr => (bp::LOGICAL_OR, true),
            AndAnd => (bp::LOGICAL_AND, true),
            Pipe => (bp::BITWISE_OR, false),
            Caret => (bp::BITWISE_XOR, false),
            Amp => (bp::BITWISE_AND, false),
            EqEq | NotEq => (bp::EQUALITY, false),
            Lt | LtEq | Gt | GtEq | DotDot => (bp::RELATIONAL, false),
            Shl | Shr => (bp::SHIFT, false),
            Plus | Minus => (bp::ADDITIVE, false),
            Star | Slash | Percent => (bp::MULTIPLICATIVE, false),
            _ => return None,
        };
        Some((lbp, lbp + 1, logical))
    }

    /// Pratt core: parses operators whose left binding power is at least
    /// `min_bp`.
    fn parse_expr_bp(&mut self, min_bp: u8) -> Result<Expr, ParseError> {
        let mut left = self.parse_unary()?;
        while let Some((lbp, rbp, logical)) = self.infix_binding_power() {
            if lbp < min_bp {
                break;
            }
            let op = self.consume();
            let loc = op.location.clone();
            let right = self.parse_expr_bp(rbp)?;
            let kind = if logical {
                ExprKind::Logical {
                    left: Box::new(left),
                    op,
                    right: Box::new(right),
                }
            } else {
                ExprKind::Binary {
                    left: Box::new(left),
                    op,
                    right: Box::new(right),
                }
            };
            left = Expr::new(kind, loc);
        }
        Ok(left)
    }

    /// Prefix level: `! - ~ await borrow view`.
    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        if let Some(op) = self.match_any(&[
            TokenKind::Bang,
            TokenKind::Minus,
            TokenKind::Tilde,
            TokenKind::KwAwait,
        ]) {
            let loc = op.location.clone();
            let operand = Box::new(self.parse_unary()?);
            let kind = if op.kind == TokenKind::KwAwait {
                ExprKind::Await(operand)
            } else {
                ExprKind::Unary { op, operand }
            };
            return Ok(Expr::new(kind, loc));
        }
        if let Some(op) = self.match_any(&[TokenKind::KwBorrow, TokenKind::KwView]) {
            let loc = op.location.clone();
            let operand = Box::new(self.parse_unary()?);
            return Ok(Expr::new(
                ExprKind::Borrow {
                    operand,
                    mutable: op.kind == TokenKind::KwBorrow,
                },
                loc,
            ));
        }
        self.parse_postfix()
    }

    /// Postfix level: calls, member access, indexing.
    fn parse_postfix(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_primary()?;
        loop {
            let op_loc = self.current_location();
            if self.match_kind(TokenKind::LParen).is_some() {
                // An intrinsic name surviving to this point means earlier
                // speculation rejected the call; check arity and fail loud.
                if let ExprKind::Identifier(name) = &expr.kind {
                    if matches!(name.as_str(), "loc" | "addr" | "at") {
                        let name = name.clone();
                        let args = self.parse_call_arguments()?;
                        if args.len() != 1 {
                            return Err(self.error(format!(
                                "intrinsic '{name}' expects 1 argument, got {}",
                                args.len()
                            )));
                        }
                        let arg = Box::new(args.into_iter().next().expect("one argument"));
                        let kind = match name.as_str() {
                            "loc" => ExprKind::LocationOf(arg),
                            "addr" => ExprKind::AddrOf(arg),
                            _ => ExprKind::PointerDeref(arg),
                        };
                        expr = Expr::new(kind, op_loc);
                        continue;
                    }
                }
                let args = self.parse_call_arguments()?;
                expr = Expr::new(
                    ExprKind::Call {
                        callee: Box::new(expr),
                        args,
                    },
                    op_loc,
                );
            } else if self.match_kind(TokenKind::Dot).is_some() {
                let property = self.expect(TokenKind::Identifier)?;
                expr = Expr::new(
                    ExprKind::Member {
                        object: Box::new(expr),
                        property: property.lexeme,
                    },
                    op_loc,
                );
            } else if self.match_kind(TokenKind::LBracket).is_some() {
                let index = self.with_object_literals(true, |p| p.parse_expression())?;
                self.expect(TokenKind::RBracket)?;
                expr = Expr::new(
                    ExprKind::Index {
                        object: Box::new(expr),
                        index: Box::new(index),
                    },
                    op_loc,
                );
            } else {
                break;
            }
        }
        Ok(expr)
    }

    /// Parses `expr, expr, ...` up to the closing `)`. The opening paren
    /// is already consumed; trailing commas are accepted.
    fn parse_call_arguments(&mut self) -> Result<Vec<Expr>, ParseError> {
        let mut args = Vec::new();
        if !self.check(TokenKind::RParen) {
            loop {
                let arg = self.with_object_literals(true, |p| p.parse_expression())?;
                args.push(arg);
                if self.match_kind(TokenKind::Comma).is_none() {
                    break;
                }
                if self.check(TokenKind::RParen) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen)?;
        Ok(args)
    }

    // =========================================================================
    // PRIMARY EXPRESSIONS
    // =========================================================================

    /// Primary alternatives, tried in order with bounded backtracking.
    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        self.fail_on_illegal()?;
        let loc = self.current_location();

        // If-expression: else is mandatory.
        if self.match_kind(TokenKind::KwIf).is_some() {
            self.expect(TokenKind::LParen)?;
            let cond = self.parse_expression()?;
            self.expect(TokenKind::RParen)?;
            self.expect(TokenKind::LBrace)?;
            let then = self.parse_expression()?;
            self.expect(TokenKind::RBrace)?;
            if self.match_kind(TokenKind::KwElse).is_none() {
                return Err(self.error("expected 'else' branch for if-expression"));
            }
            self.expect(TokenKind::LBrace)?;
            let otherwise = self.parse_expression()?;
            self.expect(TokenKind::RBrace)?;
            return Ok(Expr::new(
                ExprKind::If {
                    cond: Box::new(cond),
                    then: Box::new(then),
                    otherwise: Box::new(otherwise),
                },
                loc,
            ));
        }

        // Function expression: fn (params) [-> T] { ... }.
        if self.check(TokenKind::KwFn) && self.peek_next().kind == TokenKind::LParen {
            let snap = self.snapshot();
            match self.try_function_expression() {
                Ok(expr) => return Ok(expr),
                Err(_) => self.restore(snap),
            }
        }

        // Speculative construction: Type(args), covering the memory
        // intrinsics recognized in call position.
        let snap = self.snapshot();
        match self.try_construction() {
            Ok(Some(expr)) => return Ok(expr),
            Ok(None) | Err(_) => self.restore(snap),
        }

        // Speculative array initialization: [Type; size]().
        if self.check(TokenKind::LBracket) {
            let snap = self.snapshot();
            match self.try_array_initialization() {
                Ok(Some(expr)) => return Ok(expr),
                Ok(None) | Err(_) => self.restore(snap),
            }
        }

        // from<T>(expr) as a dedicated primary. Reached when the
        // construction attempt rejected it (bad arity, malformed type);
        // errors here are fatal and carry the precise message.
        if self.check(TokenKind::Identifier)
            && self.peek().lexeme == "from"
            && self.peek_next().kind == TokenKind::Lt
        {
            self.consume(); // from
            self.expect(TokenKind::Lt)?;
            let target = self.parse_type()?;
            self.expect_gt()?;
            self.expect(TokenKind::LParen)?;
            let address = self.parse_expression()?;
            if self.check(TokenKind::Comma) {
                return Err(self.error("from<T>() expects 1 argument"));
            }
            self.expect(TokenKind::RParen)?;
            return Ok(Expr::new(
                ExprKind::FromIntToLoc {
                    address: Box::new(address),
                    target,
                },
                loc,
            ));
        }

        // Identifiers: typed object literal, this/super, or plain name.
        if self.check(TokenKind::Identifier) {
            // Typed object literal requires '{' directly after the name.
            if self.object_literals_allowed() && self.peek_next().kind == TokenKind::LBrace {
                let name = self.consume();
                let type_path = TypeExpr::new(
                    TypeExprKind::Named {
                        name: name.lexeme,
                        generics: Vec::new(),
                    },
                    name.location.clone(),
                );
                self.expect(TokenKind::LBrace)?;
                let properties = self.parse_object_properties()?;
                self.expect(TokenKind::RBrace)?;
                return Ok(Expr::new(
                    ExprKind::Object {
                        type_path: Some(type_path),
                        properties,
                    },
                    name.location,
                ));
            }
            let token = self.consume();
            let kind = match token.lexeme.as_str() {
                "this" => ExprKind::This,
                "super" => ExprKind::Super,
                _ => ExprKind::Identifier(token.lexeme),
            };
            return Ok(Expr::new(kind, token.location));
        }

        // Literals.
        if self.peek().kind.is_literal() {
            return self.parse_literal();
        }

        // Parenthesized expression or comma sequence.
        if self.match_kind(TokenKind::LParen).is_some() {
            return self.with_object_literals(true, |p| {
                let first = p.parse_expression()?;
                if p.check(TokenKind::Comma) {
                    let mut items = vec![first];
                    while p.match_kind(TokenKind::Comma).is_some() {
                        if p.check(TokenKind::RParen) {
                            break;
                        }
                        items.push(p.parse_expression()?);
                    }
                    p.expect(TokenKind::RParen)?;
                    return Ok(Expr::new(ExprKind::Sequence(items), loc));
                }
                p.expect(TokenKind::RParen)?;
                Ok(first)
            });
        }

        // Array literal or list comprehension.
        if self.match_kind(TokenKind::LBracket).is_some() {
            return self.parse_array_or_comprehension(loc);
        }

        // Anonymous object literal.
        if self.object_literals_allowed() && self.match_kind(TokenKind::LBrace).is_some() {
            let properties = self.parse_object_properties()?;
            self.expect(TokenKind::RBrace)?;
            return Ok(Expr::new(
                ExprKind::Object {
                    type_path: None,
                    properties,
                },
                loc,
            ));
        }

        Err(self.error_expected("an expression"))
    }

    /// Attempts `fn (params) [-> T] { body }` in expression position.
    fn try_function_expression(&mut self) -> Result<Expr, ParseError> {
        let loc = self.current_location();
        self.expect(TokenKind::KwFn)?;
        self.expect(TokenKind::LParen)?;
        let mut params = Vec::new();
        if !self.check(TokenKind::RParen) {
            loop {
                let param_loc = self.current_location();
                let name = self.expect(TokenKind::Identifier)?.lexeme;
                let ty = if self.match_kind(TokenKind::Colon).is_some() {
                    Some(self.parse_type()?)
                } else {
                    None
                };
                params.push(Param {
                    name,
                    ty,
                    is_mutable: true,
                    default: None,
                    loc: param_loc,
                });
                if self.match_kind(TokenKind::Comma).is_none() {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen)?;
        let return_type = if self.match_kind(TokenKind::Arrow).is_some() {
            Some(self.parse_type()?)
        } else {
            None
        };
        if !self.check(TokenKind::LBrace) {
            return Err(self.error_expected("'{' to start a function-expression body"));
        }
        let body = self.parse_block_statement()?;
        Ok(Expr::new(
            ExprKind::Function {
                params,
                return_type,
                body: Box::new(body),
            },
            loc,
        ))
    }

    /// Attempts `Type(args)`. Returns `Ok(None)` when the cursor does not
    /// sit on a construction (the caller restores the snapshot).
    fn try_construction(&mut self) -> Result<Option<Expr>, ParseError> {
        let ty = match self.parse_type() {
            Ok(ty) => ty,
            Err(_) => return Ok(None),
        };
        if self.match_kind(TokenKind::LParen).is_none() {
            return Ok(None);
        }
        let call_loc = self.previous().location.clone();
        let args = self.parse_call_arguments()?;

        // Intrinsics recognized in call position.
        if let TypeExprKind::Named { name, generics } = &ty.kind {
            match name.as_str() {
                "loc" | "addr" | "at" => {
                    if args.len() != 1 {
                        return Err(self.error(format!(
                            "intrinsic '{name}' expects 1 argument, got {}",
                            args.len()
                        )));
                    }
                    let arg = Box::new(args.into_iter().next().expect("one argument"));
                    let kind = match name.as_str() {
                        "loc" => ExprKind::LocationOf(arg),
                        "addr" => ExprKind::AddrOf(arg),
                        _ => ExprKind::PointerDeref(arg),
                    };
                    return Ok(Some(Expr::new(kind, call_loc)));
                }
                "from" => {
                    if generics.len() != 1 {
                        return Err(
                            self.error("from<T>() expects a single generic type argument")
                        );
                    }
                    if args.len() != 1 {
                        return Err(self.error("from<T>() expects 1 argument"));
                    }
                    let target = generics[0].clone();
                    let address =
                        Box::new(args.into_iter().next().expect("one argument"));
                    return Ok(Some(Expr::new(
                        ExprKind::FromIntToLoc { address, target },
                        call_loc,
                    )));
                }
                _ => {}
            }
        }

        Ok(Some(Expr::new(ExprKind::Construction { ty, args }, call_loc)))
    }

    /// Attempts `[Type; size]()`. Returns `Ok(None)` when the brackets
    /// hold something else.
    fn try_array_initialization(&mut self) -> Result<Option<Expr>, ParseError> {
        let loc = self.current_location();
        self.expect(TokenKind::LBracket)?;
        let element = match self.parse_type() {
            Ok(ty) => ty,
            Err(_) => return Ok(None),
        };
        if self.match_kind(TokenKind::Semicolon).is_none() {
            return Ok(None);
        }
        let size = match self.parse_expression() {
            Ok(size) => size,
            Err(_) => return Ok(None),
        };
        if self.match_kind(TokenKind::RBracket).is_none() {
            return Ok(None);
        }
        if self.match_kind(TokenKind::LParen).is_none() {
            return Ok(None);
        }
        if self.match_kind(TokenKind::RParen).is_none() {
            return Ok(None);
        }
        Ok(Some(Expr::new(
            ExprKind::ArrayInit {
                element,
                size: Box::new(size),
            },
            loc,
        )))
    }

    /// Parses the contents of `[...]` after the bracket is consumed:
    /// an array literal or a list comprehension.
    fn parse_array_or_comprehension(&mut self, loc: vync_util::SourceLocation) -> Result<Expr, ParseError> {
        if self.match_kind(TokenKind::RBracket).is_some() {
            return Ok(Expr::new(ExprKind::Array(Vec::new()), loc));
        }

        // Scan the bracket-balanced range for a top-level 'for' to pick
        // the production without unbounded backtracking.
        let is_comprehension = self.scan_for_comprehension();

        let first = self.parse_expression()?;

        if is_comprehension || self.check(TokenKind::KwFor) {
            self.expect(TokenKind::KwFor)?;
            let variable = self.expect(TokenKind::Identifier)?.lexeme;
            self.expect(TokenKind::KwIn)?;
            let iterable = self.parse_expression()?;
            let condition = if self.match_kind(TokenKind::KwIf).is_some() {
                Some(Box::new(self.parse_expression()?))
            } else {
                None
            };
            self.expect(TokenKind::RBracket)?;
            return Ok(Expr::new(
                ExprKind::ListComprehension {
                    element: Box::new(first),
                    variable,
                    iterable: Box::new(iterable),
                    condition,
                },
                loc,
            ));
        }

        let mut elements = vec![first];
        while self.match_kind(TokenKind::Comma).is_some() {
            if self.check(TokenKind::RBracket) {
                break;
            }
            elements.push(self.parse_expression()?);
        }
        self.expect(TokenKind::RBracket)?;
        Ok(Expr::new(ExprKind::Array(elements), loc))
    }

    /// Scans ahead (without consuming) for a `for` keyword at bracket
    /// nesting depth one. The opening bracket is already consumed.
    fn scan_for_comprehension(&self) -> bool {
        let mut nest = 1u32;
        let mut i = self.pos;
        while i < self.tokens.len() {
            match self.tokens[i].kind {
                TokenKind::LBracket => nest += 1,
                TokenKind::RBracket => {
                    nest -= 1;
                    if nest == 0 {
                        return false;
                    }
                }
                TokenKind::KwFor if nest == 1 => return true,
                TokenKind::Eof => return false,
                _ => {}
            }
            i += 1;
        }
        false
    }

    /// Parses object-literal properties up to (not including) `}`.
    fn parse_object_properties(&mut self) -> Result<Vec<ObjectProperty>, ParseError> {
        let mut properties = Vec::new();
        if self.check(TokenKind::RBrace) {
            return Ok(properties);
        }
        loop {
            let key = self.expect(TokenKind::Identifier)?;
            let value = if self
                .match_any(&[TokenKind::Colon, TokenKind::Eq])
                .is_some()
            {
                if self.check(TokenKind::Comma) || self.check(TokenKind::RBrace) {
                    return Err(self.error("expected expression for object field value"));
                }
                Some(self.parse_expression()?)
            } else {
                // Shorthand: { name }.
                None
            };
            properties.push(ObjectProperty {
                key: key.lexeme,
                value,
                loc: key.location,
            });
            if self.match_kind(TokenKind::Comma).is_none() {
                break;
            }
            if self.check(TokenKind::RBrace) {
                break; // trailing comma
            }
        }
        Ok(properties)
    }

    /// Parses a literal token into its expression node.
    fn parse_literal(&mut self) -> Result<Expr, ParseError> {
        let token = self.consume();
        let loc = token.location.clone();
        let kind = match token.kind {
            TokenKind::IntLiteral => ExprKind::Int(self.parse_int_lexeme(&token.lexeme)?),
            TokenKind::FloatLiteral => {
                let value = token
                    .lexeme
                    .parse::<f64>()
                    .map_err(|_| self.error(format!("invalid float literal '{}'", token.lexeme)))?;
                ExprKind::Float(value)
            }
            TokenKind::StringLiteral => ExprKind::Str(unescape(&token.lexeme)),
            TokenKind::KwTrue => ExprKind::Bool(true),
            TokenKind::KwFalse => ExprKind::Bool(false),
            TokenKind::KwNull | TokenKind::KwNil => ExprKind::Nil,
            _ => return Err(self.error_expected("a literal")),
        };
        Ok(Expr::new(kind, loc))
    }

    /// Converts an integer lexeme (decimal or `0x`/`0b`/`0o`) to a value.
    fn parse_int_lexeme(&self, lexeme: &str) -> Result<i64, ParseError> {
        let digits: String = lexeme.chars().filter(|c| *c != '_').collect();
        let parsed = if let Some(hex) = digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")) {
            i64::from_str_radix(hex, 16)
        } else if let Some(bin) = digits.strip_prefix("0b").or_else(|| digits.strip_prefix("0B")) {
            i64::from_str_radix(bin, 2)
        } else if let Some(oct) = digits.strip_prefix("0o").or_else(|| digits.strip_prefix("0O")) {
            i64::from_str_radix(oct, 8)
        } else {
            digits.parse()
        };
        parsed.map_err(|_| self.error(format!("integer literal '{lexeme}' is out of range")))
    }

    /// True when a token of this kind can begin an expression.
    pub(crate) fn is_expression_start(&self, kind: TokenKind) -> bool {
        use TokenKind::*;
        matches!(
            kind,
            Identifier
                | IntLiteral
                | FloatLiteral
                | StringLiteral
                | KwTrue
                | KwFalse
                | KwNull
                | KwNil
                | LParen
                | LBracket
                | LBrace
                | Bang
                | Minus
                | Tilde
                | KwAwait
                | KwIf
                | KwFn
                | KwBorrow
                | KwView
                | KwMy
                | KwOur
                | KwTheir
                | KwPtr
        )
    }
}
