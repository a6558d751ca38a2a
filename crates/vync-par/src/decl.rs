//! Declaration grammar: functions, structs, classes, impls, enums,
//! templates, traits, type aliases, imports and namespaces.
//!
//! Function declarations accept both return-type spellings found in the
//! wild: `fn <Type> name(...)` and `fn name(...) -> Type`. A body is a
//! brace block, one indented block, or absent (forward and extern
//! declarations).

use vync_lex::TokenKind;
use vync_util::ParseError;

use crate::ast::{
    ClassDecl, Decl, DeclKind, EnumDecl, EnumVariant, FieldDecl, FunDecl, GenericParam, ImplDecl,
    Param, StructDecl, TemplateDecl, TraitDecl, TypeExpr,
};
use crate::Parser;

impl Parser {
    /// Parses one declaration, or returns `None` when the cursor does not
    /// sit on a declaration head (the module loop then tries a statement).
    pub(crate) fn parse_declaration(&mut self) -> Result<Option<Decl>, ParseError> {
        self.skip_comments_and_newlines();
        self.fail_on_illegal()?;

        match self.peek().kind {
            TokenKind::KwFn | TokenKind::KwAsync | TokenKind::KwExtern => {
                self.parse_function().map(Some)
            }
            TokenKind::KwStruct => self.parse_struct().map(Some),
            TokenKind::KwImpl => self.parse_impl().map(Some),
            TokenKind::KwClass => self.parse_class().map(Some),
            TokenKind::KwEnum => self.parse_enum().map(Some),
            TokenKind::KwTrait => self.parse_trait().map(Some),
            TokenKind::KwType => self.parse_type_alias().map(Some),
            TokenKind::KwTemplate => self.parse_template().map(Some),
            TokenKind::KwImport | TokenKind::KwSmuggle => self.parse_import().map(Some),
            TokenKind::KwModule => self.parse_namespace().map(Some),
            TokenKind::KwLet
            | TokenKind::KwMut
            | TokenKind::KwVar
            | TokenKind::KwConst
            | TokenKind::KwAuto => self.parse_var_decl().map(Some),
            TokenKind::Identifier => {
                // Relaxed global: Type name [= expr].
                let snap = self.snapshot();
                let relaxed = self
                    .parse_type()
                    .map(|_| self.check(TokenKind::Identifier))
                    .unwrap_or(false);
                self.restore(snap);
                if relaxed {
                    self.parse_var_decl().map(Some)
                } else {
                    Ok(None)
                }
            }
            _ => Ok(None),
        }
    }

    // =========================================================================
    // FUNCTIONS
    // =========================================================================

    /// Parses `[async] [extern] fn [<Ret>] name(params) [-> Ret]
    /// [throws Type] body?`.
    pub(crate) fn parse_function(&mut self) -> Result<Decl, ParseError> {
        self.skip_indents_and_dedents();
        let loc = self.current_location();
        let is_async = self.match_kind(TokenKind::KwAsync).is_some();
        let is_extern = self.match_kind(TokenKind::KwExtern).is_some();
        self.expect(TokenKind::KwFn)?;

        // Return type in angle brackets directly after 'fn'.
        let mut return_type: Option<TypeExpr> = None;
        if self.match_kind(TokenKind::Lt).is_some() {
            return_type = Some(self.parse_type()?);
            self.expect_gt()?;
        }

        // Name, including 'operator+' style spellings.
        let name = if self.check(TokenKind::Identifier) {
            let token = self.consume();
            if token.lexeme == "operator" && self.peek().kind.is_operator() {
                let op = self.consume();
                format!("{}{}", token.lexeme, op.lexeme)
            } else {
                token.lexeme
            }
        } else if self.match_kind(TokenKind::KwOperator).is_some() {
            if !self.peek().kind.is_operator() {
                return Err(self.error_expected("an operator symbol after 'operator'"));
            }
            let op = self.consume();
            format!("operator{}", op.lexeme)
        } else {
            return Err(self.error_expected("a function name"));
        };

        let generics = self.parse_generic_params()?;

        self.expect(TokenKind::LParen)?;
        let mut params = Vec::new();
        if !self.check(TokenKind::RParen) {
            loop {
                params.push(self.parse_parameter()?);
                if self.match_kind(TokenKind::Comma).is_none() {
                    break;
                }
                if self.check(TokenKind::RParen) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen)?;

        // Arrow return type, valid only when <Ret> was not given.
        if self.match_kind(TokenKind::Arrow).is_some() {
            if return_type.is_some() {
                return Err(self.error("return type already declared in angle brackets"));
            }
            return_type = Some(self.parse_type()?);
        }

        // 'throws' is recognized by lexeme; it is not a keyword.
        let throws = if self.check(TokenKind::Identifier) && self.peek().lexeme == "throws" {
            self.consume();
            Some(self.parse_type()?)
        } else {
            None
        };

        // Body: brace block, one indented block, or absent.
        let body = if self.check(TokenKind::LBrace) {
            Some(Box::new(self.parse_block_statement()?))
        } else {
            let snap = self.snapshot();
            self.skip_comments_and_newlines();
            if self.check(TokenKind::LBrace) {
                Some(Box::new(self.parse_block_statement()?))
            } else if self.check(TokenKind::Indent) {
                Some(Box::new(self.parse_indented_block()?))
            } else {
                // Forward declaration; the newlines belong to the caller.
                self.restore(snap);
                None
            }
        };

        Ok(Decl::new(
            DeclKind::Fun(FunDecl {
                name,
                generics,
                params,
                return_type,
                throws,
                body,
                is_async,
                is_extern,
            }),
            loc,
        ))
    }

    /// Parses one parameter in standard (`var<T> n`, `const<T> n`),
    /// relaxed (`[const] T n`) or annotated (`n: T`) syntax, with an
    /// optional default value.
    fn parse_parameter(&mut self) -> Result<Param, ParseError> {
        let loc = self.current_location();
        let mut is_mutable = true;
        let ty: Option<TypeExpr>;
        let name: String;

        if self.match_kind(TokenKind::KwConst).is_some() {
            is_mutable = false;
            if self.match_kind(TokenKind::Lt).is_some() {
                let t = self.parse_type()?;
                self.expect_gt()?;
                ty = Some(t);
            } else {
                ty = Some(self.parse_type()?);
            }
            name = self.expect(TokenKind::Identifier)?.lexeme;
        } else if self.match_kind(TokenKind::KwVar).is_some() {
            self.expect(TokenKind::Lt)?;
            let t = self.parse_type()?;
            self.expect_gt()?;
            ty = Some(t);
            name = self.expect(TokenKind::Identifier)?.lexeme;
        } else {
            // Relaxed 'T name', annotated 'name: T', or bare 'name'.
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

        let default = if self.match_kind(TokenKind::Eq).is_some() {
            Some(self.parse_expression()?)
        } else {
            None
        };

        Ok(Param { name, ty, is_mutable, default, loc })
    }

    /// Parses `<T, U: Bound + Bound>` if present.
    pub(crate) fn parse_generic_params(&mut self) -> Result<Vec<GenericParam>, ParseError> {
        let mut generics = Vec::new();
        if self.match_kind(TokenKind::Lt).is_none() {
            return Ok(generics);
        }
        loop {
            let loc = self.current_location();
            let name = self.expect(TokenKind::Identifier)?.lexeme;
            let mut bounds = Vec::new();
            if self.match_kind(TokenKind::Colon).is_some() {
                loop {
                    bounds.push(self.parse_type()?);
                    if self.match_kind(TokenKind::Plus).is_none() {
                        break;
                    }
                }
            }
            generics.push(GenericParam { name, bounds, loc });
            if self.match_kind(TokenKind::Comma).is_none() {
                break;
            }
        }
        self.expect_gt()?;
        Ok(generics)
    }

    // =========================================================================
    // AGGREGATES
    // =========================================================================

    /// Parses a struct declaration with either body style.
    pub(crate) fn parse_struct(&mut self) -> Result<Decl, ParseError> {
        let loc = self.expect(TokenKind::KwStruct)?.location;
        let name = self.expect(TokenKind::Identifier)?.lexeme;
        let generics = self.parse_generic_params()?;

        let mut fields = Vec::new();
        self.in_member_block(|p| {
            fields.push(p.parse_field()?);
            Ok(())
        })?;

        Ok(Decl::new(
            DeclKind::Struct(StructDecl { name, generics, fields }),
            loc,
        ))
    }

    /// Parses a class declaration: fields and methods in either style.
    pub(crate) fn parse_class(&mut self) -> Result<Decl, ParseError> {
        let loc = self.expect(TokenKind::KwClass)?.location;
        let name = self.expect(TokenKind::Identifier)?.lexeme;
        let generics = self.parse_generic_params()?;

        let mut members = Vec::new();
        self.in_member_block(|p| {
            match p.peek().kind {
                TokenKind::KwFn | TokenKind::KwAsync | TokenKind::KwExtern => {
                    members.push(p.parse_function()?);
                }
                _ => {
                    let field = p.parse_field()?;
                    let field_loc = field.loc.clone();
                    members.push(Decl::new(DeclKind::Field(field), field_loc));
                }
            }
            Ok(())
        })?;

        Ok(Decl::new(
            DeclKind::Class(ClassDecl { name, generics, members }),
            loc,
        ))
    }

    /// Parses one field: `[var|let|mut] name: Type [= init]`.
    fn parse_field(&mut self) -> Result<FieldDecl, ParseError> {
        self.match_any(&[TokenKind::KwVar, TokenKind::KwLet, TokenKind::KwMut]);
        let name_token = self.expect(TokenKind::Identifier)?;
        let ty = if self.match_kind(TokenKind::Colon).is_some() {
            Some(self.parse_type()?)
        } else {
            None
        };
        let init = if self.match_kind(TokenKind::Eq).is_some() {
            Some(self.parse_expression()?)
        } else {
            None
        };
        self.finish_statement()?;
        Ok(FieldDecl {
            name: name_token.lexeme,
            ty,
            init,
            loc: name_token.location,
        })
    }

    /// Parses `impl [Trait for] Type { fns }`.
    pub(crate) fn parse_impl(&mut self) -> Result<Decl, ParseError> {
        let loc = self.expect(TokenKind::KwImpl)?.location;
        let first = self.parse_type()?;
        let (trait_ref, self_ty) = if self.match_kind(TokenKind::KwFor).is_some() {
            (Some(first), self.parse_type()?)
        } else {
            (None, first)
        };

        let mut members = Vec::new();
        self.in_member_block(|p| {
            members.push(p.parse_function()?);
            Ok(())
        })?;

        Ok(Decl::new(
            DeclKind::Impl(ImplDecl { trait_ref, self_ty, members }),
            loc,
        ))
    }

    /// Parses an enum declaration with unit and tuple variants.
    pub(crate) fn parse_enum(&mut self) -> Result<Decl, ParseError> {
        let loc = self.expect(TokenKind::KwEnum)?.location;
        let name = self.expect(TokenKind::Identifier)?.lexeme;
        let generics = self.parse_generic_params()?;

        let mut variants = Vec::new();
        self.in_member_block(|p| {
            let token = p.expect(TokenKind::Identifier)?;
            let mut fields = Vec::new();
            if p.match_kind(TokenKind::LParen).is_some() {
                if !p.check(TokenKind::RParen) {
                    loop {
                        fields.push(p.parse_type()?);
                        if p.match_kind(TokenKind::Comma).is_none() {
                            break;
                        }
                    }
                }
                p.expect(TokenKind::RParen)?;
            }
            variants.push(EnumVariant {
                name: token.lexeme,
                fields,
                loc: token.location,
            });
            p.match_kind(TokenKind::Comma);
            Ok(())
        })?;

        Ok(Decl::new(
            DeclKind::Enum(EnumDecl { name, generics, variants }),
            loc,
        ))
    }

    /// Parses a trait declaration (bodiless functions allowed).
    pub(crate) fn parse_trait(&mut self) -> Result<Decl, ParseError> {
        let loc = self.expect(TokenKind::KwTrait)?.location;
        let name = self.expect(TokenKind::Identifier)?.lexeme;
        let generics = self.parse_generic_params()?;

        let mut members = Vec::new();
        self.in_member_block(|p| {
            members.push(p.parse_function()?);
            Ok(())
        })?;

        Ok(Decl::new(
            DeclKind::Trait(TraitDecl { name, generics, members }),
            loc,
        ))
    }

    /// Parses a template declaration: a named, parameterized block.
    pub(crate) fn parse_template(&mut self) -> Result<Decl, ParseError> {
        let loc = self.expect(TokenKind::KwTemplate)?.location;
        let name = self.expect(TokenKind::Identifier)?.lexeme;
        let params = self.parse_generic_params()?;
        let body = Box::new(self.parse_block_either_style()?);
        Ok(Decl::new(
            DeclKind::Template(TemplateDecl { name, params, body }),
            loc,
        ))
    }

    // =========================================================================
    // ALIASES, IMPORTS, NAMESPACES
    // =========================================================================

    /// Parses `type Alias = Type;`.
    pub(crate) fn parse_type_alias(&mut self) -> Result<Decl, ParseError> {
        let loc = self.expect(TokenKind::KwType)?.location;
        let name = self.expect(TokenKind::Identifier)?.lexeme;
        self.expect(TokenKind::Eq)?;
        let ty = self.parse_type()?;
        self.finish_statement()?;
        Ok(Decl::new(DeclKind::TypeAlias { name, ty }, loc))
    }

    /// Parses `import a.b.c [as x];` or `smuggle a.b.c [as x];`.
    pub(crate) fn parse_import(&mut self) -> Result<Decl, ParseError> {
        let keyword = self
            .match_any(&[TokenKind::KwImport, TokenKind::KwSmuggle])
            .ok_or_else(|| self.error_expected("'import' or 'smuggle'"))?;
        let smuggled = keyword.kind == TokenKind::KwSmuggle;

        let mut path = vec![self.expect(TokenKind::Identifier)?.lexeme];
        while self.match_kind(TokenKind::Dot).is_some() {
            path.push(self.expect(TokenKind::Identifier)?.lexeme);
        }
        let alias = if self.match_kind(TokenKind::KwAs).is_some() {
            Some(self.expect(TokenKind::Identifier)?.lexeme)
        } else {
            None
        };
        self.finish_statement()?;
        Ok(Decl::new(
            DeclKind::Import { path, alias, smuggled },
            keyword.location,
        ))
    }

    /// Parses `module name { ... }`.
    pub(crate) fn parse_namespace(&mut self) -> Result<Decl, ParseError> {
        let loc = self.expect(TokenKind::KwModule)?.location;
        let name = self.expect(TokenKind::Identifier)?.lexeme;

        let mut body = Vec::new();
        self.in_member_block(|p| {
            body.push(p.parse_statement()?);
            Ok(())
        })?;

        Ok(Decl::new(DeclKind::Namespace { name, body }, loc))
    }

    /// Runs `each` for every member of a `{ ... }` or `Indent ... Dedent`
    /// body, skipping newlines between members.
    fn in_member_block(
        &mut self,
        mut each: impl FnMut(&mut Self) -> Result<(), ParseError>,
    ) -> Result<(), ParseError> {
        self.skip_comments_and_newlines();
        let brace_style = if self.match_kind(TokenKind::LBrace).is_some() {
            true
        } else if self.match_kind(TokenKind::Indent).is_some() {
            false
        } else {
            return Err(self.error_expected("'{' or an indented block"));
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
            each(self)?;
        }

        if brace_style {
            self.expect(TokenKind::RBrace)?;
        } else {
            self.match_kind(TokenKind::Dedent);
        }
        Ok(())
    }
}
