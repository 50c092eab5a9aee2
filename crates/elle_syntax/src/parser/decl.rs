/// Declaration parsing methods.
///
/// This chunk is responsible for parsing top-level declarations: `use` imports, the `global` and
/// `namespace` directives, functions (with or without a body), external functions, constants and
/// structs, together with their modifiers, parameter lists and attributes.
///
/// ## Notes
/// - Most entrypoints in this file return [`Spanned<T>`] to preserve source locations.
/// - Error recovery is handled by `Parser::synchronize()` (in `helpers.rs`).
impl<'a> Parser<'a> {
    // ========================================================================
    // Declarations
    // ========================================================================

    fn declaration(&mut self) -> Result<Spanned<Declaration>, CompileError> {
        let start = self.current_span().start;

        let decl = match self.peek().keyword_id() {
            Some(KeywordId::Use) => Declaration::Import(self.import_decl()?),
            Some(KeywordId::Global) => Declaration::Global(self.global_directive()?),
            Some(KeywordId::Namespace) => {
                self.advance();
                let name = self.identifier()?;
                self.expect_semicolon()?;
                Declaration::Namespace(name)
            }
            _ => {
                let modifiers = self.modifiers()?;
                match self.peek().keyword_id() {
                    Some(KeywordId::Fn) => {
                        let function = self.function_decl(modifiers)?;
                        if function.modifiers.is_external() {
                            Declaration::ExternalFunction(function)
                        } else {
                            Declaration::Function(function)
                        }
                    }
                    Some(KeywordId::Const) => Declaration::Constant(self.const_decl(modifiers)?),
                    Some(KeywordId::Struct) => Declaration::Struct(self.struct_decl(modifiers)?),
                    _ => {
                        return Err(CompileError::parse(
                            ParseErrorKind::ExpectedDeclaration,
                            format!("expected declaration, found {}", self.peek().kind.describe()),
                            self.current_span(),
                        )
                        .with_hint("top-level items are `use`, `global`, `namespace`, `fn`, `const` and `struct`"));
                    }
                }
            }
        };

        Ok(Spanned::new(decl, self.span_from(start)))
    }

    /// `use a/b/c;`
    fn import_decl(&mut self) -> Result<ImportDecl, CompileError> {
        self.expect_keyword(KeywordId::Use)?;
        let mut segments = vec![self.path_segment()?];
        while self.match_op(OperatorId::Slash) {
            segments.push(self.path_segment()?);
        }
        self.expect_semicolon()?;
        Ok(ImportDecl {
            path: ModulePath(segments),
        })
    }

    /// `global pub, external;`
    fn global_directive(&mut self) -> Result<GlobalDirective, CompileError> {
        self.expect_keyword(KeywordId::Global)?;
        let mut options = Vec::new();
        loop {
            let option = match self.peek().keyword_id() {
                Some(KeywordId::Pub) => GlobalOption::Pub,
                Some(KeywordId::External) => GlobalOption::External,
                _ => return Err(self.unexpected("`pub` or `external`")),
            };
            self.advance();
            options.push(option);
            if !self.match_punct(PunctuationId::Comma) {
                break;
            }
        }
        self.expect_semicolon()?;
        Ok(GlobalDirective { options })
    }

    /// `(!?(pub|local|external))*`, kept in source order.
    fn modifiers(&mut self) -> Result<Modifiers, CompileError> {
        let mut modifiers = Vec::new();
        loop {
            let negated = self.check_op(OperatorId::Bang);
            let token = if negated { self.peek_next() } else { self.peek() };
            let Some(kind) = token.keyword_id().and_then(VisibilityKind::from_keyword) else {
                if negated {
                    self.advance();
                    return Err(self.unexpected("`pub`, `local` or `external` after `!`"));
                }
                break;
            };
            if negated {
                self.advance();
            }
            self.advance();
            modifiers.push(Modifier { kind, negated });
        }
        Ok(Modifiers(modifiers))
    }

    fn function_decl(&mut self, modifiers: Modifiers) -> Result<FunctionDecl, CompileError> {
        self.expect_keyword(KeywordId::Fn)?;
        let name = self.decl_name()?;
        let generics = self.generic_params()?;
        let params = self.param_list()?;
        let attributes = self.attributes()?;
        let return_type = if self.match_punct(PunctuationId::Arrow) {
            Some(self.type_expr()?)
        } else {
            None
        };

        let body = if self.check_punct(PunctuationId::LBrace) {
            let body = self.block()?;
            if modifiers.is_external() {
                return Err(CompileError::parse(
                    ParseErrorKind::ExpectedToken,
                    format!("external function `{}` cannot have a body", name.node),
                    body.span,
                )
                .with_hint("end the declaration with `;`"));
            }
            Some(body)
        } else {
            self.expect_semicolon()
                .map_err(|e| e.with_hint("a function needs a `{ ... }` body or `;`"))?;
            None
        };

        Ok(FunctionDecl {
            modifiers,
            name,
            generics,
            params,
            attributes,
            return_type,
            body,
        })
    }

    /// `( [ElleMeta name[,]] param, ... )`
    fn param_list(&mut self) -> Result<ParamList, CompileError> {
        let open = self.expect_punct(PunctuationId::LParen)?.span;

        let meta = if self.peek().kind.ident() == Some(META_MARKER) && matches!(self.peek_next().kind, TokenKind::Ident(_)) {
            self.advance();
            let name = self.identifier()?;
            if !self.check_punct(PunctuationId::RParen) {
                self.expect_punct(PunctuationId::Comma)?;
            }
            Some(name)
        } else {
            None
        };

        let mut params = Vec::new();
        while !self.check_punct(PunctuationId::RParen) && !self.is_at_end() {
            params.push(self.param()?);
            if !self.match_punct(PunctuationId::Comma) {
                break;
            }
        }
        self.expect_closing(PunctuationId::RParen, open)?;

        Ok(ParamList { meta, params })
    }

    fn param(&mut self) -> Result<Spanned<Param>, CompileError> {
        let start = self.current_span().start;

        let param = if self.match_punct(PunctuationId::Ellipsis) {
            let name = if self.check_ident() { Some(self.identifier()?) } else { None };
            Param::Variadic { name }
        } else if self.check_punct(PunctuationId::At) && self.peek_next().kind.ident() == Some(NOFMT_MARKER) {
            self.advance();
            self.advance();
            let ty = self.type_expr()?;
            let name = self.identifier()?;
            Param::NoFormat { ty, name }
        } else {
            let ty = self.type_expr()?;
            if self.check_ident() {
                let name = self.identifier()?;
                Param::Named { ty, name }
            } else {
                Param::Unnamed { ty }
            }
        };

        Ok(Spanned::new(param, self.span_from(start)))
    }

    /// Zero or more `@name` / `@name(args)`.
    fn attributes(&mut self) -> Result<Vec<Spanned<Attribute>>, CompileError> {
        let mut attributes = Vec::new();
        while self.check_punct(PunctuationId::At) {
            let start = self.advance().span.start;
            let name = self.identifier()?;
            let args = if self.check_punct(PunctuationId::LParen) {
                Some(self.call_args()?)
            } else {
                None
            };
            attributes.push(Spanned::new(Attribute { name, args }, self.span_from(start)));
        }
        Ok(attributes)
    }

    /// `const Type name = value;` or `const name = value;`
    fn const_decl(&mut self, modifiers: Modifiers) -> Result<ConstDecl, CompileError> {
        self.expect_keyword(KeywordId::Const)?;
        let ty = if self.check_ident() && self.peek_next().kind.is_operator(OperatorId::Eq) {
            None
        } else {
            Some(self.type_expr()?)
        };
        let name = self.identifier()?;
        self.expect_op(OperatorId::Eq)?;
        let value = self.expression()?;
        self.expect_semicolon()?;
        Ok(ConstDecl {
            modifiers,
            ty,
            name,
            value,
        })
    }

    /// `struct Name<T> @attrs { Type field; other: Type; };`
    fn struct_decl(&mut self, modifiers: Modifiers) -> Result<StructDecl, CompileError> {
        self.expect_keyword(KeywordId::Struct)?;
        let name = self.identifier()?;
        let generics = self.generic_params()?;
        let attributes = self.attributes()?;
        let open = self.expect_punct(PunctuationId::LBrace)?.span;

        let mut fields = Vec::new();
        loop {
            if self.match_punct(PunctuationId::RBrace) {
                break;
            }
            if self.is_at_end() || self.check_punct(PunctuationId::RParen) || self.check_punct(PunctuationId::RBracket) {
                return Err(errors::unclosed("{", open, &self.peek().kind.describe(), self.current_span()));
            }
            fields.push(self.struct_field()?);
            if !self.match_punct(PunctuationId::Semicolon) && !self.match_punct(PunctuationId::Comma) {
                if self.check_punct(PunctuationId::RBrace) {
                    continue;
                }
                return Err(self.unexpected("`;` after struct field"));
            }
        }
        self.match_punct(PunctuationId::Semicolon);

        Ok(StructDecl {
            modifiers,
            name,
            generics,
            attributes,
            fields,
        })
    }

    /// `Type name` or `name: Type`.
    fn struct_field(&mut self) -> Result<Spanned<Field>, CompileError> {
        let start = self.current_span().start;
        let field = if self.check_ident() && self.peek_next().kind.is_punctuation(PunctuationId::Colon) {
            let name = self.identifier()?;
            self.advance();
            let ty = self.type_expr()?;
            Field { ty, name }
        } else {
            let ty = self.type_expr()?;
            let name = self.identifier()?;
            Field { ty, name }
        };
        Ok(Spanned::new(field, self.span_from(start)))
    }
}

/// Contextual identifier that introduces the meta binding at the head of a parameter list.
const META_MARKER: &str = "ElleMeta";

/// Attribute name that marks a parameter as excluded from formatting.
const NOFMT_MARKER: &str = "nofmt";
