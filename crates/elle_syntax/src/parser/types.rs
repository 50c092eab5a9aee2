/// Type-expression parsing methods.
///
/// This chunk parses syntactic type expressions, including:
/// - Primitive keywords (`i32`, `string`, `fn`, `FILE`) and plain names (`Point`)
/// - Generic applications (`Vec<i32>`), where `<` must touch the name
/// - Tuple types (`(i32, string)`)
/// - Pointer and array suffixes (`i32**`, `char[][]`), counted per run
///
/// ## Notes
/// - A `>>` that closes two generic argument lists at once is split: the first list consumes the token
///   and leaves one `>` owed in `pending_gt` for the enclosing list.
impl<'a> Parser<'a> {
    // ========================================================================
    // Types
    // ========================================================================

    /// Generic parameter names on a declaration: `<T, U>`.
    fn generic_params(&mut self) -> Result<Vec<Ident>, CompileError> {
        if !self.match_op(OperatorId::Lt) {
            return Ok(Vec::new());
        }
        let mut params = vec![self.identifier()?];
        while self.match_punct(PunctuationId::Comma) {
            params.push(self.identifier()?);
        }
        self.expect_op(OperatorId::Gt)?;
        Ok(params)
    }

    fn type_expr(&mut self) -> Result<Spanned<Type>, CompileError> {
        self.nested(|p| p.type_inner())
    }

    fn type_inner(&mut self) -> Result<Spanned<Type>, CompileError> {
        let start = self.current_span().start;

        let base = match &self.peek().kind {
            TokenKind::Keyword(id) => match PrimitiveType::from_keyword(*id) {
                Some(primitive) => {
                    self.advance();
                    Type::Primitive(primitive)
                }
                None => return Err(errors::expected_type(&self.peek().kind.describe(), self.current_span())),
            },
            TokenKind::Ident(name) => {
                let name = name.clone();
                self.advance();
                if self.check_op(OperatorId::Lt) && self.current_is_adjacent() {
                    let args = self.generic_args()?;
                    Type::Generic { name, args }
                } else {
                    Type::Named(name)
                }
            }
            TokenKind::Punctuation(PunctuationId::LParen) => {
                let open = self.advance().span;
                let first = self.type_expr()?;
                if !self.match_punct(PunctuationId::Comma) {
                    return Err(CompileError::parse(
                        ParseErrorKind::InvalidArity,
                        "tuple types have exactly two elements",
                        self.span_from(start),
                    )
                    .with_hint("write `(T, U)`"));
                }
                let second = self.type_expr()?;
                if self.check_punct(PunctuationId::Comma) {
                    return Err(CompileError::parse(
                        ParseErrorKind::InvalidArity,
                        "tuple types have exactly two elements",
                        self.current_span(),
                    ));
                }
                self.expect_closing(PunctuationId::RParen, open)?;
                Type::Tuple(Box::new(first), Box::new(second))
            }
            _ => return Err(errors::expected_type(&self.peek().kind.describe(), self.current_span())),
        };

        let mut ty = Spanned::new(base, self.span_from(start));
        self.type_suffixes(start, &mut ty);
        Ok(ty)
    }

    /// Apply `*` / `[]` suffix runs left to right.
    fn type_suffixes(&mut self, start: usize, ty: &mut Spanned<Type>) {
        loop {
            // Owed `>` closers come before any further suffix.
            if self.pending_gt > 0 {
                return;
            }
            if self.check_op(OperatorId::Star) {
                let mut depth = 0;
                while self.match_op(OperatorId::Star) {
                    depth += 1;
                }
                let base = std::mem::replace(ty, Spanned::new(Type::Primitive(PrimitiveType::Void), Span::default()));
                *ty = Spanned::new(
                    Type::Pointer {
                        base: Box::new(base),
                        depth,
                    },
                    self.span_from(start),
                );
            } else if self.check_punct(PunctuationId::LBracket) && self.peek_next().kind.is_punctuation(PunctuationId::RBracket) {
                let mut dims = 0;
                while self.check_punct(PunctuationId::LBracket)
                    && self.peek_next().kind.is_punctuation(PunctuationId::RBracket)
                {
                    self.advance();
                    self.advance();
                    dims += 1;
                }
                let element = std::mem::replace(ty, Spanned::new(Type::Primitive(PrimitiveType::Void), Span::default()));
                *ty = Spanned::new(
                    Type::Array {
                        element: Box::new(element),
                        dims,
                    },
                    self.span_from(start),
                );
            } else {
                return;
            }
        }
    }

    /// `<T, U>` argument list; the current token is `<`.
    fn generic_args(&mut self) -> Result<Vec<Spanned<Type>>, CompileError> {
        self.expect_op(OperatorId::Lt)?;
        self.generic_depth += 1;
        let result = self.generic_arg_list();
        self.generic_depth -= 1;
        result
    }

    fn generic_arg_list(&mut self) -> Result<Vec<Spanned<Type>>, CompileError> {
        let mut args = Vec::new();
        loop {
            args.push(self.type_expr()?);
            if self.pending_gt == 0 && self.match_punct(PunctuationId::Comma) {
                continue;
            }
            break;
        }
        self.close_angle()?;
        Ok(args)
    }

    /// Consume one `>`, splitting `>>` when generic lists close together.
    ///
    /// A `>>` is only split inside a nested list, so the owed half is always taken by the enclosing list.
    fn close_angle(&mut self) -> Result<(), CompileError> {
        if self.pending_gt > 0 {
            self.pending_gt -= 1;
            return Ok(());
        }
        if self.match_op(OperatorId::Gt) {
            return Ok(());
        }
        if self.generic_depth > 1 && self.match_op(OperatorId::Shr) {
            self.pending_gt += 1;
            return Ok(());
        }
        Err(self.unexpected("`>`"))
    }
}
