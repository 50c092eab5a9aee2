/// Expression parsing methods.
///
/// This chunk implements the expression grammar by precedence climbing:
/// conditional → binary (levels from `elle_core::lang::operators`) → unary/cast → postfix → primary.
///
/// ## Notes
/// - Operator identities are carried by [`TokenKind::Operator`] / [`OperatorId`]; precedence and
///   associativity come from the registry, never from spellings.
/// - Adjacency-sensitive forms (`f<T>(...)`, `$(`, `$$(`, `$name(`) compare token offsets.
/// - Struct literals are suppressed while `no_struct_literal` is set (statement headers) and re-enabled
///   inside any bracketed sub-expression.

/// What an infix operator builds once its right operand is parsed.
#[derive(Debug, Clone, Copy)]
enum Infix {
    Binary(BinaryOp),
    Range { inclusive: bool },
}

impl Infix {
    fn of(id: OperatorId) -> Option<Self> {
        match id {
            OperatorId::DotDot => Some(Infix::Range { inclusive: false }),
            OperatorId::DotDotEq => Some(Infix::Range { inclusive: true }),
            _ => BinaryOp::from_operator(id).map(Infix::Binary),
        }
    }
}

/// Operands collected for a `#directive(...)` in source order, grouped by shape.
#[derive(Debug, Default)]
struct DirectiveArgs {
    exprs: std::collections::VecDeque<Spanned<Expr>>,
    types: std::collections::VecDeque<Spanned<Type>>,
    idents: std::collections::VecDeque<Ident>,
}

impl DirectiveArgs {
    fn expr(&mut self, id: DirectiveId, span: Span) -> Result<Box<Spanned<Expr>>, CompileError> {
        self.exprs.pop_front().map(Box::new).ok_or_else(|| missing_operand(id, span))
    }

    fn optional_expr(&mut self) -> Option<Box<Spanned<Expr>>> {
        self.exprs.pop_front().map(Box::new)
    }

    fn ty(&mut self, id: DirectiveId, span: Span) -> Result<Spanned<Type>, CompileError> {
        self.types.pop_front().ok_or_else(|| missing_operand(id, span))
    }

    fn ident(&mut self, id: DirectiveId, span: Span) -> Result<Ident, CompileError> {
        self.idents.pop_front().ok_or_else(|| missing_operand(id, span))
    }
}

fn missing_operand(id: DirectiveId, span: Span) -> CompileError {
    CompileError::parse(
        ParseErrorKind::ExpectedOperand,
        format!("missing operand for `#{}`", directives::as_str(id)),
        span,
    )
    .with_hint(format!("usage: {}", directives::signature(id)))
}

impl<'a> Parser<'a> {
    // ========================================================================
    // Expressions
    // ========================================================================

    fn expression(&mut self) -> Result<Spanned<Expr>, CompileError> {
        self.nested(|p| p.conditional())
    }

    /// `cond ? a : b` and the shorthand `cond ? : b`.
    fn conditional(&mut self) -> Result<Spanned<Expr>, CompileError> {
        let condition = self.binary(1)?;
        if !self.match_punct(PunctuationId::Question) {
            return Ok(condition);
        }

        let consequence = if self.check_punct(PunctuationId::Colon) {
            None
        } else {
            Some(self.expression()?)
        };
        self.expect_punct(PunctuationId::Colon)?;
        let alternative = self.nested(|p| p.conditional())?;

        let span = condition.span.merge(alternative.span);
        Ok(Spanned::new(
            Expr::Conditional(Box::new(ConditionalExpr {
                condition,
                consequence,
                alternative,
            })),
            span,
        ))
    }

    /// Precedence climbing over every infix operator binding at least as tightly as `min_prec`.
    fn binary(&mut self, min_prec: u8) -> Result<Spanned<Expr>, CompileError> {
        let mut left = self.unary()?;

        loop {
            let Some(op) = self.peek().operator_id() else {
                break;
            };
            let (Some((prec, assoc)), Some(infix)) = (operators::binary_power(op), Infix::of(op)) else {
                break;
            };
            if prec < min_prec {
                break;
            }
            self.advance();
            self.require_operand(op)?;

            let next_min = match assoc {
                Associativity::Right => prec,
                Associativity::Left | Associativity::None => prec + 1,
            };
            let right = self.nested(|p| p.binary(next_min))?;
            let span = left.span.merge(right.span);

            left = match infix {
                Infix::Binary(bin) => Spanned::new(Expr::Binary(Box::new(left), bin, Box::new(right)), span),
                Infix::Range { inclusive } => Spanned::new(
                    Expr::Range {
                        start: Box::new(left),
                        end: Box::new(right),
                        inclusive,
                    },
                    span,
                ),
            };
        }

        Ok(left)
    }

    /// After consuming operator `op`, the next token must be able to start an operand.
    fn require_operand(&self, op: OperatorId) -> Result<(), CompileError> {
        if self.is_at_operand_start(true) {
            Ok(())
        } else {
            Err(errors::expected_operand(
                &format!("`{}`", operators::as_str(op)),
                &self.peek().kind.describe(),
                self.current_span(),
            ))
        }
    }

    fn unary(&mut self) -> Result<Spanned<Expr>, CompileError> {
        let start = self.current_span().start;

        if let Some(op) = self.peek().operator_id() {
            if let Some(unary) = UnaryOp::from_operator(op) {
                self.advance();
                self.require_operand(op)?;
                let operand = self.nested(|p| p.unary())?;
                return Ok(Spanned::new(Expr::Unary(unary, Box::new(operand)), self.span_from(start)));
            }
        }

        // In prefix position `&&x` is two address-of operators.
        if self.check_op(OperatorId::AndAnd) {
            self.advance();
            self.require_operand(OperatorId::AndAnd)?;
            let operand = self.nested(|p| p.unary())?;
            let inner_span = Span::new(start + 1, operand.span.end);
            let inner = Spanned::new(Expr::Unary(UnaryOp::AddrOf, Box::new(operand)), inner_span);
            return Ok(Spanned::new(Expr::Unary(UnaryOp::AddrOf, Box::new(inner)), self.span_from(start)));
        }

        if self.check_punct(PunctuationId::LParen) {
            if let Some(cast) = self.try_cast()? {
                return Ok(cast);
            }
        }

        self.postfix()
    }

    /// `(Type) operand`. Restores the position and returns `None` when the parenthesized tokens do not
    /// form a cast, leaving them to be parsed as a parenthesized expression.
    fn try_cast(&mut self) -> Result<Option<Spanned<Expr>>, CompileError> {
        let checkpoint = self.checkpoint();
        let start = self.advance().span.start;

        let ty = self.speculate(|p| {
            let ty = p.type_expr()?;
            p.expect_punct(PunctuationId::RParen)?;
            Ok(ty)
        });
        let Some(ty) = ty else {
            self.restore(checkpoint);
            return Ok(None);
        };

        // A bare name in parens may just be a parenthesized variable: `(a) - b` subtracts.
        let ambiguous = matches!(ty.node, Type::Named(_));
        if !self.is_at_operand_start(!ambiguous) {
            self.restore(checkpoint);
            return Ok(None);
        }

        let operand = self.nested(|p| p.unary())?;
        Ok(Some(Spanned::new(
            Expr::Cast(Box::new(ty), Box::new(operand)),
            self.span_from(start),
        )))
    }

    /// Calls, generic calls, member access and subscripts, chained left to right.
    fn postfix(&mut self) -> Result<Spanned<Expr>, CompileError> {
        let start = self.current_span().start;
        let mut expr = self.primary()?;

        loop {
            if self.check_punct(PunctuationId::LParen) {
                let args = self.call_args()?;
                expr = Spanned::new(
                    Expr::Call(Box::new(CallExpr {
                        callee: expr,
                        generic_args: None,
                        args,
                    })),
                    self.span_from(start),
                );
            } else if self.check_op(OperatorId::Lt) && self.current_is_adjacent() && is_generic_callee(&expr.node) {
                let Some(generic_args) = self.speculate(|p| p.generic_call_prefix()) else {
                    break;
                };
                let args = self.call_args()?;
                expr = Spanned::new(
                    Expr::Call(Box::new(CallExpr {
                        callee: expr,
                        generic_args: Some(generic_args),
                        args,
                    })),
                    self.span_from(start),
                );
            } else if self.match_punct(PunctuationId::Dot) {
                let name = self.identifier()?;
                expr = Spanned::new(Expr::Member(Box::new(expr), name), self.span_from(start));
            } else if self.check_punct(PunctuationId::LBracket) {
                let open = self.advance().span;
                let index = self.with_struct_literals(false, |p| p.expression())?;
                self.expect_closing(PunctuationId::RBracket, open)?;
                expr = Spanned::new(
                    Expr::Subscript(Box::new(expr), Box::new(index)),
                    self.span_from(start),
                );
            } else {
                break;
            }
        }

        Ok(expr)
    }

    /// `<T, U>` directly followed by `(`; anything else means the `<` is a comparison.
    fn generic_call_prefix(&mut self) -> Result<Vec<Spanned<Type>>, CompileError> {
        let args = self.generic_args()?;
        if self.pending_gt > 0 || !self.check_punct(PunctuationId::LParen) {
            return Err(self.unexpected("`(`"));
        }
        Ok(args)
    }

    fn call_args(&mut self) -> Result<Vec<Spanned<Expr>>, CompileError> {
        let open = self.expect_punct(PunctuationId::LParen)?.span;
        self.with_struct_literals(false, |p| p.expr_list(PunctuationId::RParen, open))
    }

    /// Comma-separated expressions up to and including `close`; a trailing comma is allowed.
    fn expr_list(&mut self, close: PunctuationId, open: Span) -> Result<Vec<Spanned<Expr>>, CompileError> {
        let mut items = Vec::new();
        while !self.check_punct(close) && !self.is_at_end() {
            items.push(self.expression()?);
            if !self.match_punct(PunctuationId::Comma) {
                break;
            }
        }
        self.expect_closing(close, open)?;
        Ok(items)
    }

    fn primary(&mut self) -> Result<Spanned<Expr>, CompileError> {
        let start = self.current_span().start;

        let expr = match &self.peek().kind {
            TokenKind::Number(number) => {
                let number = number.clone();
                self.advance();
                Expr::Number(number)
            }
            TokenKind::Str(parts) => {
                let parts = parts.clone();
                self.advance();
                Expr::Str(parts)
            }
            TokenKind::Char(part) => {
                let part = part.clone();
                self.advance();
                Expr::Char(part)
            }
            TokenKind::Exact(raw) => {
                let raw = raw.clone();
                self.advance();
                Expr::Exact(raw)
            }
            TokenKind::Keyword(KeywordId::True) => {
                self.advance();
                Expr::Bool(true)
            }
            TokenKind::Keyword(KeywordId::False) => {
                self.advance();
                Expr::Bool(false)
            }
            TokenKind::Keyword(KeywordId::Fn) => return self.lambda(),
            TokenKind::Ident(_) => return self.name_expr(),
            TokenKind::Punctuation(PunctuationId::LParen) => {
                let open = self.advance().span;
                let inner = self.with_struct_literals(false, |p| p.expression())?;
                self.expect_closing(PunctuationId::RParen, open)?;
                Expr::Paren(Box::new(inner))
            }
            TokenKind::Punctuation(PunctuationId::LBracket) => return self.array_literal(start, false),
            TokenKind::Punctuation(PunctuationId::Hash) => return self.hash_expr(),
            TokenKind::Punctuation(PunctuationId::Dollar) => return self.dollar_expr(),
            other => return Err(errors::expected_expression(&other.describe(), self.current_span())),
        };

        Ok(Spanned::new(expr, self.span_from(start)))
    }

    /// Identifier, `A::B` path, or `Name { field = value }` struct literal.
    fn name_expr(&mut self) -> Result<Spanned<Expr>, CompileError> {
        let start = self.current_span().start;
        let name = self.identifier()?;

        if self.check_punct(PunctuationId::ColonColon) {
            let mut segments = vec![name];
            while self.match_punct(PunctuationId::ColonColon) {
                segments.push(self.identifier()?);
            }
            return Ok(Spanned::new(Expr::Qualified(segments), self.span_from(start)));
        }

        if !self.no_struct_literal {
            if let Some(literal) = self.try_struct_literal(&name, start)? {
                return Ok(literal);
            }
        }

        Ok(Spanned::new(Expr::Ident(name), self.span_from(start)))
    }

    /// A struct literal needs `{` followed by `}` or `field =`, so `x { ... }` never swallows a block.
    fn try_struct_literal(&mut self, name: &str, start: usize) -> Result<Option<Spanned<Expr>>, CompileError> {
        let checkpoint = self.checkpoint();

        let generic_args = if self.check_op(OperatorId::Lt) && self.current_is_adjacent() {
            match self.speculate(|p| p.generic_args()) {
                Some(args) if self.pending_gt == 0 => Some(args),
                _ => {
                    self.restore(checkpoint);
                    return Ok(None);
                }
            }
        } else {
            None
        };

        if !self.at_struct_literal_body() {
            self.restore(checkpoint);
            return Ok(None);
        }

        let open = self.advance().span;
        let fields = self.with_struct_literals(false, |p| p.field_inits(open))?;
        Ok(Some(Spanned::new(
            Expr::StructLit(StructLit {
                name: name.to_string(),
                generic_args,
                fields,
            }),
            self.span_from(start),
        )))
    }

    fn at_struct_literal_body(&self) -> bool {
        if !self.check_punct(PunctuationId::LBrace) {
            return false;
        }
        match &self.peek_next().kind {
            TokenKind::Punctuation(PunctuationId::RBrace) => true,
            TokenKind::Ident(_) => self.peek_nth(2).kind.is_operator(OperatorId::Eq),
            _ => false,
        }
    }

    fn field_inits(&mut self, open: Span) -> Result<Vec<Spanned<FieldInit>>, CompileError> {
        let mut fields = Vec::new();
        while !self.check_punct(PunctuationId::RBrace) && !self.is_at_end() {
            let start = self.current_span().start;
            let name = self.identifier()?;
            self.expect_op(OperatorId::Eq)?;
            let value = self.expression()?;
            fields.push(Spanned::new(FieldInit { name, value }, self.span_from(start)));
            if !self.match_punct(PunctuationId::Comma) {
                break;
            }
        }
        self.expect_closing(PunctuationId::RBrace, open)?;
        Ok(fields)
    }

    /// `[T; a, b]` / `[a, b]`; `is_static` when reached through `#[`. The current token is `[`.
    fn array_literal(&mut self, start: usize, is_static: bool) -> Result<Spanned<Expr>, CompileError> {
        let open = self.expect_punct(PunctuationId::LBracket)?.span;
        let elem_ty = self.speculate(|p| {
            let ty = p.type_expr()?;
            p.expect_punct(PunctuationId::Semicolon)?;
            Ok(ty)
        });
        let elements = self.with_struct_literals(false, |p| p.expr_list(PunctuationId::RBracket, open))?;
        Ok(Spanned::new(
            Expr::Array(ArrayLit {
                elem_ty,
                is_static,
                elements,
            }),
            self.span_from(start),
        ))
    }

    fn lambda(&mut self) -> Result<Spanned<Expr>, CompileError> {
        let start = self.expect_keyword(KeywordId::Fn)?.span.start;
        let params = self.param_list()?;
        let body = if self.check_punct(PunctuationId::LBrace) {
            LambdaBody::Block(self.block()?)
        } else {
            LambdaBody::Expr(self.expression()?)
        };
        Ok(Spanned::new(
            Expr::Lambda(Box::new(Lambda { params, body })),
            self.span_from(start),
        ))
    }

    // ========================================================================
    // `#` and `$` forms
    // ========================================================================

    /// `#[...]` static array, or a `#name` directive.
    fn hash_expr(&mut self) -> Result<Spanned<Expr>, CompileError> {
        let start = self.expect_punct(PunctuationId::Hash)?.span.start;

        if self.check_punct(PunctuationId::LBracket) {
            return self.array_literal(start, true);
        }

        let name_span = self.current_span();
        let name = match self.peek().kind.ident() {
            Some(name) => name.to_string(),
            None => return Err(self.unexpected("directive name after `#`")),
        };
        self.advance();

        let Some(id) = directives::from_str(&name) else {
            return Err(errors::unknown_directive(&name, Span::new(start, name_span.end)));
        };
        let directive = self.directive_operands(id)?;
        Ok(Spanned::new(Expr::Directive(directive), self.span_from(start)))
    }

    /// Read the operands of directive `id` following its registry shape.
    fn directive_operands(&mut self, id: DirectiveId) -> Result<Directive, CompileError> {
        let info = directives::info_for(id);
        let start = self.prev_end();
        let mut args = DirectiveArgs::default();

        if info.parenthesized {
            let open = match self.expect_punct(PunctuationId::LParen) {
                Ok(token) => token.span,
                Err(e) => return Err(e.with_hint(format!("usage: {}", directives::signature(id)))),
            };

            for (i, operand) in info.operands.iter().enumerate() {
                if *operand == Operand::OptionalExpr {
                    if self.match_punct(PunctuationId::Comma) {
                        let expr = self.with_struct_literals(false, |p| p.expression())?;
                        args.exprs.push_back(expr);
                    }
                    continue;
                }
                if i > 0 && !self.match_punct(PunctuationId::Comma) {
                    return Err(self.wrong_operand_shape(id));
                }
                if self.check_punct(PunctuationId::RParen) {
                    return Err(self.wrong_operand_shape(id));
                }
                match operand {
                    Operand::Expr => {
                        let expr = self.with_struct_literals(false, |p| p.expression())?;
                        args.exprs.push_back(expr);
                    }
                    Operand::Type => {
                        let ty = self
                            .type_expr()
                            .map_err(|e| e.with_hint(format!("usage: {}", directives::signature(id))))?;
                        args.types.push_back(ty);
                    }
                    Operand::Ident => args.idents.push_back(self.identifier()?),
                    Operand::OptionalExpr => {}
                }
            }

            if !self.check_punct(PunctuationId::RParen) && !self.is_at_end() {
                return Err(self.wrong_operand_shape(id));
            }
            self.expect_closing(PunctuationId::RParen, open)?;
        } else if self.check_punct(PunctuationId::LParen) {
            // `#env(x)` is not a call on `#env`.
            return Err(self.wrong_operand_shape(id));
        }

        let span = self.span_from(start);
        Ok(match id {
            DirectiveId::Len => Directive::Len(args.expr(id, span)?),
            DirectiveId::Size => Directive::Size(args.ty(id, span)?),
            DirectiveId::I => Directive::Ident(args.ident(id, span)?),
            DirectiveId::Env => Directive::Env,
            DirectiveId::Alloc => Directive::Alloc {
                ty: args.ty(id, span)?,
                count: args.optional_expr(),
            },
            DirectiveId::Realloc => Directive::Realloc {
                ptr: args.expr(id, span)?,
                ty: args.ty(id, span)?,
                count: args.optional_expr(),
            },
            DirectiveId::Free => Directive::Free(args.expr(id, span)?),
            DirectiveId::SetAllocator => Directive::SetAllocator(args.expr(id, span)?),
            DirectiveId::ResetAllocator => Directive::ResetAllocator,
        })
    }

    fn wrong_operand_shape(&self, id: DirectiveId) -> CompileError {
        CompileError::parse(
            ParseErrorKind::ExpectedOperand,
            format!(
                "wrong operands for `#{}`, found {}",
                directives::as_str(id),
                self.peek().kind.describe()
            ),
            self.current_span(),
        )
        .with_hint(format!("usage: {}", directives::signature(id)))
    }

    /// `$(a, b)` tuple, `$$(a, b, c)` triple, or a `$name` / `$name(args)` sigil.
    fn dollar_expr(&mut self) -> Result<Spanned<Expr>, CompileError> {
        let start = self.expect_punct(PunctuationId::Dollar)?.span.start;

        if self.check_punct(PunctuationId::Dollar)
            && self.current_is_adjacent()
            && self.peek_next().kind.is_punctuation(PunctuationId::LParen)
            && self.next_is_adjacent()
        {
            self.advance();
            let items = self.fixed_items()?;
            let [a, b, c] = <[Spanned<Expr>; 3]>::try_from(items)
                .map_err(|items| self.arity_error("triple", 3, items.len(), start))?;
            return Ok(Spanned::new(
                Expr::Triple(Box::new(a), Box::new(b), Box::new(c)),
                self.span_from(start),
            ));
        }

        if self.check_punct(PunctuationId::LParen) && self.current_is_adjacent() {
            let items = self.fixed_items()?;
            let [a, b] = <[Spanned<Expr>; 2]>::try_from(items)
                .map_err(|items| self.arity_error("tuple", 2, items.len(), start))?;
            return Ok(Spanned::new(Expr::Tuple(Box::new(a), Box::new(b)), self.span_from(start)));
        }

        if self.check_ident() && self.current_is_adjacent() {
            let name = self.identifier()?;
            let args = if self.check_punct(PunctuationId::LParen) && self.current_is_adjacent() {
                Some(self.call_args()?)
            } else {
                None
            };
            return Ok(Spanned::new(Expr::Sigil { name, args }, self.span_from(start)));
        }

        Err(self.unexpected("`(`, `$(` or a sigil name directly after `$`"))
    }

    fn fixed_items(&mut self) -> Result<Vec<Spanned<Expr>>, CompileError> {
        let open = self.expect_punct(PunctuationId::LParen)?.span;
        self.with_struct_literals(false, |p| p.expr_list(PunctuationId::RParen, open))
    }

    fn arity_error(&self, what: &str, expected: usize, found: usize, start: usize) -> CompileError {
        CompileError::parse(
            ParseErrorKind::InvalidArity,
            format!("{what} literal takes exactly {expected} elements, found {found}"),
            self.span_from(start),
        )
    }
}

/// Callees that may take an explicit `<...>` argument list.
fn is_generic_callee(expr: &Expr) -> bool {
    matches!(expr, Expr::Ident(_) | Expr::Qualified(_) | Expr::Member(..))
}
