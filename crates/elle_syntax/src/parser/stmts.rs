/// Statement parsing methods.
///
/// Statements are dispatched on their leading token (`if`, `while`, `for`, `defer`, `return`, `break`,
/// `continue`, `let`, `{`). Everything else goes through declaration-vs-expression disambiguation:
/// a speculative `Type name` prefix makes a variable declaration or static buffer, otherwise the statement
/// is an expression, optionally followed by an assignment operator.
///
/// ## Notes
/// - Errors inside a block are recorded and the parser skips to the end of the statement, so one bad
///   statement does not hide the rest of the body.
impl<'a> Parser<'a> {
    // ========================================================================
    // Blocks
    // ========================================================================

    fn block(&mut self) -> Result<Spanned<Block>, CompileError> {
        self.nested(|p| p.with_struct_literals(false, |p| p.block_inner()))
    }

    fn block_inner(&mut self) -> Result<Spanned<Block>, CompileError> {
        let open = self.expect_punct(PunctuationId::LBrace)?.span;
        let mut statements = Vec::new();

        loop {
            if self.match_punct(PunctuationId::RBrace) {
                break;
            }
            if self.is_at_end() {
                return Err(errors::unclosed("{", open, "end of file", self.current_span()).with_hint("insert `}`"));
            }
            if self.match_punct(PunctuationId::Semicolon) {
                continue;
            }
            match self.statement() {
                Ok(stmt) => statements.push(stmt),
                Err(e) => {
                    self.recover_from(e)?;
                    self.synchronize_statement();
                }
            }
        }

        Ok(Spanned::new(Block { statements }, self.span_from(open.start)))
    }

    // ========================================================================
    // Statements
    // ========================================================================

    fn statement(&mut self) -> Result<Spanned<Statement>, CompileError> {
        let start = self.current_span().start;

        let stmt = match self.peek().keyword_id() {
            Some(KeywordId::If) => Statement::If(self.if_stmt()?),
            Some(KeywordId::While) => Statement::While(self.while_stmt()?),
            Some(KeywordId::For) => self.for_stmt()?,
            Some(KeywordId::Defer) => {
                self.advance();
                let expr = self.expression()?;
                self.expect_semicolon()?;
                Statement::Defer(expr)
            }
            Some(KeywordId::Return) => {
                self.advance();
                let value = if self.check_punct(PunctuationId::Semicolon) {
                    None
                } else {
                    Some(self.expression()?)
                };
                self.expect_semicolon()?;
                Statement::Return(value)
            }
            Some(KeywordId::Break) => {
                self.advance();
                self.expect_semicolon()?;
                Statement::Break
            }
            Some(KeywordId::Continue) => {
                self.advance();
                self.expect_semicolon()?;
                Statement::Continue
            }
            _ if self.check_punct(PunctuationId::LBrace) => Statement::Block(self.block()?.node),
            _ => {
                let stmt = self.simple_statement()?;
                self.expect_semicolon()?;
                stmt
            }
        };

        Ok(Spanned::new(stmt, self.span_from(start)))
    }

    /// Declaration, static buffer, assignment or expression, without the trailing `;`.
    fn simple_statement(&mut self) -> Result<Statement, CompileError> {
        if let Some(binding) = self.binding_decl()? {
            return Ok(binding);
        }
        let target = self.expression()?;
        Ok(match self.assignment_tail(target)? {
            Ok(assign) => Statement::Assign(assign),
            Err(expr) => Statement::Expr(expr),
        })
    }

    /// `let name [= init]`, `name := init`, `Type name [= init]` or `Type name[size]`.
    ///
    /// Returns `Ok(None)`, with the position untouched, when the tokens do not start a binding.
    fn binding_decl(&mut self) -> Result<Option<Statement>, CompileError> {
        if self.match_keyword(KeywordId::Let) {
            let name = self.identifier()?;
            let init = self.initializer()?;
            return Ok(Some(Statement::VarDecl(VarDecl {
                binding: Binding::Let,
                ty: None,
                name,
                init,
            })));
        }

        if self.check_ident() && self.peek_next().kind.is_operator(OperatorId::ColonEq) {
            let name = self.identifier()?;
            self.advance();
            let init = self.expression()?;
            return Ok(Some(Statement::VarDecl(VarDecl {
                binding: Binding::Walrus,
                ty: None,
                name,
                init: Some(init),
            })));
        }

        // `fn(` opens a lambda expression, never a declaration.
        if self.check_keyword(KeywordId::Fn) && self.peek_next().kind.is_punctuation(PunctuationId::LParen) {
            return Ok(None);
        }

        let Some((ty, name)) = self.speculate(|p| {
            let ty = p.type_expr()?;
            let name = p.identifier()?;
            Ok((ty, name))
        }) else {
            return Ok(None);
        };

        if self.check_punct(PunctuationId::LBracket) {
            let open = self.advance().span;
            let size = self.with_struct_literals(false, |p| p.expression())?;
            self.expect_closing(PunctuationId::RBracket, open)?;
            return Ok(Some(Statement::StaticBuffer(StaticBuffer { ty, name, size })));
        }

        let init = self.initializer()?;
        Ok(Some(Statement::VarDecl(VarDecl {
            binding: Binding::Typed,
            ty: Some(ty),
            name,
            init,
        })))
    }

    fn initializer(&mut self) -> Result<Option<Spanned<Expr>>, CompileError> {
        if self.match_op(OperatorId::Eq) {
            Ok(Some(self.expression()?))
        } else {
            Ok(None)
        }
    }

    /// If an assignment operator follows `target`, parse the value and build the assignment;
    /// otherwise hand `target` back.
    fn assignment_tail(&mut self, target: Spanned<Expr>) -> Result<Result<AssignStmt, Spanned<Expr>>, CompileError> {
        let Some((id, op)) = self
            .peek()
            .operator_id()
            .and_then(|id| AssignOp::from_operator(id).map(|op| (id, op)))
        else {
            return Ok(Err(target));
        };
        self.advance();
        self.require_operand(id)?;
        let value = self.expression()?;
        Ok(Ok(AssignStmt { target, op, value }))
    }

    // ========================================================================
    // Control flow
    // ========================================================================

    fn if_stmt(&mut self) -> Result<IfStmt, CompileError> {
        self.expect_keyword(KeywordId::If)?;
        let condition = self.header_condition()?;
        let then_block = self.block()?;

        let else_branch = if self.match_keyword(KeywordId::Else) {
            if self.check_keyword(KeywordId::If) {
                let start = self.current_span().start;
                let nested = self.nested(|p| p.if_stmt())?;
                Some(ElseBranch::If(Box::new(Spanned::new(nested, self.span_from(start)))))
            } else {
                Some(ElseBranch::Block(self.block()?))
            }
        } else {
            None
        };

        Ok(IfStmt {
            condition,
            then_block,
            else_branch,
        })
    }

    fn while_stmt(&mut self) -> Result<WhileStmt, CompileError> {
        self.expect_keyword(KeywordId::While)?;
        let condition = self.header_condition()?;
        let body = self.block()?;
        Ok(WhileStmt { condition, body })
    }

    /// `if`/`while` condition. Enclosing parentheses are optional and not part of the condition.
    fn header_condition(&mut self) -> Result<Spanned<Expr>, CompileError> {
        let condition = self.with_struct_literals(true, |p| p.expression())?;
        Ok(match condition.node {
            Expr::Paren(inner) => *inner,
            other => Spanned::new(other, condition.span),
        })
    }

    /// `for init; cond; step { }`, `for (init; cond; step) { }` or `for name in expr { }`.
    fn for_stmt(&mut self) -> Result<Statement, CompileError> {
        self.expect_keyword(KeywordId::For)?;

        if self.check_ident() && self.peek_next().kind.is_keyword(KeywordId::In) {
            let binding = self.identifier()?;
            self.advance();
            let iterable = self.with_struct_literals(true, |p| p.expression())?;
            let body = self.block()?;
            return Ok(Statement::ForEach(ForEachStmt {
                binding,
                iterable,
                body,
            }));
        }

        let open = if self.check_punct(PunctuationId::LParen) {
            Some(self.advance().span)
        } else {
            None
        };

        // Without parentheses the step runs straight into the body's `{`.
        let (init, condition, step) = self.with_struct_literals(open.is_none(), |p| {
            let init = p.for_init()?;
            p.expect_semicolon()?;
            let condition = p.expression()?;
            p.expect_semicolon()?;
            let step = p.for_step()?;
            Ok((init, condition, step))
        })?;

        if let Some(open) = open {
            self.expect_closing(PunctuationId::RParen, open)?;
        }
        let body = self.block()?;

        Ok(Statement::For(ForStmt {
            init,
            condition,
            step,
            body,
        }))
    }

    fn for_init(&mut self) -> Result<ForInit, CompileError> {
        let start = self.current_span().start;
        if let Some(stmt) = self.binding_decl()? {
            return match stmt {
                Statement::VarDecl(decl) => Ok(ForInit::VarDecl(Spanned::new(decl, self.span_from(start)))),
                _ => Err(CompileError::parse(
                    ParseErrorKind::ExpectedExpression,
                    "static buffers cannot initialize a `for` loop",
                    self.span_from(start),
                )),
            };
        }
        Ok(ForInit::Expr(self.expression()?))
    }

    fn for_step(&mut self) -> Result<ForStep, CompileError> {
        let start = self.current_span().start;
        let target = self.expression()?;
        Ok(match self.assignment_tail(target)? {
            Ok(assign) => ForStep::Assign(Spanned::new(assign, self.span_from(start))),
            Err(expr) => ForStep::Expr(expr),
        })
    }
}
