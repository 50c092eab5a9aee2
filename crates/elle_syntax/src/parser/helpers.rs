/// Token-stream helpers and error recovery.
///
/// This chunk contains the low-level primitives used throughout parsing:
/// - Peeking/consuming tokens (`peek`, `advance`) and source adjacency checks
/// - Matching / expecting keywords, operators, and punctuation
/// - Speculation (`checkpoint`, `restore`) and the nesting guard (`nested`)
/// - Error recovery (`synchronize`, `synchronize_statement`)
impl<'a> Parser<'a> {
    // ========================================================================
    // Helpers
    // ========================================================================

    /// Return `true` if the current token is [`TokenKind::Eof`].
    fn is_at_end(&self) -> bool {
        matches!(self.peek().kind, TokenKind::Eof)
    }

    fn token_at(&self, index: usize) -> &Token {
        self.tokens.get(index).unwrap_or(&self.eof)
    }

    /// Return the current token without consuming it.
    fn peek(&self) -> &Token {
        self.token_at(self.pos)
    }

    /// Return the token after the current token without consuming it.
    fn peek_next(&self) -> &Token {
        self.token_at(self.pos + 1)
    }

    fn peek_nth(&self, n: usize) -> &Token {
        self.token_at(self.pos + n)
    }

    /// Advance to the next token and return the token we just consumed.
    fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.pos += 1;
        }
        self.token_at(self.pos.saturating_sub(1))
    }

    /// End offset of the last consumed token.
    fn prev_end(&self) -> usize {
        if self.pos == 0 {
            return self.peek().span.start;
        }
        self.token_at(self.pos - 1).span.end
    }

    /// Span from `start` to the end of the last consumed token.
    fn span_from(&self, start: usize) -> Span {
        Span::new(start, self.prev_end())
    }

    fn current_span(&self) -> Span {
        self.peek().span
    }

    /// Whether the current token starts exactly where the previous one ended.
    fn current_is_adjacent(&self) -> bool {
        self.pos > 0 && self.token_at(self.pos - 1).is_adjacent_to(self.peek())
    }

    /// Whether the current and next tokens touch.
    fn next_is_adjacent(&self) -> bool {
        self.peek().is_adjacent_to(self.peek_next())
    }

    /// Return `true` if the current token is the given keyword.
    fn check_keyword(&self, id: KeywordId) -> bool {
        self.peek().kind.is_keyword(id)
    }

    /// Return `true` if the current token is the given punctuation.
    fn check_punct(&self, id: PunctuationId) -> bool {
        self.peek().kind.is_punctuation(id)
    }

    /// Return `true` if the current token is the given operator.
    fn check_op(&self, id: OperatorId) -> bool {
        self.peek().kind.is_operator(id)
    }

    fn check_ident(&self) -> bool {
        matches!(self.peek().kind, TokenKind::Ident(_))
    }

    fn match_keyword(&mut self, id: KeywordId) -> bool {
        if self.check_keyword(id) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn match_punct(&mut self, id: PunctuationId) -> bool {
        if self.check_punct(id) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn match_op(&mut self, id: OperatorId) -> bool {
        if self.check_op(id) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect_keyword(&mut self, id: KeywordId) -> Result<&Token, CompileError> {
        if self.check_keyword(id) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(&format!("`{}`", keywords::as_str(id))))
        }
    }

    fn expect_punct(&mut self, id: PunctuationId) -> Result<&Token, CompileError> {
        if self.check_punct(id) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(&format!("`{}`", punctuation::as_str(id))))
        }
    }

    fn expect_op(&mut self, id: OperatorId) -> Result<&Token, CompileError> {
        if self.check_op(id) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(&format!("`{}`", operators::as_str(id))))
        }
    }

    /// Expect the closer for a delimiter opened at `open`.
    ///
    /// End of input, a different closer, or a `;` inside parentheses or brackets is an unbalanced delimiter;
    /// anything else is a plain "expected" error.
    fn expect_closing(&mut self, close: PunctuationId, open: Span) -> Result<(), CompileError> {
        if self.match_punct(close) {
            return Ok(());
        }
        let found = self.peek();
        let unbalanced = match found.punctuation_id() {
            Some(PunctuationId::RParen | PunctuationId::RBracket | PunctuationId::RBrace) => true,
            Some(PunctuationId::Semicolon) => close != PunctuationId::RBrace,
            _ => self.is_at_end(),
        };
        if !unbalanced {
            return Err(self.unexpected(&format!("`{}`", punctuation::as_str(close))));
        }

        let opener = punctuation::PUNCTUATION
            .iter()
            .find(|p| punctuation::closing_of(p.id) == Some(close))
            .map_or("{", |p| p.canonical);
        Err(errors::unclosed(opener, open, &found.kind.describe(), found.span)
            .with_hint(format!("insert `{}`", punctuation::as_str(close))))
    }

    /// "expected X, found <current token>" at the current token.
    fn unexpected(&self, expected: &str) -> CompileError {
        errors::expected_token(expected, &self.peek().kind.describe(), self.current_span())
    }

    // ========================================================================
    // Speculation and nesting
    // ========================================================================

    fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            pos: self.pos,
            pending_gt: self.pending_gt,
        }
    }

    fn restore(&mut self, checkpoint: Checkpoint) {
        self.pos = checkpoint.pos;
        self.pending_gt = checkpoint.pending_gt;
    }

    /// Run `f`; on failure rewind to where we started and return `None`.
    fn speculate<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T, CompileError>) -> Option<T> {
        let checkpoint = self.checkpoint();
        match f(self) {
            Ok(value) => Some(value),
            Err(_) => {
                self.restore(checkpoint);
                None
            }
        }
    }

    /// Run `f` one nesting level deeper, failing with `TooDeep` past `max_depth`. The stack grows as needed, so
    /// the limit holds regardless of the calling thread's stack size.
    fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T, CompileError>) -> Result<T, CompileError> {
        if self.depth >= self.options.max_depth {
            return Err(errors::too_deep(self.options.max_depth, self.current_span()));
        }
        self.depth += 1;
        let result = crate::stack::ensure_sufficient_stack(|| f(self));
        self.depth -= 1;
        result
    }

    /// Run `f` with the struct-literal restriction set to `restricted`.
    fn with_struct_literals<T>(
        &mut self,
        restricted: bool,
        f: impl FnOnce(&mut Self) -> Result<T, CompileError>,
    ) -> Result<T, CompileError> {
        let saved = std::mem::replace(&mut self.no_struct_literal, restricted);
        let result = f(self);
        self.no_struct_literal = saved;
        result
    }

    /// Record a recoverable error, or hand it back when recovery is off.
    fn recover_from(&mut self, error: CompileError) -> Result<(), CompileError> {
        if self.options.recover {
            self.errors.push(error);
            Ok(())
        } else {
            Err(error)
        }
    }

    // ========================================================================
    // Recovery
    // ========================================================================

    fn at_declaration_start(&self) -> bool {
        match &self.peek().kind {
            TokenKind::Keyword(
                KeywordId::Fn
                | KeywordId::Const
                | KeywordId::Struct
                | KeywordId::Use
                | KeywordId::Global
                | KeywordId::Namespace
                | KeywordId::Pub
                | KeywordId::Local
                | KeywordId::External,
            ) => true,
            TokenKind::Operator(OperatorId::Bang) => self
                .peek_next()
                .keyword_id()
                .and_then(VisibilityKind::from_keyword)
                .is_some(),
            _ => false,
        }
    }

    /// Skip to the next top-level boundary: past a `;` or `}` at depth 0, or up to a declaration keyword.
    fn synchronize(&mut self) {
        let start = self.pos;
        let mut depth = 0usize;
        while !self.is_at_end() {
            if depth == 0 && self.pos > start && self.at_declaration_start() {
                break;
            }
            match self.peek().punctuation_id() {
                Some(PunctuationId::LBrace | PunctuationId::LParen | PunctuationId::LBracket) => depth += 1,
                Some(PunctuationId::RBrace) => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        self.advance();
                        break;
                    }
                }
                Some(PunctuationId::RParen | PunctuationId::RBracket) => depth = depth.saturating_sub(1),
                Some(PunctuationId::Semicolon) if depth == 0 => {
                    self.advance();
                    break;
                }
                _ => {}
            }
            self.advance();
        }
        tracing::debug!(skipped = self.pos - start, at = self.prev_end(), "resynchronized at declaration boundary");
    }

    /// Skip to the end of the current statement: past a `;` at depth 0, or up to the enclosing `}`.
    fn synchronize_statement(&mut self) {
        let start = self.pos;
        let mut depth = 0usize;
        while !self.is_at_end() {
            match self.peek().punctuation_id() {
                Some(PunctuationId::RBrace) if depth == 0 => break,
                Some(PunctuationId::LBrace | PunctuationId::LParen | PunctuationId::LBracket) => depth += 1,
                Some(PunctuationId::RBrace | PunctuationId::RParen | PunctuationId::RBracket) => {
                    depth = depth.saturating_sub(1)
                }
                Some(PunctuationId::Semicolon) if depth == 0 => {
                    self.advance();
                    break;
                }
                _ => {}
            }
            self.advance();
        }
        tracing::debug!(skipped = self.pos - start, at = self.prev_end(), "resynchronized at statement boundary");
    }

    /// Check if the current token can start an operand.
    ///
    /// With `allow_binary_spellings == false`, tokens that may also continue an expression as a binary
    /// operator (`- + * & && [`) are rejected.
    fn is_at_operand_start(&self, allow_binary_spellings: bool) -> bool {
        match &self.peek().kind {
            TokenKind::Ident(_)
            | TokenKind::Number(_)
            | TokenKind::Str(_)
            | TokenKind::Char(_)
            | TokenKind::Exact(_) => true,
            TokenKind::Keyword(KeywordId::True | KeywordId::False | KeywordId::Fn) => true,
            TokenKind::Punctuation(PunctuationId::LParen | PunctuationId::Hash | PunctuationId::Dollar) => true,
            TokenKind::Punctuation(PunctuationId::LBracket) => allow_binary_spellings,
            TokenKind::Operator(OperatorId::Bang | OperatorId::Tilde) => true,
            TokenKind::Operator(
                OperatorId::Minus | OperatorId::Plus | OperatorId::Star | OperatorId::Amp | OperatorId::AndAnd,
            ) => allow_binary_spellings,
            _ => false,
        }
    }
}
