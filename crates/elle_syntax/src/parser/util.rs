/// Miscellaneous parser utilities.
///
/// This chunk contains small shared parsing helpers that don’t cleanly fit into
/// “decl”, “stmt”, “expr”, or “types” (identifiers, names, module path segments).
impl<'a> Parser<'a> {
    // ========================================================================
    // Utilities
    // ========================================================================

    fn identifier(&mut self) -> Result<Ident, CompileError> {
        match &self.peek().kind {
            TokenKind::Ident(name) => {
                let name = name.clone();
                self.advance();
                Ok(name)
            }
            _ => Err(self.unexpected("identifier")),
        }
    }

    /// Declaration name: plain identifier, `A::B` path, or `` `exact` `` literal.
    fn decl_name(&mut self) -> Result<Spanned<DeclName>, CompileError> {
        let start = self.current_span().start;
        if let TokenKind::Exact(raw) = &self.peek().kind {
            let raw = raw.clone();
            self.advance();
            return Ok(Spanned::new(DeclName::Exact(raw), self.span_from(start)));
        }

        let first = self.identifier()?;
        if !self.check_punct(PunctuationId::ColonColon) {
            return Ok(Spanned::new(DeclName::Plain(first), self.span_from(start)));
        }
        let mut segments = vec![first];
        while self.match_punct(PunctuationId::ColonColon) {
            segments.push(self.identifier()?);
        }
        Ok(Spanned::new(DeclName::Qualified(segments), self.span_from(start)))
    }

    /// One `use` path segment. Keyword spellings are accepted (`use std/string;`).
    fn path_segment(&mut self) -> Result<Ident, CompileError> {
        if let Some(id) = self.peek().keyword_id() {
            self.advance();
            return Ok(keywords::as_str(id).to_string());
        }
        self.identifier()
    }

    /// Statement terminator, with a hint pointing just past the previous token.
    fn expect_semicolon(&mut self) -> Result<(), CompileError> {
        if self.match_punct(PunctuationId::Semicolon) {
            return Ok(());
        }
        let end = self.prev_end();
        Err(self
            .unexpected("`;`")
            .with_note(format!("previous item ends at offset {end}"))
            .with_hint("add `;`"))
    }
}
