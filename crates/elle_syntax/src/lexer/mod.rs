//! Lexer for the Elle programming language
//!
//! Handles tokenization including:
//! - Keywords (primitive types, declarations, control flow)
//! - Identifiers, exact literals (`` `raw` ``) and literals (numbers, strings, chars)
//! - Operators and punctuation, longest match first (`<<=` before `<<` before `<`)
//! - Line and block comments, which are dropped from the token stream but whose spans are kept
//!
//! ## Module Structure
//!
//! - `tokens` - Token types (TokenKind, Token)
//! - `strings` - String, character and exact literal scanning
//! - `numbers` - Numeric literal scanning

mod numbers;
mod strings;
pub mod tokens;

pub use tokens::{Token, TokenKind, keyword_id};

use crate::ast::{Position, Span};
use crate::diagnostics::{CompileError, LexErrorKind};
use elle_core::lang::operators::OperatorId;
use elle_core::lang::punctuation::PunctuationId;

/// Everything a recovering lex pass produced.
#[derive(Debug, Clone, Default)]
pub struct Lexed {
    /// Valid tokens, always terminated by `Eof`.
    pub tokens: Vec<Token>,
    /// Spans of every line and block comment.
    pub comments: Vec<Span>,
    pub errors: Vec<CompileError>,
}

/// Lexer for Elle source code.
///
/// Whitespace is insignificant; a backslash directly before a newline is a line continuation and is skipped.
/// On a malformed token the lexer records an error, skips to the next plausible boundary, and keeps going.
pub struct Lexer<'a> {
    source: &'a str,
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
    current_pos: usize,
    line: u32,
    column: u32,
    /// Line/column of the token currently being scanned.
    token_pos: Position,
    tokens: Vec<Token>,
    comments: Vec<Span>,
    errors: Vec<CompileError>,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given source code.
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
            current_pos: 0,
            line: 1,
            column: 1,
            token_pos: Position::default(),
            tokens: Vec::new(),
            comments: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Scan the whole source, recovering from errors.
    pub fn run(mut self) -> Lexed {
        while !self.is_at_end() {
            self.scan_token();
        }

        self.token_pos = self.position();
        self.tokens.push(Token::new(
            TokenKind::Eof,
            Span::new(self.current_pos, self.current_pos),
            self.token_pos,
        ));

        Lexed {
            tokens: self.tokens,
            comments: self.comments,
            errors: self.errors,
        }
    }

    /// Tokenize the entire source code.
    ///
    /// Returns a vector of tokens on success, or every lexical error on failure.
    /// The token stream always ends with an `Eof` token.
    pub fn tokenize(self) -> Result<Vec<Token>, Vec<CompileError>> {
        let lexed = self.run();
        if lexed.errors.is_empty() {
            Ok(lexed.tokens)
        } else {
            Err(lexed.errors)
        }
    }

    // ========================================================================
    // Core character handling
    // ========================================================================

    fn is_at_end(&mut self) -> bool {
        self.chars.peek().is_none()
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|(_, c)| *c)
    }

    fn peek_next(&self) -> Option<char> {
        let mut iter = self.source[self.current_pos..].chars();
        iter.next();
        iter.next()
    }

    fn advance(&mut self) -> Option<char> {
        let (pos, c) = self.chars.next()?;
        self.current_pos = pos + c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn position(&self) -> Position {
        Position {
            line: self.line,
            column: self.column,
        }
    }

    fn error(&mut self, kind: LexErrorKind, message: impl Into<String>, start: usize) {
        self.errors
            .push(CompileError::lex(kind, message, Span::new(start, self.current_pos)));
    }

    // ========================================================================
    // Main scanning dispatch
    // ========================================================================

    fn scan_token(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }

        let start = self.current_pos;
        self.token_pos = self.position();

        let Some(c) = self.advance() else {
            return;
        };

        match c {
            // Line continuation
            '\\' if matches!(self.peek(), Some('\n' | '\r')) => {
                self.match_char('\r');
                self.match_char('\n');
            }

            '+' => self.operator(start, OperatorId::Plus, &[('=', OperatorId::PlusEq)]),
            '-' => {
                if self.match_char('>') {
                    self.add_punct(PunctuationId::Arrow, start);
                } else if self.match_char('=') {
                    self.add_op(OperatorId::MinusEq, start);
                } else {
                    self.add_op(OperatorId::Minus, start);
                }
            }
            '*' => self.operator(start, OperatorId::Star, &[('=', OperatorId::StarEq)]),
            '/' => self.scan_slash(start),
            '%' => self.operator(start, OperatorId::Percent, &[('=', OperatorId::PercentEq)]),
            '!' => self.operator(start, OperatorId::Bang, &[('=', OperatorId::NotEq)]),
            '~' => self.add_op(OperatorId::Tilde, start),
            '^' => self.operator(start, OperatorId::Caret, &[('=', OperatorId::CaretEq)]),
            '&' => self.operator(
                start,
                OperatorId::Amp,
                &[('&', OperatorId::AndAnd), ('=', OperatorId::AmpEq)],
            ),
            '|' => self.operator(
                start,
                OperatorId::Pipe,
                &[('|', OperatorId::OrOr), ('=', OperatorId::PipeEq)],
            ),
            '=' => self.operator(start, OperatorId::Eq, &[('=', OperatorId::EqEq)]),
            '<' => {
                if self.match_char('<') {
                    self.operator(start, OperatorId::Shl, &[('=', OperatorId::ShlEq)]);
                } else if self.match_char('>') {
                    self.operator(start, OperatorId::Concat, &[('=', OperatorId::ConcatEq)]);
                } else {
                    self.operator(start, OperatorId::Lt, &[('=', OperatorId::LtEq)]);
                }
            }
            '>' => {
                if self.match_char('>') {
                    self.operator(start, OperatorId::Shr, &[('=', OperatorId::ShrEq)]);
                } else {
                    self.operator(start, OperatorId::Gt, &[('=', OperatorId::GtEq)]);
                }
            }
            '.' => {
                if self.match_char('.') {
                    if self.match_char('.') {
                        self.add_punct(PunctuationId::Ellipsis, start);
                    } else if self.match_char('=') {
                        self.add_op(OperatorId::DotDotEq, start);
                    } else {
                        self.add_op(OperatorId::DotDot, start);
                    }
                } else {
                    self.add_punct(PunctuationId::Dot, start);
                }
            }
            ':' => {
                if self.match_char(':') {
                    self.add_punct(PunctuationId::ColonColon, start);
                } else if self.match_char('=') {
                    self.add_op(OperatorId::ColonEq, start);
                } else {
                    self.add_punct(PunctuationId::Colon, start);
                }
            }
            ',' => self.add_punct(PunctuationId::Comma, start),
            ';' => self.add_punct(PunctuationId::Semicolon, start),
            '?' => self.add_punct(PunctuationId::Question, start),
            '@' => self.add_punct(PunctuationId::At, start),
            '#' => self.add_punct(PunctuationId::Hash, start),
            '$' => self.add_punct(PunctuationId::Dollar, start),
            '(' => self.add_punct(PunctuationId::LParen, start),
            ')' => self.add_punct(PunctuationId::RParen, start),
            '[' => self.add_punct(PunctuationId::LBracket, start),
            ']' => self.add_punct(PunctuationId::RBracket, start),
            '{' => self.add_punct(PunctuationId::LBrace, start),
            '}' => self.add_punct(PunctuationId::RBrace, start),

            // Literals
            '"' => self.scan_string(start),
            '\'' => self.scan_char(start),
            '`' => self.scan_exact(start),
            '0'..='9' => self.scan_number(start, c),

            // Identifiers and keywords
            _ if is_ident_start(c) => self.scan_identifier(start),

            _ => self.error(
                LexErrorKind::UnexpectedCharacter,
                format!("unexpected character `{}`", c.escape_debug()),
                start,
            ),
        }
    }

    // ========================================================================
    // Operator helpers
    // ========================================================================

    fn match_char(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn add_token(&mut self, kind: TokenKind, start: usize) {
        self.tokens
            .push(Token::new(kind, Span::new(start, self.current_pos), self.token_pos));
    }

    fn add_op(&mut self, id: OperatorId, start: usize) {
        self.add_token(TokenKind::Operator(id), start);
    }

    fn add_punct(&mut self, id: PunctuationId, start: usize) {
        self.add_token(TokenKind::Punctuation(id), start);
    }

    /// Try to match compound operator, fallback to simple.
    fn operator(&mut self, start: usize, simple: OperatorId, compounds: &[(char, OperatorId)]) {
        for (c, id) in compounds {
            if self.match_char(*c) {
                self.add_op(*id, start);
                return;
            }
        }
        self.add_op(simple, start);
    }

    /// Scan slash forms: `/`, `/=`, `// comment`, `/* comment */`.
    fn scan_slash(&mut self, start: usize) {
        if self.match_char('/') {
            while let Some(c) = self.peek() {
                if c == '\n' {
                    break;
                }
                self.advance();
            }
            self.comments.push(Span::new(start, self.current_pos));
        } else if self.match_char('*') {
            self.scan_block_comment(start);
        } else if self.match_char('=') {
            self.add_op(OperatorId::SlashEq, start);
        } else {
            self.add_op(OperatorId::Slash, start);
        }
    }

    /// Block comments do not nest: the first `*/` closes.
    fn scan_block_comment(&mut self, start: usize) {
        loop {
            match self.advance() {
                Some('*') if self.match_char('/') => {
                    self.comments.push(Span::new(start, self.current_pos));
                    return;
                }
                Some(_) => {}
                None => {
                    self.error(LexErrorKind::UnterminatedComment, "unterminated block comment", start);
                    return;
                }
            }
        }
    }

    // ========================================================================
    // Identifier scanning
    // ========================================================================

    fn scan_identifier(&mut self, start: usize) {
        while let Some(c) = self.peek() {
            if is_ident_continue(c) {
                self.advance();
            } else {
                break;
            }
        }

        let spelling = &self.source[start..self.current_pos];

        if let Some(id) = keyword_id(spelling) {
            self.add_token(TokenKind::Keyword(id), start);
        } else {
            self.add_token(TokenKind::Ident(spelling.to_string()), start);
        }
    }
}

// ============================================================================
// Helper functions
// ============================================================================

/// Check if a character can start an identifier (ASCII-only).
fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

/// Check if a character can continue an identifier (ASCII-only).
fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Convenience function to lex a source string.
///
/// This is a shorthand for `Lexer::new(source).tokenize()`.
#[tracing::instrument(skip_all, fields(source_len = source.len()))]
pub fn lex(source: &str) -> Result<Vec<Token>, Vec<CompileError>> {
    Lexer::new(source).tokenize()
}

/// Lex without failing: every valid token plus every error, for tooling that wants partial results.
#[tracing::instrument(skip_all, fields(source_len = source.len()))]
pub fn lex_recovering(source: &str) -> Lexed {
    let lexed = Lexer::new(source).run();
    tracing::debug!(
        tokens = lexed.tokens.len(),
        comments = lexed.comments.len(),
        errors = lexed.errors.len(),
        "lexed"
    );
    lexed
}

/// Render a token stream back to source text, one space between tokens.
///
/// Re-lexing the result yields the same token kinds.
pub fn render(tokens: &[Token]) -> String {
    tokens
        .iter()
        .filter(|t| t.kind != TokenKind::Eof)
        .map(|t| t.kind.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Escape, NumberKind, NumberLit, StrPart};
    use elle_core::lang::keywords::KeywordId;

    fn kinds(source: &str) -> Vec<TokenKind> {
        lex(source)
            .unwrap_or_else(|errs| panic!("lex({source:?}) failed: {errs:?}"))
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    fn lex_errors(source: &str) -> Vec<LexErrorKind> {
        lex_recovering(source)
            .errors
            .iter()
            .filter_map(|e| e.lex_kind())
            .collect()
    }

    #[test]
    fn test_punctuation_registry_parity() {
        use elle_core::lang::punctuation;

        for p in punctuation::PUNCTUATION {
            let tokens = kinds(p.canonical);
            assert_eq!(tokens.len(), 2, "expected token + EOF for {:?}, got {:?}", p.canonical, tokens);
            assert!(tokens[0].is_punctuation(p.id), "{:?} lexed as {:?}", p.canonical, tokens[0]);
        }
    }

    #[test]
    fn test_keyword_registry_parity() {
        use elle_core::lang::keywords;

        for k in keywords::KEYWORDS {
            let tokens = kinds(k.canonical);
            assert_eq!(tokens.len(), 2, "expected token + EOF for {:?}, got {:?}", k.id, tokens);
            assert!(matches!(tokens.last(), Some(TokenKind::Eof)));
            assert!(tokens[0].is_keyword(k.id));
        }
    }

    #[test]
    fn test_operator_registry_parity() {
        use elle_core::lang::operators;

        for o in operators::OPERATORS {
            let tokens = kinds(o.spelling);
            assert_eq!(tokens.len(), 2, "expected token + EOF for {:?}, got {:?}", o.spelling, tokens);
            assert!(tokens[0].is_operator(o.id), "{:?} lexed as {:?}", o.spelling, tokens[0]);
        }
    }

    #[test]
    fn test_keywords_are_case_sensitive() {
        let tokens = kinds("FILE file I32 i32");
        assert!(tokens[0].is_keyword(KeywordId::File));
        assert_eq!(tokens[1].ident(), Some("file"));
        assert_eq!(tokens[2].ident(), Some("I32"));
        assert!(tokens[3].is_keyword(KeywordId::I32));
    }

    #[test]
    fn test_longest_match() {
        let tokens = kinds("a <<= b <> c >>= d ... e ..= f");
        assert!(tokens[1].is_operator(OperatorId::ShlEq));
        assert!(tokens[3].is_operator(OperatorId::Concat));
        assert!(tokens[5].is_operator(OperatorId::ShrEq));
        assert!(tokens[7].is_punctuation(PunctuationId::Ellipsis));
        assert!(tokens[9].is_operator(OperatorId::DotDotEq));
    }

    #[test]
    fn test_arrow_and_walrus() {
        let tokens = kinds("x := a->b");
        assert!(tokens[1].is_operator(OperatorId::ColonEq));
        assert!(tokens[3].is_punctuation(PunctuationId::Arrow));
    }

    #[test]
    fn test_numbers() {
        let tokens = kinds("42 0x1F 0o17 0b1010 3.14 1_000_000 1e10 2.5E-3");
        let expected = [
            (NumberKind::Decimal, "42"),
            (NumberKind::Hex, "0x1F"),
            (NumberKind::Octal, "0o17"),
            (NumberKind::Binary, "0b1010"),
            (NumberKind::Float, "3.14"),
            (NumberKind::Decimal, "1_000_000"),
            (NumberKind::Scientific, "1e10"),
            (NumberKind::Scientific, "2.5E-3"),
        ];
        for (token, (kind, text)) in tokens.iter().zip(expected) {
            match token {
                TokenKind::Number(n) => {
                    assert_eq!(n.kind, kind, "{text}");
                    assert_eq!(n.text, text);
                }
                other => panic!("expected number {text}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_number_values() {
        let value = |source: &str| match &kinds(source)[0] {
            TokenKind::Number(n) => (n.int_value(), n.float_value()),
            other => panic!("expected number, got {other:?}"),
        };
        assert_eq!(value("1_000"), (Some(1000), Some(1000.0)));
        assert_eq!(value("0x1F"), (Some(31), Some(31.0)));
        assert_eq!(value("0o17"), (Some(15), Some(15.0)));
        assert_eq!(value("0b1010"), (Some(10), Some(10.0)));
        assert_eq!(value("2.5E-3"), (None, Some(0.0025)));
        assert_eq!(value("0xFFFFFFFFFFFFFFFFF"), (None, None));

        // Hand-built literals need not be well formed.
        assert_eq!(NumberLit::new(NumberKind::Hex, "0").int_value(), None);
        assert_eq!(NumberLit::new(NumberKind::Binary, "").float_value(), None);
    }

    #[test]
    fn test_trailing_dot_is_member_access() {
        let tokens = kinds("1.x");
        assert!(matches!(&tokens[0], TokenKind::Number(n) if n.kind == NumberKind::Decimal && n.text == "1"));
        assert!(tokens[1].is_punctuation(PunctuationId::Dot));
        assert_eq!(tokens[2].ident(), Some("x"));
    }

    #[test]
    fn test_range_not_float() {
        let tokens = kinds("1..2");
        assert!(matches!(&tokens[0], TokenKind::Number(n) if n.text == "1"));
        assert!(tokens[1].is_operator(OperatorId::DotDot));
        assert!(matches!(&tokens[2], TokenKind::Number(n) if n.text == "2"));
    }

    #[test]
    fn test_malformed_numbers() {
        for source in ["0x", "0b102", "1__0", "1_", "0xG1", "1e", "1e+", "12abc", "0o8"] {
            assert_eq!(
                lex_errors(source),
                vec![LexErrorKind::InvalidNumericLiteral],
                "source {source:?}"
            );
        }
    }

    #[test]
    fn test_strings_and_escapes() {
        let tokens = kinds(r#""hi\n\x41\101\u00e9!""#);
        match &tokens[0] {
            TokenKind::Str(parts) => assert_eq!(
                parts,
                &vec![
                    StrPart::Text("hi".into()),
                    StrPart::Escape(Escape::Simple('n')),
                    StrPart::Escape(Escape::Hex("41".into())),
                    StrPart::Escape(Escape::Octal("101".into())),
                    StrPart::Escape(Escape::Unicode("00e9".into())),
                    StrPart::Text("!".into()),
                ]
            ),
            other => panic!("expected string, got {other:?}"),
        }
    }

    #[test]
    fn test_char_literals() {
        let tokens = kinds(r"'a' '\n' '\0'");
        assert_eq!(tokens[0], TokenKind::Char(StrPart::Text("a".into())));
        assert_eq!(tokens[1], TokenKind::Char(StrPart::Escape(Escape::Simple('n'))));
        assert_eq!(tokens[2], TokenKind::Char(StrPart::Escape(Escape::Octal("0".into()))));
        assert_eq!(lex_errors("''"), vec![LexErrorKind::InvalidCharLiteral]);
        assert_eq!(lex_errors("'ab'"), vec![LexErrorKind::InvalidCharLiteral]);
    }

    #[test]
    fn test_exact_literal() {
        let tokens = kinds("fn `operator+`() {}");
        assert_eq!(tokens[1], TokenKind::Exact("operator+".into()));
        assert_eq!(lex_errors("`abc"), vec![LexErrorKind::UnterminatedString]);
    }

    #[test]
    fn test_invalid_escapes() {
        assert_eq!(lex_errors(r#""\x4""#), vec![LexErrorKind::InvalidEscape]);
        assert_eq!(lex_errors(r#""\u12""#), vec![LexErrorKind::InvalidEscape]);
    }

    #[test]
    fn test_unterminated_string_recovers_on_next_line() {
        let lexed = lex_recovering("\"abc\nx");
        assert_eq!(lexed.errors.len(), 1);
        assert_eq!(lexed.errors[0].lex_kind(), Some(LexErrorKind::UnterminatedString));
        assert_eq!(lexed.tokens[0].kind.ident(), Some("x"));
        assert_eq!(lexed.tokens[0].pos, Position { line: 2, column: 1 });
    }

    #[test]
    fn test_comments_are_skipped_but_recorded() {
        let lexed = lex_recovering("a // line\n/* block\n */ b");
        assert!(lexed.errors.is_empty());
        assert_eq!(lexed.tokens.len(), 3);
        assert_eq!(lexed.comments, vec![Span::new(2, 9), Span::new(10, 22)]);
        assert_eq!(lexed.tokens[1].pos, Position { line: 3, column: 5 });
    }

    #[test]
    fn test_unterminated_block_comment() {
        assert_eq!(lex_errors("a /* never closed"), vec![LexErrorKind::UnterminatedComment]);
    }

    #[test]
    fn test_line_continuation() {
        let tokens = kinds("a \\\n b");
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[1].ident(), Some("b"));
    }

    #[test]
    fn test_unexpected_character_recovers() {
        let lexed = lex_recovering("a π b");
        assert_eq!(lexed.errors.len(), 1);
        assert_eq!(lexed.errors[0].lex_kind(), Some(LexErrorKind::UnexpectedCharacter));
        assert_eq!(lexed.tokens.len(), 3);
    }

    #[test]
    fn test_render_relexes_to_same_kinds() {
        let source = r#"fn main(){i32 x=0x1F<<2;string s="a\tb";char c='\'';x<>=`raw`;}"#;
        let first = kinds(source);
        let tokens = lex(source).unwrap();
        assert_eq!(kinds(&render(&tokens)), first);
    }
}
