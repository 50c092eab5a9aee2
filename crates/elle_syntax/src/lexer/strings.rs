//! String scanning for the Elle lexer
//!
//! Handles double-quoted strings, single-quoted characters and backtick exact literals. Escapes are kept as
//! [`Escape`] parts with their digits verbatim; nothing is decoded here.

use super::Lexer;
use super::tokens::TokenKind;
use crate::ast::{Escape, StrPart};
use crate::diagnostics::LexErrorKind;

// ============================================================================
// Escape sequence handling
// ============================================================================

/// Result of processing an escape sequence
enum EscapeResult {
    Escape(Escape),
    /// Malformed `\x` / `\u` escape; the digits read so far are consumed.
    Invalid(String),
    /// End of input during escape
    Eof,
}

impl<'a> Lexer<'a> {
    /// Process an escape sequence. Called after consuming the backslash.
    fn scan_escape(&mut self) -> EscapeResult {
        match self.peek() {
            None => EscapeResult::Eof,
            Some('x') => {
                self.advance();
                self.fixed_hex_escape(2, Escape::Hex)
            }
            Some('u') => {
                self.advance();
                self.fixed_hex_escape(4, Escape::Unicode)
            }
            Some(c @ '0'..='7') => {
                self.advance();
                let mut digits = String::from(c);
                while digits.len() < 3 {
                    match self.peek() {
                        Some(d @ '0'..='7') => {
                            digits.push(d);
                            self.advance();
                        }
                        _ => break,
                    }
                }
                EscapeResult::Escape(Escape::Octal(digits))
            }
            Some(c) => {
                self.advance();
                EscapeResult::Escape(Escape::Simple(c))
            }
        }
    }

    fn fixed_hex_escape(&mut self, width: usize, build: fn(String) -> Escape) -> EscapeResult {
        let mut digits = String::new();
        while digits.len() < width {
            match self.peek() {
                Some(d) if d.is_ascii_hexdigit() => {
                    digits.push(d);
                    self.advance();
                }
                _ => return EscapeResult::Invalid(digits),
            }
        }
        EscapeResult::Escape(build(digits))
    }

    // ========================================================================
    // String scanning
    // ========================================================================

    /// Scan a `"..."` string. A newline or end of input before the closing quote is an error; scanning
    /// resumes on the next line.
    pub(super) fn scan_string(&mut self, start: usize) {
        let mut parts = Vec::new();
        let mut text = String::new();

        loop {
            match self.peek() {
                None | Some('\n') => {
                    self.error(LexErrorKind::UnterminatedString, "unterminated string literal", start);
                    return;
                }
                Some('"') => {
                    self.advance();
                    break;
                }
                Some('\\') => {
                    let escape_start = self.current_pos;
                    self.advance();
                    match self.scan_escape() {
                        EscapeResult::Escape(escape) => {
                            if !text.is_empty() {
                                parts.push(StrPart::Text(std::mem::take(&mut text)));
                            }
                            parts.push(StrPart::Escape(escape));
                        }
                        EscapeResult::Invalid(digits) => {
                            let message = format!("invalid escape sequence after `\\` (read `{digits}`)");
                            self.error(LexErrorKind::InvalidEscape, message, escape_start);
                        }
                        EscapeResult::Eof => {
                            self.error(LexErrorKind::UnterminatedString, "unterminated string literal", start);
                            return;
                        }
                    }
                }
                Some(c) => {
                    text.push(c);
                    self.advance();
                }
            }
        }

        if !text.is_empty() {
            parts.push(StrPart::Text(text));
        }
        self.add_token(TokenKind::Str(parts), start);
    }

    /// Scan a `'c'` character literal: exactly one character or one escape.
    pub(super) fn scan_char(&mut self, start: usize) {
        let part = match self.peek() {
            None | Some('\n') => {
                self.error(LexErrorKind::UnterminatedString, "unterminated character literal", start);
                return;
            }
            Some('\'') => None,
            Some('\\') => {
                let escape_start = self.current_pos;
                self.advance();
                match self.scan_escape() {
                    EscapeResult::Escape(escape) => Some(StrPart::Escape(escape)),
                    EscapeResult::Invalid(_) => {
                        self.error(LexErrorKind::InvalidEscape, "invalid escape sequence", escape_start);
                        self.skip_char_literal_rest();
                        return;
                    }
                    EscapeResult::Eof => {
                        self.error(LexErrorKind::UnterminatedString, "unterminated character literal", start);
                        return;
                    }
                }
            }
            Some(c) => {
                self.advance();
                Some(StrPart::Text(c.to_string()))
            }
        };

        match part {
            Some(part) if self.match_char('\'') => self.add_token(TokenKind::Char(part), start),
            _ => {
                self.skip_char_literal_rest();
                self.error(
                    LexErrorKind::InvalidCharLiteral,
                    "character literals hold exactly one character or escape",
                    start,
                );
            }
        }
    }

    /// Recovery: skip to the closing `'` on the same line, if there is one.
    fn skip_char_literal_rest(&mut self) {
        while let Some(c) = self.peek() {
            if c == '\n' {
                return;
            }
            self.advance();
            if c == '\'' {
                return;
            }
        }
    }

    /// Scan a `` `raw` `` exact literal. No escapes; must close on the same line.
    pub(super) fn scan_exact(&mut self, start: usize) {
        let mut raw = String::new();
        loop {
            match self.peek() {
                None | Some('\n') => {
                    self.error(LexErrorKind::UnterminatedString, "unterminated exact literal", start);
                    return;
                }
                Some('`') => {
                    self.advance();
                    break;
                }
                Some(c) => {
                    raw.push(c);
                    self.advance();
                }
            }
        }

        if raw.is_empty() {
            self.error(LexErrorKind::InvalidCharLiteral, "exact literal must not be empty", start);
        } else {
            self.add_token(TokenKind::Exact(raw), start);
        }
    }
}
