//! Number scanning for the Elle lexer
//!
//! Handles hex/octal/binary integers, decimal integers, floats and scientific notation. The literal text is
//! kept verbatim; `_` separators must sit between two digits.

use super::Lexer;
use super::tokens::TokenKind;
use crate::ast::{NumberKind, NumberLit};
use crate::diagnostics::LexErrorKind;

/// Outcome of scanning one run of digits.
struct DigitRun {
    digits: usize,
    misplaced_separator: bool,
}

impl<'a> Lexer<'a> {
    pub(super) fn scan_number(&mut self, start: usize, first: char) {
        let mut valid = true;

        let kind = match (first, self.peek()) {
            ('0', Some('x' | 'X')) => {
                self.advance();
                valid &= self.radix_digits(|c| c.is_ascii_hexdigit());
                NumberKind::Hex
            }
            ('0', Some('o' | 'O')) => {
                self.advance();
                valid &= self.radix_digits(|c| c.is_digit(8));
                NumberKind::Octal
            }
            ('0', Some('b' | 'B')) => {
                self.advance();
                valid &= self.radix_digits(|c| c == '0' || c == '1');
                NumberKind::Binary
            }
            _ => {
                let mut kind = NumberKind::Decimal;
                let run = self.digit_run(true, |c| c.is_ascii_digit());
                valid &= !run.misplaced_separator;

                // `1.` followed by a non-digit is the integer `1` and a `.` token.
                if self.peek() == Some('.') && self.peek_next().is_some_and(|c| c.is_ascii_digit()) {
                    self.advance();
                    kind = NumberKind::Float;
                    let run = self.digit_run(false, |c| c.is_ascii_digit());
                    valid &= !run.misplaced_separator;
                }

                if matches!(self.peek(), Some('e' | 'E')) {
                    self.advance();
                    kind = NumberKind::Scientific;
                    if matches!(self.peek(), Some('+' | '-')) {
                        self.advance();
                    }
                    let run = self.digit_run(false, |c| c.is_ascii_digit());
                    valid &= run.digits > 0 && !run.misplaced_separator;
                }
                kind
            }
        };

        // Letters or digits glued to the literal (`12abc`, `0b102`) make the whole run malformed.
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == '_' {
                valid = false;
                self.advance();
            } else {
                break;
            }
        }

        let text = &self.source[start..self.current_pos];
        if valid {
            self.add_token(TokenKind::Number(NumberLit::new(kind, text)), start);
        } else {
            let message = format!("invalid numeric literal `{text}`");
            self.error(LexErrorKind::InvalidNumericLiteral, message, start);
        }
    }

    /// Digits after a radix prefix: at least one, no leading separator.
    fn radix_digits(&mut self, is_digit: fn(char) -> bool) -> bool {
        let run = self.digit_run(false, is_digit);
        run.digits > 0 && !run.misplaced_separator
    }

    fn digit_run(&mut self, after_digit: bool, is_digit: fn(char) -> bool) -> DigitRun {
        let mut run = DigitRun {
            digits: 0,
            misplaced_separator: false,
        };
        let mut last_was_digit = after_digit;
        while let Some(c) = self.peek() {
            if is_digit(c) {
                run.digits += 1;
                last_was_digit = true;
            } else if c == '_' {
                run.misplaced_separator |= !last_was_digit;
                last_was_digit = false;
            } else {
                break;
            }
            self.advance();
        }
        run.misplaced_separator |= !last_was_digit && (run.digits > 0 || after_digit);
        run
    }
}
