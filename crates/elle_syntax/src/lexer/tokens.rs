//! Token types for the Elle lexer.
//!
//! The lexer uses **registry-backed IDs** for language vocabulary:
//! - `Keyword(KeywordId)` for reserved words
//! - `Operator(OperatorId)` for operators
//! - `Punctuation(PunctuationId)` for punctuation tokens
//!
//! ## Notes
//! - Literal payloads ([`NumberLit`], [`StrPart`]) are the AST's literal types, so the parser moves them into nodes
//!   without re-reading the source.
//! - Use `crate::token_helpers` for ergonomic token matching at call sites.

use std::fmt;

use crate::ast::{NumberLit, Position, Span, StrPart};
use elle_core::lang::keywords::{self, KeywordId};
use elle_core::lang::operators::{self, OperatorId};
use elle_core::lang::punctuation::{self, PunctuationId};

// ============================================================================
// TOKEN TYPES
// ============================================================================

/// Kind of token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // ========== Keyword / operator / punctuation (ID-based) ==========
    Keyword(KeywordId),
    Operator(OperatorId),
    Punctuation(PunctuationId),

    // ========== Identifiers and Literals ==========
    Ident(String),
    Number(NumberLit),
    Str(Vec<StrPart>),
    Char(StrPart),
    /// Backtick-quoted raw name.
    Exact(String),

    // ========== Special ==========
    Eof,
}

impl fmt::Display for TokenKind {
    /// Source spelling of the token. Literals render as written, quotes and escapes included.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Keyword(id) => write!(f, "{}", keywords::as_str(*id)),
            TokenKind::Operator(id) => write!(f, "{}", operators::as_str(*id)),
            TokenKind::Punctuation(id) => write!(f, "{}", punctuation::as_str(*id)),
            TokenKind::Ident(name) => write!(f, "{name}"),
            TokenKind::Number(number) => write!(f, "{number}"),
            TokenKind::Str(parts) => {
                write!(f, "\"")?;
                for part in parts {
                    write!(f, "{part}")?;
                }
                write!(f, "\"")
            }
            TokenKind::Char(part) => write!(f, "'{part}'"),
            TokenKind::Exact(raw) => write!(f, "`{raw}`"),
            TokenKind::Eof => Ok(()),
        }
    }
}

/// A token with its kind, byte span, and the line/column of its first character.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    pub pos: Position,
}

impl Token {
    /// Construct a new token.
    pub fn new(kind: TokenKind, span: Span, pos: Position) -> Self {
        Self { kind, span, pos }
    }

    /// Whether `next` starts exactly where this token ends (no whitespace or comment between).
    pub fn is_adjacent_to(&self, next: &Token) -> bool {
        self.span.end == next.span.start
    }
}

/// Resolve an identifier spelling to a keyword id, if reserved.
pub fn keyword_id(name: &str) -> Option<KeywordId> {
    keywords::from_str(name)
}
