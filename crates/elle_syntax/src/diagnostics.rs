//! Diagnostics and error reporting for Elle
//!
//! Every lexer and parser failure is a [`CompileError`]: a message, the offending span, a classified
//! [`ErrorKind`], and optional notes/hints. Errors implement [`miette::Diagnostic`] so front-ends can render them
//! against the source with [`report`].

use std::fmt;

use miette::{LabeledSpan, NamedSource, SourceSpan};

use crate::ast::{Position, Span};

/// Lexical error classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
pub enum LexErrorKind {
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("unterminated block comment")]
    UnterminatedComment,
    #[error("invalid escape sequence")]
    InvalidEscape,
    #[error("invalid numeric literal")]
    InvalidNumericLiteral,
    #[error("invalid character literal")]
    InvalidCharLiteral,
    #[error("unexpected character")]
    UnexpectedCharacter,
}

/// Syntactic error classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
pub enum ParseErrorKind {
    #[error("expected a type")]
    ExpectedType,
    #[error("expected an expression")]
    ExpectedExpression,
    #[error("expected an operand")]
    ExpectedOperand,
    #[error("expected token")]
    ExpectedToken,
    #[error("unbalanced delimiter")]
    UnbalancedDelimiter,
    #[error("unknown directive")]
    UnknownDirective,
    #[error("wrong number of elements")]
    InvalidArity,
    #[error("nesting too deep")]
    TooDeep,
    #[error("expected a declaration")]
    ExpectedDeclaration,
}

/// Reasons the printer refuses to rewrite a source that does parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
pub enum FormatErrorKind {
    #[error("comment would be dropped")]
    CommentNotPreserved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Lex(LexErrorKind),
    Parse(ParseErrorKind),
    Format(FormatErrorKind),
}

impl ErrorKind {
    /// Stable diagnostic code, e.g. `elle::parse::expected_type`.
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::Lex(kind) => match kind {
                LexErrorKind::UnterminatedString => "elle::lex::unterminated_string",
                LexErrorKind::UnterminatedComment => "elle::lex::unterminated_comment",
                LexErrorKind::InvalidEscape => "elle::lex::invalid_escape",
                LexErrorKind::InvalidNumericLiteral => "elle::lex::invalid_number",
                LexErrorKind::InvalidCharLiteral => "elle::lex::invalid_char",
                LexErrorKind::UnexpectedCharacter => "elle::lex::unexpected_character",
            },
            ErrorKind::Parse(kind) => match kind {
                ParseErrorKind::ExpectedType => "elle::parse::expected_type",
                ParseErrorKind::ExpectedExpression => "elle::parse::expected_expression",
                ParseErrorKind::ExpectedOperand => "elle::parse::expected_operand",
                ParseErrorKind::ExpectedToken => "elle::parse::expected_token",
                ParseErrorKind::UnbalancedDelimiter => "elle::parse::unbalanced_delimiter",
                ParseErrorKind::UnknownDirective => "elle::parse::unknown_directive",
                ParseErrorKind::InvalidArity => "elle::parse::invalid_arity",
                ParseErrorKind::TooDeep => "elle::parse::too_deep",
                ParseErrorKind::ExpectedDeclaration => "elle::parse::expected_declaration",
            },
            ErrorKind::Format(kind) => match kind {
                FormatErrorKind::CommentNotPreserved => "elle::fmt::comment_not_preserved",
            },
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Lex(kind) => write!(f, "{kind}"),
            ErrorKind::Parse(kind) => write!(f, "{kind}"),
            ErrorKind::Format(kind) => write!(f, "{kind}"),
        }
    }
}

/// A compile-time error with location information
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message}")]
pub struct CompileError {
    pub message: String,
    pub span: Span,
    pub kind: ErrorKind,
    pub notes: Vec<String>,
    pub hints: Vec<String>,
}

impl CompileError {
    pub fn lex(kind: LexErrorKind, message: impl Into<String>, span: Span) -> Self {
        Self::with_kind(ErrorKind::Lex(kind), message, span)
    }

    pub fn parse(kind: ParseErrorKind, message: impl Into<String>, span: Span) -> Self {
        Self::with_kind(ErrorKind::Parse(kind), message, span)
    }

    pub fn format(kind: FormatErrorKind, message: impl Into<String>, span: Span) -> Self {
        Self::with_kind(ErrorKind::Format(kind), message, span)
    }

    fn with_kind(kind: ErrorKind, message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
            kind,
            notes: Vec::new(),
            hints: Vec::new(),
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hints.push(hint.into());
        self
    }

    pub fn is_lex(&self) -> bool {
        matches!(self.kind, ErrorKind::Lex(_))
    }

    pub fn parse_kind(&self) -> Option<ParseErrorKind> {
        match self.kind {
            ErrorKind::Parse(kind) => Some(kind),
            ErrorKind::Lex(_) | ErrorKind::Format(_) => None,
        }
    }

    pub fn lex_kind(&self) -> Option<LexErrorKind> {
        match self.kind {
            ErrorKind::Lex(kind) => Some(kind),
            ErrorKind::Parse(_) | ErrorKind::Format(_) => None,
        }
    }

    pub fn format_kind(&self) -> Option<FormatErrorKind> {
        match self.kind {
            ErrorKind::Format(kind) => Some(kind),
            ErrorKind::Lex(_) | ErrorKind::Parse(_) => None,
        }
    }
}

impl miette::Diagnostic for CompileError {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(self.kind.code()))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        if self.notes.is_empty() && self.hints.is_empty() {
            return None;
        }
        let lines: Vec<String> = self
            .notes
            .iter()
            .map(|n| format!("note: {n}"))
            .chain(self.hints.iter().cloned())
            .collect();
        Some(Box::new(lines.join("\n")))
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let span = SourceSpan::new(self.span.start.into(), self.span.len());
        Some(Box::new(std::iter::once(LabeledSpan::new_with_span(
            Some(self.kind.to_string()),
            span,
        ))))
    }
}

/// Attach the named source to an error so it renders with a highlighted snippet.
pub fn report(error: &CompileError, file_name: &str, source: &str) -> miette::Report {
    miette::Report::new(error.clone()).with_source_code(NamedSource::new(file_name, source.to_string()))
}

// ============================================================================
// Line/column lookup
// ============================================================================

/// Offsets of every line start, for turning byte offsets into [`Position`]s.
#[derive(Debug, Clone)]
pub struct LineIndex {
    line_starts: Vec<usize>,
    source_len: usize,
}

impl LineIndex {
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(source.match_indices('\n').map(|(i, _)| i + 1));
        Self {
            line_starts,
            source_len: source.len(),
        }
    }

    /// Position of `offset`; offsets past the end clamp to the last position.
    pub fn position(&self, source: &str, offset: usize) -> Position {
        let offset = offset.min(self.source_len);
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        };
        let line_start = self.line_starts[line];
        let column = source
            .get(line_start..offset)
            .map(|prefix| prefix.chars().count())
            .unwrap_or(offset - line_start);
        Position {
            line: line as u32 + 1,
            column: column as u32 + 1,
        }
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}

// ============================================================================
// Error catalog
// ============================================================================

/// Constructors for the errors the parser raises in more than one place.
pub mod errors {
    use super::*;

    pub fn expected_token(expected: &str, found: &str, span: Span) -> CompileError {
        CompileError::parse(
            ParseErrorKind::ExpectedToken,
            format!("expected {expected}, found {found}"),
            span,
        )
    }

    pub fn expected_expression(found: &str, span: Span) -> CompileError {
        CompileError::parse(
            ParseErrorKind::ExpectedExpression,
            format!("expected expression, found {found}"),
            span,
        )
    }

    pub fn expected_operand(after: &str, found: &str, span: Span) -> CompileError {
        CompileError::parse(
            ParseErrorKind::ExpectedOperand,
            format!("expected operand after {after}, found {found}"),
            span,
        )
    }

    pub fn expected_type(found: &str, span: Span) -> CompileError {
        CompileError::parse(ParseErrorKind::ExpectedType, format!("expected type, found {found}"), span)
            .with_hint("types are primitives (`i32`, `string`, `fn`, ...), names, `T*`, `T[]`, `Name<T>` or `(T, U)`")
    }

    pub fn unclosed(open: &str, open_span: Span, found: &str, span: Span) -> CompileError {
        CompileError::parse(
            ParseErrorKind::UnbalancedDelimiter,
            format!("unclosed `{open}`, found {found}"),
            span,
        )
        .with_note(format!("delimiter opened at offset {}", open_span.start))
    }

    pub fn unknown_directive(name: &str, span: Span) -> CompileError {
        CompileError::parse(ParseErrorKind::UnknownDirective, format!("unknown directive `#{name}`"), span)
            .with_hint("known directives: #len, #size, #i, #env, #alloc, #realloc, #free, #set_allocator, #reset_allocator")
    }

    pub fn too_deep(limit: usize, span: Span) -> CompileError {
        CompileError::parse(ParseErrorKind::TooDeep, format!("nesting exceeds the limit of {limit}"), span)
    }

    pub fn comment_not_preserved(span: Span) -> CompileError {
        CompileError::format(
            FormatErrorKind::CommentNotPreserved,
            "cannot format a file with comments: the formatter does not keep them",
            span,
        )
        .with_hint("remove or relocate the comment, or format a copy without comments")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_index_positions() {
        let source = "ab\ncd\n\nxé";
        let index = LineIndex::new(source);
        assert_eq!(index.line_count(), 4);
        assert_eq!(index.position(source, 0), Position { line: 1, column: 1 });
        assert_eq!(index.position(source, 3), Position { line: 2, column: 1 });
        assert_eq!(index.position(source, 4), Position { line: 2, column: 2 });
        assert_eq!(index.position(source, 6), Position { line: 3, column: 1 });
        assert_eq!(index.position(source, source.len()), Position { line: 4, column: 3 });
    }

    #[test]
    fn test_diagnostic_codes_and_help() {
        use miette::Diagnostic;

        let err = errors::expected_token("`;`", "`}`", Span::new(4, 5)).with_hint("add a semicolon");
        assert_eq!(err.to_string(), "expected `;`, found `}`");
        assert_eq!(
            err.code().map(|c| c.to_string()).as_deref(),
            Some("elle::parse::expected_token")
        );
        assert_eq!(err.help().map(|h| h.to_string()).as_deref(), Some("add a semicolon"));
        let labels: Vec<LabeledSpan> = err.labels().into_iter().flatten().collect();
        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].offset(), 4);
        assert_eq!(labels[0].len(), 1);
    }

    #[test]
    fn test_format_errors_have_their_own_code() {
        use miette::Diagnostic;

        let err = errors::comment_not_preserved(Span::new(0, 5));
        assert_eq!(err.format_kind(), Some(FormatErrorKind::CommentNotPreserved));
        assert_eq!(err.parse_kind(), None);
        assert!(!err.is_lex());
        assert_eq!(
            err.code().map(|c| c.to_string()).as_deref(),
            Some("elle::fmt::comment_not_preserved")
        );
    }
}
