/// Parser core types and entrypoint.
///
/// This chunk defines [`ParseOptions`], the [`Parser`] type and its top-level entrypoints.
///
/// ## Notes
/// - This file is `include!`'d into `crate::parser` to keep all parser methods in a
///   single module while avoiding a single “god file”.

/// Parser configuration.
///
/// ## Examples
/// ```rust
/// use elle_syntax::parser::ParseOptions;
///
/// let options = ParseOptions::new().with_max_depth(64).with_recovery(false);
/// assert_eq!(options.max_depth, 64);
/// assert!(!options.recover);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Maximum nesting of expressions, types and blocks before `TooDeep` is reported.
    pub max_depth: usize,
    /// Keep parsing after an error (resynchronizing at statement/declaration boundaries).
    pub recover: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_depth: 256,
            recover: true,
        }
    }
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_recovery(mut self, recover: bool) -> Self {
        self.recover = recover;
        self
    }
}

/// Saved parser position for speculative parses.
#[derive(Debug, Clone, Copy)]
struct Checkpoint {
    pos: usize,
    pending_gt: usize,
}

/// Parser state.
///
/// ## Notes
/// - The parser is single-pass; speculation is bounded to one construct (a type, a generic argument list,
///   an array type tag) and always restores on failure.
/// - Most parsing helpers are implemented on `Parser` but split across multiple files.
pub struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    errors: Vec<CompileError>,
    options: ParseOptions,
    depth: usize,
    /// Number of generic argument lists currently open.
    generic_depth: usize,
    /// `>` halves still owed after a `>>` closed a nested generic argument list.
    pending_gt: usize,
    /// Set while parsing `if`/`while`/`for` headers, where `Name {` opens the body.
    no_struct_literal: bool,
    /// Stand-in returned once the stream is exhausted (streams not ending in `Eof`).
    eof: Token,
}

impl<'a> Parser<'a> {
    /// Create a new parser for a token stream.
    ///
    /// ## Parameters
    /// - `tokens`: Token stream produced by `elle_syntax::lexer`.
    pub fn new(tokens: &'a [Token]) -> Self {
        let end = tokens.last().map(|t| t.span.end).unwrap_or(0);
        let pos = tokens.last().map(|t| t.pos).unwrap_or_default();
        Self {
            tokens,
            pos: 0,
            errors: Vec::new(),
            options: ParseOptions::default(),
            depth: 0,
            generic_depth: 0,
            pending_gt: 0,
            no_struct_literal: false,
            eof: Token::new(TokenKind::Eof, Span::new(end, end), pos),
        }
    }

    pub fn with_options(mut self, options: ParseOptions) -> Self {
        self.options = options;
        self
    }

    /// Parse the entire token stream into a [`Program`].
    ///
    /// ## Errors
    /// Returns every [`CompileError`] encountered. With recovery enabled the parser resynchronizes after each
    /// error to report multiple issues in one pass.
    pub fn parse(self) -> Result<Program, Vec<CompileError>> {
        let (program, errors) = self.parse_partial();
        if errors.is_empty() { Ok(program) } else { Err(errors) }
    }

    /// Parse as much as possible, returning the (possibly partial) program alongside all errors.
    pub fn parse_partial(mut self) -> (Program, Vec<CompileError>) {
        let mut declarations = Vec::new();

        while !self.is_at_end() {
            // Stray `;` between declarations (e.g. after a struct's `}`) is harmless.
            if self.match_punct(PunctuationId::Semicolon) {
                continue;
            }
            match self.declaration() {
                Ok(decl) => declarations.push(decl),
                Err(e) => {
                    self.errors.push(e);
                    if !self.options.recover {
                        break;
                    }
                    self.synchronize();
                }
            }
        }

        (Program { declarations }, self.errors)
    }
}
