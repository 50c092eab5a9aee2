/// Parse a token stream into an AST [`Program`].
///
/// This is the main public entrypoint for parsing.
///
/// ## Parameters
/// - `tokens`: Token stream produced by `elle_syntax::lexer`.
///
/// ## Errors
/// Returns `Err(Vec<CompileError>)` if parsing fails.
#[tracing::instrument(skip_all, fields(token_count = tokens.len()))]
pub fn parse(tokens: &[Token]) -> Result<Program, Vec<CompileError>> {
    Parser::new(tokens).parse()
}

/// Parse with explicit [`ParseOptions`] (depth limit, recovery).
#[tracing::instrument(skip_all, fields(token_count = tokens.len(), max_depth = options.max_depth))]
pub fn parse_with(tokens: &[Token], options: ParseOptions) -> Result<Program, Vec<CompileError>> {
    Parser::new(tokens).with_options(options).parse()
}

/// Parse as far as possible, returning the partial program together with every error.
pub fn parse_partial(tokens: &[Token], options: ParseOptions) -> (Program, Vec<CompileError>) {
    Parser::new(tokens).with_options(options).parse_partial()
}
