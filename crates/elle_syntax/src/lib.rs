//! Syntax frontend for the Elle language: lexer, parser, AST, diagnostics, printer and module loading.
//!
//! This crate turns one source buffer into a [`ast::Program`] plus an ordered list of diagnostics. It does no name
//! resolution or type checking; consumers traverse the tree and build their own structures.
//!
//! ## Notes
//! - Vocabulary identity (keywords/operators/punctuation/directives) comes from `elle_core::lang` registries.
//! - Parsing is synchronous and owns nothing beyond its input; independent sources can be parsed in parallel.
//!
//! ## Examples
//! ```rust
//! use elle_syntax::parse_source;
//!
//! let output = parse_source("const i32 LIMIT = 10;\nfn main() { return; }");
//! assert!(output.diagnostics.is_empty());
//! assert_eq!(output.program.declarations.len(), 2);
//! ```
//!
//! ## See also
//! - `elle_core::lang` for the registry-backed vocabulary tables.

pub mod ast;
pub mod diagnostics;
pub mod lexer;
pub mod loader;
pub mod parser;
pub mod printer;
mod stack;
pub mod token_helpers;

use ast::Program;
use diagnostics::CompileError;
use parser::ParseOptions;

/// Result of lexing and parsing one source buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseOutput {
    /// The (possibly partial) program. Declarations that failed to parse are absent.
    pub program: Program,
    /// Lexer diagnostics first, then parser diagnostics, each in source order of discovery.
    pub diagnostics: Vec<CompileError>,
}

impl ParseOutput {
    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}

/// Lex and parse `source` with default options, collecting every diagnostic.
pub fn parse_source(source: &str) -> ParseOutput {
    parse_source_with(source, ParseOptions::default())
}

/// Lex and parse `source`. Lexing always recovers; parsing recovers according to `options`.
#[tracing::instrument(skip_all, fields(len = source.len()))]
pub fn parse_source_with(source: &str, options: ParseOptions) -> ParseOutput {
    let lexed = lexer::lex_recovering(source);
    let (program, parse_errors) = parser::parse_partial(&lexed.tokens, options);

    let mut diagnostics = lexed.errors;
    diagnostics.extend(parse_errors);
    ParseOutput { program, diagnostics }
}
