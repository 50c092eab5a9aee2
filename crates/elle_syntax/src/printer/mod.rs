//! Elle pretty-printer
//!
//! Renders an AST back to canonical source:
//! - 4-space indentation (see [`PrintConfig`])
//! - one declaration per paragraph, `use`/`global`/`namespace` lines grouped
//! - binary expressions parenthesized only where precedence or associativity require it
//! - `Paren` nodes printed as written
//!
//! For a parsed tree, printing and re-parsing gives the same tree up to spans.
//!
//! ## Examples
//! ```rust
//! use elle_syntax::printer::{format_source, PrintConfig};
//!
//! let formatted = format_source("fn main(){return 1+2*3;}", &PrintConfig::default()).unwrap();
//! assert_eq!(formatted, "fn main() {\n    return 1 + 2 * 3;\n}\n");
//! ```

mod config;
mod render;
mod writer;

pub use config::PrintConfig;
pub use render::Printer;

use crate::ast::{Expr, Program, Type};
use crate::diagnostics::{CompileError, errors};
use crate::{lexer, parser};

/// Render a whole program.
pub fn print_program(program: &Program, config: &PrintConfig) -> String {
    Printer::new(config.clone()).print(program)
}

/// Render one expression with default settings.
pub fn print_expr(expr: &Expr) -> String {
    Printer::new(PrintConfig::default()).print_expr(expr)
}

/// Render one type.
pub fn print_type(ty: &Type) -> String {
    Printer::new(PrintConfig::default()).print_type(ty)
}

/// Lex, parse and re-print source.
///
/// Comments are not part of the tree, so a source containing any is refused rather than silently stripped.
///
/// ## Errors
/// Returns every lexer error, every parser error when the source does not parse, or one
/// [`FormatErrorKind::CommentNotPreserved`](crate::diagnostics::FormatErrorKind) error per comment.
pub fn format_source(source: &str, config: &PrintConfig) -> Result<String, Vec<CompileError>> {
    let lexed = lexer::lex_recovering(source);
    if !lexed.errors.is_empty() {
        return Err(lexed.errors);
    }
    if !lexed.comments.is_empty() {
        return Err(lexed.comments.iter().map(|span| errors::comment_not_preserved(*span)).collect());
    }
    let program = parser::parse(&lexed.tokens)?;
    Ok(print_program(&program, config))
}

/// Whether `source` is already in canonical form.
pub fn check_formatted(source: &str, config: &PrintConfig) -> Result<bool, Vec<CompileError>> {
    Ok(format_source(source, config)? == source)
}

/// Line-by-line diff between `source` and its canonical form, or `None` when nothing changes.
///
/// Each differing line is listed as `-NNNN | old` then `+NNNN | new` with 1-based line numbers.
pub fn format_diff(source: &str, config: &PrintConfig) -> Result<Option<String>, Vec<CompileError>> {
    let formatted = format_source(source, config)?;
    if formatted == source {
        return Ok(None);
    }

    let original: Vec<&str> = source.lines().collect();
    let canonical: Vec<&str> = formatted.lines().collect();
    let mut diff = String::new();
    for i in 0..original.len().max(canonical.len()) {
        let old = original.get(i).copied().unwrap_or("");
        let new = canonical.get(i).copied().unwrap_or("");
        if old == new {
            continue;
        }
        if !old.is_empty() {
            diff.push_str(&format!("-{:4} | {old}\n", i + 1));
        }
        if !new.is_empty() {
            diff.push_str(&format!("+{:4} | {new}\n", i + 1));
        }
    }
    Ok(Some(diff))
}
