#![forbid(unsafe_code)]
//! Elle language front-end
//!
//! Elle is a small, C-like language with manual memory management. This crate bundles the syntax
//! front-end (lexer, parser, AST, diagnostics, pretty-printer and module loading) behind one facade,
//! plus the `elle` debug driver (`lex`, `parse`, `fmt`, `deps`).
//!
//! ## Panic Policy
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` module enforces
//!   `#![deny(clippy::unwrap_used)]`.
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.
//!
//! ## Examples
//! ```rust
//! let output = elle::parse_source("fn main() { return 0; }");
//! assert!(!output.has_errors());
//! ```

pub mod cli;
pub mod version;

pub use elle_core::lang;
pub use elle_syntax::{ParseOutput, parse_source, parse_source_with};
pub use elle_syntax::{ast, diagnostics, lexer, loader, parser, printer, token_helpers};

pub use printer::{PrintConfig, check_formatted, format_diff, format_source};
