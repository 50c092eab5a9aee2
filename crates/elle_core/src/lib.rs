//! Provide the canonical language vocabulary for the Elle front-end.
//!
//! This crate is intentionally small and dependency-free. It contains the fixed, process-wide tables the
//! lexer and parser consult: reserved keywords, operators with their precedence/associativity, punctuation,
//! and the closed set of `#directive` forms.
//!
//! ## Notes
//!
//! - This is a “vocabulary” crate: **no IO**, no global mutable state, and no syntax-tree types.
//! - Every table is a `const` slice, so concurrent parsers share it without synchronization.

#![forbid(unsafe_code)]

pub mod lang;
