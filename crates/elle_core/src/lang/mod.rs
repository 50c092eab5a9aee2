//! Elle language vocabulary registries.
//!
//! This module is the “front door” for language-level vocabulary: reserved keywords, operators,
//! punctuation, and compiler directives.
//!
//! Callers work with **stable IDs** (e.g. `KeywordId`, `OperatorId`) and look up spellings/metadata via
//! registry tables instead of comparing strings all over the lexer and parser.
//!
//! ## Notes
//! - Registries are **pure**: no AST types, no IO, no side effects.
//! - The lexer/parser enforce syntax; registries provide spellings and metadata (precedence, operand
//!   shapes) for shared use by the parser, the printer, and diagnostics.
//!
//! ## Examples
//! ```rust
//! use elle_core::lang::keywords::{self, KeywordId};
//!
//! assert_eq!(keywords::from_str("defer"), Some(KeywordId::Defer));
//! assert_eq!(keywords::as_str(KeywordId::Defer), "defer");
//! ```

pub mod directives;
pub mod keywords;
pub mod operators;
pub mod punctuation;
pub mod registry;
