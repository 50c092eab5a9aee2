//! Parser for the Elle programming language
//!
//! Converts a token stream into an AST. Expressions are parsed by precedence climbing over the
//! `elle_core::lang::operators` table; the ambiguous corners of the grammar (cast vs parenthesis, generic
//! call vs comparison, declaration vs expression statement) are resolved by bounded speculation with
//! checkpoint/restore, and adjacency-sensitive forms compare token source offsets.
//!
//! ## Examples
//!
//! ```rust
//! use elle_syntax::{lexer, parser};
//!
//! let source = "fn add(i32 a, i32 b) -> i32 { return a + b; }";
//! let tokens = lexer::lex(source).unwrap();
//! let ast = parser::parse(&tokens).unwrap();
//! assert_eq!(ast.declarations.len(), 1);
//! ```

use crate::ast::*;
use crate::diagnostics::{CompileError, ParseErrorKind, errors};
use crate::lexer::{Token, TokenKind};
use elle_core::lang::directives::{self, DirectiveId, Operand};
use elle_core::lang::keywords::{self, KeywordId};
use elle_core::lang::operators::{self, Associativity, OperatorId};
use elle_core::lang::punctuation::{self, PunctuationId};

// NOTE: This module is split across multiple files using `include!` to keep all parser
// methods in the same Rust module (preserving privacy + call patterns) while avoiding
// a single large source file.

include!("parser/core.rs");
include!("parser/helpers.rs");
include!("parser/decl.rs");
include!("parser/types.rs");
include!("parser/stmts.rs");
include!("parser/expr.rs");
include!("parser/util.rs");
include!("parser/api.rs");
include!("parser/tests.rs");
