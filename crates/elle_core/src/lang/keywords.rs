//! Define the reserved keyword vocabulary for the Elle language.
//!
//! This module is the single source of truth for reserved words: a stable identifier ([`KeywordId`]) plus a
//! const metadata table ([`KEYWORDS`]) that records canonical spellings and categories.
//!
//! ## Notes
//! - Lookup via [`from_str`] is **case-sensitive** (`FILE` is a keyword, `file` is an identifier).
//! - Keywords win over identifiers: the lexer classifies a word as a keyword whenever [`from_str`] matches.
//! - `fn` is both the function-declaration keyword and a primitive type (function pointer); see
//!   [`is_primitive_type`].
//!
//! ## Examples
//! ```rust
//! use elle_core::lang::keywords::{self, KeywordId};
//!
//! assert_eq!(keywords::from_str("i32"), Some(KeywordId::I32));
//! assert!(keywords::is_primitive_type(KeywordId::I32));
//! assert!(!keywords::is_primitive_type(KeywordId::Defer));
//! ```

use super::registry::{Example, Stability};

/// Stable identifier for every reserved keyword.
///
/// ## Notes
/// - Declaration order matches [`KEYWORDS`]; [`info_for`] relies on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordId {
    // Primitive types
    Void,
    Bool,
    Char,
    I8,
    I16,
    I32,
    I64,
    F32,
    F64,
    Fn,
    String,
    Any,
    File,

    // Bindings / declarations
    Let,
    Const,
    Struct,
    Use,
    Global,
    Namespace,

    // Visibility modifiers
    External,
    Pub,
    Local,

    // Control flow
    If,
    Else,
    While,
    For,
    In,
    Defer,
    Return,
    Break,
    Continue,

    // Literals
    True,
    False,
}

/// High-level grouping for documentation and tooling.
///
/// ## Notes
/// - Categories are metadata only; they do not enforce parsing context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordCategory {
    PrimitiveType,
    Declaration,
    Modifier,
    ControlFlow,
    Literal,
}

/// Metadata for a keyword.
#[derive(Debug, Clone, Copy)]
pub struct KeywordInfo {
    pub id: KeywordId,
    pub canonical: &'static str,
    pub category: KeywordCategory,
    /// `true` when the keyword can start a type (`i32`, `FILE`, `fn`, ...).
    pub is_type: bool,
    pub stability: Stability,
    pub examples: &'static [Example],
}

/// Registry of all reserved keywords, in [`KeywordId`] declaration order.
pub const KEYWORDS: &[KeywordInfo] = &[
    // Primitive types
    ty(KeywordId::Void, "void"),
    ty(KeywordId::Bool, "bool"),
    ty(KeywordId::Char, "char"),
    ty(KeywordId::I8, "i8"),
    ty(KeywordId::I16, "i16"),
    ty(KeywordId::I32, "i32"),
    ty(KeywordId::I64, "i64"),
    ty(KeywordId::F32, "f32"),
    ty(KeywordId::F64, "f64"),
    KeywordInfo {
        id: KeywordId::Fn,
        canonical: "fn",
        category: KeywordCategory::Declaration,
        is_type: true,
        stability: Stability::Stable,
        examples: &[
            Example {
                code: "fn add(i32 a, i32 b) -> i32 { return a + b; }",
                note: Some("Function definition."),
            },
            Example {
                code: "fn apply(fn f, i32 x) -> i32 { return f(x); }",
                note: Some("`fn` as a function-pointer type."),
            },
        ],
    },
    ty(KeywordId::String, "string"),
    ty(KeywordId::Any, "any"),
    ty(KeywordId::File, "FILE"),
    // Bindings / declarations
    info(KeywordId::Let, "let", KeywordCategory::Declaration),
    info(KeywordId::Const, "const", KeywordCategory::Declaration),
    info(KeywordId::Struct, "struct", KeywordCategory::Declaration),
    info(KeywordId::Use, "use", KeywordCategory::Declaration),
    info(KeywordId::Global, "global", KeywordCategory::Declaration),
    info(KeywordId::Namespace, "namespace", KeywordCategory::Declaration),
    // Visibility modifiers
    info(KeywordId::External, "external", KeywordCategory::Modifier),
    info(KeywordId::Pub, "pub", KeywordCategory::Modifier),
    info(KeywordId::Local, "local", KeywordCategory::Modifier),
    // Control flow
    info(KeywordId::If, "if", KeywordCategory::ControlFlow),
    info(KeywordId::Else, "else", KeywordCategory::ControlFlow),
    info(KeywordId::While, "while", KeywordCategory::ControlFlow),
    info(KeywordId::For, "for", KeywordCategory::ControlFlow),
    info(KeywordId::In, "in", KeywordCategory::ControlFlow),
    info(KeywordId::Defer, "defer", KeywordCategory::ControlFlow),
    info(KeywordId::Return, "return", KeywordCategory::ControlFlow),
    info(KeywordId::Break, "break", KeywordCategory::ControlFlow),
    info(KeywordId::Continue, "continue", KeywordCategory::ControlFlow),
    // Literals
    info(KeywordId::True, "true", KeywordCategory::Literal),
    info(KeywordId::False, "false", KeywordCategory::Literal),
];

/// Canonical spelling.
pub fn as_str(id: KeywordId) -> &'static str {
    info_for(id).canonical
}

/// Category.
pub fn category(id: KeywordId) -> KeywordCategory {
    info_for(id).category
}

/// Whether the keyword can begin a type expression.
pub fn is_primitive_type(id: KeywordId) -> bool {
    info_for(id).is_type
}

/// Full metadata.
///
/// ## Parameters
/// - `id`: Keyword identifier.
///
/// ## Returns
/// - The associated [`KeywordInfo`] from [`KEYWORDS`].
pub fn info_for(id: KeywordId) -> &'static KeywordInfo {
    &KEYWORDS[id as usize]
}

/// Lookup by spelling.
///
/// ## Returns
/// - `Some(KeywordId)` if the spelling is reserved.
/// - `None` otherwise.
pub fn from_str(s: &str) -> Option<KeywordId> {
    KEYWORDS.iter().find(|k| k.canonical == s).map(|k| k.id)
}

// --- helpers -----------------------------------------------------------------

const fn info(id: KeywordId, canonical: &'static str, category: KeywordCategory) -> KeywordInfo {
    KeywordInfo {
        id,
        canonical,
        category,
        is_type: false,
        stability: Stability::Stable,
        examples: &[],
    }
}

const fn ty(id: KeywordId, canonical: &'static str) -> KeywordInfo {
    KeywordInfo {
        id,
        canonical,
        category: KeywordCategory::PrimitiveType,
        is_type: true,
        stability: Stability::Stable,
        examples: &[],
    }
}
