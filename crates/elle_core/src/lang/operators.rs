//! Operator vocabulary.
//!
//! This module defines the canonical operator set along with the metadata the expression parser climbs:
//! binary precedence, associativity, fixity, and whether the spelling may also open a prefix expression.
//!
//! ## Notes
//! - `precedence` is only meaningful for [`Fixity::Infix`] entries; higher binds tighter. Binary levels run from
//!   `||` (1) to the range operators (12). The conditional `?:` is not an operator token and sits below level 1.
//! - Assignment operators never appear inside expressions; the statement parser consumes them.
//!
//! ## Examples
//! ```rust
//! use elle_core::lang::operators::{self, Associativity, OperatorId};
//!
//! assert_eq!(operators::from_str("<>"), Some(OperatorId::Concat));
//! let plus = operators::info_for(OperatorId::Plus);
//! let star = operators::info_for(OperatorId::Star);
//! assert!(star.precedence > plus.precedence);
//! assert_eq!(operators::info_for(OperatorId::DotDot).associativity, Associativity::Right);
//! ```

use super::registry::{Example, Stability};

/// Define how operators associate when chained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Associativity {
    Left,
    Right,
    None,
}

/// Define the syntactic role of an operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fixity {
    /// Binary operator inside expressions.
    Infix,
    /// Prefix-only operator (`!`, `~`).
    Prefix,
    /// Statement-level assignment (`=`, `+=`, ..., `:=`).
    Assignment,
}

/// Stable identifier for every operator.
///
/// ## Notes
/// - Declaration order matches [`OPERATORS`]; [`info_for`] relies on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorId {
    // Logical
    OrOr,
    AndAnd,

    // Concatenation
    Concat,

    // Bitwise
    Pipe,
    Caret,
    Amp,

    // Comparison
    EqEq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,

    // Shift
    Shl,
    Shr,

    // Arithmetic
    Plus,
    Minus,
    Star,
    Slash,
    Percent,

    // Ranges
    DotDot,
    DotDotEq,

    // Prefix-only
    Bang,
    Tilde,

    // Assignment
    Eq,
    PlusEq,
    MinusEq,
    StarEq,
    SlashEq,
    PercentEq,
    AmpEq,
    PipeEq,
    CaretEq,
    ShlEq,
    ShrEq,
    ConcatEq,
    ColonEq,
}

/// Metadata for an operator.
#[derive(Debug, Clone, Copy)]
pub struct OperatorInfo {
    pub id: OperatorId,
    pub spelling: &'static str,
    pub precedence: u8,
    pub associativity: Associativity,
    pub fixity: Fixity,
    /// `true` when the spelling can also open a unary expression (`-x`, `*p`, `&v`, `+n`).
    pub is_prefix: bool,
    pub stability: Stability,
    pub examples: &'static [Example],
}

/// Registry of all operators, in [`OperatorId`] declaration order.
pub const OPERATORS: &[OperatorInfo] = &[
    // Logical
    infix(OperatorId::OrOr, "||", 1),
    infix(OperatorId::AndAnd, "&&", 2),
    // Concatenation
    infix(OperatorId::Concat, "<>", 3),
    // Bitwise
    infix(OperatorId::Pipe, "|", 4),
    infix(OperatorId::Caret, "^", 5),
    infix_prefix(OperatorId::Amp, "&", 6),
    // Comparison
    infix(OperatorId::EqEq, "==", 7),
    infix(OperatorId::NotEq, "!=", 7),
    infix(OperatorId::Lt, "<", 8),
    infix(OperatorId::LtEq, "<=", 8),
    infix(OperatorId::Gt, ">", 8),
    infix(OperatorId::GtEq, ">=", 8),
    // Shift
    infix(OperatorId::Shl, "<<", 9),
    infix(OperatorId::Shr, ">>", 9),
    // Arithmetic
    infix_prefix(OperatorId::Plus, "+", 10),
    infix_prefix(OperatorId::Minus, "-", 10),
    infix_prefix(OperatorId::Star, "*", 11),
    infix(OperatorId::Slash, "/", 11),
    infix(OperatorId::Percent, "%", 11),
    // Ranges
    OperatorInfo {
        id: OperatorId::DotDot,
        spelling: "..",
        precedence: 12,
        associativity: Associativity::Right,
        fixity: Fixity::Infix,
        is_prefix: false,
        stability: Stability::Stable,
        examples: &[Example {
            code: "fn main() { for i in 0..10 { } }",
            note: Some("Exclusive range."),
        }],
    },
    OperatorInfo {
        id: OperatorId::DotDotEq,
        spelling: "..=",
        precedence: 12,
        associativity: Associativity::Right,
        fixity: Fixity::Infix,
        is_prefix: false,
        stability: Stability::Stable,
        examples: &[Example {
            code: "fn main() { for i in 1..=10 { } }",
            note: Some("Inclusive range."),
        }],
    },
    // Prefix-only
    prefix(OperatorId::Bang, "!"),
    prefix(OperatorId::Tilde, "~"),
    // Assignment
    assign(OperatorId::Eq, "="),
    assign(OperatorId::PlusEq, "+="),
    assign(OperatorId::MinusEq, "-="),
    assign(OperatorId::StarEq, "*="),
    assign(OperatorId::SlashEq, "/="),
    assign(OperatorId::PercentEq, "%="),
    assign(OperatorId::AmpEq, "&="),
    assign(OperatorId::PipeEq, "|="),
    assign(OperatorId::CaretEq, "^="),
    assign(OperatorId::ShlEq, "<<="),
    assign(OperatorId::ShrEq, ">>="),
    assign(OperatorId::ConcatEq, "<>="),
    assign(OperatorId::ColonEq, ":="),
];

/// Return the full metadata entry for an operator.
pub fn info_for(id: OperatorId) -> &'static OperatorInfo {
    &OPERATORS[id as usize]
}

/// Return the canonical spelling for an operator.
pub fn as_str(id: OperatorId) -> &'static str {
    info_for(id).spelling
}

/// Resolve an operator spelling to its identifier.
///
/// ## Notes
/// - Matching is exact; the lexer is responsible for longest-match tokenization.
pub fn from_str(spelling: &str) -> Option<OperatorId> {
    OPERATORS.iter().find(|o| o.spelling == spelling).map(|o| o.id)
}

/// Binding power of a binary operator.
///
/// ## Returns
/// - `Some((precedence, associativity))` for infix operators.
/// - `None` for prefix-only and assignment operators.
pub fn binary_power(id: OperatorId) -> Option<(u8, Associativity)> {
    let info = info_for(id);
    match info.fixity {
        Fixity::Infix => Some((info.precedence, info.associativity)),
        Fixity::Prefix | Fixity::Assignment => None,
    }
}

/// Whether the operator can open a unary expression.
pub fn is_unary(id: OperatorId) -> bool {
    let info = info_for(id);
    info.is_prefix || info.fixity == Fixity::Prefix
}

/// Whether the operator is a statement-level assignment operator.
///
/// ## Notes
/// - `:=` is excluded: it introduces a binding, it does not assign to an existing place.
pub fn is_assignment(id: OperatorId) -> bool {
    info_for(id).fixity == Fixity::Assignment && id != OperatorId::ColonEq
}

// --- helpers -----------------------------------------------------------------

const fn infix(id: OperatorId, spelling: &'static str, precedence: u8) -> OperatorInfo {
    OperatorInfo {
        id,
        spelling,
        precedence,
        associativity: Associativity::Left,
        fixity: Fixity::Infix,
        is_prefix: false,
        stability: Stability::Stable,
        examples: &[],
    }
}

const fn infix_prefix(id: OperatorId, spelling: &'static str, precedence: u8) -> OperatorInfo {
    OperatorInfo {
        is_prefix: true,
        ..infix(id, spelling, precedence)
    }
}

const fn prefix(id: OperatorId, spelling: &'static str) -> OperatorInfo {
    OperatorInfo {
        id,
        spelling,
        precedence: 0,
        associativity: Associativity::Right,
        fixity: Fixity::Prefix,
        is_prefix: true,
        stability: Stability::Stable,
        examples: &[],
    }
}

const fn assign(id: OperatorId, spelling: &'static str) -> OperatorInfo {
    OperatorInfo {
        id,
        spelling,
        precedence: 0,
        associativity: Associativity::Right,
        fixity: Fixity::Assignment,
        is_prefix: false,
        stability: Stability::Stable,
        examples: &[],
    }
}
