//! Shareable metadata for `elle_core::lang` registries.
//!
//! Every vocabulary table (keywords, operators, punctuation, directives) is a `const` slice of small `Copy`
//! structs. This submodule holds the metadata types reused across those tables.
//!
//! ## Notes
//! - Metadata is meant for tooling/docs/diagnostics; enforcement of syntax rules still lives in the lexer and
//!   parser.
//!
//! ## See also
//! - [`crate::lang::keywords`]
//! - [`crate::lang::operators`]
//! - [`crate::lang::directives`]

/// Describe the lifecycle status of a language vocabulary item.
///
/// ## Examples
/// ```rust
/// use elle_core::lang::registry::Stability;
///
/// let s = Stability::Stable;
/// assert_eq!(format!("{s:?}"), "Stable");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stability {
    Stable,
    Deprecated,
}

/// Represent a small example snippet for documentation.
///
/// ## Notes
/// - `code` is a complete Elle source snippet; the syntax crate's guardrail tests parse every registry example,
///   so examples cannot silently rot.
/// - `note` is an optional short explanation.
///
/// ## Examples
/// ```rust
/// use elle_core::lang::registry::Example;
///
/// let ex = Example {
///     code: "fn main() { return; }",
///     note: Some("Minimal function."),
/// };
/// assert!(ex.code.contains("fn"));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Example {
    pub code: &'static str,
    pub note: Option<&'static str>,
}
