//! Compiler directive vocabulary.
//!
//! Directives are the `#name(...)` expressions the parser recognizes (`#len(xs)`, `#size(i32)`, `#env`, ...).
//! The set is **closed**: a name outside [`DIRECTIVES`] is a syntax error, never an ordinary call.
//!
//! Each entry records the directive's operand shape so the parser can read operands generically: which
//! positions hold a type, an expression, or a bare identifier, and which trailing operand is optional.
//!
//! ## Examples
//! ```rust
//! use elle_core::lang::directives::{self, DirectiveId, Operand};
//!
//! assert_eq!(directives::from_str("size"), Some(DirectiveId::Size));
//! assert_eq!(directives::info_for(DirectiveId::Size).operands, &[Operand::Type]);
//! assert!(!directives::info_for(DirectiveId::Env).parenthesized);
//! assert_eq!(directives::from_str("sizeof"), None);
//! ```

use super::registry::Example;

/// Stable identifier for every directive.
///
/// ## Notes
/// - Declaration order matches [`DIRECTIVES`]; [`info_for`] relies on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DirectiveId {
    Len,
    Size,
    I,
    Env,
    Alloc,
    Realloc,
    Free,
    SetAllocator,
    ResetAllocator,
}

/// One operand slot in a directive's argument list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operand {
    Expr,
    Type,
    Ident,
    /// A trailing `, expr` that may be omitted.
    OptionalExpr,
}

/// Metadata for a directive.
#[derive(Debug, Clone, Copy)]
pub struct DirectiveInfo {
    pub id: DirectiveId,
    pub name: &'static str,
    /// `false` only for `#env`, which is written without an argument list.
    pub parenthesized: bool,
    pub operands: &'static [Operand],
    pub description: &'static str,
    pub examples: &'static [Example],
}

/// Registry of all directives, in [`DirectiveId`] declaration order.
pub const DIRECTIVES: &[DirectiveInfo] = &[
    DirectiveInfo {
        id: DirectiveId::Len,
        name: "len",
        parenthesized: true,
        operands: &[Operand::Expr],
        description: "Element count of an array value.",
        examples: &[ex("fn main() { i64 n = #len(xs); }")],
    },
    DirectiveInfo {
        id: DirectiveId::Size,
        name: "size",
        parenthesized: true,
        operands: &[Operand::Type],
        description: "Byte size of a type.",
        examples: &[ex("fn main() { i64 n = #size(i32*); }")],
    },
    DirectiveInfo {
        id: DirectiveId::I,
        name: "i",
        parenthesized: true,
        operands: &[Operand::Ident],
        description: "Refer to an identifier by name without evaluating it.",
        examples: &[ex("fn main() { string s = #i(counter); }")],
    },
    DirectiveInfo {
        id: DirectiveId::Env,
        name: "env",
        parenthesized: false,
        operands: &[],
        description: "The ambient environment value.",
        examples: &[ex("fn main() { let e = #env; }")],
    },
    DirectiveInfo {
        id: DirectiveId::Alloc,
        name: "alloc",
        parenthesized: true,
        operands: &[Operand::Type, Operand::OptionalExpr],
        description: "Allocate one or `count` values of a type.",
        examples: &[ex("fn main() { i32 *p = #alloc(i32, 16); }")],
    },
    DirectiveInfo {
        id: DirectiveId::Realloc,
        name: "realloc",
        parenthesized: true,
        operands: &[Operand::Expr, Operand::Type, Operand::OptionalExpr],
        description: "Resize an allocation.",
        examples: &[ex("fn main() { p = #realloc(p, i32, 32); }")],
    },
    DirectiveInfo {
        id: DirectiveId::Free,
        name: "free",
        parenthesized: true,
        operands: &[Operand::Expr],
        description: "Release an allocation.",
        examples: &[ex("fn main() { defer #free(p); }")],
    },
    DirectiveInfo {
        id: DirectiveId::SetAllocator,
        name: "set_allocator",
        parenthesized: true,
        operands: &[Operand::Expr],
        description: "Install an allocator for subsequent `#alloc` calls.",
        examples: &[ex("fn main() { #set_allocator(arena); }")],
    },
    DirectiveInfo {
        id: DirectiveId::ResetAllocator,
        name: "reset_allocator",
        parenthesized: true,
        operands: &[],
        description: "Restore the default allocator.",
        examples: &[ex("fn main() { #reset_allocator(); }")],
    },
];

/// Return the full metadata entry for a directive.
pub fn info_for(id: DirectiveId) -> &'static DirectiveInfo {
    &DIRECTIVES[id as usize]
}

/// Return the spelling of a directive (without the leading `#`).
pub fn as_str(id: DirectiveId) -> &'static str {
    info_for(id).name
}

/// Resolve a directive name (without the leading `#`).
pub fn from_str(name: &str) -> Option<DirectiveId> {
    DIRECTIVES.iter().find(|d| d.name == name).map(|d| d.id)
}

/// Render the operand shape for diagnostics, e.g. `#alloc(type[, expr])`.
pub fn signature(id: DirectiveId) -> String {
    let info = info_for(id);
    if !info.parenthesized {
        return format!("#{}", info.name);
    }
    let mut out = format!("#{}(", info.name);
    for (i, operand) in info.operands.iter().enumerate() {
        let part = match operand {
            Operand::Expr => "expr",
            Operand::Type => "type",
            Operand::Ident => "identifier",
            Operand::OptionalExpr => {
                out.push_str("[, expr]");
                continue;
            }
        };
        if i > 0 {
            out.push_str(", ");
        }
        out.push_str(part);
    }
    out.push(')');
    out
}

const fn ex(code: &'static str) -> Example {
    Example { code, note: None }
}
