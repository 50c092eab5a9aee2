//! Abstract Syntax Tree definitions for Elle
//!
//! Every node family (declarations, types, statements, expressions) is a closed enum. Nodes own their
//! children exclusively; the only shared data is [`Span`], which is `Copy`.

use std::fmt;

use elle_core::lang::directives::DirectiveId;
use elle_core::lang::keywords::{self, KeywordId};
use elle_core::lang::operators::{self, OperatorId};

/// Source location span (byte offsets)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// 1-based line/column of a source offset. Columns count chars, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Default for Position {
    fn default() -> Self {
        Self { line: 1, column: 1 }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A node with source location
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    pub node: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(node: T, span: Span) -> Self {
        Self { node, span }
    }
}

pub type Ident = String;

/// A parsed translation unit: top-level declarations in source order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub declarations: Vec<Spanned<Declaration>>,
}

impl Program {
    /// Module paths named by `use` declarations, in source order.
    pub fn imports(&self) -> impl Iterator<Item = &ModulePath> {
        self.declarations.iter().filter_map(|d| match &d.node {
            Declaration::Import(import) => Some(&import.path),
            _ => None,
        })
    }

    /// A copy of the tree with every span reset to `Span::default()`.
    ///
    /// Two trees parsed from differently formatted sources compare equal after this.
    pub fn without_spans(&self) -> Program {
        let mut program = self.clone();
        SpanEraser.visit_program(&mut program);
        program
    }
}

/// Top-level declarations
#[derive(Debug, Clone, PartialEq)]
pub enum Declaration {
    Import(ImportDecl),
    Global(GlobalDirective),
    Namespace(Ident),
    Function(FunctionDecl),
    /// Always bodiless (`external fn puts(string) -> i32;`).
    ExternalFunction(FunctionDecl),
    Constant(ConstDecl),
    Struct(StructDecl),
}

// ============================================================================
// Imports and file-level directives
// ============================================================================

/// Slash-separated module path from `use a/b/c;`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModulePath(pub Vec<Ident>);

impl ModulePath {
    pub fn segments(&self) -> &[Ident] {
        &self.0
    }
}

impl fmt::Display for ModulePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("/"))
    }
}

/// `"a/b/c"` splits on `/`; empty segments are dropped.
impl From<&str> for ModulePath {
    fn from(path: &str) -> Self {
        ModulePath(path.split('/').filter(|s| !s.is_empty()).map(str::to_string).collect())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImportDecl {
    pub path: ModulePath,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GlobalOption {
    Pub,
    External,
}

impl GlobalOption {
    pub fn keyword(self) -> KeywordId {
        match self {
            GlobalOption::Pub => KeywordId::Pub,
            GlobalOption::External => KeywordId::External,
        }
    }
}

/// `global pub, external;`: file-wide default visibility.
#[derive(Debug, Clone, PartialEq)]
pub struct GlobalDirective {
    pub options: Vec<GlobalOption>,
}

// ============================================================================
// Visibility modifiers
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VisibilityKind {
    Pub,
    Local,
    External,
}

impl VisibilityKind {
    pub fn from_keyword(id: KeywordId) -> Option<Self> {
        match id {
            KeywordId::Pub => Some(VisibilityKind::Pub),
            KeywordId::Local => Some(VisibilityKind::Local),
            KeywordId::External => Some(VisibilityKind::External),
            _ => None,
        }
    }

    pub fn keyword(self) -> KeywordId {
        match self {
            VisibilityKind::Pub => KeywordId::Pub,
            VisibilityKind::Local => KeywordId::Local,
            VisibilityKind::External => KeywordId::External,
        }
    }
}

/// One modifier as written, e.g. `pub` or `!external`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Modifier {
    pub kind: VisibilityKind,
    pub negated: bool,
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negated {
            write!(f, "!")?;
        }
        write!(f, "{}", keywords::as_str(self.kind.keyword()))
    }
}

/// Modifier sequence in source order. Contradictions (`pub !pub`) are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Modifiers(pub Vec<Modifier>);

impl Modifiers {
    /// Polarity of the last occurrence of `kind`, if any.
    pub fn get(&self, kind: VisibilityKind) -> Option<bool> {
        self.0.iter().rev().find(|m| m.kind == kind).map(|m| !m.negated)
    }

    pub fn is_pub(&self) -> bool {
        self.get(VisibilityKind::Pub) == Some(true)
    }

    pub fn is_local(&self) -> bool {
        self.get(VisibilityKind::Local) == Some(true)
    }

    pub fn is_external(&self) -> bool {
        self.get(VisibilityKind::External) == Some(true)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// ============================================================================
// Functions
// ============================================================================

/// Name of a function declaration.
#[derive(Debug, Clone, PartialEq)]
pub enum DeclName {
    Plain(Ident),
    /// `Type::method`
    Qualified(Vec<Ident>),
    /// `` `raw name` ``, a name that is not a valid identifier.
    Exact(String),
}

impl fmt::Display for DeclName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeclName::Plain(name) => write!(f, "{name}"),
            DeclName::Qualified(path) => write!(f, "{}", path.join("::")),
            DeclName::Exact(raw) => write!(f, "`{raw}`"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    pub modifiers: Modifiers,
    pub name: Spanned<DeclName>,
    pub generics: Vec<Ident>,
    pub params: ParamList,
    pub attributes: Vec<Spanned<Attribute>>,
    pub return_type: Option<Spanned<Type>>,
    pub body: Option<Spanned<Block>>,
}

/// Parameter list, optionally led by a meta-binding marker (`ElleMeta meta, ...`).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParamList {
    pub meta: Option<Ident>,
    pub params: Vec<Spanned<Param>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Param {
    Named { ty: Spanned<Type>, name: Ident },
    /// Prototype form: type only.
    Unnamed { ty: Spanned<Type> },
    /// `...` or `...rest`
    Variadic { name: Option<Ident> },
    /// `@nofmt Type name`
    NoFormat { ty: Spanned<Type>, name: Ident },
}

/// `@name` or `@name(args)` after a parameter list or struct header.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub name: Ident,
    pub args: Option<Vec<Spanned<Expr>>>,
}

// ============================================================================
// Constants and structs
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ConstDecl {
    pub modifiers: Modifiers,
    pub ty: Option<Spanned<Type>>,
    pub name: Ident,
    pub value: Spanned<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StructDecl {
    pub modifiers: Modifiers,
    pub name: Ident,
    pub generics: Vec<Ident>,
    pub attributes: Vec<Spanned<Attribute>>,
    pub fields: Vec<Spanned<Field>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub ty: Spanned<Type>,
    pub name: Ident,
}

// ============================================================================
// Types
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
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
}

impl PrimitiveType {
    pub fn from_keyword(id: KeywordId) -> Option<Self> {
        let ty = match id {
            KeywordId::Void => PrimitiveType::Void,
            KeywordId::Bool => PrimitiveType::Bool,
            KeywordId::Char => PrimitiveType::Char,
            KeywordId::I8 => PrimitiveType::I8,
            KeywordId::I16 => PrimitiveType::I16,
            KeywordId::I32 => PrimitiveType::I32,
            KeywordId::I64 => PrimitiveType::I64,
            KeywordId::F32 => PrimitiveType::F32,
            KeywordId::F64 => PrimitiveType::F64,
            KeywordId::Fn => PrimitiveType::Fn,
            KeywordId::String => PrimitiveType::String,
            KeywordId::Any => PrimitiveType::Any,
            KeywordId::File => PrimitiveType::File,
            _ => return None,
        };
        Some(ty)
    }

    pub fn keyword(self) -> KeywordId {
        match self {
            PrimitiveType::Void => KeywordId::Void,
            PrimitiveType::Bool => KeywordId::Bool,
            PrimitiveType::Char => KeywordId::Char,
            PrimitiveType::I8 => KeywordId::I8,
            PrimitiveType::I16 => KeywordId::I16,
            PrimitiveType::I32 => KeywordId::I32,
            PrimitiveType::I64 => KeywordId::I64,
            PrimitiveType::F32 => KeywordId::F32,
            PrimitiveType::F64 => KeywordId::F64,
            PrimitiveType::Fn => KeywordId::Fn,
            PrimitiveType::String => KeywordId::String,
            PrimitiveType::Any => KeywordId::Any,
            PrimitiveType::File => KeywordId::File,
        }
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", keywords::as_str(self.keyword()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    Primitive(PrimitiveType),
    Named(Ident),
    /// `T[]`, `T[][]`, ... (`dims >= 1`)
    Array { element: Box<Spanned<Type>>, dims: usize },
    /// `T*`, `T**`, ... (`depth >= 1`)
    Pointer { base: Box<Spanned<Type>>, depth: usize },
    /// `Name<T, U>`
    Generic { name: Ident, args: Vec<Spanned<Type>> },
    /// `(T, U)`
    Tuple(Box<Spanned<Type>>, Box<Spanned<Type>>),
}

// ============================================================================
// Statements
// ============================================================================

/// A braced statement sequence.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Block {
    pub statements: Vec<Spanned<Statement>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Expr(Spanned<Expr>),
    VarDecl(VarDecl),
    Assign(AssignStmt),
    If(IfStmt),
    While(WhileStmt),
    For(ForStmt),
    ForEach(ForEachStmt),
    Defer(Spanned<Expr>),
    Return(Option<Spanned<Expr>>),
    Break,
    Continue,
    Block(Block),
    StaticBuffer(StaticBuffer),
}

/// How a variable declaration introduces its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Binding {
    /// `Type name = ...`
    Typed,
    /// `let name = ...`
    Let,
    /// `name := ...`
    Walrus,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VarDecl {
    pub binding: Binding,
    pub ty: Option<Spanned<Type>>,
    pub name: Ident,
    pub init: Option<Spanned<Expr>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssignOp {
    Assign,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
    Concat,
}

impl AssignOp {
    pub fn from_operator(id: OperatorId) -> Option<Self> {
        let op = match id {
            OperatorId::Eq => AssignOp::Assign,
            OperatorId::PlusEq => AssignOp::Add,
            OperatorId::MinusEq => AssignOp::Sub,
            OperatorId::StarEq => AssignOp::Mul,
            OperatorId::SlashEq => AssignOp::Div,
            OperatorId::PercentEq => AssignOp::Mod,
            OperatorId::AmpEq => AssignOp::BitAnd,
            OperatorId::PipeEq => AssignOp::BitOr,
            OperatorId::CaretEq => AssignOp::BitXor,
            OperatorId::ShlEq => AssignOp::Shl,
            OperatorId::ShrEq => AssignOp::Shr,
            OperatorId::ConcatEq => AssignOp::Concat,
            _ => return None,
        };
        Some(op)
    }

    pub fn operator(self) -> OperatorId {
        match self {
            AssignOp::Assign => OperatorId::Eq,
            AssignOp::Add => OperatorId::PlusEq,
            AssignOp::Sub => OperatorId::MinusEq,
            AssignOp::Mul => OperatorId::StarEq,
            AssignOp::Div => OperatorId::SlashEq,
            AssignOp::Mod => OperatorId::PercentEq,
            AssignOp::BitAnd => OperatorId::AmpEq,
            AssignOp::BitOr => OperatorId::PipeEq,
            AssignOp::BitXor => OperatorId::CaretEq,
            AssignOp::Shl => OperatorId::ShlEq,
            AssignOp::Shr => OperatorId::ShrEq,
            AssignOp::Concat => OperatorId::ConcatEq,
        }
    }
}

impl fmt::Display for AssignOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", operators::as_str(self.operator()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssignStmt {
    pub target: Spanned<Expr>,
    pub op: AssignOp,
    pub value: Spanned<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    pub condition: Spanned<Expr>,
    pub then_block: Spanned<Block>,
    pub else_branch: Option<ElseBranch>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ElseBranch {
    Block(Spanned<Block>),
    If(Box<Spanned<IfStmt>>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhileStmt {
    pub condition: Spanned<Expr>,
    pub body: Spanned<Block>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ForInit {
    VarDecl(Spanned<VarDecl>),
    Expr(Spanned<Expr>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ForStep {
    Assign(Spanned<AssignStmt>),
    Expr(Spanned<Expr>),
}

/// C-style `for (init; condition; step) { ... }`
#[derive(Debug, Clone, PartialEq)]
pub struct ForStmt {
    pub init: ForInit,
    pub condition: Spanned<Expr>,
    pub step: ForStep,
    pub body: Spanned<Block>,
}

/// `for name in iterable { ... }`
#[derive(Debug, Clone, PartialEq)]
pub struct ForEachStmt {
    pub binding: Ident,
    pub iterable: Spanned<Expr>,
    pub body: Spanned<Block>,
}

/// `Type name[size];`
#[derive(Debug, Clone, PartialEq)]
pub struct StaticBuffer {
    pub ty: Spanned<Type>,
    pub name: Ident,
    pub size: Spanned<Expr>,
}

// ============================================================================
// Expressions
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Binary(Box<Spanned<Expr>>, BinaryOp, Box<Spanned<Expr>>),
    Unary(UnaryOp, Box<Spanned<Expr>>),
    Call(Box<CallExpr>),
    Member(Box<Spanned<Expr>>, Ident),
    Subscript(Box<Spanned<Expr>>, Box<Spanned<Expr>>),
    Conditional(Box<ConditionalExpr>),
    Cast(Box<Spanned<Type>>, Box<Spanned<Expr>>),
    Paren(Box<Spanned<Expr>>),
    Ident(Ident),
    /// `A::B`
    Qualified(Vec<Ident>),
    /// `` `raw text` ``
    Exact(String),
    Number(NumberLit),
    Str(Vec<StrPart>),
    Bool(bool),
    Char(StrPart),
    Array(ArrayLit),
    /// `$(a, b)`
    Tuple(Box<Spanned<Expr>>, Box<Spanned<Expr>>),
    /// `$$(a, b, c)`
    Triple(Box<Spanned<Expr>>, Box<Spanned<Expr>>, Box<Spanned<Expr>>),
    StructLit(StructLit),
    Lambda(Box<Lambda>),
    Range {
        start: Box<Spanned<Expr>>,
        end: Box<Spanned<Expr>>,
        inclusive: bool,
    },
    Directive(Directive),
    /// `$name` or `$name(args)`
    Sigil {
        name: Ident,
        args: Option<Vec<Spanned<Expr>>>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct CallExpr {
    pub callee: Spanned<Expr>,
    /// Explicit `f<T, U>(...)` arguments.
    pub generic_args: Option<Vec<Spanned<Type>>>,
    pub args: Vec<Spanned<Expr>>,
}

/// `cond ? a : b`; `consequence` is `None` for the shorthand `cond ? : b`.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionalExpr {
    pub condition: Spanned<Expr>,
    pub consequence: Option<Spanned<Expr>>,
    pub alternative: Spanned<Expr>,
}

/// `[T; a, b]`, `[a, b]`, or the static form `#[...]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayLit {
    pub elem_ty: Option<Spanned<Type>>,
    pub is_static: bool,
    pub elements: Vec<Spanned<Expr>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StructLit {
    pub name: Ident,
    pub generic_args: Option<Vec<Spanned<Type>>>,
    pub fields: Vec<Spanned<FieldInit>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldInit {
    pub name: Ident,
    pub value: Spanned<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Lambda {
    pub params: ParamList,
    pub body: LambdaBody,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LambdaBody {
    Expr(Spanned<Expr>),
    Block(Spanned<Block>),
}

/// `#name(...)` forms. The set is closed, see [`elle_core::lang::directives`].
#[derive(Debug, Clone, PartialEq)]
pub enum Directive {
    Len(Box<Spanned<Expr>>),
    Size(Spanned<Type>),
    /// `#i(name)`
    Ident(Ident),
    Env,
    Alloc {
        ty: Spanned<Type>,
        count: Option<Box<Spanned<Expr>>>,
    },
    Realloc {
        ptr: Box<Spanned<Expr>>,
        ty: Spanned<Type>,
        count: Option<Box<Spanned<Expr>>>,
    },
    Free(Box<Spanned<Expr>>),
    SetAllocator(Box<Spanned<Expr>>),
    ResetAllocator,
}

impl Directive {
    pub fn id(&self) -> DirectiveId {
        match self {
            Directive::Len(_) => DirectiveId::Len,
            Directive::Size(_) => DirectiveId::Size,
            Directive::Ident(_) => DirectiveId::I,
            Directive::Env => DirectiveId::Env,
            Directive::Alloc { .. } => DirectiveId::Alloc,
            Directive::Realloc { .. } => DirectiveId::Realloc,
            Directive::Free(_) => DirectiveId::Free,
            Directive::SetAllocator(_) => DirectiveId::SetAllocator,
            Directive::ResetAllocator => DirectiveId::ResetAllocator,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Or,
    And,
    Concat,
    BitOr,
    BitXor,
    BitAnd,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Shl,
    Shr,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl BinaryOp {
    /// Map an operator token onto a binary operator. Range operators are excluded: they build
    /// [`Expr::Range`].
    pub fn from_operator(id: OperatorId) -> Option<Self> {
        let op = match id {
            OperatorId::OrOr => BinaryOp::Or,
            OperatorId::AndAnd => BinaryOp::And,
            OperatorId::Concat => BinaryOp::Concat,
            OperatorId::Pipe => BinaryOp::BitOr,
            OperatorId::Caret => BinaryOp::BitXor,
            OperatorId::Amp => BinaryOp::BitAnd,
            OperatorId::EqEq => BinaryOp::Eq,
            OperatorId::NotEq => BinaryOp::NotEq,
            OperatorId::Lt => BinaryOp::Lt,
            OperatorId::LtEq => BinaryOp::LtEq,
            OperatorId::Gt => BinaryOp::Gt,
            OperatorId::GtEq => BinaryOp::GtEq,
            OperatorId::Shl => BinaryOp::Shl,
            OperatorId::Shr => BinaryOp::Shr,
            OperatorId::Plus => BinaryOp::Add,
            OperatorId::Minus => BinaryOp::Sub,
            OperatorId::Star => BinaryOp::Mul,
            OperatorId::Slash => BinaryOp::Div,
            OperatorId::Percent => BinaryOp::Mod,
            _ => return None,
        };
        Some(op)
    }

    pub fn operator(self) -> OperatorId {
        match self {
            BinaryOp::Or => OperatorId::OrOr,
            BinaryOp::And => OperatorId::AndAnd,
            BinaryOp::Concat => OperatorId::Concat,
            BinaryOp::BitOr => OperatorId::Pipe,
            BinaryOp::BitXor => OperatorId::Caret,
            BinaryOp::BitAnd => OperatorId::Amp,
            BinaryOp::Eq => OperatorId::EqEq,
            BinaryOp::NotEq => OperatorId::NotEq,
            BinaryOp::Lt => OperatorId::Lt,
            BinaryOp::LtEq => OperatorId::LtEq,
            BinaryOp::Gt => OperatorId::Gt,
            BinaryOp::GtEq => OperatorId::GtEq,
            BinaryOp::Shl => OperatorId::Shl,
            BinaryOp::Shr => OperatorId::Shr,
            BinaryOp::Add => OperatorId::Plus,
            BinaryOp::Sub => OperatorId::Minus,
            BinaryOp::Mul => OperatorId::Star,
            BinaryOp::Div => OperatorId::Slash,
            BinaryOp::Mod => OperatorId::Percent,
        }
    }

    /// Binding power from the operator registry.
    pub fn precedence(self) -> u8 {
        operators::info_for(self.operator()).precedence
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", operators::as_str(self.operator()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    /// `!`
    Not,
    /// `~`
    BitNot,
    /// `&`
    AddrOf,
    /// `-`
    Neg,
    /// `+`
    Plus,
    /// `*`
    Deref,
}

impl UnaryOp {
    pub fn from_operator(id: OperatorId) -> Option<Self> {
        let op = match id {
            OperatorId::Bang => UnaryOp::Not,
            OperatorId::Tilde => UnaryOp::BitNot,
            OperatorId::Amp => UnaryOp::AddrOf,
            OperatorId::Minus => UnaryOp::Neg,
            OperatorId::Plus => UnaryOp::Plus,
            OperatorId::Star => UnaryOp::Deref,
            _ => return None,
        };
        Some(op)
    }

    pub fn operator(self) -> OperatorId {
        match self {
            UnaryOp::Not => OperatorId::Bang,
            UnaryOp::BitNot => OperatorId::Tilde,
            UnaryOp::AddrOf => OperatorId::Amp,
            UnaryOp::Neg => OperatorId::Minus,
            UnaryOp::Plus => OperatorId::Plus,
            UnaryOp::Deref => OperatorId::Star,
        }
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", operators::as_str(self.operator()))
    }
}

// ============================================================================
// Literals (shared with the lexer's token payloads)
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumberKind {
    Hex,
    Octal,
    Binary,
    Decimal,
    Float,
    Scientific,
}

/// A numeric literal, kept as written (prefix and `_` separators included).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NumberLit {
    pub kind: NumberKind,
    pub text: String,
}

impl NumberLit {
    pub fn new(kind: NumberKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    /// Integer value for the integral kinds; `None` for floats, on overflow, or when the text is not a valid
    /// literal of its kind.
    pub fn int_value(&self) -> Option<u64> {
        let (digits, radix) = match self.kind {
            NumberKind::Hex => (self.text.get(2..)?, 16),
            NumberKind::Octal => (self.text.get(2..)?, 8),
            NumberKind::Binary => (self.text.get(2..)?, 2),
            NumberKind::Decimal => (self.text.as_str(), 10),
            NumberKind::Float | NumberKind::Scientific => return None,
        };
        let cleaned: String = digits.chars().filter(|c| *c != '_').collect();
        u64::from_str_radix(&cleaned, radix).ok()
    }

    /// Floating value for every decimal-based kind.
    pub fn float_value(&self) -> Option<f64> {
        match self.kind {
            NumberKind::Decimal | NumberKind::Float | NumberKind::Scientific => {
                let cleaned: String = self.text.chars().filter(|c| *c != '_').collect();
                cleaned.parse().ok()
            }
            NumberKind::Hex | NumberKind::Octal | NumberKind::Binary => self.int_value().map(|v| v as f64),
        }
    }
}

impl fmt::Display for NumberLit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// Escape sequence after a backslash, digits kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Escape {
    /// `\n`, `\"`, `\\`, ... (the char after the backslash)
    Simple(char),
    /// `\0` .. `\777`
    Octal(String),
    /// `\xHH`
    Hex(String),
    /// `\uHHHH`
    Unicode(String),
}

impl Escape {
    /// The character the escape denotes, if it is a valid scalar value.
    pub fn value(&self) -> Option<char> {
        match self {
            Escape::Simple(c) => Some(match c {
                'n' => '\n',
                't' => '\t',
                'r' => '\r',
                '0' => '\0',
                'a' => '\u{7}',
                'b' => '\u{8}',
                'f' => '\u{c}',
                'v' => '\u{b}',
                'e' => '\u{1b}',
                other => *other,
            }),
            Escape::Octal(digits) => u32::from_str_radix(digits, 8).ok().and_then(char::from_u32),
            Escape::Hex(digits) | Escape::Unicode(digits) => u32::from_str_radix(digits, 16).ok().and_then(char::from_u32),
        }
    }
}

impl fmt::Display for Escape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Escape::Simple(c) => write!(f, "\\{c}"),
            Escape::Octal(digits) => write!(f, "\\{digits}"),
            Escape::Hex(digits) => write!(f, "\\x{digits}"),
            Escape::Unicode(digits) => write!(f, "\\u{digits}"),
        }
    }
}

/// Piece of a string or character literal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StrPart {
    Text(String),
    Escape(Escape),
}

impl fmt::Display for StrPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrPart::Text(text) => write!(f, "{text}"),
            StrPart::Escape(escape) => write!(f, "{escape}"),
        }
    }
}

/// Decoded contents of a string literal's parts.
pub fn string_value(parts: &[StrPart]) -> String {
    let mut out = String::new();
    for part in parts {
        match part {
            StrPart::Text(text) => out.push_str(text),
            StrPart::Escape(escape) => {
                if let Some(c) = escape.value() {
                    out.push(c);
                }
            }
        }
    }
    out
}

// ============================================================================
// Mutable traversal
// ============================================================================

/// Mutable AST traversal. Every `visit_*` method defaults to walking its children, so an implementor
/// overrides only the nodes it cares about.
pub trait VisitorMut {
    fn visit_span(&mut self, _span: &mut Span) {}

    fn visit_program(&mut self, program: &mut Program) {
        for decl in &mut program.declarations {
            self.visit_declaration(decl);
        }
    }

    fn visit_declaration(&mut self, decl: &mut Spanned<Declaration>) {
        self.visit_span(&mut decl.span);
        match &mut decl.node {
            Declaration::Import(_) | Declaration::Global(_) | Declaration::Namespace(_) => {}
            Declaration::Function(func) | Declaration::ExternalFunction(func) => self.visit_function(func),
            Declaration::Constant(c) => {
                if let Some(ty) = &mut c.ty {
                    self.visit_type(ty);
                }
                self.visit_expr(&mut c.value);
            }
            Declaration::Struct(s) => {
                self.visit_attributes(&mut s.attributes);
                for field in &mut s.fields {
                    self.visit_span(&mut field.span);
                    self.visit_type(&mut field.node.ty);
                }
            }
        }
    }

    fn visit_function(&mut self, func: &mut FunctionDecl) {
        self.visit_span(&mut func.name.span);
        self.visit_params(&mut func.params);
        self.visit_attributes(&mut func.attributes);
        if let Some(ty) = &mut func.return_type {
            self.visit_type(ty);
        }
        if let Some(body) = &mut func.body {
            self.visit_block(body);
        }
    }

    fn visit_params(&mut self, params: &mut ParamList) {
        for param in &mut params.params {
            self.visit_span(&mut param.span);
            match &mut param.node {
                Param::Named { ty, .. } | Param::Unnamed { ty } | Param::NoFormat { ty, .. } => self.visit_type(ty),
                Param::Variadic { .. } => {}
            }
        }
    }

    fn visit_attributes(&mut self, attributes: &mut [Spanned<Attribute>]) {
        for attr in attributes {
            self.visit_span(&mut attr.span);
            if let Some(args) = &mut attr.node.args {
                for arg in args {
                    self.visit_expr(arg);
                }
            }
        }
    }

    fn visit_block(&mut self, block: &mut Spanned<Block>) {
        self.visit_span(&mut block.span);
        for stmt in &mut block.node.statements {
            self.visit_statement(stmt);
        }
    }

    fn visit_statement(&mut self, stmt: &mut Spanned<Statement>) {
        self.visit_span(&mut stmt.span);
        match &mut stmt.node {
            Statement::Expr(e) | Statement::Defer(e) => self.visit_expr(e),
            Statement::VarDecl(decl) => self.visit_var_decl(decl),
            Statement::Assign(assign) => self.visit_assign(assign),
            Statement::If(stmt) => self.visit_if(stmt),
            Statement::While(w) => {
                self.visit_expr(&mut w.condition);
                self.visit_block(&mut w.body);
            }
            Statement::For(f) => {
                match &mut f.init {
                    ForInit::VarDecl(decl) => {
                        self.visit_span(&mut decl.span);
                        self.visit_var_decl(&mut decl.node);
                    }
                    ForInit::Expr(e) => self.visit_expr(e),
                }
                self.visit_expr(&mut f.condition);
                match &mut f.step {
                    ForStep::Assign(assign) => {
                        self.visit_span(&mut assign.span);
                        self.visit_assign(&mut assign.node);
                    }
                    ForStep::Expr(e) => self.visit_expr(e),
                }
                self.visit_block(&mut f.body);
            }
            Statement::ForEach(f) => {
                self.visit_expr(&mut f.iterable);
                self.visit_block(&mut f.body);
            }
            Statement::Return(value) => {
                if let Some(e) = value {
                    self.visit_expr(e);
                }
            }
            Statement::Break | Statement::Continue => {}
            Statement::Block(block) => {
                for stmt in &mut block.statements {
                    self.visit_statement(stmt);
                }
            }
            Statement::StaticBuffer(buf) => {
                self.visit_type(&mut buf.ty);
                self.visit_expr(&mut buf.size);
            }
        }
    }

    fn visit_var_decl(&mut self, decl: &mut VarDecl) {
        if let Some(ty) = &mut decl.ty {
            self.visit_type(ty);
        }
        if let Some(init) = &mut decl.init {
            self.visit_expr(init);
        }
    }

    fn visit_assign(&mut self, assign: &mut AssignStmt) {
        self.visit_expr(&mut assign.target);
        self.visit_expr(&mut assign.value);
    }

    fn visit_if(&mut self, stmt: &mut IfStmt) {
        self.visit_expr(&mut stmt.condition);
        self.visit_block(&mut stmt.then_block);
        match &mut stmt.else_branch {
            Some(ElseBranch::Block(block)) => self.visit_block(block),
            Some(ElseBranch::If(nested)) => {
                self.visit_span(&mut nested.span);
                self.visit_if(&mut nested.node);
            }
            None => {}
        }
    }

    fn visit_type(&mut self, ty: &mut Spanned<Type>) {
        self.visit_span(&mut ty.span);
        match &mut ty.node {
            Type::Primitive(_) | Type::Named(_) => {}
            Type::Array { element, .. } => self.visit_type(element),
            Type::Pointer { base, .. } => self.visit_type(base),
            Type::Generic { args, .. } => {
                for arg in args {
                    self.visit_type(arg);
                }
            }
            Type::Tuple(first, second) => {
                self.visit_type(first);
                self.visit_type(second);
            }
        }
    }

    fn visit_expr(&mut self, expr: &mut Spanned<Expr>) {
        self.visit_span(&mut expr.span);
        match &mut expr.node {
            Expr::Binary(left, _, right) => {
                self.visit_expr(left);
                self.visit_expr(right);
            }
            Expr::Unary(_, operand) | Expr::Paren(operand) | Expr::Member(operand, _) => self.visit_expr(operand),
            Expr::Call(call) => {
                self.visit_expr(&mut call.callee);
                if let Some(args) = &mut call.generic_args {
                    for ty in args {
                        self.visit_type(ty);
                    }
                }
                for arg in &mut call.args {
                    self.visit_expr(arg);
                }
            }
            Expr::Subscript(object, index) => {
                self.visit_expr(object);
                self.visit_expr(index);
            }
            Expr::Conditional(cond) => {
                self.visit_expr(&mut cond.condition);
                if let Some(consequence) = &mut cond.consequence {
                    self.visit_expr(consequence);
                }
                self.visit_expr(&mut cond.alternative);
            }
            Expr::Cast(ty, value) => {
                self.visit_type(ty);
                self.visit_expr(value);
            }
            Expr::Ident(_)
            | Expr::Qualified(_)
            | Expr::Exact(_)
            | Expr::Number(_)
            | Expr::Str(_)
            | Expr::Bool(_)
            | Expr::Char(_) => {}
            Expr::Array(array) => {
                if let Some(ty) = &mut array.elem_ty {
                    self.visit_type(ty);
                }
                for element in &mut array.elements {
                    self.visit_expr(element);
                }
            }
            Expr::Tuple(a, b) => {
                self.visit_expr(a);
                self.visit_expr(b);
            }
            Expr::Triple(a, b, c) => {
                self.visit_expr(a);
                self.visit_expr(b);
                self.visit_expr(c);
            }
            Expr::StructLit(lit) => {
                if let Some(args) = &mut lit.generic_args {
                    for ty in args {
                        self.visit_type(ty);
                    }
                }
                for field in &mut lit.fields {
                    self.visit_span(&mut field.span);
                    self.visit_expr(&mut field.node.value);
                }
            }
            Expr::Lambda(lambda) => {
                self.visit_params(&mut lambda.params);
                match &mut lambda.body {
                    LambdaBody::Expr(body) => self.visit_expr(body),
                    LambdaBody::Block(body) => self.visit_block(body),
                }
            }
            Expr::Range { start, end, .. } => {
                self.visit_expr(start);
                self.visit_expr(end);
            }
            Expr::Directive(directive) => match directive {
                Directive::Len(e) | Directive::Free(e) | Directive::SetAllocator(e) => self.visit_expr(e),
                Directive::Size(ty) => self.visit_type(ty),
                Directive::Alloc { ty, count } => {
                    self.visit_type(ty);
                    if let Some(count) = count {
                        self.visit_expr(count);
                    }
                }
                Directive::Realloc { ptr, ty, count } => {
                    self.visit_expr(ptr);
                    self.visit_type(ty);
                    if let Some(count) = count {
                        self.visit_expr(count);
                    }
                }
                Directive::Ident(_) | Directive::Env | Directive::ResetAllocator => {}
            },
            Expr::Sigil { args, .. } => {
                if let Some(args) = args {
                    for arg in args {
                        self.visit_expr(arg);
                    }
                }
            }
        }
    }
}

struct SpanEraser;

impl VisitorMut for SpanEraser {
    fn visit_span(&mut self, span: &mut Span) {
        *span = Span::default();
    }
}
