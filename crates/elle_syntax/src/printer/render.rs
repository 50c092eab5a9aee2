//! Tree walker that renders an AST back to Elle source.
//!
//! The output is canonical: spacing, indentation and statement layout are fixed, and parentheses are
//! inserted only where precedence or associativity demand them. `Expr::Paren` nodes are printed as
//! written, so a parsed tree prints to source that parses back to the same tree.
//!
//! Comments are not part of the tree and are not printed.

use elle_core::lang::operators::{self, Associativity, OperatorId};
use elle_core::lang::{directives, keywords};

use super::config::PrintConfig;
use super::writer::SourceWriter;
use crate::ast::*;

/// Binding levels for expressions that are not binary operators.
const LEVEL_CONDITIONAL: u8 = 0;
const LEVEL_PREFIX: u8 = 13;
const LEVEL_POSTFIX: u8 = 14;
const LEVEL_PRIMARY: u8 = 15;

/// Renders programs, statements, expressions and types.
pub struct Printer {
    writer: SourceWriter,
}

impl Printer {
    pub fn new(config: PrintConfig) -> Self {
        Self {
            writer: SourceWriter::new(config),
        }
    }

    /// Print a whole program.
    pub fn print(mut self, program: &Program) -> String {
        self.program(program);
        self.writer.finish()
    }

    /// Print a single expression with no surrounding context.
    pub fn print_expr(mut self, expr: &Expr) -> String {
        self.expr(expr, LEVEL_CONDITIONAL, true);
        self.writer.finish()
    }

    pub fn print_type(mut self, ty: &Type) -> String {
        self.ty(ty);
        self.writer.finish()
    }

    /// A printer that continues the current line at the current indentation.
    fn fork(&self) -> Printer {
        let mut writer = SourceWriter::new(self.writer.config().clone());
        for _ in 0..self.writer.current_indent() {
            writer.indent();
        }
        writer.resume_line();
        Printer { writer }
    }

    // ========================================================================
    // Program and declarations
    // ========================================================================

    fn program(&mut self, program: &Program) {
        let blank = self.writer.config().blank_lines_top_level;
        let mut previous: Option<&Declaration> = None;
        for decl in &program.declarations {
            if let Some(prev) = previous {
                if !(is_header(prev) && is_header(&decl.node)) {
                    self.writer.blank_lines(blank);
                }
            }
            self.declaration(&decl.node);
            self.writer.newline();
            previous = Some(&decl.node);
        }
    }

    fn declaration(&mut self, decl: &Declaration) {
        match decl {
            Declaration::Import(import) => {
                self.writer.write("use ");
                self.writer.write(&import.path.to_string());
                self.writer.write(";");
            }
            Declaration::Global(global) => {
                self.writer.write("global ");
                let options: Vec<&str> = global.options.iter().map(|o| keywords::as_str(o.keyword())).collect();
                self.writer.write(&options.join(", "));
                self.writer.write(";");
            }
            Declaration::Namespace(name) => {
                self.writer.write("namespace ");
                self.writer.write(name);
                self.writer.write(";");
            }
            Declaration::Function(func) | Declaration::ExternalFunction(func) => self.function(func),
            Declaration::Constant(c) => {
                self.modifiers(&c.modifiers);
                self.writer.write("const ");
                if let Some(ty) = &c.ty {
                    self.ty(&ty.node);
                    self.writer.write(" ");
                }
                self.writer.write(&c.name);
                self.writer.write(" = ");
                self.expr(&c.value.node, LEVEL_CONDITIONAL, true);
                self.writer.write(";");
            }
            Declaration::Struct(s) => self.struct_decl(s),
        }
    }

    fn modifiers(&mut self, modifiers: &Modifiers) {
        for modifier in &modifiers.0 {
            self.writer.write(&modifier.to_string());
            self.writer.write(" ");
        }
    }

    fn function(&mut self, func: &FunctionDecl) {
        self.modifiers(&func.modifiers);
        self.writer.write("fn ");
        self.writer.write(&func.name.node.to_string());
        self.generic_params(&func.generics);
        self.params(&func.params);
        self.attributes(&func.attributes);
        if let Some(ret) = &func.return_type {
            self.writer.write(" -> ");
            self.ty(&ret.node);
        }
        match &func.body {
            Some(body) => {
                self.writer.write(" ");
                self.block(&body.node);
            }
            None => self.writer.write(";"),
        }
    }

    fn generic_params(&mut self, generics: &[Ident]) {
        if !generics.is_empty() {
            self.writer.write("<");
            self.writer.write(&generics.join(", "));
            self.writer.write(">");
        }
    }

    fn params(&mut self, list: &ParamList) {
        self.writer.write("(");
        if let Some(meta) = &list.meta {
            self.writer.write("ElleMeta ");
            self.writer.write(meta);
            if !list.params.is_empty() {
                self.writer.write(", ");
            }
        }
        for (i, param) in list.params.iter().enumerate() {
            if i > 0 {
                self.writer.write(", ");
            }
            match &param.node {
                Param::Named { ty, name } => {
                    self.ty(&ty.node);
                    self.writer.write(" ");
                    self.writer.write(name);
                }
                Param::Unnamed { ty } => self.ty(&ty.node),
                Param::Variadic { name } => {
                    self.writer.write("...");
                    if let Some(name) = name {
                        self.writer.write(name);
                    }
                }
                Param::NoFormat { ty, name } => {
                    self.writer.write("@nofmt ");
                    self.ty(&ty.node);
                    self.writer.write(" ");
                    self.writer.write(name);
                }
            }
        }
        self.writer.write(")");
    }

    fn attributes(&mut self, attributes: &[Spanned<Attribute>]) {
        for attr in attributes {
            self.writer.write(" @");
            self.writer.write(&attr.node.name);
            if let Some(args) = &attr.node.args {
                self.expr_list("(", args, ")");
            }
        }
    }

    fn struct_decl(&mut self, s: &StructDecl) {
        self.modifiers(&s.modifiers);
        self.writer.write("struct ");
        self.writer.write(&s.name);
        self.generic_params(&s.generics);
        self.attributes(&s.attributes);
        if s.fields.is_empty() {
            self.writer.write(" {};");
            return;
        }
        self.writer.writeln(" {");
        self.writer.indent();
        for field in &s.fields {
            self.ty(&field.node.ty.node);
            self.writer.write(" ");
            self.writer.write(&field.node.name);
            self.writer.writeln(";");
        }
        self.writer.dedent();
        self.writer.write("};");
    }

    // ========================================================================
    // Statements
    // ========================================================================

    /// `{ ... }` without a trailing newline.
    fn block(&mut self, block: &Block) {
        if block.statements.is_empty() {
            self.writer.write("{}");
            return;
        }
        self.writer.writeln("{");
        self.writer.indent();
        for stmt in &block.statements {
            self.statement(&stmt.node);
            self.writer.newline();
        }
        self.writer.dedent();
        self.writer.write("}");
    }

    fn statement(&mut self, stmt: &Statement) {
        match stmt {
            Statement::Expr(e) => {
                self.expr(&e.node, LEVEL_CONDITIONAL, true);
                self.writer.write(";");
            }
            Statement::VarDecl(decl) => {
                self.var_decl(decl);
                self.writer.write(";");
            }
            Statement::Assign(assign) => {
                self.assign(assign);
                self.writer.write(";");
            }
            Statement::If(stmt) => self.if_stmt(stmt),
            Statement::While(w) => {
                self.writer.write("while ");
                self.header_condition(&w.condition.node);
                self.writer.write(" ");
                self.block(&w.body.node);
            }
            Statement::For(f) => {
                self.writer.write("for (");
                match &f.init {
                    ForInit::VarDecl(decl) => self.var_decl(&decl.node),
                    ForInit::Expr(e) => self.expr(&e.node, LEVEL_CONDITIONAL, true),
                }
                self.writer.write("; ");
                self.expr(&f.condition.node, LEVEL_CONDITIONAL, true);
                self.writer.write("; ");
                match &f.step {
                    ForStep::Assign(assign) => self.assign(&assign.node),
                    ForStep::Expr(e) => self.expr(&e.node, LEVEL_CONDITIONAL, true),
                }
                self.writer.write(") ");
                self.block(&f.body.node);
            }
            Statement::ForEach(f) => {
                self.writer.write("for ");
                self.writer.write(&f.binding);
                self.writer.write(" in ");
                self.expr(&f.iterable.node, LEVEL_CONDITIONAL, true);
                self.writer.write(" ");
                self.block(&f.body.node);
            }
            Statement::Defer(e) => {
                self.writer.write("defer ");
                self.expr(&e.node, LEVEL_CONDITIONAL, true);
                self.writer.write(";");
            }
            Statement::Return(value) => {
                self.writer.write("return");
                if let Some(value) = value {
                    self.writer.write(" ");
                    self.expr(&value.node, LEVEL_CONDITIONAL, true);
                }
                self.writer.write(";");
            }
            Statement::Break => self.writer.write("break;"),
            Statement::Continue => self.writer.write("continue;"),
            Statement::Block(block) => self.block(block),
            Statement::StaticBuffer(buf) => {
                self.ty(&buf.ty.node);
                self.writer.write(" ");
                self.writer.write(&buf.name);
                self.writer.write("[");
                self.expr(&buf.size.node, LEVEL_CONDITIONAL, true);
                self.writer.write("];");
            }
        }
    }

    fn var_decl(&mut self, decl: &VarDecl) {
        match (decl.binding, &decl.ty, &decl.init) {
            (Binding::Walrus, _, Some(init)) => {
                self.writer.write(&decl.name);
                self.writer.write(" := ");
                self.expr(&init.node, LEVEL_CONDITIONAL, true);
                return;
            }
            (Binding::Typed, Some(ty), _) => {
                self.ty(&ty.node);
                self.writer.write(" ");
            }
            _ => self.writer.write("let "),
        }
        self.writer.write(&decl.name);
        if let Some(init) = &decl.init {
            self.writer.write(" = ");
            self.expr(&init.node, LEVEL_CONDITIONAL, true);
        }
    }

    fn assign(&mut self, assign: &AssignStmt) {
        self.expr(&assign.target.node, LEVEL_CONDITIONAL, true);
        self.writer.write(" ");
        self.writer.write(&assign.op.to_string());
        self.writer.write(" ");
        self.expr(&assign.value.node, LEVEL_CONDITIONAL, true);
    }

    fn if_stmt(&mut self, stmt: &IfStmt) {
        self.writer.write("if ");
        self.header_condition(&stmt.condition.node);
        self.writer.write(" ");
        self.block(&stmt.then_block.node);
        match &stmt.else_branch {
            Some(ElseBranch::Block(block)) => {
                self.writer.write(" else ");
                self.block(&block.node);
            }
            Some(ElseBranch::If(nested)) => {
                self.writer.write(" else ");
                self.if_stmt(&nested.node);
            }
            None => {}
        }
    }

    /// `if`/`while` condition. The parser strips one pair of enclosing parentheses, so a `Paren`
    /// condition gets an extra pair, and any condition containing `{` is wrapped to keep struct
    /// literals and block lambdas out of the header position.
    fn header_condition(&mut self, condition: &Expr) {
        let mut fork = self.fork();
        fork.expr(condition, LEVEL_CONDITIONAL, true);
        let text = fork.writer.finish();
        if matches!(condition, Expr::Paren(_)) || text.contains('{') {
            self.writer.write("(");
            self.writer.write(&text);
            self.writer.write(")");
        } else {
            self.writer.write(&text);
        }
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    /// Print `expr` where the context requires at least `min_level`.
    ///
    /// `open_right` is false when an operator or postfix follows the expression in the output; an
    /// expression-bodied lambda would swallow it, so it is parenthesized there.
    fn expr(&mut self, expr: &Expr, min_level: u8, open_right: bool) {
        let trailing_body = matches!(expr, Expr::Lambda(l) if matches!(l.body, LambdaBody::Expr(_)));
        if level(expr) < min_level || (trailing_body && !open_right) {
            self.writer.write("(");
            self.expr_inner(expr, true);
            self.writer.write(")");
        } else {
            self.expr_inner(expr, open_right);
        }
    }

    fn expr_inner(&mut self, expr: &Expr, open_right: bool) {
        match expr {
            Expr::Binary(left, op, right) => {
                let (prec, assoc) = operators::binary_power(op.operator()).unwrap_or((op.precedence(), Associativity::Left));
                let (left_min, right_min) = operand_levels(prec, assoc);
                self.expr(&left.node, left_min, false);
                self.writer.write(" ");
                self.writer.write(&op.to_string());
                self.writer.write(" ");
                self.expr(&right.node, right_min, open_right);
            }
            Expr::Range { start, end, inclusive } => {
                let id = if *inclusive { OperatorId::DotDotEq } else { OperatorId::DotDot };
                let info = operators::info_for(id);
                let (start_min, end_min) = operand_levels(info.precedence, info.associativity);
                self.expr(&start.node, start_min, false);
                self.writer.write(operators::as_str(id));
                self.expr(&end.node, end_min, open_right);
            }
            Expr::Unary(op, operand) => {
                self.writer.write(&op.to_string());
                if let Expr::Unary(inner, _) = &operand.node {
                    // `& &x` must not lex as `&&x`.
                    if operators::from_str(&format!("{op}{inner}")).is_some() {
                        self.writer.write(" ");
                    }
                }
                self.expr(&operand.node, LEVEL_PREFIX, open_right);
            }
            Expr::Cast(ty, operand) => {
                self.writer.write("(");
                self.ty(&ty.node);
                self.writer.write(") ");
                if matches!(ty.node, Type::Named(_)) && starts_with_infix_spelling(&operand.node) {
                    self.writer.write("(");
                    self.expr_inner(&operand.node, true);
                    self.writer.write(")");
                } else {
                    self.expr(&operand.node, LEVEL_PREFIX, open_right);
                }
            }
            Expr::Call(call) => {
                self.expr(&call.callee.node, LEVEL_POSTFIX, false);
                if matches!(&call.callee.node, Expr::Sigil { args: None, .. }) {
                    // `$name(...)` would read as the sigil's own arguments.
                    self.writer.write(" ");
                }
                if let Some(args) = &call.generic_args {
                    self.type_list("<", args, ">");
                }
                self.expr_list("(", &call.args, ")");
            }
            Expr::Member(object, name) => {
                self.expr(&object.node, LEVEL_POSTFIX, false);
                self.writer.write(".");
                self.writer.write(name);
            }
            Expr::Subscript(object, index) => {
                self.expr(&object.node, LEVEL_POSTFIX, false);
                self.writer.write("[");
                self.expr(&index.node, LEVEL_CONDITIONAL, true);
                self.writer.write("]");
            }
            Expr::Conditional(cond) => {
                self.expr(&cond.condition.node, LEVEL_CONDITIONAL + 1, false);
                match &cond.consequence {
                    Some(consequence) => {
                        self.writer.write(" ? ");
                        self.expr(&consequence.node, LEVEL_CONDITIONAL, true);
                        self.writer.write(" : ");
                    }
                    None => self.writer.write(" ? : "),
                }
                self.expr(&cond.alternative.node, LEVEL_CONDITIONAL, open_right);
            }
            Expr::Paren(inner) => {
                self.writer.write("(");
                self.expr(&inner.node, LEVEL_CONDITIONAL, true);
                self.writer.write(")");
            }
            Expr::Ident(name) => self.writer.write(name),
            Expr::Qualified(segments) => self.writer.write(&segments.join("::")),
            Expr::Exact(raw) => {
                self.writer.write("`");
                self.writer.write(raw);
                self.writer.write("`");
            }
            Expr::Number(n) => self.writer.write(&n.text),
            Expr::Str(parts) => {
                self.writer.write("\"");
                for part in parts {
                    self.writer.write(&part.to_string());
                }
                self.writer.write("\"");
            }
            Expr::Bool(value) => self.writer.write(if *value { "true" } else { "false" }),
            Expr::Char(part) => {
                self.writer.write("'");
                self.writer.write(&part.to_string());
                self.writer.write("'");
            }
            Expr::Array(array) => {
                if array.is_static {
                    self.writer.write("#");
                }
                self.writer.write("[");
                if let Some(ty) = &array.elem_ty {
                    self.ty(&ty.node);
                    self.writer.write(";");
                    if !array.elements.is_empty() {
                        self.writer.write(" ");
                    }
                }
                self.expr_items(&array.elements);
                self.writer.write("]");
            }
            Expr::Tuple(a, b) => {
                self.writer.write("$(");
                self.expr_items([a.as_ref(), b.as_ref()]);
                self.writer.write(")");
            }
            Expr::Triple(a, b, c) => {
                self.writer.write("$$(");
                self.expr_items([a.as_ref(), b.as_ref(), c.as_ref()]);
                self.writer.write(")");
            }
            Expr::StructLit(lit) => {
                self.writer.write(&lit.name);
                if let Some(args) = &lit.generic_args {
                    self.type_list("<", args, ">");
                }
                if lit.fields.is_empty() {
                    self.writer.write(" {}");
                    return;
                }
                self.writer.write(" { ");
                for (i, field) in lit.fields.iter().enumerate() {
                    if i > 0 {
                        self.writer.write(", ");
                    }
                    self.writer.write(&field.node.name);
                    self.writer.write(" = ");
                    self.expr(&field.node.value.node, LEVEL_CONDITIONAL, true);
                }
                self.writer.write(" }");
            }
            Expr::Lambda(lambda) => {
                self.writer.write("fn");
                self.params(&lambda.params);
                self.writer.write(" ");
                match &lambda.body {
                    LambdaBody::Expr(body) => self.expr(&body.node, LEVEL_CONDITIONAL, open_right),
                    LambdaBody::Block(body) => self.block(&body.node),
                }
            }
            Expr::Directive(directive) => self.directive(directive),
            Expr::Sigil { name, args } => {
                self.writer.write("$");
                self.writer.write(name);
                if let Some(args) = args {
                    self.expr_list("(", args, ")");
                }
            }
        }
    }

    fn directive(&mut self, directive: &Directive) {
        self.writer.write("#");
        self.writer.write(directives::as_str(directive.id()));
        match directive {
            Directive::Env => {}
            Directive::ResetAllocator => self.writer.write("()"),
            Directive::Len(e) | Directive::Free(e) | Directive::SetAllocator(e) => {
                self.writer.write("(");
                self.expr(&e.node, LEVEL_CONDITIONAL, true);
                self.writer.write(")");
            }
            Directive::Size(ty) => {
                self.writer.write("(");
                self.ty(&ty.node);
                self.writer.write(")");
            }
            Directive::Ident(name) => {
                self.writer.write("(");
                self.writer.write(name);
                self.writer.write(")");
            }
            Directive::Alloc { ty, count } => {
                self.writer.write("(");
                self.ty(&ty.node);
                self.optional_count(count.as_deref());
                self.writer.write(")");
            }
            Directive::Realloc { ptr, ty, count } => {
                self.writer.write("(");
                self.expr(&ptr.node, LEVEL_CONDITIONAL, true);
                self.writer.write(", ");
                self.ty(&ty.node);
                self.optional_count(count.as_deref());
                self.writer.write(")");
            }
        }
    }

    fn optional_count(&mut self, count: Option<&Spanned<Expr>>) {
        if let Some(count) = count {
            self.writer.write(", ");
            self.expr(&count.node, LEVEL_CONDITIONAL, true);
        }
    }

    fn expr_list(&mut self, open: &str, items: &[Spanned<Expr>], close: &str) {
        self.writer.write(open);
        self.expr_items(items);
        self.writer.write(close);
    }

    fn expr_items<'e>(&mut self, items: impl IntoIterator<Item = &'e Spanned<Expr>>) {
        for (i, item) in items.into_iter().enumerate() {
            if i > 0 {
                self.writer.write(", ");
            }
            self.expr(&item.node, LEVEL_CONDITIONAL, true);
        }
    }

    // ========================================================================
    // Types
    // ========================================================================

    fn ty(&mut self, ty: &Type) {
        match ty {
            Type::Primitive(p) => self.writer.write(&p.to_string()),
            Type::Named(name) => self.writer.write(name),
            Type::Array { element, dims } => {
                self.ty(&element.node);
                self.writer.write(&"[]".repeat(*dims));
            }
            Type::Pointer { base, depth } => {
                self.ty(&base.node);
                self.writer.write(&"*".repeat(*depth));
            }
            Type::Generic { name, args } => {
                self.writer.write(name);
                self.type_list("<", args, ">");
            }
            Type::Tuple(first, second) => {
                self.writer.write("(");
                self.ty(&first.node);
                self.writer.write(", ");
                self.ty(&second.node);
                self.writer.write(")");
            }
        }
    }

    fn type_list(&mut self, open: &str, types: &[Spanned<Type>], close: &str) {
        self.writer.write(open);
        for (i, ty) in types.iter().enumerate() {
            if i > 0 {
                self.writer.write(", ");
            }
            self.ty(&ty.node);
        }
        self.writer.write(close);
    }
}

/// `use`, `global` and `namespace` lines are kept together without blank lines.
fn is_header(decl: &Declaration) -> bool {
    matches!(
        decl,
        Declaration::Import(_) | Declaration::Global(_) | Declaration::Namespace(_)
    )
}

/// How tightly `expr` binds when it appears as an operand.
fn level(expr: &Expr) -> u8 {
    match expr {
        Expr::Conditional(_) => LEVEL_CONDITIONAL,
        Expr::Binary(_, op, _) => op.precedence(),
        Expr::Range { inclusive, .. } => {
            let id = if *inclusive { OperatorId::DotDotEq } else { OperatorId::DotDot };
            operators::info_for(id).precedence
        }
        Expr::Unary(..) | Expr::Cast(..) => LEVEL_PREFIX,
        Expr::Lambda(lambda) => match lambda.body {
            LambdaBody::Expr(_) => LEVEL_PREFIX,
            LambdaBody::Block(_) => LEVEL_PRIMARY,
        },
        Expr::Call(_) | Expr::Member(..) | Expr::Subscript(..) => LEVEL_POSTFIX,
        _ => LEVEL_PRIMARY,
    }
}

/// Minimum operand levels `(left, right)` for an infix operator.
fn operand_levels(prec: u8, assoc: Associativity) -> (u8, u8) {
    match assoc {
        Associativity::Left => (prec, prec + 1),
        Associativity::Right => (prec + 1, prec),
        Associativity::None => (prec + 1, prec + 1),
    }
}

/// Whether `expr` prints with a leading `-`, `+`, `*`, `&` or `[`, which after `(Name)` would make
/// the parser read a binary expression or subscript instead of a cast.
fn starts_with_infix_spelling(expr: &Expr) -> bool {
    match expr {
        Expr::Unary(op, _) => matches!(op, UnaryOp::Neg | UnaryOp::Plus | UnaryOp::Deref | UnaryOp::AddrOf),
        Expr::Array(array) => !array.is_static,
        Expr::Call(call) => leads_postfix(&call.callee.node),
        Expr::Member(object, _) | Expr::Subscript(object, _) => leads_postfix(&object.node),
        _ => false,
    }
}

/// The head of a postfix chain prints bare unless it binds looser than a postfix operator.
fn leads_postfix(object: &Expr) -> bool {
    level(object) >= LEVEL_POSTFIX && starts_with_infix_spelling(object)
}
