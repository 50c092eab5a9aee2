#[cfg(test)]
/// Parser unit tests.
///
/// These tests focus on how the ambiguous corners of the grammar resolve (precedence, casts, generic
/// calls, struct literals, dangling `else`) and on error recovery.
mod tests {
    use super::*;
    use crate::lexer;

    fn parse_str(source: &str) -> Result<Program, Vec<CompileError>> {
        let tokens = lexer::lex(source)?;
        parse(&tokens)
    }

    fn parse_ok(source: &str) -> Program {
        match parse_str(source) {
            Ok(program) => program.without_spans(),
            Err(errors) => panic!("failed to parse {source:?}: {errors:#?}"),
        }
    }

    fn parse_errors(source: &str) -> Vec<CompileError> {
        parse_str(source).expect_err("source should not parse")
    }

    /// Statements of the first function's body.
    fn body(program: &Program) -> &[Spanned<Statement>] {
        match &program.declarations[0].node {
            Declaration::Function(FunctionDecl { body: Some(body), .. }) => &body.node.statements,
            other => panic!("expected function with body, got {other:?}"),
        }
    }

    fn statements(source: &str) -> Vec<Statement> {
        let program = parse_ok(&format!("fn main() {{ {source} }}"));
        body(&program).iter().map(|s| s.node.clone()).collect()
    }

    /// Parse `source` as the initializer of `let x = ...;`.
    fn expr(source: &str) -> Expr {
        match statements(&format!("let x = {source};")).remove(0) {
            Statement::VarDecl(VarDecl { init: Some(init), .. }) => init.node,
            other => panic!("expected declaration, got {other:?}"),
        }
    }

    fn sp<T>(node: T) -> Spanned<T> {
        Spanned::new(node, Span::default())
    }

    fn id(name: &str) -> Spanned<Expr> {
        sp(Expr::Ident(name.to_string()))
    }

    fn num(text: &str) -> Spanned<Expr> {
        sp(Expr::Number(NumberLit::new(NumberKind::Decimal, text)))
    }

    fn bin(left: Spanned<Expr>, op: BinaryOp, right: Spanned<Expr>) -> Spanned<Expr> {
        sp(Expr::Binary(Box::new(left), op, Box::new(right)))
    }

    fn named(name: &str) -> Spanned<Type> {
        sp(Type::Named(name.to_string()))
    }

    fn prim(primitive: PrimitiveType) -> Spanned<Type> {
        sp(Type::Primitive(primitive))
    }

    // ---- Expressions ----------------------------------------------------------------------------

    #[test]
    fn test_multiplication_binds_tighter_than_addition() {
        assert_eq!(
            expr("1 + 2 * 3"),
            bin(num("1"), BinaryOp::Add, bin(num("2"), BinaryOp::Mul, num("3"))).node
        );
    }

    #[test]
    fn test_logical_and_binds_tighter_than_or() {
        assert_eq!(
            expr("a || b && c"),
            bin(id("a"), BinaryOp::Or, bin(id("b"), BinaryOp::And, id("c"))).node
        );
    }

    #[test]
    fn test_subtraction_is_left_associative() {
        assert_eq!(
            expr("a - b - c"),
            bin(bin(id("a"), BinaryOp::Sub, id("b")), BinaryOp::Sub, id("c")).node
        );
    }

    #[test]
    fn test_full_precedence_ladder() {
        // `<>` sits between `&&` and `|`; shifts between relational and additive.
        assert_eq!(
            expr("a <> b | c"),
            bin(id("a"), BinaryOp::Concat, bin(id("b"), BinaryOp::BitOr, id("c"))).node
        );
        assert_eq!(
            expr("a < b << 1"),
            bin(id("a"), BinaryOp::Lt, bin(id("b"), BinaryOp::Shl, num("1"))).node
        );
        assert_eq!(
            expr("a & b == c"),
            bin(id("a"), BinaryOp::BitAnd, bin(id("b"), BinaryOp::Eq, id("c"))).node
        );
    }

    #[test]
    fn test_range_is_right_associative() {
        let range = |start, end| {
            sp(Expr::Range {
                start: Box::new(start),
                end: Box::new(end),
                inclusive: false,
            })
        };
        assert_eq!(expr("a..b..c"), range(id("a"), range(id("b"), id("c"))).node);
        match expr("0..=n") {
            Expr::Range { inclusive, .. } => assert!(inclusive),
            other => panic!("expected range, got {other:?}"),
        }
    }

    #[test]
    fn test_unary_operators_nest_and_bind_tightest() {
        assert_eq!(
            expr("-a * b"),
            bin(sp(Expr::Unary(UnaryOp::Neg, Box::new(id("a")))), BinaryOp::Mul, id("b")).node
        );
        assert_eq!(
            expr("!~*p"),
            Expr::Unary(
                UnaryOp::Not,
                Box::new(sp(Expr::Unary(
                    UnaryOp::BitNot,
                    Box::new(sp(Expr::Unary(UnaryOp::Deref, Box::new(id("p")))))
                )))
            )
        );
    }

    #[test]
    fn test_prefix_and_and_is_double_address_of() {
        let addr = |inner: Spanned<Expr>| sp(Expr::Unary(UnaryOp::AddrOf, Box::new(inner)));
        assert_eq!(expr("&&x"), addr(addr(id("x"))).node);
        assert_eq!(statements("p = &&x;"), statements("p = & &x;"));
        // Infix `&&` is still logical and.
        assert_eq!(expr("a && b"), bin(id("a"), BinaryOp::And, id("b")).node);
        assert_eq!(expr("a && &&b"), bin(id("a"), BinaryOp::And, addr(addr(id("b")))).node);
    }

    #[test]
    fn test_postfix_chains_left_to_right() {
        // a.b[c].d(e)
        let member_b = sp(Expr::Member(Box::new(id("a")), "b".to_string()));
        let index = sp(Expr::Subscript(Box::new(member_b), Box::new(id("c"))));
        let member_d = sp(Expr::Member(Box::new(index), "d".to_string()));
        let call = Expr::Call(Box::new(CallExpr {
            callee: member_d,
            generic_args: None,
            args: vec![id("e")],
        }));
        assert_eq!(expr("a.b[c].d(e)"), call);
    }

    #[test]
    fn test_adjacent_angle_is_generic_call() {
        match expr("add<i32>(a, b)") {
            Expr::Call(call) => {
                assert_eq!(call.callee, id("add"));
                assert_eq!(call.generic_args, Some(vec![prim(PrimitiveType::I32)]));
                assert_eq!(call.args, vec![id("a"), id("b")]);
            }
            other => panic!("expected call, got {other:?}"),
        }
    }

    #[test]
    fn test_spaced_angle_is_comparison() {
        assert_eq!(expr("a < b"), bin(id("a"), BinaryOp::Lt, id("b")).node);
        // Adjacent, but no `(` after the closing `>`: still comparisons.
        assert_eq!(
            expr("a<b > c"),
            bin(bin(id("a"), BinaryOp::Lt, id("b")), BinaryOp::Gt, id("c")).node
        );
    }

    #[test]
    fn test_nested_generic_call_splits_shift_token() {
        match expr("make<Vec<i32>>(n)") {
            Expr::Call(call) => {
                let args = call.generic_args.expect("generic args");
                assert_eq!(
                    args[0].node,
                    Type::Generic {
                        name: "Vec".to_string(),
                        args: vec![prim(PrimitiveType::I32)],
                    }
                );
            }
            other => panic!("expected call, got {other:?}"),
        }
    }

    #[test]
    fn test_parenthesized_type_before_operand_is_cast() {
        assert_eq!(
            expr("(i32) x"),
            Expr::Cast(Box::new(prim(PrimitiveType::I32)), Box::new(id("x")))
        );
        assert_eq!(
            expr("(i32) -x"),
            Expr::Cast(
                Box::new(prim(PrimitiveType::I32)),
                Box::new(sp(Expr::Unary(UnaryOp::Neg, Box::new(id("x")))))
            )
        );
        match expr("(Point*) p") {
            Expr::Cast(ty, _) => assert!(matches!(ty.node, Type::Pointer { depth: 1, .. })),
            other => panic!("expected cast, got {other:?}"),
        }
    }

    #[test]
    fn test_parenthesized_expression_is_not_cast() {
        assert_eq!(
            expr("(x + 1)"),
            Expr::Paren(Box::new(bin(id("x"), BinaryOp::Add, num("1"))))
        );
        // A bare name followed by a binary-capable operator stays an operand.
        assert_eq!(
            expr("(a) - b"),
            bin(sp(Expr::Paren(Box::new(id("a")))), BinaryOp::Sub, id("b")).node
        );
        // A named type followed by a plain operand is a cast.
        assert!(matches!(expr("(Meters) n"), Expr::Cast(..)));
    }

    #[test]
    fn test_conditional_and_shorthand() {
        match expr("a ? b : c ? d : e") {
            Expr::Conditional(cond) => {
                assert_eq!(cond.condition, id("a"));
                assert_eq!(cond.consequence, Some(id("b")));
                assert!(matches!(cond.alternative.node, Expr::Conditional(_)));
            }
            other => panic!("expected conditional, got {other:?}"),
        }
        match expr("value ? : fallback") {
            Expr::Conditional(cond) => {
                assert_eq!(cond.consequence, None);
                assert_eq!(cond.alternative, id("fallback"));
            }
            other => panic!("expected conditional, got {other:?}"),
        }
    }

    #[test]
    fn test_struct_literal_with_field_initializers() {
        let expected = Expr::StructLit(StructLit {
            name: "Point".to_string(),
            generic_args: None,
            fields: vec![
                sp(FieldInit {
                    name: "x".to_string(),
                    value: num("1"),
                }),
                sp(FieldInit {
                    name: "y".to_string(),
                    value: num("2"),
                }),
            ],
        });
        assert_eq!(expr("Point { x = 1, y = 2 }"), expected);
        match expr("Pair<i32> { first = 1, }") {
            Expr::StructLit(lit) => {
                assert_eq!(lit.generic_args, Some(vec![prim(PrimitiveType::I32)]));
                assert_eq!(lit.fields.len(), 1);
            }
            other => panic!("expected struct literal, got {other:?}"),
        }
    }

    #[test]
    fn test_identifier_statement_then_block_is_not_struct_literal() {
        let stmts = statements("Point; { }");
        assert_eq!(stmts.len(), 2);
        assert_eq!(stmts[0], Statement::Expr(id("Point")));
        assert_eq!(stmts[1], Statement::Block(Block { statements: vec![] }));
    }

    #[test]
    fn test_struct_literal_not_taken_in_if_header() {
        let stmts = statements("if ready { go = 1; }");
        match &stmts[0] {
            Statement::If(stmt) => {
                assert_eq!(stmt.condition, id("ready"));
                assert_eq!(stmt.then_block.node.statements.len(), 1);
            }
            other => panic!("expected if, got {other:?}"),
        }
        // Parentheses lift the restriction.
        match &statements("if (p == Point { x = 1 }) { }")[0] {
            Statement::If(stmt) => assert!(matches!(stmt.condition.node, Expr::Binary(_, BinaryOp::Eq, _))),
            other => panic!("expected if, got {other:?}"),
        }
    }

    #[test]
    fn test_array_literals() {
        match expr("[i32; 1, 2, 3,]") {
            Expr::Array(array) => {
                assert_eq!(array.elem_ty, Some(prim(PrimitiveType::I32)));
                assert!(!array.is_static);
                assert_eq!(array.elements.len(), 3);
            }
            other => panic!("expected array, got {other:?}"),
        }
        match expr("#[a, b]") {
            Expr::Array(array) => {
                assert_eq!(array.elem_ty, None);
                assert!(array.is_static);
                assert_eq!(array.elements, vec![id("a"), id("b")]);
            }
            other => panic!("expected array, got {other:?}"),
        }
    }

    #[test]
    fn test_tuple_and_triple_literals() {
        assert_eq!(expr("$(a, b)"), Expr::Tuple(Box::new(id("a")), Box::new(id("b"))));
        assert_eq!(
            expr("$$(a, b, c)"),
            Expr::Triple(Box::new(id("a")), Box::new(id("b")), Box::new(id("c")))
        );
    }

    #[test]
    fn test_tuple_arity_is_enforced() {
        let errors = parse_errors("fn main() { let t = $(a, b, c); }");
        assert_eq!(errors[0].parse_kind(), Some(ParseErrorKind::InvalidArity));
        let errors = parse_errors("fn main() { let t = $$(a, b); }");
        assert_eq!(errors[0].parse_kind(), Some(ParseErrorKind::InvalidArity));
    }

    #[test]
    fn test_sigils() {
        assert_eq!(
            expr("$fmt"),
            Expr::Sigil {
                name: "fmt".to_string(),
                args: None,
            }
        );
        assert_eq!(
            expr("$dbg(x, 1)"),
            Expr::Sigil {
                name: "dbg".to_string(),
                args: Some(vec![id("x"), num("1")]),
            }
        );
    }

    #[test]
    fn test_directives_follow_registry_shapes() {
        assert_eq!(expr("#len(xs)"), Expr::Directive(Directive::Len(Box::new(id("xs")))));
        assert_eq!(
            expr("#size(i32*)"),
            Expr::Directive(Directive::Size(sp(Type::Pointer {
                base: Box::new(prim(PrimitiveType::I32)),
                depth: 1,
            })))
        );
        assert_eq!(expr("#i(counter)"), Expr::Directive(Directive::Ident("counter".to_string())));
        assert_eq!(expr("#env"), Expr::Directive(Directive::Env));
        assert_eq!(
            expr("#alloc(Node)"),
            Expr::Directive(Directive::Alloc {
                ty: named("Node"),
                count: None,
            })
        );
        assert_eq!(
            expr("#alloc(i8, n * 2)"),
            Expr::Directive(Directive::Alloc {
                ty: prim(PrimitiveType::I8),
                count: Some(Box::new(bin(id("n"), BinaryOp::Mul, num("2")))),
            })
        );
        assert_eq!(
            expr("#realloc(p, i32, 32)"),
            Expr::Directive(Directive::Realloc {
                ptr: Box::new(id("p")),
                ty: prim(PrimitiveType::I32),
                count: Some(Box::new(num("32"))),
            })
        );
        assert_eq!(expr("#reset_allocator()"), Expr::Directive(Directive::ResetAllocator));
    }

    #[test]
    fn test_unknown_directive_is_an_error() {
        let errors = parse_errors("fn main() { let n = #sizeof(i32); }");
        assert_eq!(errors[0].parse_kind(), Some(ParseErrorKind::UnknownDirective));
        assert!(errors[0].message.contains("#sizeof"), "{}", errors[0].message);
    }

    #[test]
    fn test_wrong_directive_operands_are_errors() {
        for source in [
            "fn main() { let n = #len(a, b); }",
            "fn main() { let n = #alloc(); }",
            "fn main() { let n = #reset_allocator(x); }",
            "fn main() { let n = #realloc(p); }",
            "fn main() { let n = #env(); }",
            "fn main() { let n = #env(x); }",
            "fn main() { let n = #env (1, 2); }",
        ] {
            let errors = parse_errors(source);
            assert_eq!(errors[0].parse_kind(), Some(ParseErrorKind::ExpectedOperand), "{source}");
            assert!(!errors[0].hints.is_empty(), "{source} should carry a usage hint");
        }
        let errors = parse_errors("fn main() { let n = #size(1); }");
        assert_eq!(errors[0].parse_kind(), Some(ParseErrorKind::ExpectedType));
    }

    #[test]
    fn test_lambdas() {
        match expr("fn(i32 a) a + 1") {
            Expr::Lambda(lambda) => {
                assert_eq!(lambda.params.params.len(), 1);
                assert!(matches!(lambda.body, LambdaBody::Expr(_)));
            }
            other => panic!("expected lambda, got {other:?}"),
        }
        match expr("fn() { return 1; }") {
            Expr::Lambda(lambda) => assert!(matches!(lambda.body, LambdaBody::Block(_))),
            other => panic!("expected lambda, got {other:?}"),
        }
    }

    #[test]
    fn test_qualified_and_exact_names() {
        assert_eq!(
            expr("io::println(1)"),
            Expr::Call(Box::new(CallExpr {
                callee: sp(Expr::Qualified(vec!["io".to_string(), "println".to_string()])),
                generic_args: None,
                args: vec![num("1")],
            }))
        );
        assert_eq!(expr("`odd name`"), Expr::Exact("odd name".to_string()));
    }

    #[test]
    fn test_missing_operand_after_operator() {
        let errors = parse_errors("fn main() { let x = 1 + ; }");
        assert_eq!(errors[0].parse_kind(), Some(ParseErrorKind::ExpectedOperand));
    }

    // ---- Statements -----------------------------------------------------------------------------

    #[test]
    fn test_variable_declaration_forms() {
        let stmts = statements("i32 a = 1; let b = 2; c := 3; string d; i32 *p = &a;");
        let bindings: Vec<(Binding, &str, bool)> = stmts
            .iter()
            .map(|s| match s {
                Statement::VarDecl(decl) => (decl.binding, decl.name.as_str(), decl.init.is_some()),
                other => panic!("expected declaration, got {other:?}"),
            })
            .collect();
        assert_eq!(
            bindings,
            vec![
                (Binding::Typed, "a", true),
                (Binding::Let, "b", true),
                (Binding::Walrus, "c", true),
                (Binding::Typed, "d", false),
                (Binding::Typed, "p", true),
            ]
        );
    }

    #[test]
    fn test_static_buffer_vs_subscript_assignment() {
        let stmts = statements("char buf[64]; buf[0] = 'a';");
        match &stmts[0] {
            Statement::StaticBuffer(buffer) => {
                assert_eq!(buffer.ty, prim(PrimitiveType::Char));
                assert_eq!(buffer.name, "buf");
                assert_eq!(buffer.size, num("64"));
            }
            other => panic!("expected static buffer, got {other:?}"),
        }
        match &stmts[1] {
            Statement::Assign(assign) => {
                assert!(matches!(assign.target.node, Expr::Subscript(..)));
                assert_eq!(assign.op, AssignOp::Assign);
            }
            other => panic!("expected assignment, got {other:?}"),
        }
    }

    #[test]
    fn test_compound_assignments() {
        let ops: Vec<AssignOp> = statements("a += 1; a <>= s; a >>= 2; a = b;")
            .into_iter()
            .map(|s| match s {
                Statement::Assign(assign) => assign.op,
                other => panic!("expected assignment, got {other:?}"),
            })
            .collect();
        assert_eq!(ops, vec![AssignOp::Add, AssignOp::Concat, AssignOp::Shr, AssignOp::Assign]);
    }

    #[test]
    fn test_dangling_else_builds_a_chain() {
        let stmts = statements("if a { } else if b { } else { }");
        assert_eq!(stmts.len(), 1);
        let Statement::If(first) = &stmts[0] else {
            panic!("expected if, got {:?}", stmts[0]);
        };
        assert_eq!(first.condition, id("a"));
        let Some(ElseBranch::If(second)) = &first.else_branch else {
            panic!("expected else-if, got {:?}", first.else_branch);
        };
        assert_eq!(second.node.condition, id("b"));
        assert!(matches!(second.node.else_branch, Some(ElseBranch::Block(_))));
    }

    #[test]
    fn test_header_parentheses_are_optional() {
        assert_eq!(statements("while (n > 0) { }"), statements("while n > 0 { }"));
        assert_eq!(statements("if (ok) { }"), statements("if ok { }"));
    }

    #[test]
    fn test_for_loop_forms() {
        let with_parens = statements("for (i32 i = 0; i < n; i += 1) { }");
        let without = statements("for i32 i = 0; i < n; i += 1 { }");
        assert_eq!(with_parens, without);
        match &with_parens[0] {
            Statement::For(stmt) => {
                assert!(matches!(stmt.init, ForInit::VarDecl(_)));
                assert!(matches!(stmt.step, ForStep::Assign(_)));
            }
            other => panic!("expected for, got {other:?}"),
        }

        match &statements("for let i = 0; i < n; next(i) { }")[0] {
            Statement::For(stmt) => {
                assert!(matches!(stmt.init, ForInit::VarDecl(_)));
                assert!(matches!(stmt.step, ForStep::Expr(_)));
            }
            other => panic!("expected for, got {other:?}"),
        }

        match &statements("for item in items { }")[0] {
            Statement::ForEach(stmt) => {
                assert_eq!(stmt.binding, "item");
                assert_eq!(stmt.iterable, id("items"));
            }
            other => panic!("expected for-each, got {other:?}"),
        }
    }

    #[test]
    fn test_simple_statements() {
        let stmts = statements("defer #free(p); return; return 1; break; continue; ;");
        assert!(matches!(stmts[0], Statement::Defer(_)));
        assert_eq!(stmts[1], Statement::Return(None));
        assert_eq!(stmts[2], Statement::Return(Some(num("1"))));
        assert_eq!(stmts[3], Statement::Break);
        assert_eq!(stmts[4], Statement::Continue);
        assert_eq!(stmts.len(), 5);
    }

    // ---- Declarations ---------------------------------------------------------------------------

    #[test]
    fn test_top_level_directives() {
        let program = parse_ok("use std/io; use string; global pub, external; namespace app;");
        let kinds: Vec<&Declaration> = program.declarations.iter().map(|d| &d.node).collect();
        assert_eq!(
            kinds[0],
            &Declaration::Import(ImportDecl {
                path: ModulePath(vec!["std".to_string(), "io".to_string()]),
            })
        );
        assert_eq!(
            kinds[1],
            &Declaration::Import(ImportDecl {
                path: ModulePath(vec!["string".to_string()]),
            })
        );
        assert_eq!(
            kinds[2],
            &Declaration::Global(GlobalDirective {
                options: vec![GlobalOption::Pub, GlobalOption::External],
            })
        );
        assert_eq!(kinds[3], &Declaration::Namespace("app".to_string()));
    }

    #[test]
    fn test_function_with_everything() {
        let program = parse_ok("pub fn max<T>(ElleMeta meta, T a, T b, ...) @inline @section(\"hot\") -> T { }");
        let Declaration::Function(func) = &program.declarations[0].node else {
            panic!("expected function");
        };
        assert!(func.modifiers.is_pub());
        assert_eq!(func.name.node, DeclName::Plain("max".to_string()));
        assert_eq!(func.generics, vec!["T".to_string()]);
        assert_eq!(func.params.meta.as_deref(), Some("meta"));
        assert_eq!(func.params.params.len(), 3);
        assert_eq!(func.params.params[2].node, Param::Variadic { name: None });
        assert_eq!(func.attributes.len(), 2);
        assert_eq!(func.attributes[0].node.args, None);
        assert_eq!(func.attributes[1].node.args.as_ref().map(Vec::len), Some(1));
        assert_eq!(func.return_type, Some(named("T")));
    }

    #[test]
    fn test_external_functions_and_prototypes() {
        let program = parse_ok("external fn printf(string, ...); fn helper(i32, @nofmt string s);");
        match &program.declarations[0].node {
            Declaration::ExternalFunction(func) => {
                assert!(func.body.is_none());
                assert_eq!(func.params.params[0].node, Param::Unnamed { ty: prim(PrimitiveType::String) });
            }
            other => panic!("expected external function, got {other:?}"),
        }
        match &program.declarations[1].node {
            Declaration::Function(func) => {
                assert!(func.body.is_none());
                assert!(matches!(func.params.params[1].node, Param::NoFormat { .. }));
            }
            other => panic!("expected prototype, got {other:?}"),
        }

        let errors = parse_errors("external fn f() { }");
        assert!(errors[0].message.contains("cannot have a body"), "{}", errors[0].message);
    }

    #[test]
    fn test_qualified_and_exact_function_names() {
        let program = parse_ok("fn Vec::push() { } fn `my-symbol`() { }");
        let names: Vec<String> = program
            .declarations
            .iter()
            .map(|d| match &d.node {
                Declaration::Function(func) => func.name.node.to_string(),
                other => panic!("expected function, got {other:?}"),
            })
            .collect();
        assert_eq!(names, vec!["Vec::push", "`my-symbol`"]);
    }

    #[test]
    fn test_contradictory_modifiers_are_kept_in_order() {
        let program = parse_ok("pub !pub local fn f() { }");
        let Declaration::Function(func) = &program.declarations[0].node else {
            panic!("expected function");
        };
        let seen: Vec<String> = func.modifiers.0.iter().map(ToString::to_string).collect();
        assert_eq!(seen, vec!["pub", "!pub", "local"]);
        assert!(!func.modifiers.is_pub());
        assert!(func.modifiers.is_local());
    }

    #[test]
    fn test_constants() {
        let program = parse_ok("const i32 LIMIT = 10; pub const NAME = \"elle\";");
        match &program.declarations[0].node {
            Declaration::Constant(c) => {
                assert_eq!(c.ty, Some(prim(PrimitiveType::I32)));
                assert_eq!(c.name, "LIMIT");
            }
            other => panic!("expected constant, got {other:?}"),
        }
        match &program.declarations[1].node {
            Declaration::Constant(c) => {
                assert_eq!(c.ty, None);
                assert!(c.modifiers.is_pub());
            }
            other => panic!("expected constant, got {other:?}"),
        }
    }

    #[test]
    fn test_structs_accept_both_field_forms() {
        let program = parse_ok("struct Pair<A, B> { A first; second: B; }; struct Empty { }");
        match &program.declarations[0].node {
            Declaration::Struct(s) => {
                assert_eq!(s.name, "Pair");
                assert_eq!(s.generics, vec!["A".to_string(), "B".to_string()]);
                let fields: Vec<(&str, &Type)> = s.fields.iter().map(|f| (f.node.name.as_str(), &f.node.ty.node)).collect();
                assert_eq!(
                    fields,
                    vec![
                        ("first", &Type::Named("A".to_string())),
                        ("second", &Type::Named("B".to_string())),
                    ]
                );
            }
            other => panic!("expected struct, got {other:?}"),
        }
        assert_eq!(program.declarations.len(), 2);
    }

    #[test]
    fn test_type_suffixes_apply_left_to_right() {
        let program = parse_ok("fn f(i32*[] a, char[][] b, (i32, string) c) { }");
        let Declaration::Function(func) = &program.declarations[0].node else {
            panic!("expected function");
        };
        let types: Vec<&Type> = func
            .params
            .params
            .iter()
            .map(|p| match &p.node {
                Param::Named { ty, .. } => &ty.node,
                other => panic!("expected named param, got {other:?}"),
            })
            .collect();
        assert_eq!(
            types[0],
            &Type::Array {
                element: Box::new(sp(Type::Pointer {
                    base: Box::new(prim(PrimitiveType::I32)),
                    depth: 1,
                })),
                dims: 1,
            }
        );
        assert!(matches!(types[1], Type::Array { dims: 2, .. }));
        assert!(matches!(types[2], Type::Tuple(..)));
    }

    #[test]
    fn test_tuple_type_arity_is_enforced() {
        let errors = parse_errors("fn f((i32, i32, i32) t) { }");
        assert_eq!(errors[0].parse_kind(), Some(ParseErrorKind::InvalidArity));
    }

    // ---- Errors and recovery --------------------------------------------------------------------

    #[test]
    fn test_recovery_reports_errors_from_several_declarations() {
        let source = "fn a() { let = 1; }\nfn b() { return 2 }\nfn c() { }";
        let tokens = lexer::lex(source).expect("lexes");
        let (program, errors) = parse_partial(&tokens, ParseOptions::default());
        assert_eq!(errors.len(), 2, "{errors:#?}");
        assert_eq!(program.declarations.len(), 3);
    }

    #[test]
    fn test_recovery_off_stops_at_first_error() {
        let tokens = lexer::lex("fn a() { let = 1; } fn b() { return 2 }").expect("lexes");
        let errors = parse_with(&tokens, ParseOptions::new().with_recovery(false)).expect_err("fails");
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_stray_top_level_tokens_are_expected_declaration() {
        let errors = parse_errors("x = 1; fn ok() { }");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].parse_kind(), Some(ParseErrorKind::ExpectedDeclaration));
    }

    #[test]
    fn test_unclosed_brace_is_unbalanced() {
        let errors = parse_errors("fn main() { if a { ");
        assert!(
            errors
                .iter()
                .any(|e| e.parse_kind() == Some(ParseErrorKind::UnbalancedDelimiter)),
            "{errors:#?}"
        );
        let errors = parse_errors("fn main() { f(a, b; }");
        assert_eq!(errors[0].parse_kind(), Some(ParseErrorKind::UnbalancedDelimiter), "{errors:#?}");
    }

    #[test]
    fn test_unclosed_call_before_semicolon_is_unbalanced() {
        let source = "fn m() { x = f(a; }";
        let errors = parse_errors(source);
        assert_eq!(errors[0].parse_kind(), Some(ParseErrorKind::UnbalancedDelimiter), "{errors:#?}");
        assert!(errors[0].message.contains('('), "{}", errors[0].message);
        assert_eq!(&source[errors[0].span.start..errors[0].span.end], ";");

        for source in ["fn m() { x = a[1; }", "fn m() { x = (a + b; }", "fn m() { x = f(a }"] {
            let errors = parse_errors(source);
            assert_eq!(errors[0].parse_kind(), Some(ParseErrorKind::UnbalancedDelimiter), "{source}");
        }
    }

    #[test]
    fn test_deep_nesting_is_too_deep() {
        let source = format!("fn main() {{ let x = {}1{}; }}", "(".repeat(200), ")".repeat(200));
        let tokens = lexer::lex(&source).expect("lexes");
        let errors = parse_with(&tokens, ParseOptions::new().with_max_depth(32)).expect_err("too deep");
        assert!(
            errors.iter().any(|e| e.parse_kind() == Some(ParseErrorKind::TooDeep)),
            "{errors:#?}"
        );

        // The same input is fine with a generous limit.
        let shallow = format!("fn main() {{ let x = {}1{}; }}", "(".repeat(20), ")".repeat(20));
        let tokens = lexer::lex(&shallow).expect("lexes");
        assert!(parse_with(&tokens, ParseOptions::new().with_max_depth(256)).is_ok());
    }

    /// Parse with default options on a thread with a 2 MB stack, the default for spawned threads.
    fn parse_on_small_stack(source: String) -> Result<Program, Vec<CompileError>> {
        std::thread::Builder::new()
            .stack_size(2 << 20)
            .spawn(move || parse_str(&source))
            .expect("spawns")
            .join()
            .expect("parser thread should not overflow its stack")
    }

    fn nested_parens(n: usize) -> String {
        format!("fn m() {{ x = {}1{}; }}", "(".repeat(n), ")".repeat(n))
    }

    #[test]
    fn test_default_depth_limit_fits_on_small_stack() {
        assert!(parse_on_small_stack(nested_parens(250)).is_ok());

        let calls = format!("fn m() {{ x = {}1{}; }}", "f(".repeat(150), ")".repeat(150));
        assert!(parse_on_small_stack(calls).is_ok());

        let blocks = format!("fn m() {{ {}{} }}", "{".repeat(150), "}".repeat(150));
        assert!(parse_on_small_stack(blocks).is_ok());
    }

    #[test]
    fn test_very_deep_input_is_too_deep_not_a_crash() {
        let errors = parse_on_small_stack(nested_parens(100_000)).expect_err("too deep");
        assert!(
            errors.iter().any(|e| e.parse_kind() == Some(ParseErrorKind::TooDeep)),
            "{errors:#?}"
        );
    }

    #[test]
    fn test_error_spans_point_at_offending_token() {
        let source = "fn main() { let x = ; }";
        let errors = parse_errors(source);
        let span = errors[0].span;
        assert_eq!(&source[span.start..span.end], ";");
    }
}
