//! Property-based tests for the Elle frontend
//!
//! Generated programs are valid source by construction. The properties:
//! - rendering a token stream and lexing it again yields the same token kinds
//! - printing a parsed program and parsing the output yields the same tree (spans aside)
//! - printing is idempotent

use elle_core::lang::keywords;
use elle_syntax::lexer::{self, TokenKind};
use elle_syntax::parser;
use elle_syntax::printer::{PrintConfig, print_program};
use proptest::prelude::*;

// =============================================================================
// Strategies
// =============================================================================

fn ident() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,5}".prop_filter("not a keyword", |s| keywords::from_str(s).is_none())
}

fn number() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("0".to_string()),
        Just("42".to_string()),
        Just("3.14".to_string()),
        Just("0x1F".to_string()),
        Just("0b101".to_string()),
        Just("0o17".to_string()),
        Just("1e3".to_string()),
    ]
}

fn string_lit() -> impl Strategy<Value = String> {
    prop_oneof!["[a-z ]{0,5}".prop_map(|s| format!("\"{s}\"")), Just("\"a\\n\\t\"".to_string())]
}

fn ty() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("i32".to_string()),
        Just("char*".to_string()),
        Just("bool".to_string()),
        Just("f64[]".to_string()),
        Just("Vec<i32>".to_string()),
        Just("(i32, bool)".to_string()),
    ]
}

fn binary_op() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just("+"),
        Just("-"),
        Just("*"),
        Just("/"),
        Just("%"),
        Just("=="),
        Just("!="),
        Just("<="),
        Just(">="),
        Just("&&"),
        Just("||"),
        Just("&"),
        Just("|"),
        Just("^"),
        Just("<<"),
        Just(">>"),
        Just("<>"),
        Just(".."),
        Just("..="),
    ]
}

fn unary_op() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just("-"), Just("!"), Just("~"), Just("*"), Just("&")]
}

fn expr() -> impl Strategy<Value = String> {
    let leaf = prop_oneof![
        ident(),
        number(),
        string_lit(),
        Just("true".to_string()),
        Just("'c'".to_string()),
        Just("#env".to_string()),
    ];
    leaf.prop_recursive(4, 32, 3, |inner| {
        prop_oneof![
            (inner.clone(), binary_op(), inner.clone()).prop_map(|(a, op, b)| format!("{a} {op} {b}")),
            (unary_op(), inner.clone()).prop_map(|(op, a)| format!("{op} {a}")),
            inner.clone().prop_map(|a| format!("({a})")),
            (ident(), prop::collection::vec(inner.clone(), 0..3)).prop_map(|(f, args)| format!("{f}({})", args.join(", "))),
            (ident(), ident()).prop_map(|(a, b)| format!("{a}.{b}")),
            (ident(), inner.clone()).prop_map(|(a, i)| format!("{a}[{i}]")),
            (inner.clone(), inner.clone(), inner.clone()).prop_map(|(c, a, b)| format!("{c} ? {a} : {b}")),
            (inner.clone(), inner.clone()).prop_map(|(c, b)| format!("{c} ? : {b}")),
            (ty(), inner.clone()).prop_map(|(t, a)| format!("({t}) {a}")),
            inner.clone().prop_map(|a| format!("fn(i32 x) {a}")),
            inner.clone().prop_map(|a| format!("fn() {{ return {a}; }}")),
            (ident(), inner.clone()).prop_map(|(f, a)| format!("Point {{ {f} = {a} }}")),
            prop::collection::vec(inner.clone(), 0..3).prop_map(|items| format!("[{}]", items.join(", "))),
            (inner.clone(), inner.clone()).prop_map(|(a, b)| format!("$({a}, {b})")),
            inner.clone().prop_map(|a| format!("#len({a})")),
            (ty(), inner.clone()).prop_map(|(t, a)| format!("#alloc({t}, {a})")),
        ]
    })
}

fn statement() -> impl Strategy<Value = String> {
    let simple = prop_oneof![
        (ident(), expr()).prop_map(|(x, e)| format!("let {x} = {e};")),
        (ty(), ident(), expr()).prop_map(|(t, x, e)| format!("{t} {x} = {e};")),
        (ident(), expr()).prop_map(|(x, e)| format!("{x} := {e};")),
        (ident(), expr()).prop_map(|(x, e)| format!("{x} = {e};")),
        (ident(), expr()).prop_map(|(x, e)| format!("{x} += {e};")),
        (ident(), expr()).prop_map(|(f, e)| format!("{f}({e});")),
        expr().prop_map(|e| format!("return {e};")),
        Just("return;".to_string()),
        Just("break;".to_string()),
        (ident(), number()).prop_map(|(x, n)| format!("i32 {x}[{n}];")),
    ];
    simple.prop_recursive(2, 12, 3, |inner| {
        let body = prop::collection::vec(inner, 0..3).prop_map(|stmts| stmts.join(" "));
        prop_oneof![
            (expr(), body.clone(), body.clone()).prop_map(|(c, a, b)| format!("if ({c}) {{ {a} }} else {{ {b} }}")),
            (expr(), body.clone()).prop_map(|(c, a)| format!("while ({c}) {{ {a} }}")),
            (expr(), body.clone()).prop_map(|(c, a)| format!("for (let i = 0; {c}; i += 1) {{ {a} }}")),
            (ident(), expr(), body.clone()).prop_map(|(x, e, a)| format!("for {x} in ({e}) {{ {a} }}")),
            body.prop_map(|a| format!("{{ {a} }}")),
        ]
    })
}

fn declaration() -> impl Strategy<Value = String> {
    prop_oneof![
        (ident(), prop::collection::vec(statement(), 0..4))
            .prop_map(|(name, body)| format!("fn {name}(i32 a, char* b) -> i32 {{ {} }}", body.join(" "))),
        (ident(), expr()).prop_map(|(name, e)| format!("const i32 {name} = {e};")),
        (ident(), ident()).prop_map(|(a, b)| format!("struct S {{ i32 {a}; {b}: char*; }};")),
        (ident(), ident()).prop_map(|(a, b)| format!("use {a}/{b};")),
        ident().prop_map(|name| format!("external fn {name}(string, ...) -> i32;")),
    ]
}

fn program() -> impl Strategy<Value = String> {
    prop::collection::vec(declaration(), 1..4).prop_map(|decls| decls.join("\n"))
}

/// Token spellings joined by whitespace, so no two of them fuse into one token.
fn token_soup() -> impl Strategy<Value = String> {
    let piece = prop_oneof![
        ident(),
        number(),
        string_lit(),
        binary_op().prop_map(str::to_string),
        unary_op().prop_map(str::to_string),
        Just("(".to_string()),
        Just(")".to_string()),
        Just("{".to_string()),
        Just("}".to_string()),
        Just(";".to_string()),
        Just("::".to_string()),
        Just("fn".to_string()),
        Just("...".to_string()),
        Just("$".to_string()),
        Just("#".to_string()),
        Just("// note\n".to_string()),
        Just("/* block */".to_string()),
    ];
    let gap = prop_oneof![Just(" "), Just("\n"), Just("\t  ")];
    prop::collection::vec((piece, gap), 0..40)
        .prop_map(|parts| parts.into_iter().map(|(p, g)| format!("{p}{g}")).collect())
}

fn kinds(source: &str) -> Vec<TokenKind> {
    lexer::lex(source)
        .unwrap_or_else(|e| panic!("lex failed for {source:?}: {e:?}"))
        .into_iter()
        .map(|t| t.kind)
        .collect()
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn relexing_rendered_tokens_is_stable(source in token_soup()) {
        let tokens = lexer::lex(&source).unwrap_or_else(|e| panic!("lex failed for {source:?}: {e:?}"));
        let rendered = lexer::render(&tokens);
        prop_assert_eq!(kinds(&rendered), kinds(&source));
    }

    #[test]
    fn generated_programs_parse(source in program()) {
        let tokens = lexer::lex(&source).unwrap_or_else(|e| panic!("lex failed for {source:?}: {e:?}"));
        let parsed = parser::parse(&tokens);
        prop_assert!(parsed.is_ok(), "{source}\n{:?}", parsed.err());
    }

    #[test]
    fn print_then_parse_round_trips(source in program()) {
        let program = parser::parse(&lexer::lex(&source).unwrap()).unwrap();
        let printed = print_program(&program, &PrintConfig::default());
        let reparsed = parser::parse(&lexer::lex(&printed).unwrap())
            .unwrap_or_else(|e| panic!("printed source does not parse:\n{printed}\n{e:?}"));
        prop_assert_eq!(program.without_spans(), reparsed.without_spans(), "printed:\n{}", printed);
    }

    #[test]
    fn printing_is_idempotent(source in program()) {
        let config = PrintConfig::default();
        let once = print_program(&parser::parse(&lexer::lex(&source).unwrap()).unwrap(), &config);
        let twice = print_program(&parser::parse(&lexer::lex(&once).unwrap()).unwrap(), &config);
        prop_assert_eq!(once, twice);
    }
}
