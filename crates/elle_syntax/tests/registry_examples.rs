//! Every example program attached to a registry entry must parse cleanly.
//!
//! The registries double as documentation, so a broken example is a bug in either the example or the parser.

use elle_core::lang::{directives, keywords, operators};
use elle_syntax::parse_source;
use elle_syntax::printer::{PrintConfig, print_program};

fn assert_parses(owner: &str, code: &str) {
    let output = parse_source(code);
    assert!(
        output.diagnostics.is_empty(),
        "example for {owner} does not parse: {code}\n{:#?}",
        output.diagnostics
    );
}

#[test]
fn keyword_examples_parse() {
    for info in keywords::KEYWORDS {
        for example in info.examples {
            assert_parses(info.canonical, example.code);
        }
    }
}

#[test]
fn operator_examples_parse() {
    for info in operators::OPERATORS {
        for example in info.examples {
            assert_parses(info.spelling, example.code);
        }
    }
}

#[test]
fn every_directive_has_an_example_that_uses_it() {
    for info in directives::DIRECTIVES {
        assert!(!info.examples.is_empty(), "#{} has no example", info.name);
        for example in info.examples {
            assert_parses(info.name, example.code);
            let printed = print_program(&parse_source(example.code).program, &PrintConfig::default());
            assert!(
                printed.contains(&format!("#{}", info.name)),
                "example for #{} does not use it: {printed}",
                info.name
            );
        }
    }
}

#[test]
fn directive_usage_hint_names_the_signature() {
    let output = parse_source("fn main() { n := #size(1); }");
    let error = output.diagnostics.first().expect("`#size(1)` must be rejected");
    let signature = directives::signature(directives::DirectiveId::Size);
    assert!(
        error.hints.iter().any(|h| h.contains(&signature)),
        "hints {:?} do not mention {signature}",
        error.hints
    );
}
