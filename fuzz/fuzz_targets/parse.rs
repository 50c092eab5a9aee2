#![no_main]

use elle::{lexer, parser};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Ignore invalid UTF-8
    if let Ok(s) = std::str::from_utf8(data) {
        // Strict pipeline
        if let Ok(tokens) = lexer::lex(s) {
            let _ = parser::parse(&tokens);
        }
        // Recovering pipeline must never panic either
        let _ = elle::parse_source(s);
    }
});
