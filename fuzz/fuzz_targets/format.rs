#![no_main]

use elle::{PrintConfig, format_source};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else { return };
    let config = PrintConfig::default();
    // Anything that formats must format to a fixed point.
    if let Ok(once) = format_source(s, &config) {
        let twice = format_source(&once, &config).unwrap_or_else(|e| panic!("formatted output does not parse: {e:?}\n{once}"));
        assert_eq!(once, twice);
    }
});
