#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // Never panics; accepted input renders to text that parses back to the same tree.
        if let Ok(formula) = mltl_dsl::parse(s) {
            let rendered = formula.to_string();
            match mltl_dsl::parse(&rendered) {
                Ok(again) => assert_eq!(again, formula, "{rendered}"),
                Err(e) => panic!("canonical form {rendered:?} does not parse: {e}"),
            }
        }
    }
});
