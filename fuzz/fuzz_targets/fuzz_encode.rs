#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let formulas: Vec<_> = s
            .lines()
            .filter_map(|line| mltl_dsl::parse(line).ok())
            .collect();
        // Keep the unrolling small; encoding errors are fine, panics are not.
        if let Ok(encoding) = mltl_smt::encoder::encode_formulas(&formulas, 64) {
            let _ = encoding.to_smtlib();
        }
    }
});
