#![no_main]

use libfuzzer_sys::fuzz_target;
use qto::normalize::extract_number;

fuzz_target!(|text: &str| {
    let (value, outcome) = extract_number(text);
    assert!(value >= 0.0 || value.is_nan());
    if outcome.is_default() {
        assert_eq!(value, 0.0);
    }
});
