#![no_main]

use libfuzzer_sys::fuzz_target;
use qto::aggregate::aggregate;
use qto::{Dataset, PatternMatcher, QuantityField};

fuzz_target!(|data: &[u8]| {
    // Load arbitrary tables and aggregate them if they have the right columns
    let Ok(dataset) = Dataset::from_reader(data, 1_000) else {
        return;
    };
    let (Some(keys), Ok(matcher)) = (dataset.columns().first(), PatternMatcher::new("")) else {
        return;
    };
    let mask = matcher.mask(keys);
    let _ = aggregate(&dataset, &mask, keys.name(), QuantityField::Area);
});
