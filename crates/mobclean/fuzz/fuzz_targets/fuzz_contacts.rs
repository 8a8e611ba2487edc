//! Fuzz target for contact field classification.

#![no_main]

use libfuzzer_sys::fuzz_target;
use mobclean::{classify_field, normalize_digits};

fuzz_target!(|data: &[u8]| {
    let field = String::from_utf8_lossy(data);
    let outcome = classify_field(Some(&field));

    for value in &outcome.valid {
        assert_eq!(value.len(), 13);
        assert!(value.starts_with("8801"));
    }
    assert!(outcome.valid.iter().all(|v| !outcome.invalid.contains(v)));

    let once = normalize_digits(&field);
    assert_eq!(normalize_digits(&once), once);
});
