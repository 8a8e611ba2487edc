//! Contact field normalization: splitting, digit translation, validation.
//!
//! [`classify_field`] chains the three steps for one cell and returns the
//! deduplicated, sorted valid and invalid numbers.

mod classify;
mod digits;
mod tokenizer;

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

pub use classify::{
    classify, Classification, COUNTRY_PREFIX, INTERNATIONAL_LEN, LOCAL_LEN, MOBILE_PREFIX,
};
pub use digits::normalize_digits;
pub use tokenizer::split_contacts;

/// Classified contents of one contact field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowOutcome {
    /// Valid numbers in 13-digit prefixed form, deduplicated and sorted.
    pub valid: Vec<String>,
    /// Normalized digits that failed validation, deduplicated and sorted.
    pub invalid: Vec<String>,
    /// Number of non-empty tokens found in the field.
    pub tokens: usize,
    /// Tokens dropped because they held no digits.
    pub dropped: usize,
}

impl RowOutcome {
    /// Whether the field yielded at least one valid number.
    pub fn has_valid(&self) -> bool {
        !self.valid.is_empty()
    }

    /// Whether the field yielded invalid numbers and no valid one.
    pub fn is_invalid_only(&self) -> bool {
        self.valid.is_empty() && !self.invalid.is_empty()
    }

    /// Whether the field yielded no numbers at all.
    pub fn is_empty(&self) -> bool {
        self.valid.is_empty() && self.invalid.is_empty()
    }
}

/// Classify every entry of a raw contact field.
pub fn classify_field(field: Option<&str>) -> RowOutcome {
    let tokens = split_contacts(field);

    let mut valid = BTreeSet::new();
    let mut invalid = BTreeSet::new();
    let mut dropped = 0;

    for token in &tokens {
        let digits = normalize_digits(token);
        if digits.is_empty() {
            dropped += 1;
            continue;
        }

        let result = classify(&digits);
        if result.is_valid {
            valid.insert(result.value);
        } else {
            invalid.insert(result.value);
        }
    }

    RowOutcome {
        valid: valid.into_iter().collect(),
        invalid: invalid.into_iter().collect(),
        tokens: tokens.len(),
        dropped,
    }
}
