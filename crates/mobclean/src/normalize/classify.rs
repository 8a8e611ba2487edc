//! Validation and formatting of normalized mobile numbers.

use serde::{Deserialize, Serialize};

/// Country calling code prepended to local numbers.
pub const COUNTRY_PREFIX: &str = "88";

/// Leading digits of every national mobile number.
pub const MOBILE_PREFIX: &str = "01";

/// Length of a local mobile number (`01XXXXXXXXX`).
pub const LOCAL_LEN: usize = 11;

/// Length of a country-prefixed mobile number (`8801XXXXXXXXX`).
pub const INTERNATIONAL_LEN: usize = 13;

/// Outcome of validating one normalized number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    /// Whether the digits form a valid mobile number.
    pub is_valid: bool,
    /// The 13-digit prefixed form when valid, otherwise the input digits.
    pub value: String,
}

impl Classification {
    fn valid(value: String) -> Self {
        Self {
            is_valid: true,
            value,
        }
    }

    fn invalid(value: &str) -> Self {
        Self {
            is_valid: false,
            value: value.to_string(),
        }
    }
}

/// Classify normalized digits and format valid numbers with the country prefix.
///
/// Only two shapes are valid: `8801` followed by nine digits (kept as is) and
/// `01` followed by nine digits (prefixed with `88`).
pub fn classify(digits: &str) -> Classification {
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Classification::invalid(digits);
    }

    if digits.len() == INTERNATIONAL_LEN
        && digits.starts_with(COUNTRY_PREFIX)
        && digits[COUNTRY_PREFIX.len()..].starts_with(MOBILE_PREFIX)
    {
        return Classification::valid(digits.to_string());
    }

    if digits.len() == LOCAL_LEN && digits.starts_with(MOBILE_PREFIX) {
        return Classification::valid(format!("{}{}", COUNTRY_PREFIX, digits));
    }

    Classification::invalid(digits)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_number_prefixed() {
        let result = classify("01712345678");
        assert!(result.is_valid);
        assert_eq!(result.value, "8801712345678");
    }

    #[test]
    fn test_prefixed_number_unchanged() {
        let result = classify("8801712345678");
        assert!(result.is_valid);
        assert_eq!(result.value, "8801712345678");
    }

    #[test]
    fn test_prefixed_without_mobile_block_is_invalid() {
        // Plausible length but no "01" after the country code.
        let result = classify("8802712345678");
        assert!(!result.is_valid);
        assert_eq!(result.value, "8802712345678");
    }

    #[test]
    fn test_too_short() {
        assert_eq!(classify("0171234567"), Classification::invalid("0171234567"));
        assert_eq!(classify("017123"), Classification::invalid("017123"));
    }

    #[test]
    fn test_too_long() {
        assert!(!classify("017123456789").is_valid);
        assert!(!classify("88017123456789").is_valid);
    }

    #[test]
    fn test_wrong_prefix() {
        assert!(!classify("02712345678").is_valid);
        assert!(!classify("1712345678").is_valid);
    }

    #[test]
    fn test_non_digit_input_is_invalid() {
        assert!(!classify("01712 45678").is_valid);
        assert!(!classify("88০1712345678").is_valid);
    }

    #[test]
    fn test_empty_is_invalid() {
        let result = classify("");
        assert!(!result.is_valid);
        assert_eq!(result.value, "");
    }
}
