//! Digit normalization across Bengali and Latin numerals.

/// First code point of the Bengali digit block (০ = U+09E6).
const BENGALI_ZERO: u32 = 0x09E6;

/// Map a Bengali digit to its Latin equivalent.
fn bengali_to_latin(c: char) -> Option<char> {
    let offset = (c as u32).checked_sub(BENGALI_ZERO)?;
    if offset < 10 {
        char::from_digit(offset, 10)
    } else {
        None
    }
}

/// Reduce a token to Latin digits only.
///
/// Bengali digits are translated; every other non-digit character (spaces,
/// `+`, dashes, letters) is removed. The result may be empty.
pub fn normalize_digits(token: &str) -> String {
    token
        .chars()
        .filter_map(|c| {
            if c.is_ascii_digit() {
                Some(c)
            } else {
                bengali_to_latin(c)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latin_digits_unchanged() {
        assert_eq!(normalize_digits("01712345678"), "01712345678");
    }

    #[test]
    fn test_bengali_digits() {
        assert_eq!(normalize_digits("০১২৩৪৫৬৭৮৯"), "0123456789");
        assert_eq!(normalize_digits("৮৮০১৭১২৩৪৫৬৭৮"), "8801712345678");
    }

    #[test]
    fn test_strips_symbols() {
        assert_eq!(normalize_digits("+880 1712-345678"), "8801712345678");
        assert_eq!(normalize_digits("(017) 12.34.56.78"), "01712345678");
        assert_eq!(normalize_digits("tel: ০১৭-abc"), "017");
    }

    #[test]
    fn test_mixed_scripts() {
        assert_eq!(normalize_digits("০17১২345678"), "01712345678");
    }

    #[test]
    fn test_no_digits() {
        assert_eq!(normalize_digits("n/a phone"), "");
        assert_eq!(normalize_digits(""), "");
    }

    #[test]
    fn test_other_scripts_dropped() {
        // Devanagari and Arabic-Indic digits are outside the supported scripts.
        assert_eq!(normalize_digits("०१२"), "");
        assert_eq!(normalize_digits("٠١٢"), "");
    }

    #[test]
    fn test_idempotent() {
        let once = normalize_digits("+৮৮ ০১৭১২-৩৪৫৬৭৮");
        assert_eq!(normalize_digits(&once), once);
    }
}
