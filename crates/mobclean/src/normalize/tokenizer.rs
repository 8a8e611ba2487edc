//! Splitting a contact field into candidate entries.

use once_cell::sync::Lazy;
use regex::Regex;

/// Separators between entries in one contact field.
static SEPARATOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"[,/]").expect("valid separator regex"));

/// Split a raw contact field into trimmed, non-empty tokens.
///
/// An absent field yields no tokens.
pub fn split_contacts(field: Option<&str>) -> Vec<&str> {
    let Some(field) = field else {
        return Vec::new();
    };

    SEPARATOR
        .split(field)
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_single() {
        assert_eq!(split_contacts(Some("01712345678")), vec!["01712345678"]);
    }

    #[test]
    fn test_split_comma_and_slash() {
        assert_eq!(
            split_contacts(Some("017 1234 5678, +88018/ 019")),
            vec!["017 1234 5678", "+88018", "019"]
        );
    }

    #[test]
    fn test_split_only_separators() {
        assert!(split_contacts(Some(" , / ")).is_empty());
    }

    #[test]
    fn test_split_absent() {
        assert!(split_contacts(None).is_empty());
        assert!(split_contacts(Some("")).is_empty());
    }

    #[test]
    fn test_split_keeps_other_punctuation() {
        assert_eq!(split_contacts(Some("017-123; 018")), vec!["017-123; 018"]);
    }
}
