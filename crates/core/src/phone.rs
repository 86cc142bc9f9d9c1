//! Phone number normalization and formatting.
//!
//! Stored phone numbers are free-form (digits and hyphens). Matching is
//! always done on the digit-only form so `010-1234-5678`, `01012345678`
//! and `010 1234 5678` all refer to the same member.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::CoreError;

/// Accepted input shape: 2-3 digit prefix, 3-4 digit middle, 4 digit tail,
/// hyphens optional.
static PHONE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{2,3}-?\d{3,4}-?\d{4}$").expect("valid phone regex"));

/// Strip every non-digit character.
pub fn normalize_phone(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

/// Whether two phone strings refer to the same number.
pub fn phones_match(a: &str, b: &str) -> bool {
    let a = normalize_phone(a);
    !a.is_empty() && a == normalize_phone(b)
}

/// Render digits in the canonical hyphenated form used for storage.
///
/// 11 digits become `3-4-4`, 10 digits become `3-3-4`. Anything else is
/// returned as the bare digit string.
pub fn format_phone(raw: &str) -> String {
    let digits = normalize_phone(raw);
    match digits.len() {
        11 => format!("{}-{}-{}", &digits[..3], &digits[3..7], &digits[7..]),
        10 => format!("{}-{}-{}", &digits[..3], &digits[3..6], &digits[6..]),
        _ => digits,
    }
}

/// Validate a phone number supplied on member create/update.
pub fn validate_phone(raw: &str) -> Result<(), CoreError> {
    let trimmed = raw.trim();
    if PHONE_PATTERN.is_match(trimmed) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid phone number '{trimmed}'. Expected a format like 010-1234-5678"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_hyphens_and_spaces() {
        assert_eq!(normalize_phone("010-1234-5678"), "01012345678");
        assert_eq!(normalize_phone(" 010 1234 5678 "), "01012345678");
        assert_eq!(normalize_phone("(010).1234/5678"), "01012345678");
    }

    #[test]
    fn normalize_empty_for_no_digits() {
        assert_eq!(normalize_phone("---"), "");
        assert_eq!(normalize_phone(""), "");
    }

    #[test]
    fn phones_match_ignores_hyphenation() {
        assert!(phones_match("010-2345-6789", "01023456789"));
        assert!(!phones_match("010-2345-6789", "010-2345-6780"));
    }

    #[test]
    fn empty_phones_never_match() {
        assert!(!phones_match("", ""));
        assert!(!phones_match("-", "--"));
    }

    #[test]
    fn format_eleven_digits() {
        assert_eq!(format_phone("01012345678"), "010-1234-5678");
    }

    #[test]
    fn format_ten_digits() {
        assert_eq!(format_phone("0311234567"), "031-123-4567");
    }

    #[test]
    fn format_other_lengths_returns_digits() {
        assert_eq!(format_phone("12-34"), "1234");
    }

    #[test]
    fn validate_accepts_common_shapes() {
        assert!(validate_phone("010-1234-5678").is_ok());
        assert!(validate_phone("01012345678").is_ok());
        assert!(validate_phone("02-123-4567").is_ok());
    }

    #[test]
    fn validate_rejects_garbage() {
        assert!(validate_phone("010-12-5678").is_err());
        assert!(validate_phone("phone").is_err());
        assert!(validate_phone("").is_err());
    }
}
