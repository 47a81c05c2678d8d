//! Phone number canonicalization.
//!
//! A lossy, single-country heuristic that coerces free-text input to one
//! `+91...` shape. This is NOT general E.164 validation: invalid input
//! silently degrades to an empty or best-effort string, and no error is
//! ever raised.

/// Canonicalize free-text phone input.
///
/// Non-digits are stripped first. Digits starting with the country code
/// `91` and at least 12 long keep their first 12 digits behind a `+`;
/// anything else keeps its last 10 digits behind `+91`. An empty digit
/// string yields an empty output.
pub fn normalize_phone(input: &str) -> String {
    let digits: String = input.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return String::new();
    }
    if digits.starts_with("91") && digits.len() >= 12 {
        format!("+{}", &digits[..12])
    } else {
        let start = digits.len().saturating_sub(10);
        format!("+91{}", &digits[start..])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_ten_digit_number() {
        assert_eq!(normalize_phone("9876543210"), "+919876543210");
    }

    #[test]
    fn test_number_with_country_code() {
        assert_eq!(normalize_phone("919876543210"), "+919876543210");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(normalize_phone(""), "");
        assert_eq!(normalize_phone("no digits here"), "");
    }

    #[test]
    fn test_formatting_noise_is_stripped() {
        assert_eq!(normalize_phone("+91 98765-43210"), "+919876543210");
        assert_eq!(normalize_phone("(0)98765 43210"), "+919876543210");
    }

    #[test]
    fn test_leading_zero_trunk_prefix() {
        // "0919876543210" does not start with "91", so the last 10 win.
        assert_eq!(normalize_phone("0919876543210"), "+919876543210");
    }

    #[test]
    fn test_short_input_degrades_best_effort() {
        assert_eq!(normalize_phone("12345"), "+9112345");
    }

    #[test]
    fn test_long_foreign_number_keeps_last_ten() {
        assert_eq!(normalize_phone("4415550123456"), "+915550123456");
    }
}
