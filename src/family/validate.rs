//! Contact format checks for the invitation form.

use once_cell::sync::Lazy;
use regex::Regex;

// local@domain with at least one dot in the domain part
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern"));

// optional leading +, then 10-15 digits
static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9]{10,15}$").expect("phone pattern"));

pub fn is_valid_email(contact: &str) -> bool {
    EMAIL_RE.is_match(contact)
}

/// Embedded whitespace is ignored, so "+7 900 123 45 67" passes.
pub fn is_valid_phone(contact: &str) -> bool {
    let compact: String = contact.chars().filter(|c| !c.is_whitespace()).collect();
    PHONE_RE.is_match(&compact)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_email() {
        assert!(is_valid_email("maria@example.com"));
        assert!(is_valid_email("a.b+c@mail.co.uk"));
    }

    #[test]
    fn rejects_malformed_email() {
        assert!(!is_valid_email("maria@example"));
        assert!(!is_valid_email("maria example.com"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("maria@@example.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn accepts_phone_with_spaces_and_plus() {
        assert!(is_valid_phone("+79001234567"));
        assert!(is_valid_phone("+7 900 123 45 67"));
        assert!(is_valid_phone("79001234567"));
        assert!(is_valid_phone("123456789012345"));
    }

    #[test]
    fn rejects_short_or_garbled_phone() {
        assert!(!is_valid_phone("123"));
        assert!(!is_valid_phone("+7 (900) 123-45-67"));
        assert!(!is_valid_phone("1234567890123456"));
        assert!(!is_valid_phone(""));
    }
}
