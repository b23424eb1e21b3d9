//! Field rules shared by the validated input structs.

use once_cell::sync::Lazy;
use regex::Regex;
use validator::{ValidateEmail, ValidationError};

/// Optional leading `+`, then digits with spaces or dashes, 6 to 20 chars
pub static PHONE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9][0-9 \-]{5,19}$").expect("phone pattern compiles"));

/// Rejects values made only of whitespace; `length(min = 1)` lets them through.
pub fn non_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("blank");
        error.message = Some("must not be blank".into());
        return Err(error);
    }
    Ok(())
}

/// Email format check on the trimmed value, since emails are stored trimmed.
pub fn email_address(value: &str) -> Result<(), ValidationError> {
    if value.trim().validate_email() {
        Ok(())
    } else {
        Err(ValidationError::new("email"))
    }
}

/// Trim an optional text field, turning blank into `None`.
pub fn clean_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_regex() {
        assert!(PHONE_REGEX.is_match("+20 100 000 0000"));
        assert!(PHONE_REGEX.is_match("555-1234"));
        assert!(!PHONE_REGEX.is_match("call me"));
        assert!(!PHONE_REGEX.is_match("12"));
    }

    #[test]
    fn test_non_blank() {
        assert!(non_blank("Cardiology").is_ok());
        assert!(non_blank("   ").is_err());
    }

    #[test]
    fn test_email_address_ignores_surrounding_whitespace() {
        assert!(email_address(" Root@Clinic.com ").is_ok());
        assert!(email_address("a@x.com").is_ok());
        assert!(email_address("not-an-email").is_err());
        assert!(email_address("   ").is_err());
    }

    #[test]
    fn test_clean_optional() {
        assert_eq!(clean_optional(Some("  ".to_string())), None);
        assert_eq!(clean_optional(Some(" 555 ".to_string())), Some("555".to_string()));
        assert_eq!(clean_optional(None), None);
    }
}
