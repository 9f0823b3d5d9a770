/// Input validators for request bodies
///
/// Each validator returns the cleaned value on success so handlers can shadow
/// the raw input with it.

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::ValidationError;

const MAX_EMAIL_LENGTH: usize = 254; // RFC 5321
pub const MAX_CHIRP_LENGTH: usize = 140;

lazy_static! {
    // RFC 5322 simplified email regex (practical validation)
    static ref EMAIL_REGEX: Regex = Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$"
    ).unwrap();
}

/// Validates an email address and returns it trimmed
pub fn is_valid_email(email: &str) -> Result<String, ValidationError> {
    let trimmed = email.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::EmptyField("email".to_string()));
    }

    if trimmed.len() > MAX_EMAIL_LENGTH {
        return Err(ValidationError::TooLong("email".to_string(), MAX_EMAIL_LENGTH));
    }

    if !EMAIL_REGEX.is_match(trimmed) {
        return Err(ValidationError::InvalidFormat("email".to_string()));
    }

    Ok(trimmed.to_string())
}

/// Passwords are only required to be present; bcrypt enforces the upper bound.
pub fn is_present_password(password: &str) -> Result<&str, ValidationError> {
    if password.is_empty() {
        return Err(ValidationError::EmptyField("password".to_string()));
    }
    Ok(password)
}

/// Chirp bodies are limited to 140 characters
pub fn is_valid_chirp_body(body: &str) -> Result<&str, ValidationError> {
    if body.trim().is_empty() {
        return Err(ValidationError::EmptyField("chirp".to_string()));
    }

    if body.chars().count() > MAX_CHIRP_LENGTH {
        return Err(ValidationError::TooLong("chirp".to_string(), MAX_CHIRP_LENGTH));
    }

    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_emails() {
        assert_eq!(is_valid_email("walt@breakingbad.com").unwrap(), "walt@breakingbad.com");
        assert_eq!(is_valid_email("  saul@bettercall.com ").unwrap(), "saul@bettercall.com");
    }

    #[test]
    fn test_invalid_emails() {
        for email in ["notanemail", "user@", "@example.com", "user@@example.com"] {
            assert!(
                matches!(is_valid_email(email), Err(ValidationError::InvalidFormat(_))),
                "{} should be rejected",
                email
            );
        }
    }

    #[test]
    fn test_empty_email() {
        assert_eq!(
            is_valid_email("   "),
            Err(ValidationError::EmptyField("email".to_string()))
        );
    }

    #[test]
    fn test_password_presence() {
        assert!(is_present_password("04234").is_ok());
        assert!(is_present_password("").is_err());
    }

    #[test]
    fn test_chirp_at_limit() {
        let body = "a".repeat(MAX_CHIRP_LENGTH);
        assert!(is_valid_chirp_body(&body).is_ok());
    }

    #[test]
    fn test_chirp_over_limit() {
        let body = "a".repeat(MAX_CHIRP_LENGTH + 1);
        assert_eq!(
            is_valid_chirp_body(&body),
            Err(ValidationError::TooLong("chirp".to_string(), MAX_CHIRP_LENGTH))
        );
    }

    #[test]
    fn test_chirp_limit_counts_characters() {
        let body = "é".repeat(MAX_CHIRP_LENGTH);
        assert!(is_valid_chirp_body(&body).is_ok());
    }

    #[test]
    fn test_empty_chirp() {
        assert!(is_valid_chirp_body("").is_err());
    }
}
