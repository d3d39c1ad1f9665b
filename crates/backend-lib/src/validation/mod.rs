// ============================
// crates/backend-lib/src/validation/mod.rs
// ============================
//! Registration form validation.

use crate::auth::{validate_password_strength, PasswordRequirements};
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

const MAX_USERNAME_LENGTH: usize = 64;
const MAX_PASSWORD_LENGTH: usize = 128;
const MAX_EMAIL_LENGTH: usize = 254; // RFC 5321 SMTP limit

static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email regex compiles"));

/// Possible validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("missing field: {0}")]
    MissingField(&'static str),

    #[error("field too long: {0}")]
    TooLong(&'static str),

    #[error("malformed email address")]
    InvalidEmail,

    #[error("password does not meet the configured requirements")]
    WeakPassword,
}

impl ValidationError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ValidationError::MissingField(_) => "All fields are required.",
            ValidationError::TooLong(_) => "One or more fields are too long.",
            ValidationError::InvalidEmail => "Please enter a valid email address.",
            ValidationError::WeakPassword => "Password does not meet the requirements.",
        }
    }
}

/// Result type for validation operations
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Normalize an email for lookup and uniqueness checks.
///
/// Emails compare case-insensitively; usernames do not.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Normalize a username. Surrounding whitespace is dropped, case is kept.
pub fn normalize_username(username: &str) -> &str {
    username.trim()
}

/// Validate already-normalized registration fields
pub fn validate_registration(
    username: &str,
    email: &str,
    password: &str,
    requirements: &PasswordRequirements,
) -> ValidationResult<()> {
    if username.is_empty() {
        return Err(ValidationError::MissingField("username"));
    }
    if email.is_empty() {
        return Err(ValidationError::MissingField("email"));
    }
    if password.is_empty() {
        return Err(ValidationError::MissingField("password"));
    }

    if username.chars().count() > MAX_USERNAME_LENGTH {
        return Err(ValidationError::TooLong("username"));
    }
    if email.len() > MAX_EMAIL_LENGTH {
        return Err(ValidationError::TooLong("email"));
    }
    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(ValidationError::TooLong("password"));
    }

    if !EMAIL_REGEX.is_match(email) {
        return Err(ValidationError::InvalidEmail);
    }

    if !validate_password_strength(password, requirements) {
        return Err(ValidationError::WeakPassword);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lenient() -> PasswordRequirements {
        PasswordRequirements::default()
    }

    #[test]
    fn test_normalize_email_trims_and_lowercases() {
        assert_eq!(normalize_email("  Gold@Example.COM "), "gold@example.com");
        assert_eq!(normalize_username("  Gold "), "Gold");
    }

    #[test]
    fn test_accepts_reference_registration() {
        assert_eq!(
            validate_registration("gold", "gold@example.com", "smiths123ABC$", &lenient()),
            Ok(())
        );
    }

    #[test]
    fn test_rejects_missing_fields() {
        assert_eq!(
            validate_registration("", "a@x.com", "password1", &lenient()),
            Err(ValidationError::MissingField("username"))
        );
        assert_eq!(
            validate_registration("a", "", "password1", &lenient()),
            Err(ValidationError::MissingField("email"))
        );
        assert_eq!(
            validate_registration("a", "a@x.com", "", &lenient()),
            Err(ValidationError::MissingField("password"))
        );
    }

    #[test]
    fn test_rejects_malformed_email() {
        for email in ["plainaddress", "no-at.example.com", "a@b", "a b@c.com"] {
            assert_eq!(
                validate_registration("a", email, "password1", &lenient()),
                Err(ValidationError::InvalidEmail),
                "{email} should be rejected"
            );
        }
    }

    #[test]
    fn test_rejects_overlong_fields() {
        let long_name = "u".repeat(MAX_USERNAME_LENGTH + 1);
        assert_eq!(
            validate_registration(&long_name, "a@x.com", "password1", &lenient()),
            Err(ValidationError::TooLong("username"))
        );
        let long_password = "p".repeat(MAX_PASSWORD_LENGTH + 1);
        assert_eq!(
            validate_registration("a", "a@x.com", &long_password, &lenient()),
            Err(ValidationError::TooLong("password"))
        );
    }

    #[test]
    fn test_applies_password_policy() {
        assert_eq!(
            validate_registration("a", "a@x.com", "short", &lenient()),
            Err(ValidationError::WeakPassword)
        );
    }
}
