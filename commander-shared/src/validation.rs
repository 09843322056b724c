//! Client-side checks for credentials, run before anything reaches the server.
//!
//! The backend enforces the same rules; failing early keeps the round trip
//! and the server's German error texts out of the common mistakes.

use thiserror::Error;

/// Shortest accepted username, in characters.
pub const USERNAME_MIN_LEN: usize = 3;
/// Longest accepted username, in characters.
pub const USERNAME_MAX_LEN: usize = 50;
/// Shortest accepted password, in characters.
pub const PASSWORD_MIN_LEN: usize = 8;

/// Validation errors that can occur during form validation.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Error)]
pub enum ValidationError {
    /// Field is required but empty
    #[error("this field is required")]
    Required,
    /// Username is shorter than [`USERNAME_MIN_LEN`]
    #[error("username must be at least {} characters", USERNAME_MIN_LEN)]
    UsernameTooShort,
    /// Username is longer than [`USERNAME_MAX_LEN`]
    #[error("username must be at most {} characters", USERNAME_MAX_LEN)]
    UsernameTooLong,
    /// Password is shorter than [`PASSWORD_MIN_LEN`]
    #[error("password must be at least {} characters", PASSWORD_MIN_LEN)]
    PasswordTooShort,
    /// Password confirmation doesn't match password
    #[error("passwords do not match")]
    PasswordsDoNotMatch,
}

/// Validates a username.
///
/// # Errors
/// [`ValidationError::Required`] for blank input, otherwise a length error
/// when outside `3..=50` characters.
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    let trimmed = username.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Required);
    }

    let length = trimmed.chars().count();
    if length < USERNAME_MIN_LEN {
        return Err(ValidationError::UsernameTooShort);
    }
    if length > USERNAME_MAX_LEN {
        return Err(ValidationError::UsernameTooLong);
    }

    Ok(())
}

/// Validates a new password.
///
/// # Errors
/// [`ValidationError::Required`] for blank input,
/// [`ValidationError::PasswordTooShort`] below eight characters.
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.trim().is_empty() {
        return Err(ValidationError::Required);
    }

    if password.chars().count() < PASSWORD_MIN_LEN {
        return Err(ValidationError::PasswordTooShort);
    }

    Ok(())
}

/// Validates that the password confirmation matches the password.
///
/// # Errors
/// [`ValidationError::Required`] for blank input,
/// [`ValidationError::PasswordsDoNotMatch`] on mismatch.
pub fn validate_confirm_password(
    confirm_password: &str,
    password: &str,
) -> Result<(), ValidationError> {
    if confirm_password.trim().is_empty() {
        return Err(ValidationError::Required);
    }

    if confirm_password != password {
        return Err(ValidationError::PasswordsDoNotMatch);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_rules() {
        assert_eq!(validate_username("   "), Err(ValidationError::Required));
        assert_eq!(validate_username("ab"), Err(ValidationError::UsernameTooShort));
        assert_eq!(
            validate_username(&"x".repeat(51)),
            Err(ValidationError::UsernameTooLong)
        );
        assert!(validate_username("admin").is_ok());
        assert!(validate_username(&"x".repeat(50)).is_ok());
    }

    #[test]
    fn password_counts_characters_not_bytes() {
        assert_eq!(validate_password(""), Err(ValidationError::Required));
        assert_eq!(
            validate_password("kurz"),
            Err(ValidationError::PasswordTooShort)
        );
        assert_eq!(
            validate_password("äöüäöüä"),
            Err(ValidationError::PasswordTooShort)
        );
        assert!(validate_password("äöüäöüäö").is_ok());
    }

    #[test]
    fn confirmation_must_match() {
        assert_eq!(
            validate_confirm_password("", "secret-1"),
            Err(ValidationError::Required)
        );
        assert_eq!(
            validate_confirm_password("secret-2", "secret-1"),
            Err(ValidationError::PasswordsDoNotMatch)
        );
        assert!(validate_confirm_password("secret-1", "secret-1").is_ok());
    }

    #[test]
    fn messages_mention_limits() {
        assert_eq!(
            ValidationError::PasswordTooShort.to_string(),
            "password must be at least 8 characters"
        );
        assert_eq!(
            ValidationError::UsernameTooLong.to_string(),
            "username must be at most 50 characters"
        );
    }
}
