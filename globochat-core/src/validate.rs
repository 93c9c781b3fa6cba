//! Validation rules for participant names and message bodies.
//!
//! The same rules run on both sides: the client pre-validates for immediate
//! feedback, the server re-validates every inbound event and is
//! authoritative. Lengths count characters, not bytes.

use thiserror::Error;

/// Minimum display-name length after trimming.
pub const USERNAME_MIN: usize = 2;
/// Maximum display-name length after trimming.
pub const USERNAME_MAX: usize = 20;
/// Maximum message-body length after trimming.
pub const MESSAGE_MAX: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("name must be at least 2 characters")]
    UsernameTooShort,
    #[error("name must be at most 20 characters")]
    UsernameTooLong,
    #[error("message cannot be empty")]
    MessageEmpty,
    #[error("message must be at most 500 characters")]
    MessageTooLong,
}

/// Checks a display name, returning the trimmed form.
pub fn validate_username(raw: &str) -> Result<&str, ValidationError> {
    let name = raw.trim();
    let len = name.chars().count();
    if len < USERNAME_MIN {
        return Err(ValidationError::UsernameTooShort);
    }
    if len > USERNAME_MAX {
        return Err(ValidationError::UsernameTooLong);
    }
    Ok(name)
}

/// Checks a message body, returning the trimmed form.
pub fn validate_message(raw: &str) -> Result<&str, ValidationError> {
    let body = raw.trim();
    if body.is_empty() {
        return Err(ValidationError::MessageEmpty);
    }
    if body.chars().count() > MESSAGE_MAX {
        return Err(ValidationError::MessageTooLong);
    }
    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_is_trimmed_before_length_check() {
        assert_eq!(validate_username("  Ana  "), Ok("Ana"));
        // one character surrounded by spaces is still too short
        assert_eq!(validate_username("   a   "), Err(ValidationError::UsernameTooShort));
    }

    #[test]
    fn username_bounds_are_inclusive() {
        assert!(validate_username("ab").is_ok());
        assert!(validate_username(&"x".repeat(20)).is_ok());
        assert_eq!(validate_username("a"), Err(ValidationError::UsernameTooShort));
        assert_eq!(
            validate_username(&"x".repeat(21)),
            Err(ValidationError::UsernameTooLong)
        );
    }

    #[test]
    fn message_rejects_whitespace_only() {
        assert_eq!(validate_message("   \t  "), Err(ValidationError::MessageEmpty));
        assert_eq!(validate_message(" oi "), Ok("oi"));
    }

    #[test]
    fn message_limit_counts_characters_not_bytes() {
        // 500 multibyte characters are within the limit even though the
        // byte length is far over 500
        let body = "á".repeat(500);
        assert!(validate_message(&body).is_ok());
        let over = "á".repeat(501);
        assert_eq!(validate_message(&over), Err(ValidationError::MessageTooLong));
    }
}
