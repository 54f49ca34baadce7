//! Common validation rules shared across request payloads.

use validator::ValidationError;

use crate::utils::password::meets_password_policy;

/// Validates username format.
///
/// Requirements:
/// - Only alphanumeric characters, underscores, dots and dashes
/// - 1-50 characters in length
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    let length = username.chars().count();
    if length == 0 || length > 50 {
        return Err(with_message(
            "username_invalid_length",
            "Username must be between 1 and 50 characters",
        ));
    }

    if !username
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '_' | '.' | '-'))
    {
        return Err(with_message(
            "username_invalid_characters",
            "Username may only contain letters, digits, '_', '.' and '-'",
        ));
    }

    Ok(())
}

/// Accepts addresses shaped like `local@domain.tld`: exactly one `@`, a
/// non-empty local part, and a dot inside the domain with text on both sides.
pub fn validate_email_shape(email: &str) -> Result<(), ValidationError> {
    let invalid = || with_message("email_invalid", "Enter a valid email address");

    if email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }
    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') {
        return Err(invalid());
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) if !host.is_empty() && !tld.is_empty() => Ok(()),
        _ => Err(invalid()),
    }
}

pub fn validate_password_length(password: &str) -> Result<(), ValidationError> {
    if meets_password_policy(password) {
        Ok(())
    } else {
        Err(with_message(
            "password_too_short",
            "Password must be at least 8 characters",
        ))
    }
}

fn with_message(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(message.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_rejects_empty() {
        assert!(validate_username("").is_err());
    }

    #[test]
    fn username_rejects_special_chars() {
        assert!(validate_username("user@name").is_err());
        assert!(validate_username("two words").is_err());
    }

    #[test]
    fn username_accepts_valid() {
        assert!(validate_username("valid_user123").is_ok());
        assert!(validate_username("ana.lopez-2").is_ok());
    }

    #[test]
    fn email_shape_requires_domain_with_dot() {
        assert!(validate_email_shape("ana@x.com").is_ok());
        assert!(validate_email_shape("a.b@mail.example.org").is_ok());
        for bad in ["", "ana", "ana@", "@x.com", "ana@x", "ana@.com", "ana@x.", "a@b@c.d", "a na@x.com"] {
            assert!(validate_email_shape(bad).is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn password_length_boundary() {
        assert!(validate_password_length("1234567").is_err());
        assert!(validate_password_length("12345678").is_ok());
    }

    #[test]
    fn errors_carry_readable_messages() {
        let err = validate_password_length("short").unwrap_err();
        assert_eq!(err.code, "password_too_short");
        assert_eq!(
            err.message.as_deref(),
            Some("Password must be at least 8 characters")
        );
    }
}
