//! Payloads for the forgotten-password flow.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::validation::rules;

/// Reply to every reset request, whether or not the address is known.
pub const RESET_REQUESTED_MESSAGE: &str = "If the email is registered, we sent you instructions.";

#[derive(Debug, Clone, Deserialize)]
pub struct ForgotPasswordRequest {
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ResetPasswordRequest {
    #[validate(custom(function = "rules::validate_password_length"))]
    pub password: String,
    #[validate(must_match(other = "password", message = "Passwords must match"))]
    pub password_confirmation: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_request_requires_matching_long_password() {
        let ok = ResetPasswordRequest {
            password: "n3wpass!".into(),
            password_confirmation: "n3wpass!".into(),
        };
        assert!(ok.validate().is_ok());

        let mismatch = ResetPasswordRequest {
            password: "n3wpass!".into(),
            password_confirmation: "n3wpass?".into(),
        };
        assert!(mismatch.validate().is_err());

        let short = ResetPasswordRequest {
            password: "short".into(),
            password_confirmation: "short".into(),
        };
        assert!(short.validate().is_err());
    }
}
