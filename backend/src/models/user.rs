//! Models that represent users, authentication payloads, and role metadata.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::types::UserId;
use crate::validation::rules;

/// Database representation of an account.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: UserId,
    pub firstname: String,
    pub lastname: String,
    /// Stored lowercased.
    pub email: String,
    /// Unique without regard to case.
    pub username: String,
    /// Argon2 PHC string. Never serialized.
    pub password_hash: String,
    pub role: UserRole,
    pub status: UserStatus,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum UserRole {
    #[default]
    User,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::User => "USER",
            UserRole::Admin => "ADMIN",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum UserStatus {
    #[default]
    Active,
    Suspended,
}

impl UserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatus::Active => "ACTIVE",
            UserStatus::Suspended => "SUSPENDED",
        }
    }
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    pub fn is_active(&self) -> bool {
        self.status == UserStatus::Active
    }
}

/// Self-service registration form. Any `role` sent by the client is ignored.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 100, message = "First name is required"))]
    pub firstname: String,
    #[validate(length(min = 1, max = 100, message = "Last name is required"))]
    pub lastname: String,
    #[validate(custom(function = "rules::validate_email_shape"))]
    pub email: String,
    #[validate(custom(function = "rules::validate_username"))]
    pub username: String,
    #[validate(custom(function = "rules::validate_password_length"))]
    pub password: String,
    #[validate(must_match(other = "password", message = "Passwords must match"))]
    pub confirm_password: String,
}

impl RegisterRequest {
    /// Trims the identity fields and lowercases the email. Passwords are kept
    /// exactly as typed.
    pub fn normalized(self) -> Self {
        Self {
            firstname: self.firstname.trim().to_string(),
            lastname: self.lastname.trim().to_string(),
            email: normalize_email(&self.email),
            username: self.username.trim().to_string(),
            password: self.password,
            confirm_password: self.confirm_password,
        }
    }
}

pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Credentials submitted by a user attempting to authenticate.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateRoleRequest {
    pub role: UserRole,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: UserStatus,
}

/// Public-facing representation of a user returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: UserId,
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub username: String,
    pub role: UserRole,
    pub status: UserStatus,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        UserResponse {
            id: user.id,
            firstname: user.firstname,
            lastname: user.lastname,
            email: user.email,
            username: user.username,
            role: user.role,
            status: user.status,
            last_login_at: user.last_login_at,
            created_at: user.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn register(password: &str, confirm: &str) -> RegisterRequest {
        RegisterRequest {
            firstname: "Ana".into(),
            lastname: "Lopez".into(),
            email: "ana@x.com".into(),
            username: "ana".into(),
            password: password.into(),
            confirm_password: confirm.into(),
        }
    }

    #[test]
    fn role_and_status_use_uppercase_on_the_wire() {
        assert_eq!(
            serde_json::to_value(UserRole::Admin).unwrap(),
            Value::String("ADMIN".into())
        );
        let status: UserStatus = serde_json::from_str("\"SUSPENDED\"").unwrap();
        assert_eq!(status, UserStatus::Suspended);
        assert!(serde_json::from_str::<UserRole>("\"admin\"").is_err());
    }

    #[test]
    fn register_request_ignores_client_role() {
        let payload = json!({
            "firstname": "Ana",
            "lastname": "Lopez",
            "email": "ana@x.com",
            "username": "ana",
            "password": "secret123",
            "confirm_password": "secret123",
            "role": "ADMIN"
        });
        let parsed: RegisterRequest = serde_json::from_value(payload).unwrap();
        assert!(parsed.validate().is_ok());
    }

    #[test]
    fn register_request_checks_password_rules() {
        assert!(register("secret123", "secret123").validate().is_ok());

        let errors = register("short", "short").validate().unwrap_err();
        assert!(errors.field_errors().contains_key("password"));

        let errors = register("secret123", "secret124").validate().unwrap_err();
        assert!(errors.field_errors().contains_key("confirm_password"));
    }

    #[test]
    fn normalization_trims_and_lowercases_email() {
        let mut raw = register("secret123", "secret123");
        raw.email = "  Ana@X.COM ".into();
        raw.username = " ana ".into();
        let normalized = raw.normalized();
        assert_eq!(normalized.email, "ana@x.com");
        assert_eq!(normalized.username, "ana");
    }

    #[test]
    fn blank_fields_fail_after_normalization() {
        let mut raw = register("secret123", "secret123");
        raw.firstname = "   ".into();
        let errors = raw.normalized().validate().unwrap_err();
        assert!(errors.field_errors().contains_key("firstname"));
    }
}
