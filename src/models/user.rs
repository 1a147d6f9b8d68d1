use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

lazy_static! {
    // Regex for username validation: alphanumeric, underscores, hyphens
    static ref USERNAME_REGEX: regex::Regex = regex::Regex::new(r"^[a-zA-Z0-9_-]+$").unwrap();
}

/// Identifier of a registered user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct UserId(pub i32);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A stored user record. Neither the id nor the password hash is ever serialized.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct User {
    #[serde(skip_serializing)]
    pub id: UserId,
    pub name: String,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
}

/// What the credential store needs to create a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub username: String,
    pub password_hash: String,
}

/// Payload of `POST /auth/sign-up`.
#[derive(Debug, Deserialize, Validate)]
pub struct SignUpRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    /// Between 3 and 32 characters, alphanumeric, underscores or hyphens.
    #[validate(
        length(min = 3, max = 32),
        regex(
            path = "USERNAME_REGEX",
            message = "Username must be alphanumeric, underscores, or hyphens"
        )
    )]
    pub username: String,
    #[validate(length(min = 6, max = 128))]
    pub password: String,
}

/// Payload of `POST /auth/sign-in`.
#[derive(Debug, Deserialize, Validate)]
pub struct SignInRequest {
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SignUpResponse {
    pub id: i32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_up_validation() {
        let valid = SignUpRequest {
            name: "Alice".to_string(),
            username: "alice_01".to_string(),
            password: "password123".to_string(),
        };
        assert!(valid.validate().is_ok());

        let bad_username = SignUpRequest {
            name: "Alice".to_string(),
            username: "alice smith!".to_string(),
            password: "password123".to_string(),
        };
        assert!(bad_username.validate().is_err());

        let short_password = SignUpRequest {
            name: "Alice".to_string(),
            username: "alice".to_string(),
            password: "123".to_string(),
        };
        assert!(short_password.validate().is_err());

        let empty_name = SignUpRequest {
            name: "".to_string(),
            username: "alice".to_string(),
            password: "password123".to_string(),
        };
        assert!(empty_name.validate().is_err());
    }

    #[test]
    fn test_user_serialization_hides_id_and_hash() {
        let user = User {
            id: UserId(7),
            name: "Alice".into(),
            username: "alice".into(),
            password_hash: "$2b$04$abc".into(),
        };
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json, serde_json::json!({ "name": "Alice", "username": "alice" }));
    }
}
