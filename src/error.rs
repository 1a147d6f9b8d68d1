//!
//! # Custom Error Handling
//!
//! This module defines the custom error type `AppError` used throughout the application.
//! Every handler, repository and guard returns it, and `actix_web::error::ResponseError`
//! turns it into a JSON envelope of the form `{"message": "..."}`.
//!
//! Authentication and authorization failures carry generic messages only. Store failures
//! are logged with their full detail here, at the single point where they leave the
//! process, and the caller receives a generic message.

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

/// Message returned for every rejected credential, whatever the internal reason.
pub const UNAUTHORIZED_MESSAGE: &str = "authorization required";

/// Represents all possible errors that can occur within the application.
#[derive(Debug)]
pub enum AppError {
    /// Authentication failed or is required but missing (HTTP 401).
    Unauthorized(String),
    /// Valid identity, but the resource belongs to another user (HTTP 403).
    Forbidden(String),
    /// Malformed request or an empty update (HTTP 400).
    BadRequest(String),
    /// The requested resource or user does not exist (HTTP 404).
    NotFound(String),
    /// Sign-up with a username that is already taken (HTTP 409).
    DuplicateUsername(String),
    /// Input failed `validator` rules (HTTP 422).
    ValidationError(String),
    /// A handler ran without the identity the middleware should have attached.
    /// Always a wiring defect; the request fails closed (HTTP 500).
    InternalInconsistency(String),
    /// Unexpected server-side error (HTTP 500).
    InternalServerError(String),
    /// Error originating from the backing store (HTTP 500).
    DatabaseError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::DuplicateUsername(msg) => write!(f, "Duplicate Username: {}", msg),
            AppError::ValidationError(msg) => write!(f, "Validation Error: {}", msg),
            AppError::InternalInconsistency(msg) => write!(f, "Internal Inconsistency: {}", msg),
            AppError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
            AppError::DatabaseError(msg) => write!(f, "Database Error: {}", msg),
        }
    }
}

impl AppError {
    /// Shorthand for the uniform 401 answer.
    pub fn unauthorized() -> Self {
        AppError::Unauthorized(UNAUTHORIZED_MESSAGE.into())
    }

    /// The message shown to the caller. Internal failures never expose their detail.
    fn public_message(&self) -> String {
        match self {
            AppError::Unauthorized(msg)
            | AppError::Forbidden(msg)
            | AppError::BadRequest(msg)
            | AppError::NotFound(msg)
            | AppError::DuplicateUsername(msg)
            | AppError::ValidationError(msg) => msg.clone(),
            AppError::InternalInconsistency(_)
            | AppError::InternalServerError(_)
            | AppError::DatabaseError(_) => "internal server error".into(),
        }
    }
}

/// Converts `AppError` variants into `HttpResponse` objects.
impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::DuplicateUsername(_) => StatusCode::CONFLICT,
            AppError::ValidationError(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::InternalInconsistency(_)
            | AppError::InternalServerError(_)
            | AppError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::InternalInconsistency(detail) => {
                log::error!("internal inconsistency: {}", detail)
            }
            AppError::InternalServerError(detail) => log::error!("internal error: {}", detail),
            AppError::DatabaseError(detail) => log::error!("store failure: {}", detail),
            _ => {}
        }

        HttpResponse::build(self.status_code()).json(json!({
            "message": self.public_message()
        }))
    }
}

/// Converts `sqlx::Error` into `AppError`.
///
/// Unique violations can only come from the `users.username` constraint and become
/// `DuplicateUsername`; `RowNotFound` becomes `NotFound`; everything else is a store failure.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        match error {
            sqlx::Error::RowNotFound => AppError::NotFound("record not found".into()),
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                AppError::DuplicateUsername("username already taken".into())
            }
            _ => AppError::DatabaseError(error.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for AppError {
    fn from(error: sqlx::migrate::MigrateError) -> AppError {
        AppError::DatabaseError(format!("migration failed: {}", error))
    }
}

/// Converts `validator::ValidationErrors` into `AppError::ValidationError`.
impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        AppError::ValidationError(error.to_string())
    }
}

/// Converts `bcrypt::BcryptError` into `AppError::InternalServerError`.
impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::InternalServerError(error.to_string())
    }
}
