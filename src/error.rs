//!
//! # Custom Error Handling
//!
//! This module defines the custom error type `AppError` used throughout the application.
//! It centralizes error management, providing a consistent way to handle and represent
//! the error conditions handlers can hit, from a missing bearer token to a failed query.
//!
//! `AppError` implements `actix_web::error::ResponseError` so handlers can return
//! `Result<_, AppError>` and have the variant decide the HTTP status. Internal failures
//! are logged with their detail and answered with a generic message; the client never
//! sees database or hashing error text.
//!
//! `From` implementations for `StoreError`, `validator::ValidationErrors`,
//! `bcrypt::BcryptError` and `actix_multipart::MultipartError` allow `?` in handlers.

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

use crate::store::StoreError;

/// Message returned to clients for every internal failure.
const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Represents all possible errors that can occur within the application.
///
/// Each variant corresponds to a specific type of error, often carrying a message
/// detailing the issue. These errors are then converted into appropriate HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// No bearer token was presented (HTTP 401).
    Unauthorized(String),
    /// A token was presented but is invalid or expired, or the caller does not own
    /// the resource it tried to remove (HTTP 403).
    Forbidden(String),
    /// Represents a client-side error due to a conflicting or malformed request (HTTP 400).
    /// Duplicate email, already liked and not liked are reported this way.
    BadRequest(String),
    /// Login failed. Unknown email and wrong password share this variant (HTTP 400).
    InvalidCredentials,
    /// Represents a situation where a requested resource was not found (HTTP 404).
    NotFound(String),
    /// An uploaded payload exceeded the configured bound (HTTP 413).
    PayloadTooLarge(String),
    /// Represents an error due to failed input validation (HTTP 422 Unprocessable Entity).
    /// Wraps errors from the `validator` crate.
    ValidationError(String),
    /// Represents an unexpected server-side error (HTTP 500).
    InternalServerError(String),
    /// Represents an error originating from the persistence layer (HTTP 500).
    DatabaseError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            AppError::InvalidCredentials => write!(f, "Invalid credentials"),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::PayloadTooLarge(msg) => write!(f, "Payload Too Large: {}", msg),
            AppError::ValidationError(msg) => write!(f, "Validation Error: {}", msg),
            AppError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
            AppError::DatabaseError(msg) => write!(f, "Database Error: {}", msg),
        }
    }
}

impl AppError {
    /// The message placed in the JSON body. Internal variants never expose their detail.
    fn public_message(&self) -> String {
        match self {
            AppError::Unauthorized(msg)
            | AppError::Forbidden(msg)
            | AppError::BadRequest(msg)
            | AppError::NotFound(msg)
            | AppError::PayloadTooLarge(msg)
            | AppError::ValidationError(msg) => msg.clone(),
            AppError::InvalidCredentials => "Invalid credentials".to_string(),
            AppError::InternalServerError(_) | AppError::DatabaseError(_) => {
                INTERNAL_ERROR_MESSAGE.to_string()
            }
        }
    }
}

/// Converts `AppError` variants into `HttpResponse` objects.
///
/// This implementation allows Actix Web to automatically translate `AppError`
/// results from handlers into the correct HTTP status codes and JSON error responses.
impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::BadRequest(_) | AppError::InvalidCredentials => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::ValidationError(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::InternalServerError(_) | AppError::DatabaseError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let AppError::InternalServerError(detail) | AppError::DatabaseError(detail) = self {
            log::error!("{}: {}", self.status_code(), detail);
        }
        HttpResponse::build(self.status_code()).json(json!({
            "error": self.public_message()
        }))
    }
}

/// Converts repository failures into `AppError`.
///
/// A `Conflict` that reaches a handler unhandled is still a client error; backend
/// failures become `AppError::DatabaseError`.
impl From<StoreError> for AppError {
    fn from(error: StoreError) -> AppError {
        match error {
            StoreError::Conflict(msg) => AppError::BadRequest(msg),
            StoreError::Backend(msg) => AppError::DatabaseError(msg),
        }
    }
}

/// Converts `validator::ValidationErrors` into `AppError::ValidationError`.
///
/// The detailed validation messages are preserved.
impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        AppError::ValidationError(error.to_string())
    }
}

/// Converts `bcrypt::BcryptError` into `AppError::InternalServerError`.
impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::InternalServerError(format!("Password hashing failed: {}", error))
    }
}

impl From<actix_multipart::MultipartError> for AppError {
    fn from(error: actix_multipart::MultipartError) -> AppError {
        AppError::BadRequest(format!("Malformed multipart body: {}", error))
    }
}
