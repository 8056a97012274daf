//! Error types for the mechanic shop service.
//!
//! Defines a unified error type that maps cleanly to HTTP responses.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use sqlx::error::ErrorKind;
use thiserror::Error;

/// Unified error type for shop operations.
#[derive(Debug, Error)]
pub enum ShopError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),

    #[error("Foreign key constraint violated: {0}")]
    ForeignKeyViolation(String),

    #[error("Database error: {0}")]
    Database(#[source] sqlx::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sqlx::Error> for ShopError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Configuration(e) = &err {
            return ShopError::Config(e.to_string());
        }
        if let sqlx::Error::Database(db_err) = &err {
            match db_err.kind() {
                ErrorKind::UniqueViolation => {
                    return ShopError::UniqueViolation(db_err.message().to_string())
                }
                ErrorKind::ForeignKeyViolation => {
                    return ShopError::ForeignKeyViolation(db_err.message().to_string())
                }
                _ => {}
            }
        }
        ShopError::Database(err)
    }
}

/// Unreadable bodies (bad JSON syntax, wrong content type) are bad requests.
impl From<JsonRejection> for ShopError {
    fn from(rejection: JsonRejection) -> Self {
        ShopError::BadRequest(rejection.body_text())
    }
}

/// Error response body for API clients.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ShopError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ShopError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ShopError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ShopError::UniqueViolation(_) => (StatusCode::CONFLICT, "UNIQUE_VIOLATION"),
            ShopError::ForeignKeyViolation(_) => (StatusCode::CONFLICT, "FOREIGN_KEY_VIOLATION"),
            ShopError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "DATABASE_ERROR"),
            ShopError::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "CONFIG_ERROR"),
            ShopError::Serialization(_) => (StatusCode::BAD_REQUEST, "SERIALIZATION_ERROR"),
            ShopError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for ShopError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let (message, details) = match &self {
            ShopError::NotFound(msg) => (msg.clone(), None),
            ShopError::BadRequest(msg) => ("Malformed request body".to_string(), Some(msg.clone())),
            ShopError::UniqueViolation(msg) => (
                "A record with the same unique value already exists".to_string(),
                Some(msg.clone()),
            ),
            ShopError::ForeignKeyViolation(msg) => (
                "The record references a missing row or is still referenced".to_string(),
                Some(msg.clone()),
            ),
            ShopError::Database(e) => {
                // Log the actual error but don't expose internals
                tracing::error!(error = %e, "Database error");
                ("A database error occurred".to_string(), None)
            }
            ShopError::Config(msg) => (
                "Configuration error".to_string(),
                Some(msg.clone()),
            ),
            ShopError::Serialization(e) => (
                "Request body does not match the expected fields".to_string(),
                Some(e.to_string()),
            ),
            ShopError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                ("An internal error occurred".to_string(), None)
            }
        };

        let body = ErrorResponse {
            error: message,
            code: code.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for shop operations.
pub type ShopResult<T> = Result<T, ShopError>;
