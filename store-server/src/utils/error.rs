//! Unified error handling
//!
//! Application-level error type and response envelope:
//! - [`AppError`] - application error enum, maps to HTTP status codes
//! - [`AppResponse`] - API response structure
//!
//! # Error code convention
//!
//! | Prefix | Category | Example |
//! |--------|----------|---------|
//! | E0xxx  | Business | E0003 not found |
//! | E2xxx  | Authorization | E2001 permission denied |
//! | E3xxx  | Authentication | E3001 no actor identity |
//! | E9xxx  | System | E9002 database error |

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;

use crate::db::repository::RepoError;

/// Error response envelope
///
/// ```json
/// {
///   "code": "E0003",
///   "message": "Resource not found: ..."
/// }
/// ```
///
/// Successful handlers return their payload directly; only errors are
/// wrapped.
#[derive(Debug, Serialize)]
pub struct AppResponse<T> {
    /// Error code (E0000 means success)
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

/// Application error enum
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // ========== Authentication / authorization (4xx) ==========
    #[error("Authentication required")]
    /// No actor identity on the request (401)
    Unauthorized,

    #[error("Permission denied: {0}")]
    /// Actor lacks the required capability (403)
    Forbidden(String),

    // ========== Business logic errors (4xx) ==========
    #[error("Resource not found: {0}")]
    /// Referenced entity absent (404)
    NotFound(String),

    #[error("Resource already exists: {0}")]
    /// Unique constraint conflict, e.g. duplicate SKU (409)
    Conflict(String),

    #[error("Validation failed: {0}")]
    /// Malformed or missing input (400)
    Validation(String),

    #[error("Business rule violation: {0}")]
    /// Rule violation such as insufficient stock (422)
    BusinessRule(String),

    // ========== System errors (5xx) ==========
    #[error("Database error: {0}")]
    /// Store failure; detail is logged, not surfaced (500)
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "E3001", "Please login first"),

            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, "E2001", msg.as_str()),

            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "E0003", msg.as_str()),

            AppError::Conflict(msg) => (StatusCode::CONFLICT, "E0004", msg.as_str()),

            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "E0002", msg.as_str()),

            AppError::BusinessRule(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "E0005", msg.as_str())
            }

            AppError::Database(msg) => {
                error!(target: "database", error = %msg, "Database error occurred");
                (StatusCode::INTERNAL_SERVER_ERROR, "E9002", "Database error")
            }

            AppError::Internal(msg) => {
                error!(target: "internal", error = %msg, "Internal error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "E9001",
                    "Internal server error",
                )
            }
        };

        let body = Json(AppResponse::<()> {
            code: code.to_string(),
            message: message.to_string(),
            data: None,
        });

        (status, body).into_response()
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::NotFound(msg),
            RepoError::Duplicate(msg) => AppError::Conflict(msg),
            RepoError::InsufficientStock(name) => {
                AppError::BusinessRule(format!("Insufficient stock for product: {name}"))
            }
            RepoError::Forbidden(msg) => AppError::Forbidden(msg),
            RepoError::Validation(msg) => AppError::Validation(msg),
            RepoError::Database(msg) => AppError::Database(msg),
        }
    }
}

// ========== Helper Constructors ==========

impl AppError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}
