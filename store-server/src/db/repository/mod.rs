//! Repository Module
//!
//! Provides CRUD operations over the SQLite tables. Repositories own a
//! pool for plain reads; mutation helpers that must participate in a
//! caller's transaction take a `&mut SqliteConnection` instead.

// Catalog
pub mod product;

// Orders
pub mod order;

// Re-exports
pub use order::{OrderFilter, OrderRepository};
pub use product::ProductRepository;

use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Insufficient stock: {0}")]
    InsufficientStock(String),

    #[error("Permission denied: {0}")]
    Forbidden(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => RepoError::NotFound(err.to_string()),
            sqlx::Error::Database(db_err) => {
                if db_err.is_unique_violation() {
                    RepoError::Duplicate(db_err.to_string())
                } else if db_err.is_foreign_key_violation() {
                    RepoError::Validation(format!("Referenced entity does not exist: {db_err}"))
                } else {
                    RepoError::Database(err.to_string())
                }
            }
            _ => RepoError::Database(err.to_string()),
        }
    }
}

impl From<crate::pricing::PricingError> for RepoError {
    fn from(err: crate::pricing::PricingError) -> Self {
        RepoError::Validation(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;
