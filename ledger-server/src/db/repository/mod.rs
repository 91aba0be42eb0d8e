//! Repository Module
//!
//! CRUD operations over SQLite. Repositories are free async functions over
//! `&SqlitePool`; steps that participate in a multi-entity transaction take
//! `&mut SqliteConnection` so the service layer controls the commit.

pub mod cash_register;
pub mod cashback;
pub mod customer;
pub mod daily_report;
pub mod neighborhood;
pub mod order;
pub mod product;
pub mod table_sale;

use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Business rule violation: {0}")]
    BusinessRule(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

impl From<serde_json::Error> for RepoError {
    fn from(err: serde_json::Error) -> Self {
        RepoError::Database(format!("snapshot decode failed: {err}"))
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;
