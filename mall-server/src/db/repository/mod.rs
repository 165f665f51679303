//! Repository Module
//!
//! Data access functions over the SQLite pool. Functions that participate in a
//! caller-owned transaction take `&mut SqliteConnection`; plain reads take
//! `&SqlitePool`.

pub mod address;
pub mod cart;
pub mod order;
pub mod snack;

use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                RepoError::Duplicate(db.message().to_string())
            }
            _ => RepoError::Database(err.to_string()),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Build a `?, ?, ...` placeholder list for an IN clause
pub(crate) fn placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}
