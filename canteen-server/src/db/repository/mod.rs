//! Repository Module
//!
//! Free functions over `SqlitePool` per table. Multi-statement writes take a
//! `&mut SqliteConnection` so callers can run them inside a transaction.

pub mod feedback;
pub mod menu_item;
pub mod notification;
pub mod order;

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
            sqlx::Error::RowNotFound => RepoError::NotFound("Row not found".into()),
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                RepoError::Duplicate(db.message().to_string())
            }
            _ => RepoError::Database(err.to_string()),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Default page size for list endpoints
pub const DEFAULT_PAGE_SIZE: u32 = 10;
/// Upper bound for `limit`
pub const MAX_PAGE_SIZE: u32 = 100;

/// `(offset, limit)` for a 1-based page
pub fn page_window(page: Option<u32>, limit: Option<u32>) -> (i64, i64) {
    let page = page.unwrap_or(1).max(1);
    let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
    (i64::from(page - 1) * i64::from(limit), i64::from(limit))
}
