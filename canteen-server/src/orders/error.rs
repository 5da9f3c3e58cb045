//! Order engine errors

use serde::Serialize;
use shared::error::{AppError, ErrorCode};
use thiserror::Error;

use crate::db::repository::RepoError;

/// One rejected item of a batch, reported back to the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemRejection {
    pub menu_item_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub reason: String,
    #[serde(skip)]
    pub code: ErrorCode,
}

impl ItemRejection {
    pub fn new(menu_item_id: i64, name: Option<&str>, code: ErrorCode, reason: impl Into<String>) -> Self {
        Self {
            menu_item_id,
            name: name.map(str::to_string),
            reason: reason.into(),
            code,
        }
    }
}

/// Order engine error
///
/// `WindowExpired` is kept apart from `Conflict` so callers can tell an
/// elapsed cancel/dispute window from a state clash.
#[derive(Debug, Error)]
pub enum OrderError {
    #[error("{1}")]
    Validation(ErrorCode, String),

    #[error("{} item(s) rejected", .0.len())]
    Rejected(Vec<ItemRejection>),

    #[error("{1}")]
    NotFound(ErrorCode, String),

    #[error("{1}")]
    Forbidden(ErrorCode, String),

    #[error("{1}")]
    Conflict(ErrorCode, String),

    #[error("{1}")]
    WindowExpired(ErrorCode, String),

    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}

impl OrderError {
    pub fn code(&self) -> ErrorCode {
        match self {
            OrderError::Validation(code, _)
            | OrderError::NotFound(code, _)
            | OrderError::Forbidden(code, _)
            | OrderError::Conflict(code, _)
            | OrderError::WindowExpired(code, _) => *code,
            OrderError::Rejected(_) => ErrorCode::ItemsRejected,
            OrderError::Repo(RepoError::NotFound(_)) => ErrorCode::NotFound,
            OrderError::Repo(RepoError::Duplicate(_)) => ErrorCode::AlreadyExists,
            OrderError::Repo(RepoError::Validation(_)) => ErrorCode::ValidationFailed,
            OrderError::Repo(RepoError::Database(_)) => ErrorCode::DatabaseError,
        }
    }
}

pub type OrderResult<T> = Result<T, OrderError>;

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::not_found(msg),
            RepoError::Duplicate(msg) => AppError::already_exists(msg),
            RepoError::Validation(msg) => AppError::validation(msg),
            RepoError::Database(msg) => {
                // details go to the log only
                tracing::error!(error = %msg, "Database error");
                AppError::new(ErrorCode::DatabaseError)
            }
        }
    }
}

impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::Validation(code, msg)
            | OrderError::NotFound(code, msg)
            | OrderError::Forbidden(code, msg)
            | OrderError::Conflict(code, msg) => AppError::with_message(code, msg),
            OrderError::WindowExpired(code, msg) => AppError::window_expired(code, msg),
            OrderError::Rejected(rejections) => {
                AppError::items_rejected(serde_json::to_value(&rejections).unwrap_or_default())
            }
            OrderError::Repo(e) => e.into(),
        }
    }
}
