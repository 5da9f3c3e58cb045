//! Input validation helpers
//!
//! Centralized text length constants and validation functions.
//! SQLite TEXT has no built-in length enforcement.

use shared::ErrorCode;

use crate::orders::OrderError;
use crate::utils::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: menu items, proportions
pub const MAX_NAME_LEN: usize = 200;

/// Order comments, feedback comments
pub const MAX_NOTE_LEN: usize = 500;

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.chars().count() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.chars().count()
        )));
    }
    Ok(())
}

// ── Validation helpers (Order engine) ───────────────────────────────

/// Validate an optional string for order operations (max length).
pub fn validate_order_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), OrderError> {
    validate_optional_text(value, field, max_len)
        .map_err(|e| OrderError::Validation(ErrorCode::ValueOutOfRange, e.message))
}
