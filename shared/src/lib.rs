//! Shared types for the canteen backend
//!
//! Domain models and the unified error system used by the server crate and
//! serialized to API clients.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use error::{AppError, AppResult, ErrorBody, ErrorCategory, ErrorCode};
pub use serde::{Deserialize, Serialize};
