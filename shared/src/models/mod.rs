//! Data models
//!
//! Shared between canteen-server and API clients.
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY).

pub mod feedback;
pub mod menu_item;
pub mod notification;
pub mod order;
pub mod scheduling;
pub mod summary;

// Re-exports
pub use feedback::*;
pub use menu_item::*;
pub use notification::*;
pub use order::*;
pub use scheduling::*;
pub use summary::*;
