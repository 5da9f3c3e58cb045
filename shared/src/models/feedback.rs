//! Feedback Model

use serde::{Deserialize, Serialize};

/// Order feedback, at most one per order
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Feedback {
    pub id: i64,
    pub order_id: i64,
    pub user_id: i64,
    /// 1..=5
    pub rating: i32,
    pub comment: Option<String>,
    pub created_at: i64,
}

/// Submit feedback payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackCreate {
    pub rating: i32,
    pub comment: Option<String>,
}
