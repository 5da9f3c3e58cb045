//! Feedback Repository

use super::RepoResult;
use shared::models::Feedback;
use sqlx::SqlitePool;

pub async fn find_by_order(pool: &SqlitePool, order_id: i64) -> RepoResult<Option<Feedback>> {
    let feedback = sqlx::query_as::<_, Feedback>(
        "SELECT id, order_id, user_id, rating, comment, created_at FROM feedback WHERE order_id = ?",
    )
    .bind(order_id)
    .fetch_optional(pool)
    .await?;
    Ok(feedback)
}

/// Insert feedback; a second row for the same order fails with `RepoError::Duplicate`
pub async fn create(
    pool: &SqlitePool,
    order_id: i64,
    user_id: i64,
    rating: i32,
    comment: Option<&str>,
    now: i64,
) -> RepoResult<Feedback> {
    let feedback = sqlx::query_as::<_, Feedback>(
        "INSERT INTO feedback (order_id, user_id, rating, comment, created_at) VALUES (?, ?, ?, ?, ?) RETURNING id, order_id, user_id, rating, comment, created_at",
    )
    .bind(order_id)
    .bind(user_id)
    .bind(rating)
    .bind(comment)
    .bind(now)
    .fetch_one(pool)
    .await?;
    Ok(feedback)
}
