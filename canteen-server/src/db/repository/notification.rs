//! Notification Repository

use super::RepoResult;
use shared::models::{Notification, NotificationType};
use sqlx::SqlitePool;

pub async fn insert(
    pool: &SqlitePool,
    user_id: i64,
    order_id: Option<i64>,
    kind: NotificationType,
    message: &str,
    now: i64,
) -> RepoResult<i64> {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO notification (user_id, order_id, type, message, is_read, created_at) VALUES (?, ?, ?, ?, 0, ?) RETURNING id",
    )
    .bind(user_id)
    .bind(order_id)
    .bind(kind)
    .bind(message)
    .bind(now)
    .fetch_one(pool)
    .await?;
    Ok(id)
}

/// Newest first
pub async fn list_for_user(pool: &SqlitePool, user_id: i64, limit: i64) -> RepoResult<Vec<Notification>> {
    let rows = sqlx::query_as::<_, Notification>(
        "SELECT id, user_id, order_id, type, message, is_read, created_at FROM notification WHERE user_id = ? ORDER BY created_at DESC, id DESC LIMIT ?",
    )
    .bind(user_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn unread_count(pool: &SqlitePool, user_id: i64) -> RepoResult<i64> {
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM notification WHERE user_id = ? AND is_read = 0")
            .bind(user_id)
            .fetch_one(pool)
            .await?;
    Ok(count)
}

/// Only the recipient can mark a notification read
pub async fn mark_read(pool: &SqlitePool, id: i64, user_id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("UPDATE notification SET is_read = 1 WHERE id = ? AND user_id = ?")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}
