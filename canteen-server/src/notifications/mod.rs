//! Notification sink
//!
//! Order code hands notifications to a [`NotificationSink`] and never waits
//! on the outcome: [`emit`] logs failures and moves on, so a committed order
//! is never rolled back because a notification could not be stored.

use async_trait::async_trait;
use shared::models::{NotificationList, NotificationType};
use sqlx::SqlitePool;
use std::sync::Arc;

use crate::clock::Clock;
use crate::db::repository::{RepoResult, notification};

/// Unread + read notifications returned per request
const LIST_LIMIT: i64 = 50;

#[async_trait]
pub trait NotificationSink: Send + Sync + std::fmt::Debug {
    async fn notify(
        &self,
        user_id: i64,
        order_id: Option<i64>,
        kind: NotificationType,
        message: &str,
    ) -> RepoResult<()>;
}

/// Fire-and-forget delivery
pub async fn emit(
    sink: &dyn NotificationSink,
    user_id: i64,
    order_id: Option<i64>,
    kind: NotificationType,
    message: &str,
) {
    if let Err(e) = sink.notify(user_id, order_id, kind, message).await {
        tracing::warn!(user_id, ?order_id, error = %e, "Failed to store notification");
    }
}

/// Writes notifications to the `notification` table
#[derive(Debug, Clone)]
pub struct SqliteNotificationSink {
    pool: SqlitePool,
    clock: Arc<dyn Clock>,
}

impl SqliteNotificationSink {
    pub fn new(pool: SqlitePool, clock: Arc<dyn Clock>) -> Self {
        Self { pool, clock }
    }
}

#[async_trait]
impl NotificationSink for SqliteNotificationSink {
    async fn notify(
        &self,
        user_id: i64,
        order_id: Option<i64>,
        kind: NotificationType,
        message: &str,
    ) -> RepoResult<()> {
        let id = notification::insert(
            &self.pool,
            user_id,
            order_id,
            kind,
            message,
            self.clock.now_millis(),
        )
        .await?;
        tracing::debug!(notification_id = id, user_id, "Notification stored");
        Ok(())
    }
}

/// Latest notifications of a user with the unread count
pub async fn list_for_user(pool: &SqlitePool, user_id: i64) -> RepoResult<NotificationList> {
    let notifications = notification::list_for_user(pool, user_id, LIST_LIMIT).await?;
    let unread_count = notification::unread_count(pool, user_id).await?;
    Ok(NotificationList {
        notifications,
        unread_count,
    })
}

/// Advisory sent to the owner of an admin-placed order
pub fn admin_order_message(order_id: i64, window_hours: i64) -> String {
    format!(
        "An order (#{order_id}) was placed on your behalf by an admin. \
         You can cancel or dispute it within {window_hours} hours."
    )
}
