//! Notification API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::models::NotificationList;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::notification;
use crate::notifications;
use crate::utils::{AppError, AppResult};

pub async fn list(
    State(state): State<ServerState>,
    current_user: CurrentUser,
) -> AppResult<Json<NotificationList>> {
    let list = notifications::list_for_user(&state.pool, current_user.id).await?;
    Ok(Json(list))
}

/// Mark one of the caller's notifications as read
pub async fn mark_read(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let updated = notification::mark_read(&state.pool, id, current_user.id).await?;
    if !updated {
        return Err(AppError::not_found(format!("Notification {}", id)));
    }
    Ok(Json(true))
}
