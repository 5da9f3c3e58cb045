//! Order API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use shared::models::{
    BillQuery, BillSummary, DailySummary, DailySummaryQuery, Feedback, FeedbackCreate, Order,
    OrderCreate, OrderListQuery, OrderPage, OrderStatusUpdate, SettleResult,
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::orders::Actor;
use crate::utils::AppResult;

/// Place an order for the caller, or for `for_user_id` when the caller is an admin
pub async fn create(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Json(payload): Json<OrderCreate>,
) -> AppResult<Json<Order>> {
    let order = state
        .orders
        .create(&Actor::from(&current_user), payload)
        .await?;
    Ok(Json(order))
}

/// List orders (non-admins only see their own)
pub async fn list(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Query(query): Query<OrderListQuery>,
) -> AppResult<Json<OrderPage>> {
    let page = state
        .orders
        .list_orders(&Actor::from(&current_user), query)
        .await?;
    Ok(Json(page))
}

/// Get order by id
pub async fn get_by_id(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<Order>> {
    let order = state
        .orders
        .get_order(&Actor::from(&current_user), id)
        .await?;
    Ok(Json(order))
}

/// Set status (admin)
pub async fn update_status(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<OrderStatusUpdate>,
) -> AppResult<Json<Order>> {
    let order = state
        .orders
        .update_status(&Actor::from(&current_user), id, &payload.status)
        .await?;
    Ok(Json(order))
}

/// Cancel within the applicable window
pub async fn cancel(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<Order>> {
    let order = state
        .orders
        .cancel(&Actor::from(&current_user), id)
        .await?;
    Ok(Json(order))
}

/// Dispute an admin-placed order
pub async fn dispute(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<Order>> {
    let order = state
        .orders
        .dispute(&Actor::from(&current_user), id)
        .await?;
    Ok(Json(order))
}

pub async fn add_feedback(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<FeedbackCreate>,
) -> AppResult<Json<Feedback>> {
    let feedback = state
        .orders
        .add_feedback(&Actor::from(&current_user), id, payload)
        .await?;
    Ok(Json(feedback))
}

/// Settle every delivered order of a user (admin)
pub async fn settle_user(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(user_id): Path<i64>,
) -> AppResult<Json<SettleResult>> {
    let result = state
        .orders
        .settle_for_user(&Actor::from(&current_user), user_id)
        .await?;
    Ok(Json(result))
}

/// Item totals for one day (admin)
pub async fn daily_summary(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Query(query): Query<DailySummaryQuery>,
) -> AppResult<Json<DailySummary>> {
    let summary = state
        .orders
        .daily_item_summary(&Actor::from(&current_user), query.date)
        .await?;
    Ok(Json(summary))
}

pub async fn bill_summary(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Query(query): Query<BillQuery>,
) -> AppResult<Json<BillSummary>> {
    let summary = state
        .orders
        .bill_summary(&Actor::from(&current_user), query)
        .await?;
    Ok(Json(summary))
}
