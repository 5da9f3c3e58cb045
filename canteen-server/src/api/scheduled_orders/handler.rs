//! Scheduled Order API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use shared::models::{
    BulkCancelRequest, BulkCancelResult, Order, OrderPage, SchedulableCatalog,
    ScheduledOrderCreate, ScheduledOrderListQuery, ScheduledOrderResult, SchedulingConstraints,
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::orders::Actor;
use crate::utils::AppResult;

/// Paging for the admin listing
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

pub async fn create(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Json(payload): Json<ScheduledOrderCreate>,
) -> AppResult<Json<ScheduledOrderResult>> {
    let result = state
        .scheduling
        .create(&Actor::from(&current_user), payload)
        .await?;
    Ok(Json(result))
}

/// The caller's scheduled orders
pub async fn list_mine(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Query(query): Query<ScheduledOrderListQuery>,
) -> AppResult<Json<OrderPage>> {
    let page = state
        .scheduling
        .list_for_user(&Actor::from(&current_user), query)
        .await?;
    Ok(Json(page))
}

/// Every scheduled order (admin)
pub async fn list_all(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<OrderPage>> {
    let page = state
        .scheduling
        .list_all(&Actor::from(&current_user), query.page, query.limit)
        .await?;
    Ok(Json(page))
}

pub async fn cancel_one(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<Order>> {
    let order = state
        .scheduling
        .cancel_one(&Actor::from(&current_user), id)
        .await?;
    Ok(Json(order))
}

pub async fn cancel_bulk(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Json(payload): Json<BulkCancelRequest>,
) -> AppResult<Json<BulkCancelResult>> {
    let result = state
        .scheduling
        .cancel_bulk(&Actor::from(&current_user), &payload.order_ids)
        .await?;
    Ok(Json(result))
}

pub async fn schedulable_items(
    State(state): State<ServerState>,
) -> AppResult<Json<SchedulableCatalog>> {
    let catalog = state.scheduling.schedulable_items().await?;
    Ok(Json(catalog))
}

pub async fn constraints(State(state): State<ServerState>) -> Json<SchedulingConstraints> {
    Json(state.scheduling.constraints())
}
