//! Scheduled Order API Module
//!
//! 按日期范围预订，每个符合条件的日期生成一张订单。

mod handler;

use axum::{
    Router, middleware,
    routing::{delete, get, post},
};

use crate::auth::require_admin;
use crate::core::ServerState;

/// Scheduled order router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/scheduled-orders", routes())
}

fn routes() -> Router<ServerState> {
    let user_routes = Router::new()
        .route("/", post(handler::create).get(handler::list_mine))
        .route("/schedulable-items", get(handler::schedulable_items))
        .route("/constraints", get(handler::constraints));

    // 管理路由：仅管理员可用
    let admin_routes = Router::new()
        .route("/all", get(handler::list_all))
        .route("/bulk-cancel", post(handler::cancel_bulk))
        .route("/{id}", delete(handler::cancel_one))
        .layer(middleware::from_fn(require_admin));

    user_routes.merge(admin_routes)
}
