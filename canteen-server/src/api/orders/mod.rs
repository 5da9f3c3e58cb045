//! Order API Module
//!
//! | 路径 | 方法 | 说明 | 权限 |
//! |------|------|------|------|
//! | /api/orders | POST | 下单 (管理员可代下单) | 登录 |
//! | /api/orders | GET | 订单列表 | 登录 |
//! | /api/orders/{id} | GET | 订单详情 | 本人/管理员 |
//! | /api/orders/{id}/cancel | POST | 取消 | 登录 |
//! | /api/orders/{id}/dispute | POST | 申诉代下单 | 登录 |
//! | /api/orders/{id}/feedback | POST | 评价 | 登录 |
//! | /api/orders/bill-summary | GET | 账单汇总 | 本人/管理员 |
//! | /api/orders/{id}/status | PATCH | 修改状态 | 管理员 |
//! | /api/orders/settle-user/{user_id} | POST | 结算 | 管理员 |
//! | /api/orders/daily-summary | GET | 当日菜品汇总 | 管理员 |

mod handler;

use axum::{
    Router, middleware,
    routing::{get, patch, post},
};

use crate::auth::require_admin;
use crate::core::ServerState;

/// Order router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    // 用户路由：服务层再校验归属
    let user_routes = Router::new()
        .route("/", post(handler::create).get(handler::list))
        .route("/bill-summary", get(handler::bill_summary))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/cancel", post(handler::cancel))
        .route("/{id}/dispute", post(handler::dispute))
        .route("/{id}/feedback", post(handler::add_feedback));

    // 管理路由：仅管理员可用
    let admin_routes = Router::new()
        .route("/{id}/status", patch(handler::update_status))
        .route("/settle-user/{user_id}", post(handler::settle_user))
        .route("/daily-summary", get(handler::daily_summary))
        .layer(middleware::from_fn(require_admin));

    user_routes.merge(admin_routes)
}
