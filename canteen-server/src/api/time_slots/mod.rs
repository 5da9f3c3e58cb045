//! 点餐时段路由
//!
//! # 路由列表
//!
//! | 路径 | 方法 | 说明 | 认证 |
//! |------|------|------|------|
//! | /api/time-slots | GET | 各时段状态与下一个时段 | 无 |
//! | /api/time-slots/check/{category} | GET | 单个分类是否可点 | 无 |

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

/// 时段路由 - 公共路由 (无需认证)
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/time-slots", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::status))
        .route("/check/{category}", get(handler::check))
}
