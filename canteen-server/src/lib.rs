//! Canteen Server - 食堂点餐与预订订单服务
//!
//! # 架构概述
//!
//! - **时钟** (`clock`): 可信时钟与墙钟，业务时区 UTC+5:30
//! - **时段** (`slots`): 早餐/午餐/点心点餐窗口
//! - **计价** (`pricing`): 份量价格解析与订单总额
//! - **订单** (`orders`): 校验、下单、取消/申诉窗口、状态流转、汇总
//! - **预订** (`scheduling`): 按日期范围逐日生成订单
//! - **通知** (`notifications`): 代下单提醒
//! - **数据库** (`db`): SQLite 仓储
//! - **认证** (`auth`): JWT 校验
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! canteen-server/src/
//! ├── core/          # 配置、状态、启动错误
//! ├── auth/          # JWT 认证、管理员守卫
//! ├── api/           # HTTP 路由和处理器
//! ├── routes/        # 路由与中间件组装
//! ├── db/            # 连接池、迁移、仓储
//! ├── orders/        # 即时订单引擎
//! ├── scheduling/    # 预订订单引擎
//! ├── pricing/       # 价格解析
//! └── utils/         # 错误、日志、时间、校验
//! ```

pub mod api;
pub mod auth;
pub mod clock;
pub mod core;
pub mod db;
pub mod notifications;
pub mod orders;
pub mod pricing;
pub mod routes;
pub mod scheduling;
pub mod slots;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentUser, JwtService};
pub use clock::{Clock, FixedClock, SystemClock, TrustedClock};
pub use core::{Config, Server, ServerState};
pub use orders::{Actor, OrderError, OrderService};
pub use scheduling::ScheduledOrderService;
pub use utils::{AppError, AppResult};

// Re-export unified error types from shared
pub use utils::{ErrorBody, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - 支持 tracing 格式说明符
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

/// 设置运行环境: 加载 .env 并初始化日志
pub fn setup_environment() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let log_level = std::env::var("LOG_LEVEL").ok();
    let log_dir = std::env::var("LOG_DIR").ok();
    let json = std::env::var("LOG_JSON")
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);

    init_logger_with_file(log_level.as_deref(), json, log_dir.as_deref());
    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
   ______            __
  / ____/___ _____  / /____  ___  ____
 / /   / __ `/ __ \/ __/ _ \/ _ \/ __ \
/ /___/ /_/ / / / / /_/  __/  __/ / / /
\____/\__,_/_/ /_/\__/\___/\___/_/ /_/
    "#
    );
}
