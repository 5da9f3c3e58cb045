use sqlx::SqlitePool;
use std::sync::Arc;

use crate::auth::JwtService;
use crate::clock::{Clock, SystemClock, TrustedClock};
use crate::core::{Config, Result};
use crate::db::DbService;
use crate::notifications::{NotificationSink, SqliteNotificationSink};
use crate::orders::OrderService;
use crate::scheduling::ScheduledOrderService;
use crate::slots::SlotPolicy;

/// 服务器状态 - 持有所有服务的共享引用
///
/// 使用 Arc 实现浅拷贝，所有权成本极低。
///
/// # 服务组件
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | pool | SqlitePool | 数据库连接池 |
/// | jwt_service | Arc<JwtService> | JWT 认证服务 |
/// | orders | OrderService | 即时订单 |
/// | scheduling | ScheduledOrderService | 预订订单 |
/// | slots | Arc<SlotPolicy> | 点餐时段 |
/// | trusted | Arc<dyn Clock> | 可信时钟 (时段判断) |
#[derive(Clone, Debug)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// SQLite 连接池
    pub pool: SqlitePool,
    /// JWT 认证服务 (Arc 共享所有权)
    pub jwt_service: Arc<JwtService>,
    /// 即时订单服务
    pub orders: OrderService,
    /// 预订订单服务
    pub scheduling: ScheduledOrderService,
    /// 点餐时段表
    pub slots: Arc<SlotPolicy>,
    /// 可信时钟
    pub trusted: Arc<dyn Clock>,
}

impl ServerState {
    /// 使用给定连接池和时钟组装服务
    ///
    /// 测试中传入 `FixedClock` 控制时间
    pub fn new(
        config: Config,
        pool: SqlitePool,
        trusted: Arc<dyn Clock>,
        wall: Arc<dyn Clock>,
    ) -> Self {
        let slots = Arc::new(SlotPolicy::canteen());
        let notifier: Arc<dyn NotificationSink> =
            Arc::new(SqliteNotificationSink::new(pool.clone(), wall.clone()));

        let orders = OrderService::new(pool.clone(), trusted.clone(), wall.clone(), notifier)
            .with_windows(config.order_windows())
            .with_slots(slots.clone());
        let scheduling = ScheduledOrderService::new(pool.clone(), trusted.clone(), wall);
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));

        Self {
            config,
            pool,
            jwt_service,
            orders,
            scheduling,
            slots,
            trusted,
        }
    }

    /// 初始化服务器状态
    ///
    /// 1. 打开数据库并应用迁移
    /// 2. 在进程启动时固定可信时钟
    /// 3. 组装各服务
    pub async fn initialize(config: &Config) -> Result<Self> {
        let db = DbService::new(&config.database_path).await?;
        let trusted: Arc<dyn Clock> = Arc::new(TrustedClock::new());
        let wall: Arc<dyn Clock> = Arc::new(SystemClock);

        tracing::info!(
            database = %config.database_path,
            environment = %config.environment,
            "Server state initialized"
        );

        Ok(Self::new(config.clone(), db.pool, trusted, wall))
    }

    /// 获取 JWT 服务
    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }
}
