//! 测试公共工具: 内存数据库、固定时钟、通知记录
#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use parking_lot::Mutex;
use shared::models::{DayOfWeek, MealCategory, MenuItem, MenuItemCreate, NotificationType, Proportion};
use sqlx::SqlitePool;

use canteen_server::clock::{Clock, FixedClock};
use canteen_server::db::DbService;
use canteen_server::db::repository::{RepoError, RepoResult, menu_item};
use canteen_server::notifications::NotificationSink;
use canteen_server::{OrderService, ScheduledOrderService};

/// (user_id, order_id, message)
pub type Sent = (i64, Option<i64>, String);

/// Sink that keeps every notification in memory
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub sent: Mutex<Vec<Sent>>,
}

#[async_trait]
impl NotificationSink for RecordingSink {
    async fn notify(
        &self,
        user_id: i64,
        order_id: Option<i64>,
        _kind: NotificationType,
        message: &str,
    ) -> RepoResult<()> {
        self.sent.lock().push((user_id, order_id, message.to_string()));
        Ok(())
    }
}

/// Sink whose store is always unavailable
#[derive(Debug, Default)]
pub struct FailingSink {
    pub attempts: Mutex<u32>,
}

#[async_trait]
impl NotificationSink for FailingSink {
    async fn notify(
        &self,
        _user_id: i64,
        _order_id: Option<i64>,
        _kind: NotificationType,
        _message: &str,
    ) -> RepoResult<()> {
        *self.attempts.lock() += 1;
        Err(RepoError::Database("notification store unavailable".into()))
    }
}

pub struct Harness {
    pub pool: SqlitePool,
    pub clock: Arc<FixedClock>,
    pub sink: Arc<RecordingSink>,
    pub orders: OrderService,
    pub scheduling: ScheduledOrderService,
}

/// Monday 2026-03-02 at the given business-local time
pub fn monday_at(h: u32, m: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 3, 2)
        .unwrap()
        .and_hms_opt(h, m, 0)
        .unwrap()
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

impl Harness {
    /// Both clocks share one fixed instant
    pub async fn at(local: NaiveDateTime) -> Self {
        let db = DbService::in_memory().await.unwrap();
        let clock = Arc::new(FixedClock::at_local(local));
        let sink = Arc::new(RecordingSink::default());

        let dyn_clock: Arc<dyn Clock> = clock.clone();
        let dyn_sink: Arc<dyn NotificationSink> = sink.clone();
        let orders = OrderService::new(db.pool.clone(), dyn_clock.clone(), dyn_clock.clone(), dyn_sink);
        let scheduling = ScheduledOrderService::new(db.pool.clone(), dyn_clock.clone(), dyn_clock);

        Self {
            pool: db.pool,
            clock,
            sink,
            orders,
            scheduling,
        }
    }

    pub async fn add_item(&self, data: MenuItemCreate) -> MenuItem {
        menu_item::create(&self.pool, data, self.clock.now_millis())
            .await
            .unwrap()
    }
}

/// Uncategorized, orderable at any time
pub fn plain(name: &str, price: f64) -> MenuItemCreate {
    MenuItemCreate {
        name: name.to_string(),
        description: None,
        price,
        category: MealCategory::None,
        day_of_week: None,
        schedulable: false,
        available: true,
        proportions: Vec::new(),
    }
}

/// Thali: half 30 / full 50
pub fn thali() -> MenuItemCreate {
    MenuItemCreate {
        proportions: vec![
            Proportion {
                name: "half".into(),
                price: 30.0,
            },
            Proportion {
                name: "full".into(),
                price: 50.0,
            },
        ],
        ..plain("Thali", 30.0)
    }
}

/// Schedulable rotation entry
pub fn rotation(name: &str, category: MealCategory, day: DayOfWeek, price: f64) -> MenuItemCreate {
    MenuItemCreate {
        category,
        day_of_week: Some(day),
        schedulable: true,
        ..plain(name, price)
    }
}
