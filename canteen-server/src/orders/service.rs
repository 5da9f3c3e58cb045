//! Order lifecycle
//!
//! ```text
//! Pending → Confirmed → Delivered → Settled
//!    └──────────┴── cancel ──→ Cancelled
//! ```
//!
//! Slot and weekday eligibility read the trusted clock. Record timestamps and
//! cancel / dispute windows read the wall clock, matching `created_at`.

use chrono::NaiveDate;
use shared::ErrorCode;
use shared::models::{
    BillQuery, BillSummary, DailySummary, Feedback, FeedbackCreate, MenuItem, NotificationType,
    Order, OrderCreate, OrderListQuery, OrderPage, OrderStatus, SettleResult,
};
use sqlx::SqlitePool;
use std::collections::HashMap;
use std::sync::Arc;

use super::error::{ItemRejection, OrderError, OrderResult};
use super::policy::{OrderWindows, check_cancel, check_dispute};
use super::{Actor, summary, validator};
use crate::clock::Clock;
use crate::db::repository::order::{NewOrder, OrderFilter};
use crate::db::repository::{RepoError, feedback, menu_item, order, page_window};
use crate::notifications::{self, NotificationSink};
use crate::pricing::{self, PricingError, ResolvedLine};
use crate::slots::SlotPolicy;
use crate::utils::time::format_date;
use crate::utils::validation::{MAX_NOTE_LEN, validate_order_optional_text};

/// Order engine over the shared pool
#[derive(Clone, Debug)]
pub struct OrderService {
    pool: SqlitePool,
    trusted: Arc<dyn Clock>,
    wall: Arc<dyn Clock>,
    slots: Arc<SlotPolicy>,
    windows: OrderWindows,
    notifier: Arc<dyn NotificationSink>,
}

impl OrderService {
    pub fn new(
        pool: SqlitePool,
        trusted: Arc<dyn Clock>,
        wall: Arc<dyn Clock>,
        notifier: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            pool,
            trusted,
            wall,
            slots: Arc::new(SlotPolicy::canteen()),
            windows: OrderWindows::default(),
            notifier,
        }
    }

    pub fn with_windows(mut self, windows: OrderWindows) -> Self {
        self.windows = windows;
        self
    }

    pub fn with_slots(mut self, slots: Arc<SlotPolicy>) -> Self {
        self.slots = slots;
        self
    }

    pub fn windows(&self) -> &OrderWindows {
        &self.windows
    }

    fn require_admin(actor: &Actor) -> OrderResult<()> {
        if actor.is_admin() {
            Ok(())
        } else {
            Err(OrderError::Forbidden(
                ErrorCode::AdminRequired,
                "Admin role required".into(),
            ))
        }
    }

    async fn load(&self, id: i64) -> OrderResult<Order> {
        order::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| OrderError::NotFound(ErrorCode::OrderNotFound, format!("Order {id} not found")))
    }

    /// Place an ad hoc order
    ///
    /// Admins may order for another user via `for_user_id`; the owner is then
    /// notified about the extended cancel / dispute window.
    pub async fn create(&self, actor: &Actor, payload: OrderCreate) -> OrderResult<Order> {
        let owner_id = payload.for_user_id.unwrap_or(actor.user_id);
        let created_by_admin = if owner_id != actor.user_id {
            Self::require_admin(actor)?;
            Some(actor.user_id)
        } else {
            None
        };

        if payload.items.is_empty() {
            return Err(OrderError::Validation(
                ErrorCode::OrderEmpty,
                "Order must contain at least one item".into(),
            ));
        }
        validate_order_optional_text(&payload.comment, "comment", MAX_NOTE_LEN)?;

        let mut ids: Vec<i64> = payload.items.iter().map(|l| l.menu_item_id).collect();
        ids.sort_unstable();
        ids.dedup();
        let catalog: HashMap<i64, MenuItem> = menu_item::find_by_ids(&self.pool, &ids)
            .await?
            .into_iter()
            .map(|item| (item.id, item))
            .collect();

        let now = self.trusted.local_now();
        validator::validate_batch(&payload.items, &catalog, &self.slots, &now)
            .map_err(OrderError::Rejected)?;

        let mut lines: Vec<ResolvedLine> = Vec::with_capacity(payload.items.len());
        let mut rejections = Vec::new();
        for input in &payload.items {
            // validate_batch guarantees presence
            let Some(item) = catalog.get(&input.menu_item_id) else {
                continue;
            };
            match pricing::resolve_line(item, input.proportion_name.as_deref(), input.quantity) {
                Ok(line) => lines.push(line),
                Err(e @ PricingError::ProportionNotFound { .. }) => rejections.push(
                    ItemRejection::new(item.id, Some(&item.name), ErrorCode::ProportionNotFound, e.to_string()),
                ),
            }
        }
        if !rejections.is_empty() {
            return Err(OrderError::Rejected(rejections));
        }

        let total_price = pricing::order_total(&lines);
        let created_at = self.wall.now_millis();

        let mut tx = self.pool.begin().await.map_err(RepoError::from)?;
        let order_id = order::insert_with_items(
            &mut *tx,
            &NewOrder {
                user_id: owner_id,
                total_price,
                comment: payload.comment.as_deref(),
                created_by_admin,
                scheduled_for: None,
                created_at,
                lines: &lines,
            },
        )
        .await?;
        tx.commit().await.map_err(RepoError::from)?;

        tracing::info!(
            order_id,
            user_id = owner_id,
            created_by_admin = ?created_by_admin,
            items = lines.len(),
            total = total_price,
            "Order created"
        );

        if created_by_admin.is_some() {
            let message =
                notifications::admin_order_message(order_id, self.windows.admin_order.num_hours());
            notifications::emit(
                self.notifier.as_ref(),
                owner_id,
                Some(order_id),
                NotificationType::AdminOrder,
                &message,
            )
            .await;
        }

        self.load(order_id).await
    }

    /// Owner or admin
    pub async fn get_order(&self, actor: &Actor, id: i64) -> OrderResult<Order> {
        let order = self.load(id).await?;
        if !actor.is_admin() && order.user_id != actor.user_id {
            return Err(OrderError::Forbidden(
                ErrorCode::NotOrderOwner,
                "You can only view your own orders".into(),
            ));
        }
        Ok(order)
    }

    /// Non-admins only ever see their own orders
    pub async fn list_orders(&self, actor: &Actor, query: OrderListQuery) -> OrderResult<OrderPage> {
        let status = query
            .status
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(|s| {
                s.parse::<OrderStatus>()
                    .map_err(|e| OrderError::Validation(ErrorCode::InvalidOrderStatus, e))
            })
            .transpose()?;
        let date = query
            .date
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(|s| {
                NaiveDate::parse_from_str(s, "%Y-%m-%d").map(format_date).map_err(|_| {
                    OrderError::Validation(
                        ErrorCode::InvalidFormat,
                        format!("Invalid date format: {s}, expected YYYY-MM-DD"),
                    )
                })
            })
            .transpose()?;

        let filter = OrderFilter {
            user_id: if actor.is_admin() {
                query.user_id
            } else {
                Some(actor.user_id)
            },
            status,
            date,
            is_scheduled: query.is_scheduled,
        };
        let (offset, limit) = page_window(query.page, query.limit);
        let (orders, total) = order::list(&self.pool, &filter, offset, limit).await?;
        Ok(OrderPage { orders, total })
    }

    /// Admin transition; any recognized status from any state
    pub async fn update_status(&self, actor: &Actor, id: i64, status: &str) -> OrderResult<Order> {
        Self::require_admin(actor)?;
        let status: OrderStatus = status
            .parse()
            .map_err(|e| OrderError::Validation(ErrorCode::InvalidOrderStatus, e))?;

        let previous = self.load(id).await?;
        order::update_status(&self.pool, id, status, actor.user_id, self.wall.now_millis()).await?;

        tracing::info!(
            order_id = id,
            from = %previous.status,
            to = %status,
            admin_id = actor.user_id,
            "Order status updated"
        );
        self.load(id).await
    }

    pub async fn cancel(&self, actor: &Actor, id: i64) -> OrderResult<Order> {
        let current = self.load(id).await?;
        let now = self.wall.now_millis();

        if let Err(e) = check_cancel(&current, actor, now, &self.windows) {
            if matches!(e, OrderError::Forbidden(..)) {
                crate::security_log!(
                    "WARN",
                    "order_cancel_denied",
                    order_id = id,
                    user_id = actor.user_id
                );
            }
            return Err(e);
        }

        if current.is_scheduled {
            if !order::cancel_scheduled(&self.pool, id, actor.user_id, now).await? {
                return Err(OrderError::Conflict(
                    ErrorCode::ScheduledOrderImmutable,
                    format!("Scheduled order {id} can no longer be cancelled"),
                ));
            }
        } else if !order::mark_cancelled(&self.pool, id, actor.user_id, now).await? {
            // Lost a race; reload to report the actual state
            let latest = self.load(id).await?;
            return Err(OrderError::Conflict(
                if latest.status == OrderStatus::Settled {
                    ErrorCode::OrderAlreadySettled
                } else {
                    ErrorCode::OrderAlreadyCancelled
                },
                format!("Order {id} is already {}", latest.status),
            ));
        }

        tracing::info!(order_id = id, user_id = actor.user_id, "Order cancelled");
        self.load(id).await
    }

    /// Owner feedback on a Delivered or Settled order, once
    pub async fn add_feedback(
        &self,
        actor: &Actor,
        id: i64,
        payload: FeedbackCreate,
    ) -> OrderResult<Feedback> {
        if !(1..=5).contains(&payload.rating) {
            return Err(OrderError::Validation(
                ErrorCode::InvalidRating,
                format!("Rating must be between 1 and 5, got {}", payload.rating),
            ));
        }
        validate_order_optional_text(&payload.comment, "comment", MAX_NOTE_LEN)?;

        let order = self.load(id).await?;
        if order.user_id != actor.user_id {
            return Err(OrderError::Forbidden(
                ErrorCode::NotOrderOwner,
                "You can only review your own orders".into(),
            ));
        }
        if !matches!(order.status, OrderStatus::Delivered | OrderStatus::Settled) {
            return Err(OrderError::Validation(
                ErrorCode::FeedbackNotAllowed,
                format!("Feedback is only accepted for delivered orders, order is {}", order.status),
            ));
        }
        if feedback::find_by_order(&self.pool, id).await?.is_some() {
            return Err(OrderError::Conflict(
                ErrorCode::FeedbackAlreadyExists,
                format!("Feedback already submitted for order {id}"),
            ));
        }

        let created = feedback::create(
            &self.pool,
            id,
            actor.user_id,
            payload.rating,
            payload.comment.as_deref(),
            self.wall.now_millis(),
        )
        .await
        .map_err(|e| match e {
            RepoError::Duplicate(_) => OrderError::Conflict(
                ErrorCode::FeedbackAlreadyExists,
                format!("Feedback already submitted for order {id}"),
            ),
            other => other.into(),
        })?;

        tracing::info!(order_id = id, rating = created.rating, "Feedback added");
        Ok(created)
    }

    /// Owner flags an admin-placed order within the admin window
    pub async fn dispute(&self, actor: &Actor, id: i64) -> OrderResult<Order> {
        let order = self.load(id).await?;
        check_dispute(&order, actor, self.wall.now_millis(), &self.windows)?;

        if !order::mark_disputed(&self.pool, id, self.wall.now_millis()).await? {
            return Err(OrderError::Conflict(
                ErrorCode::OrderAlreadyDisputed,
                format!("Order {id} is already disputed"),
            ));
        }

        tracing::info!(order_id = id, user_id = actor.user_id, "Order disputed");
        self.load(id).await
    }

    /// Delivered → Settled for all of a user's orders
    pub async fn settle_for_user(&self, actor: &Actor, user_id: i64) -> OrderResult<SettleResult> {
        Self::require_admin(actor)?;
        let settled_count =
            order::settle_delivered_for_user(&self.pool, user_id, self.wall.now_millis()).await?;
        tracing::info!(user_id, settled_count, admin_id = actor.user_id, "User orders settled");
        Ok(SettleResult {
            user_id,
            settled_count,
        })
    }

    /// Per-item quantities and revenue for one business day (default today)
    pub async fn daily_item_summary(
        &self,
        actor: &Actor,
        date: Option<NaiveDate>,
    ) -> OrderResult<DailySummary> {
        Self::require_admin(actor)?;
        let date = date.unwrap_or_else(|| self.trusted.today());
        let rows = order::summary_lines_for_date(&self.pool, &format_date(date)).await?;
        Ok(summary::aggregate_daily(date, &rows))
    }

    /// Owner or admin
    pub async fn bill_summary(&self, actor: &Actor, query: BillQuery) -> OrderResult<BillSummary> {
        let user_id = query.user_id.unwrap_or(actor.user_id);
        if user_id != actor.user_id && !actor.is_admin() {
            crate::security_log!(
                "WARN",
                "bill_access_denied",
                user_id = actor.user_id,
                target_user_id = user_id
            );
            return Err(OrderError::Forbidden(
                ErrorCode::PermissionDenied,
                "You can only view your own bill".into(),
            ));
        }
        if query.end_date < query.start_date {
            return Err(OrderError::Validation(
                ErrorCode::InvalidDateRange,
                "End date must not be before start date".into(),
            ));
        }

        let orders = order::billable_for_user(
            &self.pool,
            user_id,
            &format_date(query.start_date),
            &format_date(query.end_date),
        )
        .await?;
        Ok(summary::aggregate_bill(
            user_id,
            query.start_date,
            query.end_date,
            &orders,
        ))
    }
}
