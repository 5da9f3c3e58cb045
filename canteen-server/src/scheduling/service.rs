//! Scheduled order service

use shared::ErrorCode;
use shared::models::{
    BulkCancelResult, Order, OrderPage, SchedulableCatalog, ScheduledOrderCreate,
    ScheduledOrderListQuery, ScheduledOrderResult, SchedulingConstraints,
};
use sqlx::SqlitePool;
use std::sync::Arc;

use super::catalog::CatalogSnapshot;
use super::constraints::{scheduling_constraints, validate_date_range};
use super::materializer::{plan, prepare};
use crate::clock::Clock;
use crate::db::repository::order::NewOrder;
use crate::db::repository::{RepoError, menu_item, order, page_window};
use crate::orders::policy::check_scheduled_cancel;
use crate::orders::{Actor, OrderError, OrderResult};
use crate::utils::time::format_date;
use crate::utils::validation::{MAX_NOTE_LEN, validate_order_optional_text};

#[derive(Clone, Debug)]
pub struct ScheduledOrderService {
    pool: SqlitePool,
    /// Source of "today" for date-range checks
    trusted: Arc<dyn Clock>,
    /// Record timestamps
    wall: Arc<dyn Clock>,
}

impl ScheduledOrderService {
    pub fn new(pool: SqlitePool, trusted: Arc<dyn Clock>, wall: Arc<dyn Clock>) -> Self {
        Self {
            pool,
            trusted,
            wall,
        }
    }

    fn require_admin(actor: &Actor) -> OrderResult<()> {
        if actor.is_admin() {
            Ok(())
        } else {
            crate::security_log!(
                "WARN",
                "scheduled_order_admin_required",
                user_id = actor.user_id
            );
            Err(OrderError::Forbidden(
                ErrorCode::AdminRequired,
                "Only admins can cancel scheduled orders".into(),
            ))
        }
    }

    async fn snapshot(&self) -> OrderResult<CatalogSnapshot> {
        Ok(CatalogSnapshot::build(
            menu_item::find_schedulable(&self.pool).await?,
        ))
    }

    /// Materialize one order per eligible day, all in one transaction
    pub async fn create(
        &self,
        actor: &Actor,
        payload: ScheduledOrderCreate,
    ) -> OrderResult<ScheduledOrderResult> {
        validate_order_optional_text(&payload.comment, "comment", MAX_NOTE_LEN)?;
        validate_date_range(payload.start_date, payload.end_date, self.trusted.today())?;

        let snapshot = self.snapshot().await?;
        let prepared = prepare(&snapshot, &payload.items)?;
        let days = plan(&prepared, payload.start_date, payload.end_date);

        if days.is_empty() {
            tracing::info!(
                user_id = actor.user_id,
                start = %payload.start_date,
                end = %payload.end_date,
                "Scheduled order produced no eligible days"
            );
            return Ok(ScheduledOrderResult {
                created_count: 0,
                orders: Vec::new(),
            });
        }

        let created_at = self.wall.now_millis();
        let mut ids = Vec::with_capacity(days.len());

        // One transaction for the whole range
        let mut tx = self.pool.begin().await.map_err(RepoError::from)?;
        for day in &days {
            let id = order::insert_with_items(
                &mut *tx,
                &NewOrder {
                    user_id: actor.user_id,
                    total_price: day.total_price,
                    comment: payload.comment.as_deref(),
                    created_by_admin: None,
                    scheduled_for: Some(format_date(day.date)),
                    created_at,
                    lines: &day.lines,
                },
            )
            .await?;
            ids.push(id);
        }
        tx.commit().await.map_err(RepoError::from)?;

        tracing::info!(
            user_id = actor.user_id,
            start = %payload.start_date,
            end = %payload.end_date,
            created = ids.len(),
            "Scheduled orders materialized"
        );

        let orders = order::find_by_ids(&self.pool, &ids).await?;
        Ok(ScheduledOrderResult {
            created_count: orders.len(),
            orders,
        })
    }

    /// The caller's own scheduled orders by day
    pub async fn list_for_user(
        &self,
        actor: &Actor,
        query: ScheduledOrderListQuery,
    ) -> OrderResult<OrderPage> {
        let (offset, limit) = page_window(query.page, query.limit);
        let (orders, total) = order::list_scheduled_for_user(
            &self.pool,
            actor.user_id,
            query.include_completed,
            offset,
            limit,
        )
        .await?;
        Ok(OrderPage { orders, total })
    }

    /// Every scheduled order (admin)
    pub async fn list_all(
        &self,
        actor: &Actor,
        page: Option<u32>,
        limit: Option<u32>,
    ) -> OrderResult<OrderPage> {
        Self::require_admin(actor)?;
        let (offset, limit) = page_window(page, limit);
        let (orders, total) = order::list_all_scheduled(&self.pool, offset, limit).await?;
        Ok(OrderPage { orders, total })
    }

    /// Cancel one materialized order that has not progressed (admin)
    pub async fn cancel_one(&self, actor: &Actor, id: i64) -> OrderResult<Order> {
        Self::require_admin(actor)?;

        let existing = order::find_by_id(&self.pool, id)
            .await?
            .filter(|o| o.is_scheduled)
            .ok_or_else(|| {
                OrderError::NotFound(
                    ErrorCode::ScheduledOrderNotFound,
                    format!("Scheduled order {id} not found"),
                )
            })?;

        check_scheduled_cancel(&existing, actor)?;

        let changed =
            order::cancel_scheduled(&self.pool, id, actor.user_id, self.wall.now_millis()).await?;
        if !changed {
            // status changed concurrently
            return Err(OrderError::Conflict(
                ErrorCode::ScheduledOrderImmutable,
                format!("Scheduled order {id} can no longer be cancelled"),
            ));
        }

        tracing::info!(order_id = id, admin_id = actor.user_id, "Scheduled order cancelled");
        order::find_by_id(&self.pool, id).await?.ok_or_else(|| {
            OrderError::NotFound(
                ErrorCode::ScheduledOrderNotFound,
                format!("Scheduled order {id} not found"),
            )
        })
    }

    /// Cancel many in one transaction; only rows actually changed are counted
    pub async fn cancel_bulk(&self, actor: &Actor, ids: &[i64]) -> OrderResult<BulkCancelResult> {
        Self::require_admin(actor)?;
        if ids.is_empty() {
            return Err(OrderError::Validation(
                ErrorCode::ValidationFailed,
                "order_ids must not be empty".into(),
            ));
        }

        let now = self.wall.now_millis();
        let mut cancelled_count = 0u64;
        let mut tx = self.pool.begin().await.map_err(RepoError::from)?;
        for id in ids {
            if order::cancel_scheduled(&mut *tx, *id, actor.user_id, now).await? {
                cancelled_count += 1;
            }
        }
        tx.commit().await.map_err(RepoError::from)?;

        tracing::info!(
            requested = ids.len(),
            cancelled_count,
            admin_id = actor.user_id,
            "Scheduled orders bulk cancelled"
        );
        Ok(BulkCancelResult {
            requested: ids.len(),
            cancelled_count,
        })
    }

    pub async fn schedulable_items(&self) -> OrderResult<SchedulableCatalog> {
        Ok(self.snapshot().await?.to_view())
    }

    pub fn constraints(&self) -> SchedulingConstraints {
        scheduling_constraints(self.trusted.today())
    }
}
