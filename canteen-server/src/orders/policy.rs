//! Cancel / dispute window policy
//!
//! | Order | Caller | Rule |
//! |-------|--------|------|
//! | any | admin / superadmin | allowed unless Settled / Cancelled |
//! | admin-placed | owner | within the admin window (24h), any non-terminal status |
//! | self-placed | owner | Pending / Confirmed and within the self window (60s) |
//! | scheduled | admin / superadmin only | Pending / Confirmed |
//!
//! Elapsed time is measured from the persisted `created_at` against the wall clock.

use chrono::Duration;
use shared::ErrorCode;
use shared::models::{Order, OrderStatus};

use super::Actor;
use super::error::{OrderError, OrderResult};

/// Time windows measured from order creation
#[derive(Debug, Clone, Copy)]
pub struct OrderWindows {
    pub self_cancel: Duration,
    /// Cancel and dispute window for admin-placed orders
    pub admin_order: Duration,
}

impl Default for OrderWindows {
    fn default() -> Self {
        Self {
            self_cancel: Duration::seconds(60),
            admin_order: Duration::hours(24),
        }
    }
}

fn elapsed(order: &Order, now_millis: i64) -> Duration {
    Duration::milliseconds(now_millis - order.created_at)
}

/// Whether `actor` may cancel `order` at `now_millis`
pub fn check_cancel(
    order: &Order,
    actor: &Actor,
    now_millis: i64,
    windows: &OrderWindows,
) -> OrderResult<()> {
    if order.is_scheduled {
        return check_scheduled_cancel(order, actor);
    }

    match order.status {
        OrderStatus::Settled => {
            return Err(OrderError::Conflict(
                ErrorCode::OrderAlreadySettled,
                format!("Order {} is already settled", order.id),
            ));
        }
        OrderStatus::Cancelled => {
            return Err(OrderError::Conflict(
                ErrorCode::OrderAlreadyCancelled,
                format!("Order {} is already cancelled", order.id),
            ));
        }
        _ => {}
    }

    if actor.is_admin() {
        return Ok(());
    }

    if order.user_id != actor.user_id {
        return Err(OrderError::Forbidden(
            ErrorCode::NotOrderOwner,
            "You can only cancel your own orders".into(),
        ));
    }

    let age = elapsed(order, now_millis);

    if order.is_admin_placed() {
        if age > windows.admin_order {
            return Err(OrderError::WindowExpired(
                ErrorCode::CancelWindowExpired,
                format!(
                    "Orders placed by an admin can only be cancelled within {} hours",
                    windows.admin_order.num_hours()
                ),
            ));
        }
        return Ok(());
    }

    if !matches!(order.status, OrderStatus::Pending | OrderStatus::Confirmed) {
        return Err(OrderError::Conflict(
            ErrorCode::OrderNotCancellable,
            format!("Order {} is {} and can no longer be cancelled", order.id, order.status),
        ));
    }
    if age > windows.self_cancel {
        return Err(OrderError::WindowExpired(
            ErrorCode::CancelWindowExpired,
            format!(
                "Orders can only be cancelled within {} seconds of placing them",
                windows.self_cancel.num_seconds()
            ),
        ));
    }
    Ok(())
}

/// Statuses a materialized order can still be cancelled from
pub fn is_scheduled_cancellable(status: OrderStatus) -> bool {
    !matches!(
        status,
        OrderStatus::Cancelled | OrderStatus::Settled | OrderStatus::Delivered
    )
}

/// Materialized orders: admin only, and never once delivered
pub fn check_scheduled_cancel(order: &Order, actor: &Actor) -> OrderResult<()> {
    if !actor.is_admin() {
        return Err(OrderError::Forbidden(
            ErrorCode::AdminRequired,
            "Only admins can cancel scheduled orders".into(),
        ));
    }
    if !is_scheduled_cancellable(order.status) {
        return Err(OrderError::Conflict(
            ErrorCode::ScheduledOrderImmutable,
            format!(
                "Scheduled order {} is {} and can no longer be cancelled",
                order.id, order.status
            ),
        ));
    }
    Ok(())
}

/// Whether `actor` may dispute `order` at `now_millis`
pub fn check_dispute(
    order: &Order,
    actor: &Actor,
    now_millis: i64,
    windows: &OrderWindows,
) -> OrderResult<()> {
    if order.user_id != actor.user_id {
        return Err(OrderError::Forbidden(
            ErrorCode::NotOrderOwner,
            "You can only dispute your own orders".into(),
        ));
    }
    if !order.is_admin_placed() {
        return Err(OrderError::Validation(
            ErrorCode::OrderNotDisputable,
            "Only orders placed by an admin can be disputed".into(),
        ));
    }
    if order.status == OrderStatus::Cancelled {
        return Err(OrderError::Conflict(
            ErrorCode::OrderAlreadyCancelled,
            format!("Order {} is already cancelled", order.id),
        ));
    }
    if order.disputed {
        return Err(OrderError::Conflict(
            ErrorCode::OrderAlreadyDisputed,
            format!("Order {} is already disputed", order.id),
        ));
    }
    if elapsed(order, now_millis) > windows.admin_order {
        return Err(OrderError::WindowExpired(
            ErrorCode::DisputeWindowExpired,
            format!(
                "Orders can only be disputed within {} hours",
                windows.admin_order.num_hours()
            ),
        ));
    }
    Ok(())
}
