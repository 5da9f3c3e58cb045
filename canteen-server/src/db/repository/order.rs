//! Order Repository
//!
//! Orders and their line items. Inserts take a connection so the caller
//! decides the transaction boundary (one order, or a whole date range).

use super::{RepoError, RepoResult};
use crate::pricing::ResolvedLine;
use shared::models::{Order, OrderItem, OrderStatus};
use sqlx::{Executor, QueryBuilder, Sqlite, SqliteConnection, SqlitePool};
use std::collections::HashMap;

const ORDER_COLUMNS: &str = "o.id, o.user_id, o.status, o.total_price, o.comment, o.created_by_admin, o.is_scheduled, o.scheduled_for_date, o.scheduled_end_date, o.disputed, o.cancelled_by, o.cancelled_at, o.created_at, o.updated_at";

/// Business date of an order: the scheduled day, else the creation day in UTC+5:30
pub const EFFECTIVE_DATE_SQL: &str =
    "COALESCE(o.scheduled_for_date, date(o.created_at / 1000 + 19800, 'unixepoch'))";

/// Creation day in UTC+5:30
const CREATED_DATE_SQL: &str = "date(o.created_at / 1000 + 19800, 'unixepoch')";

/// Order row to insert
#[derive(Debug, Clone)]
pub struct NewOrder<'a> {
    pub user_id: i64,
    pub total_price: f64,
    pub comment: Option<&'a str>,
    pub created_by_admin: Option<i64>,
    /// Set for materialized scheduled orders (YYYY-MM-DD)
    pub scheduled_for: Option<String>,
    pub created_at: i64,
    pub lines: &'a [ResolvedLine],
}

/// Filters for order listing
#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    pub user_id: Option<i64>,
    pub status: Option<OrderStatus>,
    /// Effective date (YYYY-MM-DD)
    pub date: Option<String>,
    pub is_scheduled: Option<bool>,
}

/// One order line joined with its order status, for daily aggregation
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SummaryLineRow {
    pub name_at_order: String,
    pub proportion_name: Option<String>,
    pub price_at_order: f64,
    pub quantity: i32,
    pub status: OrderStatus,
}

/// Insert an order and its items, returns the new order id
pub async fn insert_with_items(conn: &mut SqliteConnection, new: &NewOrder<'_>) -> RepoResult<i64> {
    let order_id: i64 = sqlx::query_scalar(
        "INSERT INTO orders (user_id, status, total_price, comment, created_by_admin, is_scheduled, scheduled_for_date, scheduled_end_date, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING id",
    )
    .bind(new.user_id)
    .bind(OrderStatus::Pending)
    .bind(new.total_price)
    .bind(new.comment)
    .bind(new.created_by_admin)
    .bind(new.scheduled_for.is_some())
    .bind(&new.scheduled_for)
    .bind(&new.scheduled_for)
    .bind(new.created_at)
    .bind(new.created_at)
    .fetch_one(&mut *conn)
    .await?;

    for line in new.lines {
        sqlx::query(
            "INSERT INTO order_item (order_id, menu_item_id, quantity, price_at_order, name_at_order, proportion_name) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(order_id)
        .bind(line.menu_item_id)
        .bind(line.quantity)
        .bind(line.price_at_order)
        .bind(&line.name_at_order)
        .bind(&line.proportion_name)
        .execute(&mut *conn)
        .await?;
    }

    Ok(order_id)
}

/// Attach line items to loaded orders
pub async fn load_items(pool: &SqlitePool, orders: &mut [Order]) -> RepoResult<()> {
    if orders.is_empty() {
        return Ok(());
    }

    let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(
        "SELECT id, order_id, menu_item_id, quantity, price_at_order, name_at_order, proportion_name FROM order_item WHERE order_id IN (",
    );
    let mut sep = qb.separated(", ");
    for order in orders.iter() {
        sep.push_bind(order.id);
    }
    qb.push(") ORDER BY order_id, id");

    let rows: Vec<OrderItem> = qb.build_query_as().fetch_all(pool).await?;
    let mut by_order: HashMap<i64, Vec<OrderItem>> = HashMap::new();
    for row in rows {
        by_order.entry(row.order_id).or_default().push(row);
    }
    for order in orders.iter_mut() {
        order.items = by_order.remove(&order.id).unwrap_or_default();
    }
    Ok(())
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Order>> {
    let order = sqlx::query_as::<_, Order>(&format!(
        "SELECT {ORDER_COLUMNS} FROM orders o WHERE o.id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    match order {
        Some(order) => {
            let mut orders = vec![order];
            load_items(pool, &mut orders).await?;
            Ok(orders.pop())
        }
        None => Ok(None),
    }
}

/// Load several orders (with items) in id order
pub async fn find_by_ids(pool: &SqlitePool, ids: &[i64]) -> RepoResult<Vec<Order>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let mut qb: QueryBuilder<Sqlite> =
        QueryBuilder::new(format!("SELECT {ORDER_COLUMNS} FROM orders o WHERE o.id IN ("));
    let mut sep = qb.separated(", ");
    for id in ids {
        sep.push_bind(*id);
    }
    qb.push(") ORDER BY o.id");

    let mut orders: Vec<Order> = qb.build_query_as().fetch_all(pool).await?;
    load_items(pool, &mut orders).await?;
    Ok(orders)
}

/// Unconditional status write (admin transition)
///
/// Moving to Cancelled also stamps `cancelled_by` / `cancelled_at`.
pub async fn update_status(
    pool: &SqlitePool,
    id: i64,
    status: OrderStatus,
    changed_by: i64,
    now: i64,
) -> RepoResult<()> {
    let rows = if status == OrderStatus::Cancelled {
        sqlx::query(
            "UPDATE orders SET status = ?, cancelled_by = ?, cancelled_at = ?, updated_at = ? WHERE id = ?",
        )
        .bind(status)
        .bind(changed_by)
        .bind(now)
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?
    } else {
        sqlx::query("UPDATE orders SET status = ?, updated_at = ? WHERE id = ?")
            .bind(status)
            .bind(now)
            .bind(id)
            .execute(pool)
            .await?
    };
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Order {id} not found")));
    }
    Ok(())
}

/// Cancel unless already terminal, stamping who and when
///
/// Returns false when the row was not in a cancellable state.
pub async fn mark_cancelled(
    pool: &SqlitePool,
    id: i64,
    cancelled_by: i64,
    now: i64,
) -> RepoResult<bool> {
    let rows = sqlx::query(
        "UPDATE orders SET status = 'Cancelled', cancelled_by = ?, cancelled_at = ?, updated_at = ? WHERE id = ? AND status NOT IN ('Settled', 'Cancelled')",
    )
    .bind(cancelled_by)
    .bind(now)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected() > 0)
}

/// Returns false when the order was already disputed
pub async fn mark_disputed(pool: &SqlitePool, id: i64, now: i64) -> RepoResult<bool> {
    let rows = sqlx::query(
        "UPDATE orders SET disputed = 1, updated_at = ? WHERE id = ? AND disputed = 0",
    )
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected() > 0)
}

/// Delivered → Settled for every order of the user
pub async fn settle_delivered_for_user(pool: &SqlitePool, user_id: i64, now: i64) -> RepoResult<u64> {
    let rows = sqlx::query(
        "UPDATE orders SET status = 'Settled', updated_at = ? WHERE user_id = ? AND status = 'Delivered'",
    )
    .bind(now)
    .bind(user_id)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected())
}

fn push_filters(qb: &mut QueryBuilder<'_, Sqlite>, filter: &OrderFilter) {
    qb.push(" WHERE 1 = 1");
    if let Some(user_id) = filter.user_id {
        qb.push(" AND o.user_id = ").push_bind(user_id);
    }
    if let Some(status) = filter.status {
        qb.push(" AND o.status = ").push_bind(status);
    }
    if let Some(date) = &filter.date {
        qb.push(format!(" AND {EFFECTIVE_DATE_SQL} = "))
            .push_bind(date.clone());
    }
    if let Some(is_scheduled) = filter.is_scheduled {
        qb.push(" AND o.is_scheduled = ").push_bind(is_scheduled);
    }
}

/// Filtered page of orders (newest first) and the total match count
pub async fn list(
    pool: &SqlitePool,
    filter: &OrderFilter,
    offset: i64,
    limit: i64,
) -> RepoResult<(Vec<Order>, i64)> {
    let mut count_qb: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT COUNT(*) FROM orders o");
    push_filters(&mut count_qb, filter);
    let total: i64 = count_qb.build_query_scalar().fetch_one(pool).await?;

    let mut qb: QueryBuilder<Sqlite> =
        QueryBuilder::new(format!("SELECT {ORDER_COLUMNS} FROM orders o"));
    push_filters(&mut qb, filter);
    qb.push(" ORDER BY o.created_at DESC, o.id DESC LIMIT ")
        .push_bind(limit)
        .push(" OFFSET ")
        .push_bind(offset);

    let mut orders: Vec<Order> = qb.build_query_as().fetch_all(pool).await?;
    load_items(pool, &mut orders).await?;
    Ok((orders, total))
}

/// Lines of every non-cancelled order whose effective date is `date`
pub async fn summary_lines_for_date(pool: &SqlitePool, date: &str) -> RepoResult<Vec<SummaryLineRow>> {
    let rows = sqlx::query_as::<_, SummaryLineRow>(&format!(
        "SELECT oi.name_at_order, oi.proportion_name, oi.price_at_order, oi.quantity, o.status \
         FROM order_item oi JOIN orders o ON o.id = oi.order_id \
         WHERE o.status != 'Cancelled' AND {EFFECTIVE_DATE_SQL} = ? \
         ORDER BY oi.name_at_order, oi.id"
    ))
    .bind(date)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Delivered and Settled orders of a user created within [start, end]
pub async fn billable_for_user(
    pool: &SqlitePool,
    user_id: i64,
    start: &str,
    end: &str,
) -> RepoResult<Vec<Order>> {
    let mut orders = sqlx::query_as::<_, Order>(&format!(
        "SELECT {ORDER_COLUMNS} FROM orders o \
         WHERE o.user_id = ? AND o.status IN ('Delivered', 'Settled') \
         AND {CREATED_DATE_SQL} BETWEEN ? AND ? \
         ORDER BY o.created_at"
    ))
    .bind(user_id)
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await?;
    load_items(pool, &mut orders).await?;
    Ok(orders)
}

/// A user's scheduled orders by day; Cancelled always hidden, Settled unless `include_completed`
pub async fn list_scheduled_for_user(
    pool: &SqlitePool,
    user_id: i64,
    include_completed: bool,
    offset: i64,
    limit: i64,
) -> RepoResult<(Vec<Order>, i64)> {
    let excluded = if include_completed {
        "('Cancelled')"
    } else {
        "('Cancelled', 'Settled')"
    };
    let where_clause =
        format!("WHERE o.user_id = ? AND o.is_scheduled = 1 AND o.status NOT IN {excluded}");

    let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM orders o {where_clause}"))
        .bind(user_id)
        .fetch_one(pool)
        .await?;

    let mut orders = sqlx::query_as::<_, Order>(&format!(
        "SELECT {ORDER_COLUMNS} FROM orders o {where_clause} \
         ORDER BY o.scheduled_for_date ASC, o.id ASC LIMIT ? OFFSET ?"
    ))
    .bind(user_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;
    load_items(pool, &mut orders).await?;
    Ok((orders, total))
}

/// Every scheduled order, newest day first
pub async fn list_all_scheduled(
    pool: &SqlitePool,
    offset: i64,
    limit: i64,
) -> RepoResult<(Vec<Order>, i64)> {
    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE is_scheduled = 1")
        .fetch_one(pool)
        .await?;

    let mut orders = sqlx::query_as::<_, Order>(&format!(
        "SELECT {ORDER_COLUMNS} FROM orders o WHERE o.is_scheduled = 1 \
         ORDER BY o.scheduled_for_date DESC, o.id DESC LIMIT ? OFFSET ?"
    ))
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;
    load_items(pool, &mut orders).await?;
    Ok((orders, total))
}

/// Cancel a scheduled order that has not progressed
///
/// Returns false when the row is missing, not scheduled, or already
/// Cancelled / Delivered / Settled.
pub async fn cancel_scheduled<'e, E>(
    executor: E,
    id: i64,
    cancelled_by: i64,
    now: i64,
) -> RepoResult<bool>
where
    E: Executor<'e, Database = Sqlite>,
{
    let rows = sqlx::query(
        "UPDATE orders SET status = 'Cancelled', cancelled_by = ?, cancelled_at = ?, updated_at = ? \
         WHERE id = ? AND is_scheduled = 1 AND status NOT IN ('Cancelled', 'Settled', 'Delivered')",
    )
    .bind(cancelled_by)
    .bind(now)
    .bind(now)
    .bind(id)
    .execute(executor)
    .await?;
    Ok(rows.rows_affected() > 0)
}
