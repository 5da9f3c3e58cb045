//! Daily and bill aggregation
//!
//! Pure functions over rows already loaded from the store. Money is summed in
//! `Decimal` and converted once at the end.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use shared::models::{
    BillItem, BillSummary, BillTotals, DailyItemSummary, DailySummary, Order, OrderStatus,
};
use shared::util::{line_total, to_decimal, to_f64};
use std::collections::{BTreeMap, HashMap};

use crate::db::repository::order::SummaryLineRow;

#[derive(Default)]
struct DailyBucket {
    pending: i64,
    delivered: i64,
    settled: i64,
    paid: Decimal,
    sale: Decimal,
}

/// Group lines by (name, proportion, price)
///
/// Pending and Confirmed count as pending. Paid revenue is Settled lines,
/// sale revenue is Delivered plus Settled lines. Cancelled rows are ignored.
pub fn aggregate_daily(date: NaiveDate, rows: &[SummaryLineRow]) -> DailySummary {
    let mut buckets: BTreeMap<(String, Option<String>, Decimal), DailyBucket> = BTreeMap::new();

    for row in rows {
        let key = (
            row.name_at_order.clone(),
            row.proportion_name.clone(),
            to_decimal(row.price_at_order),
        );
        let qty = i64::from(row.quantity);
        let amount = line_total(row.price_at_order, row.quantity);
        let bucket = match row.status {
            OrderStatus::Cancelled => continue,
            _ => buckets.entry(key).or_default(),
        };
        match row.status {
            OrderStatus::Pending | OrderStatus::Confirmed => bucket.pending += qty,
            OrderStatus::Delivered => {
                bucket.delivered += qty;
                bucket.sale += amount;
            }
            OrderStatus::Settled => {
                bucket.settled += qty;
                bucket.paid += amount;
                bucket.sale += amount;
            }
            OrderStatus::Cancelled => {}
        }
    }

    let mut total_paid = Decimal::ZERO;
    let mut total_sale = Decimal::ZERO;
    let items = buckets
        .into_iter()
        .map(|((name, proportion_name, price), b)| {
            total_paid += b.paid;
            total_sale += b.sale;
            DailyItemSummary {
                name,
                proportion_name,
                price: to_f64(price),
                pending_quantity: b.pending,
                delivered_quantity: b.delivered,
                settled_quantity: b.settled,
                total_quantity: b.pending + b.delivered + b.settled,
                paid_amount: to_f64(b.paid),
                sale_amount: to_f64(b.sale),
            }
        })
        .collect();

    DailySummary {
        date,
        items,
        total_paid: to_f64(total_paid),
        total_sale: to_f64(total_sale),
    }
}

/// Bill over Delivered and Settled orders; `outstanding` is the delivered total
pub fn aggregate_bill(
    user_id: i64,
    start_date: NaiveDate,
    end_date: NaiveDate,
    orders: &[Order],
) -> BillSummary {
    let mut settled_count = 0;
    let mut delivered_count = 0;
    let mut settled_total = Decimal::ZERO;
    let mut delivered_total = Decimal::ZERO;

    // (menu_item_id, proportion) -> (name, unit price, quantity, amount)
    let mut lines: HashMap<(i64, Option<String>), (String, f64, i64, Decimal)> = HashMap::new();

    for order in orders {
        match order.status {
            OrderStatus::Settled => {
                settled_count += 1;
                settled_total += to_decimal(order.total_price);
            }
            OrderStatus::Delivered => {
                delivered_count += 1;
                delivered_total += to_decimal(order.total_price);
            }
            _ => continue,
        }

        for item in &order.items {
            let entry = lines
                .entry((item.menu_item_id, item.proportion_name.clone()))
                .or_insert_with(|| (item.name_at_order.clone(), item.price_at_order, 0, Decimal::ZERO));
            entry.2 += i64::from(item.quantity);
            entry.3 += line_total(item.price_at_order, item.quantity);
        }
    }

    let mut items_breakdown: Vec<BillItem> = lines
        .into_iter()
        .map(|((menu_item_id, proportion_name), (name, price, qty, amount))| BillItem {
            menu_item_id,
            name,
            proportion_name,
            price_per_unit: price,
            total_quantity: qty,
            total_amount: to_f64(amount),
        })
        .collect();
    items_breakdown.sort_by(|a, b| {
        b.total_amount
            .total_cmp(&a.total_amount)
            .then_with(|| a.name.cmp(&b.name))
    });

    BillSummary {
        user_id,
        start_date,
        end_date,
        summary: BillTotals {
            settled_orders_count: settled_count,
            delivered_orders_count: delivered_count,
            total_orders_count: settled_count + delivered_count,
            settled_total: to_f64(settled_total),
            delivered_total: to_f64(delivered_total),
            outstanding: to_f64(delivered_total),
        },
        items_breakdown,
    }
}
