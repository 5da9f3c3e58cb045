//! Summary Models (日汇总 / 账单)

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One (name, proportion, price) group of the daily item summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyItemSummary {
    pub name: String,
    pub proportion_name: Option<String>,
    pub price: f64,
    /// Pending + Confirmed quantity
    pub pending_quantity: i64,
    pub delivered_quantity: i64,
    pub settled_quantity: i64,
    pub total_quantity: i64,
    /// Settled revenue
    pub paid_amount: f64,
    /// Delivered + Settled revenue
    pub sale_amount: f64,
}

/// Daily item summary for one effective date
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailySummary {
    pub date: NaiveDate,
    pub items: Vec<DailyItemSummary>,
    pub total_paid: f64,
    pub total_sale: f64,
}

/// Aggregated bill line, grouped by menu item and proportion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillItem {
    pub menu_item_id: i64,
    pub name: String,
    pub proportion_name: Option<String>,
    pub price_per_unit: f64,
    pub total_quantity: i64,
    pub total_amount: f64,
}

/// Bill totals
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillTotals {
    pub settled_orders_count: usize,
    pub delivered_orders_count: usize,
    pub total_orders_count: usize,
    pub settled_total: f64,
    pub delivered_total: f64,
    /// Delivered but not yet settled
    pub outstanding: f64,
}

/// Bill summary of one user over a date range
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillSummary {
    pub user_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub summary: BillTotals,
    pub items_breakdown: Vec<BillItem>,
}

/// Bill summary query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillQuery {
    /// Defaults to the caller
    pub user_id: Option<i64>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Daily summary query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailySummaryQuery {
    /// Defaults to today
    pub date: Option<NaiveDate>,
}
