//! Scheduled Order Model (预约订单)
//!
//! A scheduled order request covers a date range and is materialized into
//! one concrete [`Order`] per eligible day.

use super::menu_item::{DayOfWeek, MealCategory, MenuItem};
use super::order::Order;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One requested line of a scheduled order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScheduleRequestItem {
    /// A specific menu item, delivered on every eligible day
    Item {
        menu_item_id: i64,
        quantity: i32,
        proportion_name: Option<String>,
    },
    /// Whatever item the category rotation maps to each weekday
    Category {
        category: MealCategory,
        quantity: i32,
    },
}

impl ScheduleRequestItem {
    pub fn quantity(&self) -> i32 {
        match self {
            Self::Item { quantity, .. } | Self::Category { quantity, .. } => *quantity,
        }
    }
}

/// Create scheduled order payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduledOrderCreate {
    pub items: Vec<ScheduleRequestItem>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub comment: Option<String>,
}

/// Materialization result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduledOrderResult {
    pub created_count: usize,
    pub orders: Vec<Order>,
}

/// Date bounds a client may pick from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulingConstraints {
    pub min_start_date: NaiveDate,
    pub max_start_date: NaiveDate,
    pub max_end_date: NaiveDate,
}

/// Scheduled order list query
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScheduledOrderListQuery {
    #[serde(default)]
    pub include_completed: bool,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// Bulk cancel payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkCancelRequest {
    pub order_ids: Vec<i64>,
}

/// Bulk cancel result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkCancelResult {
    pub requested: usize,
    pub cancelled_count: u64,
}

/// Item a category rotation maps to on one weekday
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RotationEntry {
    pub id: i64,
    pub name: String,
    pub price: f64,
}

/// Weekday rotation of one category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryRotation {
    pub category: MealCategory,
    pub day_mappings: BTreeMap<DayOfWeek, RotationEntry>,
    pub min_price: f64,
    pub max_price: f64,
    pub has_price_range: bool,
}

/// Schedulable catalog view
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulableCatalog {
    /// Every schedulable item; snack items carry no weekday here
    pub items: Vec<MenuItem>,
    pub categories: Vec<CategoryRotation>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_item_tagged() {
        let json = r#"[
            {"kind": "item", "menu_item_id": 4, "quantity": 2, "proportion_name": "half"},
            {"kind": "category", "category": "lunch", "quantity": 1}
        ]"#;
        let items: Vec<ScheduleRequestItem> = serde_json::from_str(json).unwrap();
        assert_eq!(
            items[0],
            ScheduleRequestItem::Item {
                menu_item_id: 4,
                quantity: 2,
                proportion_name: Some("half".to_string()),
            }
        );
        assert_eq!(
            items[1],
            ScheduleRequestItem::Category {
                category: MealCategory::Lunch,
                quantity: 1,
            }
        );
        assert_eq!(items[1].quantity(), 1);
    }

    #[test]
    fn test_request_item_requires_kind() {
        let json = r#"{"menu_item_id": 4, "quantity": 2}"#;
        assert!(serde_json::from_str::<ScheduleRequestItem>(json).is_err());
    }

    #[test]
    fn test_create_payload_dates() {
        let json = r#"{"items": [], "start_date": "2026-03-02", "end_date": "2026-03-08"}"#;
        let payload: ScheduledOrderCreate = serde_json::from_str(json).unwrap();
        assert_eq!(payload.start_date, NaiveDate::from_ymd_opt(2026, 3, 2).unwrap());
        assert!(payload.comment.is_none());
    }
}
