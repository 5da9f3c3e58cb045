//! Order Model (订单)

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Order status
///
/// Pending → Confirmed → Delivered → Settled, with Cancelled reachable from
/// any non-terminal state. Settled and Cancelled are terminal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Delivered,
    Settled,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Confirmed => "Confirmed",
            Self::Delivered => "Delivered",
            Self::Settled => "Settled",
            Self::Cancelled => "Cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Settled | Self::Cancelled)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(Self::Pending),
            "Confirmed" => Ok(Self::Confirmed),
            "Delivered" => Ok(Self::Delivered),
            "Settled" => Ok(Self::Settled),
            "Cancelled" => Ok(Self::Cancelled),
            other => Err(format!("Invalid status: {other}")),
        }
    }
}

/// Order line with price and name snapshot taken at creation time
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub menu_item_id: i64,
    pub quantity: i32,
    pub price_at_order: f64,
    pub name_at_order: String,
    pub proportion_name: Option<String>,
}

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Order {
    pub id: i64,
    /// Owner user ID
    pub user_id: i64,
    pub status: OrderStatus,
    pub total_price: f64,
    pub comment: Option<String>,
    /// Admin who placed the order on behalf of the owner
    pub created_by_admin: Option<i64>,
    pub is_scheduled: bool,
    /// Delivery date for scheduled orders (YYYY-MM-DD)
    pub scheduled_for_date: Option<String>,
    pub scheduled_end_date: Option<String>,
    pub disputed: bool,
    pub cancelled_by: Option<i64>,
    /// Unix millis
    pub cancelled_at: Option<i64>,
    /// Unix millis
    pub created_at: i64,
    pub updated_at: i64,

    // -- Relations (populated by application code, skipped by FromRow) --
    #[cfg_attr(feature = "db", sqlx(skip))]
    #[serde(default)]
    pub items: Vec<OrderItem>,
}

impl Order {
    /// Placed by an admin for somebody else
    pub fn is_admin_placed(&self) -> bool {
        self.created_by_admin.is_some_and(|admin| admin != self.user_id)
    }
}

/// Requested order line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemInput {
    pub menu_item_id: i64,
    pub quantity: i32,
    pub proportion_name: Option<String>,
}

/// Create order payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCreate {
    pub items: Vec<OrderItemInput>,
    pub comment: Option<String>,
    /// Place the order on behalf of another user (admin only)
    pub for_user_id: Option<i64>,
}

/// Update order status payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderStatusUpdate {
    pub status: String,
}

/// Order list filters and paging
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderListQuery {
    pub user_id: Option<i64>,
    pub status: Option<String>,
    /// Effective date (YYYY-MM-DD)
    pub date: Option<String>,
    pub is_scheduled: Option<bool>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// One page of orders
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderPage {
    pub orders: Vec<Order>,
    pub total: i64,
}

/// Result of a bulk settlement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettleResult {
    pub user_id: i64,
    pub settled_count: u64,
}
