//! Line resolver

use rust_decimal::Decimal;
use shared::models::{DayOfWeek, MealCategory, MenuItem, RotationEntry};
use shared::util::{line_total, to_f64};
use thiserror::Error;

/// Pricing errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PricingError {
    #[error("Proportion '{proportion}' not found for {item_name}")]
    ProportionNotFound {
        item_id: i64,
        item_name: String,
        proportion: String,
    },
}

/// A priced line ready to be persisted
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedLine {
    pub menu_item_id: i64,
    pub quantity: i32,
    pub price_at_order: f64,
    pub name_at_order: String,
    pub proportion_name: Option<String>,
}

impl ResolvedLine {
    pub fn line_total(&self) -> Decimal {
        line_total(self.price_at_order, self.quantity)
    }
}

/// Resolve an item line, optionally at a named proportion
///
/// Without a proportion the base price and item name are used. An empty
/// proportion name is treated as no proportion.
pub fn resolve_line(
    item: &MenuItem,
    proportion: Option<&str>,
    quantity: i32,
) -> Result<ResolvedLine, PricingError> {
    match proportion.filter(|p| !p.is_empty()) {
        None => Ok(ResolvedLine {
            menu_item_id: item.id,
            quantity,
            price_at_order: item.price,
            name_at_order: item.name.clone(),
            proportion_name: None,
        }),
        Some(name) => {
            let p = item
                .proportion(name)
                .ok_or_else(|| PricingError::ProportionNotFound {
                    item_id: item.id,
                    item_name: item.name.clone(),
                    proportion: name.to_string(),
                })?;
            Ok(ResolvedLine {
                menu_item_id: item.id,
                quantity,
                price_at_order: p.price,
                name_at_order: format!("{} ({})", item.name, p.name),
                proportion_name: Some(p.name.clone()),
            })
        }
    }
}

/// Resolve a category-rotation line for one weekday, always at base price
pub fn resolve_rotation(
    entry: &RotationEntry,
    category: MealCategory,
    day: DayOfWeek,
    quantity: i32,
) -> ResolvedLine {
    ResolvedLine {
        menu_item_id: entry.id,
        quantity,
        price_at_order: entry.price,
        name_at_order: format!("{category} ({day})"),
        proportion_name: None,
    }
}

/// Σ(price × quantity), rounded to cents
pub fn order_total(lines: &[ResolvedLine]) -> f64 {
    to_f64(lines.iter().map(ResolvedLine::line_total).sum())
}
