//! Batch validation of requested order lines
//!
//! Every problem in a batch is collected in one pass; nothing fails fast.

use chrono::{DateTime, Datelike, FixedOffset};
use shared::ErrorCode;
use shared::models::{DayOfWeek, MenuItem, OrderItemInput};
use std::collections::{HashMap, HashSet};

use super::error::ItemRejection;
use crate::slots::{SlotPolicy, SlotRule};

/// Upper bound for a single line's quantity
pub const MAX_QUANTITY: i32 = 9999;

pub fn check_quantity(quantity: i32) -> Result<(), String> {
    if quantity <= 0 {
        return Err(format!("Quantity must be a positive integer, got {quantity}"));
    }
    if quantity > MAX_QUANTITY {
        return Err(format!("Quantity must not exceed {MAX_QUANTITY}, got {quantity}"));
    }
    Ok(())
}

/// Item-level eligibility, first failing check wins
fn check_item(
    item: &MenuItem,
    slots: &SlotPolicy,
    now: &DateTime<FixedOffset>,
    today: DayOfWeek,
) -> Result<(), (ErrorCode, String)> {
    if item.is_deleted() {
        return Err((
            ErrorCode::MenuItemNotFound,
            format!("{} is no longer on the menu", item.name),
        ));
    }
    if !item.available {
        return Err((
            ErrorCode::MenuItemUnavailable,
            format!("{} is currently not available", item.name),
        ));
    }
    if let SlotRule::Window(w) = slots.rule(item.category)
        && !slots.is_within_slot(item.category, now)
    {
        return Err((
            ErrorCode::SlotClosed,
            format!(
                "{} orders are only accepted between {} and {}",
                item.category, w.display_start, w.display_end
            ),
        ));
    }
    if let Some(day) = item.day_of_week
        && day != today
    {
        return Err((
            ErrorCode::DayRestricted,
            format!("{} is only available on {}", item.name, day),
        ));
    }
    Ok(())
}

/// Validate a batch against a catalog snapshot at `now`
///
/// Returns every rejection, at most one per (item, code) pair.
pub fn validate_batch(
    lines: &[OrderItemInput],
    catalog: &HashMap<i64, MenuItem>,
    slots: &SlotPolicy,
    now: &DateTime<FixedOffset>,
) -> Result<(), Vec<ItemRejection>> {
    let today = DayOfWeek::from(now.weekday());
    let mut rejections = Vec::new();
    let mut seen: HashSet<(i64, ErrorCode)> = HashSet::new();
    let mut checked: HashSet<i64> = HashSet::new();

    for line in lines {
        let item = catalog.get(&line.menu_item_id);
        let name = item.map(|i| i.name.as_str());

        if let Err(reason) = check_quantity(line.quantity)
            && seen.insert((line.menu_item_id, ErrorCode::InvalidQuantity))
        {
            rejections.push(ItemRejection::new(
                line.menu_item_id,
                name,
                ErrorCode::InvalidQuantity,
                reason,
            ));
        }

        if !checked.insert(line.menu_item_id) {
            continue;
        }

        let outcome = match item {
            None => Err((
                ErrorCode::MenuItemNotFound,
                format!("Menu item {} not found", line.menu_item_id),
            )),
            Some(item) => check_item(item, slots, now, today),
        };
        if let Err((code, reason)) = outcome
            && seen.insert((line.menu_item_id, code))
        {
            rejections.push(ItemRejection::new(line.menu_item_id, name, code, reason));
        }
    }

    if rejections.is_empty() {
        Ok(())
    } else {
        Err(rejections)
    }
}
