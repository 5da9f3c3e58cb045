//! Date-range expansion
//!
//! [`prepare`] checks every request against the snapshot up front; [`plan`]
//! then walks the range day by day and cannot fail.

use chrono::{Datelike, NaiveDate};
use shared::ErrorCode;
use shared::models::{CategoryRotation, DayOfWeek, MenuItem, ScheduleRequestItem};

use super::catalog::CatalogSnapshot;
use crate::orders::OrderError;
use crate::orders::validator::check_quantity;
use crate::pricing::{self, ResolvedLine};
use crate::utils::time::days_inclusive;

/// A request resolved against the snapshot
#[derive(Debug, Clone)]
pub enum PreparedRequest<'a> {
    Item {
        item: &'a MenuItem,
        proportion: Option<String>,
        quantity: i32,
    },
    Category {
        rotation: &'a CategoryRotation,
        quantity: i32,
    },
}

/// Lines for one calendar day
#[derive(Debug, Clone)]
pub struct DayPlan {
    pub date: NaiveDate,
    pub lines: Vec<ResolvedLine>,
    pub total_price: f64,
}

/// Validate requests: quantity, schedulable item, known proportion, known category
pub fn prepare<'a>(
    snapshot: &'a CatalogSnapshot,
    requests: &[ScheduleRequestItem],
) -> Result<Vec<PreparedRequest<'a>>, OrderError> {
    if requests.is_empty() {
        return Err(OrderError::Validation(
            ErrorCode::OrderEmpty,
            "Scheduled order must contain at least one item".into(),
        ));
    }

    requests
        .iter()
        .map(|request| {
            check_quantity(request.quantity())
                .map_err(|msg| OrderError::Validation(ErrorCode::InvalidQuantity, msg))?;

            match request {
                ScheduleRequestItem::Item {
                    menu_item_id,
                    quantity,
                    proportion_name,
                } => {
                    let item = snapshot.item(*menu_item_id).ok_or_else(|| {
                        OrderError::Validation(
                            ErrorCode::ItemNotSchedulable,
                            format!("Menu item {menu_item_id} is not schedulable or does not exist"),
                        )
                    })?;
                    let proportion = proportion_name.clone().filter(|p| !p.is_empty());
                    // proportion checked up front so planning cannot fail per day
                    pricing::resolve_line(item, proportion.as_deref(), *quantity).map_err(|e| {
                        OrderError::NotFound(ErrorCode::ProportionNotFound, e.to_string())
                    })?;
                    Ok(PreparedRequest::Item {
                        item,
                        proportion,
                        quantity: *quantity,
                    })
                }
                ScheduleRequestItem::Category { category, quantity } => {
                    let rotation = snapshot.rotation(*category).ok_or_else(|| {
                        OrderError::Validation(
                            ErrorCode::CategoryNotSchedulable,
                            format!("Category '{category}' is not available for scheduling"),
                        )
                    })?;
                    Ok(PreparedRequest::Category {
                        rotation,
                        quantity: *quantity,
                    })
                }
            }
        })
        .collect()
}

/// Lines produced by one request on `day`, if any
fn line_for_day(request: &PreparedRequest<'_>, day: DayOfWeek) -> Option<ResolvedLine> {
    match request {
        PreparedRequest::Item {
            item,
            proportion,
            quantity,
        } => {
            if item.day_of_week.is_some_and(|d| d != day) {
                return None;
            }
            pricing::resolve_line(item, proportion.as_deref(), *quantity).ok()
        }
        PreparedRequest::Category { rotation, quantity } => rotation
            .day_mappings
            .get(&day)
            .map(|entry| pricing::resolve_rotation(entry, rotation.category, day, *quantity)),
    }
}

/// One plan per day in [start, end] that yields at least one line
pub fn plan(requests: &[PreparedRequest<'_>], start: NaiveDate, end: NaiveDate) -> Vec<DayPlan> {
    days_inclusive(start, end)
        .filter_map(|date| {
            let day = DayOfWeek::from(date.weekday());
            let lines: Vec<ResolvedLine> = requests
                .iter()
                .filter_map(|r| line_for_day(r, day))
                .collect();
            if lines.is_empty() {
                return None;
            }
            Some(DayPlan {
                date,
                total_price: pricing::order_total(&lines),
                lines,
            })
        })
        .collect()
}
