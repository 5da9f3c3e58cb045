//! Schedulable catalog snapshot
//!
//! Loaded once per request so every day of a range prices against the same
//! catalog state.

use rust_decimal::Decimal;
use shared::models::{
    CategoryRotation, MealCategory, MenuItem, RotationEntry, SchedulableCatalog,
};
use shared::util::{to_decimal, to_f64};
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, Default)]
pub struct CatalogSnapshot {
    /// Schedulable items in catalog order, snack items without a weekday
    items: Vec<MenuItem>,
    by_id: HashMap<i64, usize>,
    rotations: BTreeMap<MealCategory, CategoryRotation>,
}

impl CatalogSnapshot {
    /// Build from schedulable, non-deleted items ordered by category, weekday, name
    ///
    /// When two items share a (category, weekday) the later one wins.
    pub fn build(items: Vec<MenuItem>) -> Self {
        let mut rotation_entries: BTreeMap<MealCategory, BTreeMap<_, RotationEntry>> =
            BTreeMap::new();

        let items: Vec<MenuItem> = items
            .into_iter()
            .filter(|item| item.schedulable && !item.is_deleted())
            .map(|mut item| {
                if item.category != MealCategory::None
                    && let Some(day) = item.day_of_week
                {
                    rotation_entries.entry(item.category).or_default().insert(
                        day,
                        RotationEntry {
                            id: item.id,
                            name: item.name.clone(),
                            price: item.price,
                        },
                    );
                }
                // snacks are orderable on any weekday
                if item.category == MealCategory::Snack {
                    item.day_of_week = None;
                }
                item
            })
            .collect();

        let rotations = rotation_entries
            .into_iter()
            .map(|(category, day_mappings)| {
                let prices: Vec<Decimal> = day_mappings.values().map(|e| to_decimal(e.price)).collect();
                let min = prices.iter().copied().min().unwrap_or_default();
                let max = prices.iter().copied().max().unwrap_or_default();
                (
                    category,
                    CategoryRotation {
                        category,
                        day_mappings,
                        min_price: to_f64(min),
                        max_price: to_f64(max),
                        has_price_range: min != max,
                    },
                )
            })
            .collect();

        let by_id = items.iter().enumerate().map(|(i, item)| (item.id, i)).collect();

        Self {
            items,
            by_id,
            rotations,
        }
    }

    /// Schedulable item by id
    pub fn item(&self, id: i64) -> Option<&MenuItem> {
        self.by_id.get(&id).map(|&i| &self.items[i])
    }

    pub fn rotation(&self, category: MealCategory) -> Option<&CategoryRotation> {
        self.rotations.get(&category)
    }

    /// Client-facing view
    pub fn to_view(&self) -> SchedulableCatalog {
        SchedulableCatalog {
            items: self.items.clone(),
            categories: self.rotations.values().cloned().collect(),
        }
    }
}
