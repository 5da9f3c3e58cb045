//! Ordering time slots
//!
//! Each meal category maps to an explicit [`SlotRule`]. Bounds are
//! minute-of-day in the business timezone and inclusive at both ends.
//!
//! | Category | Window |
//! |----------|--------|
//! | breakfast | 08:00 - 09:45 |
//! | lunch | 11:00 - 12:30 |
//! | snack | 15:00 - 15:45 |
//! | none | always allowed |

use chrono::{DateTime, FixedOffset, Timelike};
use serde::Serialize;
use shared::models::MealCategory;

const MINUTES_PER_DAY: u32 = 24 * 60;

/// Daily ordering window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotWindow {
    /// Minute of day, inclusive
    pub start: u32,
    /// Minute of day, inclusive
    pub end: u32,
    pub display_start: &'static str,
    pub display_end: &'static str,
}

impl SlotWindow {
    const fn new(
        start: (u32, u32),
        end: (u32, u32),
        display_start: &'static str,
        display_end: &'static str,
    ) -> Self {
        Self {
            start: start.0 * 60 + start.1,
            end: end.0 * 60 + end.1,
            display_start,
            display_end,
        }
    }

    pub fn contains(&self, minute_of_day: u32) -> bool {
        minute_of_day >= self.start && minute_of_day <= self.end
    }
}

/// Ordering rule for one category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotRule {
    Window(SlotWindow),
    AlwaysAllowed,
}

/// Per-category slot state
#[derive(Debug, Clone, Serialize)]
pub struct SlotInfo {
    pub category: MealCategory,
    pub is_active: bool,
    /// HH:MM
    pub start: String,
    pub end: String,
    pub display_start: &'static str,
    pub display_end: &'static str,
    pub minutes_until_start: Option<u32>,
    pub minutes_until_end: Option<u32>,
}

/// Status of every slotted category
#[derive(Debug, Clone, Serialize)]
pub struct SlotStatus {
    pub current_time: String,
    pub current_time_formatted: String,
    pub slots: Vec<SlotInfo>,
}

/// Nearest upcoming slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NextSlot {
    pub category: MealCategory,
    pub display_start: &'static str,
    pub display_end: &'static str,
    pub minutes_until: u32,
    pub is_tomorrow: bool,
}

/// Slot table
#[derive(Debug, Clone)]
pub struct SlotPolicy {
    rules: Vec<(MealCategory, SlotRule)>,
}

impl Default for SlotPolicy {
    fn default() -> Self {
        Self::canteen()
    }
}

impl SlotPolicy {
    /// The canteen's fixed slot table
    pub fn canteen() -> Self {
        Self {
            rules: vec![
                (
                    MealCategory::Breakfast,
                    SlotRule::Window(SlotWindow::new((8, 0), (9, 45), "8:00 AM", "9:45 AM")),
                ),
                (
                    MealCategory::Lunch,
                    SlotRule::Window(SlotWindow::new((11, 0), (12, 30), "11:00 AM", "12:30 PM")),
                ),
                (
                    MealCategory::Snack,
                    SlotRule::Window(SlotWindow::new((15, 0), (15, 45), "3:00 PM", "3:45 PM")),
                ),
                (MealCategory::None, SlotRule::AlwaysAllowed),
            ],
        }
    }

    pub fn rule(&self, category: MealCategory) -> SlotRule {
        self.rules
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, rule)| *rule)
            .unwrap_or(SlotRule::AlwaysAllowed)
    }

    pub fn window(&self, category: MealCategory) -> Option<SlotWindow> {
        match self.rule(category) {
            SlotRule::Window(w) => Some(w),
            SlotRule::AlwaysAllowed => None,
        }
    }

    /// Whether `category` may be ordered at `now`
    pub fn is_within_slot(&self, category: MealCategory, now: &DateTime<FixedOffset>) -> bool {
        match self.rule(category) {
            SlotRule::AlwaysAllowed => true,
            SlotRule::Window(w) => w.contains(minute_of_day(now)),
        }
    }

    fn windows(&self) -> impl Iterator<Item = (MealCategory, SlotWindow)> + '_ {
        self.rules.iter().filter_map(|(c, rule)| match rule {
            SlotRule::Window(w) => Some((*c, *w)),
            SlotRule::AlwaysAllowed => None,
        })
    }

    pub fn slot_info(&self, category: MealCategory, now: &DateTime<FixedOffset>) -> Option<SlotInfo> {
        let w = self.window(category)?;
        let current = minute_of_day(now);
        let is_active = w.contains(current);
        Some(SlotInfo {
            category,
            is_active,
            start: format_hhmm(w.start),
            end: format_hhmm(w.end),
            display_start: w.display_start,
            display_end: w.display_end,
            minutes_until_start: (current < w.start).then(|| w.start - current),
            minutes_until_end: is_active.then(|| w.end - current),
        })
    }

    pub fn status(&self, now: &DateTime<FixedOffset>) -> SlotStatus {
        SlotStatus {
            current_time: now.to_rfc3339(),
            current_time_formatted: now.format("%I:%M %p").to_string(),
            slots: self
                .windows()
                .filter_map(|(c, _)| self.slot_info(c, now))
                .collect(),
        }
    }

    /// Nearest slot starting later today, otherwise the first slot tomorrow
    pub fn next_available(&self, now: &DateTime<FixedOffset>) -> Option<NextSlot> {
        let current = minute_of_day(now);
        let mut windows: Vec<_> = self.windows().collect();
        windows.sort_by_key(|(_, w)| w.start);

        if let Some((category, w)) = windows.iter().find(|(_, w)| current < w.start) {
            return Some(NextSlot {
                category: *category,
                display_start: w.display_start,
                display_end: w.display_end,
                minutes_until: w.start - current,
                is_tomorrow: false,
            });
        }

        windows.first().map(|(category, w)| NextSlot {
            category: *category,
            display_start: w.display_start,
            display_end: w.display_end,
            minutes_until: MINUTES_PER_DAY - current + w.start,
            is_tomorrow: true,
        })
    }
}

fn minute_of_day(now: &DateTime<FixedOffset>) -> u32 {
    now.hour() * 60 + now.minute()
}

fn format_hhmm(minute_of_day: u32) -> String {
    format!("{:02}:{:02}", minute_of_day / 60, minute_of_day % 60)
}
