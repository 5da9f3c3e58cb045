//! Menu Item Model (菜品)

use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Meal category, each slotted category has its own ordering window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum MealCategory {
    Breakfast,
    Lunch,
    #[serde(alias = "snacks")]
    Snack,
    /// Uncategorized item, orderable at any time
    None,
}

impl MealCategory {
    /// Categories that carry an ordering window, in chronological order
    pub const SLOTTED: [MealCategory; 3] = [Self::Breakfast, Self::Lunch, Self::Snack];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Breakfast => "breakfast",
            Self::Lunch => "lunch",
            Self::Snack => "snack",
            Self::None => "none",
        }
    }
}

impl fmt::Display for MealCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MealCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "breakfast" => Ok(Self::Breakfast),
            "lunch" => Ok(Self::Lunch),
            "snack" | "snacks" => Ok(Self::Snack),
            "none" | "" => Ok(Self::None),
            other => Err(format!("Unknown category: {other}")),
        }
    }
}

/// Weekday restriction of a menu item (stored as the English day name)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Monday => "Monday",
            Self::Tuesday => "Tuesday",
            Self::Wednesday => "Wednesday",
            Self::Thursday => "Thursday",
            Self::Friday => "Friday",
            Self::Saturday => "Saturday",
            Self::Sunday => "Sunday",
        }
    }
}

impl From<Weekday> for DayOfWeek {
    fn from(day: Weekday) -> Self {
        match day {
            Weekday::Mon => Self::Monday,
            Weekday::Tue => Self::Tuesday,
            Weekday::Wed => Self::Wednesday,
            Weekday::Thu => Self::Thursday,
            Weekday::Fri => Self::Friday,
            Weekday::Sat => Self::Saturday,
            Weekday::Sun => Self::Sunday,
        }
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DayOfWeek {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "monday" => Ok(Self::Monday),
            "tuesday" => Ok(Self::Tuesday),
            "wednesday" => Ok(Self::Wednesday),
            "thursday" => Ok(Self::Thursday),
            "friday" => Ok(Self::Friday),
            "saturday" => Ok(Self::Saturday),
            "sunday" => Ok(Self::Sunday),
            other => Err(format!("Unknown weekday: {other}")),
        }
    }
}

/// Named size/price variant of a menu item (e.g. half / full)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Proportion {
    pub name: String,
    pub price: f64,
}

/// Menu item entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct MenuItem {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    /// Base price, equals the lowest proportion price when proportions exist
    pub price: f64,
    pub category: MealCategory,
    pub day_of_week: Option<DayOfWeek>,
    pub schedulable: bool,
    pub available: bool,
    /// Soft-delete marker (Unix millis)
    pub deleted_at: Option<i64>,
    pub created_at: i64,

    // -- Relations (populated by application code, skipped by FromRow) --
    #[cfg_attr(feature = "db", sqlx(skip))]
    #[serde(default)]
    pub proportions: Vec<Proportion>,
}

impl MenuItem {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Exact-name proportion lookup
    pub fn proportion(&self, name: &str) -> Option<&Proportion> {
        self.proportions.iter().find(|p| p.name == name)
    }
}

/// Create menu item payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItemCreate {
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    #[serde(default = "default_category")]
    pub category: MealCategory,
    pub day_of_week: Option<DayOfWeek>,
    #[serde(default)]
    pub schedulable: bool,
    #[serde(default = "default_true")]
    pub available: bool,
    #[serde(default)]
    pub proportions: Vec<Proportion>,
}

fn default_category() -> MealCategory {
    MealCategory::None
}

fn default_true() -> bool {
    true
}
