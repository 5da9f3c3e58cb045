//! Scheduled orders
//!
//! A date-range request is expanded eagerly into one Pending order per day
//! that produces at least one line. There is no background timer: the rows
//! exist as soon as the request commits.

pub mod catalog;
pub mod constraints;
pub mod materializer;
pub mod service;

pub use catalog::CatalogSnapshot;
pub use constraints::{scheduling_constraints, validate_date_range};
pub use materializer::{DayPlan, PreparedRequest, plan, prepare};
pub use service::ScheduledOrderService;
