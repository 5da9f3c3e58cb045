//! Line pricing
//!
//! Resolves a requested line into the price and display name that get
//! snapshotted onto the order item.

mod resolver;

pub use resolver::{PricingError, ResolvedLine, order_total, resolve_line, resolve_rotation};
