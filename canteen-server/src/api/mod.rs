//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`orders`] - 即时订单、状态流转、申诉、反馈与汇总
//! - [`scheduled_orders`] - 预订订单
//! - [`notifications`] - 站内通知
//! - [`time_slots`] - 点餐时段 (公开)

pub mod health;
pub mod notifications;
pub mod orders;
pub mod scheduled_orders;
pub mod time_slots;

// Re-export common types for handlers
pub use crate::utils::{AppError, AppResult};
