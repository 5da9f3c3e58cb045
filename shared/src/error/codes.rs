//! Unified error codes for the canteen backend
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 4xxx: Order errors
//! - 6xxx: Menu errors
//! - 7xxx: Scheduling errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Admin role required
    AdminRequired = 2003,
    /// Caller does not own the order
    NotOrderOwner = 2010,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Order has already been settled
    OrderAlreadySettled = 4002,
    /// Order has already been cancelled
    OrderAlreadyCancelled = 4003,
    /// Cancellation window has elapsed
    CancelWindowExpired = 4004,
    /// Order status no longer allows cancellation
    OrderNotCancellable = 4005,
    /// Order has no items
    OrderEmpty = 4007,
    /// Unknown order status value
    InvalidOrderStatus = 4008,
    /// One or more requested items were rejected
    ItemsRejected = 4009,
    /// Feedback already submitted for this order
    FeedbackAlreadyExists = 4010,
    /// Feedback is not allowed in the current order state
    FeedbackNotAllowed = 4011,
    /// Quantity must be a positive integer
    InvalidQuantity = 4012,
    /// Rating must be between 1 and 5
    InvalidRating = 4013,
    /// Dispute window has elapsed
    DisputeWindowExpired = 4014,
    /// Order has already been disputed
    OrderAlreadyDisputed = 4015,
    /// Order cannot be disputed
    OrderNotDisputable = 4016,

    // ==================== 6xxx: Menu ====================
    /// Menu item not found
    MenuItemNotFound = 6001,
    /// Menu item is not available
    MenuItemUnavailable = 6002,
    /// Proportion not found on menu item
    ProportionNotFound = 6003,
    /// Ordering slot for the item's category is closed
    SlotClosed = 6004,
    /// Item is restricted to a different weekday
    DayRestricted = 6005,
    /// Menu item price does not match its proportions
    MenuItemInvalidPrice = 6006,

    // ==================== 7xxx: Scheduling ====================
    /// Invalid scheduling date range
    InvalidDateRange = 7001,
    /// Start date lies in the past
    StartDateInPast = 7002,
    /// Date lies beyond the schedulable year
    BeyondSchedulingYear = 7003,
    /// Menu item is not schedulable
    ItemNotSchedulable = 7004,
    /// Category has no schedulable rotation
    CategoryNotSchedulable = 7005,
    /// Scheduled order not found
    ScheduledOrderNotFound = 7006,
    /// Scheduled order can no longer be changed
    ScheduledOrderImmutable = 7007,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Configuration error
    ConfigError = 9005,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    /// Get the default message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            Self::Success => "Success",
            Self::Unknown => "Unknown error",
            Self::ValidationFailed => "Validation failed",
            Self::NotFound => "Resource not found",
            Self::AlreadyExists => "Resource already exists",
            Self::InvalidRequest => "Invalid request",
            Self::InvalidFormat => "Invalid format",
            Self::ValueOutOfRange => "Value out of range",

            // Auth
            Self::NotAuthenticated => "Authentication required",
            Self::TokenExpired => "Token has expired",
            Self::TokenInvalid => "Invalid token",

            // Permission
            Self::PermissionDenied => "Permission denied",
            Self::AdminRequired => "Admin role required",
            Self::NotOrderOwner => "Order belongs to another user",

            // Order
            Self::OrderNotFound => "Order not found",
            Self::OrderAlreadySettled => "Order has already been settled",
            Self::OrderAlreadyCancelled => "Order has already been cancelled",
            Self::CancelWindowExpired => "Cancellation window has expired",
            Self::OrderNotCancellable => "Order can no longer be cancelled",
            Self::OrderEmpty => "Order has no items",
            Self::InvalidOrderStatus => "Invalid order status",
            Self::ItemsRejected => "Some items cannot be ordered right now",
            Self::FeedbackAlreadyExists => "Feedback already submitted for this order",
            Self::FeedbackNotAllowed => "Feedback is only accepted for delivered orders",
            Self::InvalidQuantity => "Quantity must be a positive integer",
            Self::InvalidRating => "Rating must be between 1 and 5",
            Self::DisputeWindowExpired => "Dispute window has expired",
            Self::OrderAlreadyDisputed => "Order has already been disputed",
            Self::OrderNotDisputable => "Order cannot be disputed",

            // Menu
            Self::MenuItemNotFound => "Menu item not found",
            Self::MenuItemUnavailable => "Menu item is not available",
            Self::ProportionNotFound => "Proportion not found",
            Self::SlotClosed => "Ordering slot is closed",
            Self::DayRestricted => "Item is not served today",
            Self::MenuItemInvalidPrice => "Base price must equal the lowest proportion price",

            // Scheduling
            Self::InvalidDateRange => "Invalid date range",
            Self::StartDateInPast => "Start date cannot be in the past",
            Self::BeyondSchedulingYear => "Cannot schedule beyond the current year",
            Self::ItemNotSchedulable => "Menu item is not schedulable",
            Self::CategoryNotSchedulable => "Category is not available for scheduling",
            Self::ScheduledOrderNotFound => "Scheduled order not found",
            Self::ScheduledOrderImmutable => "Scheduled order can no longer be cancelled",

            // System
            Self::InternalError => "Internal server error",
            Self::DatabaseError => "Database error",
            Self::ConfigError => "Configuration error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error returned when converting an unknown numeric value into an [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(Self::Success),
            1 => Ok(Self::Unknown),
            2 => Ok(Self::ValidationFailed),
            3 => Ok(Self::NotFound),
            4 => Ok(Self::AlreadyExists),
            5 => Ok(Self::InvalidRequest),
            6 => Ok(Self::InvalidFormat),
            8 => Ok(Self::ValueOutOfRange),

            // Auth
            1001 => Ok(Self::NotAuthenticated),
            1003 => Ok(Self::TokenExpired),
            1004 => Ok(Self::TokenInvalid),

            // Permission
            2001 => Ok(Self::PermissionDenied),
            2003 => Ok(Self::AdminRequired),
            2010 => Ok(Self::NotOrderOwner),

            // Order
            4001 => Ok(Self::OrderNotFound),
            4002 => Ok(Self::OrderAlreadySettled),
            4003 => Ok(Self::OrderAlreadyCancelled),
            4004 => Ok(Self::CancelWindowExpired),
            4005 => Ok(Self::OrderNotCancellable),
            4007 => Ok(Self::OrderEmpty),
            4008 => Ok(Self::InvalidOrderStatus),
            4009 => Ok(Self::ItemsRejected),
            4010 => Ok(Self::FeedbackAlreadyExists),
            4011 => Ok(Self::FeedbackNotAllowed),
            4012 => Ok(Self::InvalidQuantity),
            4013 => Ok(Self::InvalidRating),
            4014 => Ok(Self::DisputeWindowExpired),
            4015 => Ok(Self::OrderAlreadyDisputed),
            4016 => Ok(Self::OrderNotDisputable),

            // Menu
            6001 => Ok(Self::MenuItemNotFound),
            6002 => Ok(Self::MenuItemUnavailable),
            6003 => Ok(Self::ProportionNotFound),
            6004 => Ok(Self::SlotClosed),
            6005 => Ok(Self::DayRestricted),
            6006 => Ok(Self::MenuItemInvalidPrice),

            // Scheduling
            7001 => Ok(Self::InvalidDateRange),
            7002 => Ok(Self::StartDateInPast),
            7003 => Ok(Self::BeyondSchedulingYear),
            7004 => Ok(Self::ItemNotSchedulable),
            7005 => Ok(Self::CategoryNotSchedulable),
            7006 => Ok(Self::ScheduledOrderNotFound),
            7007 => Ok(Self::ScheduledOrderImmutable),

            // System
            9001 => Ok(Self::InternalError),
            9002 => Ok(Self::DatabaseError),
            9005 => Ok(Self::ConfigError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::ValidationFailed.code(), 2);
        assert_eq!(ErrorCode::NotAuthenticated.code(), 1001);
        assert_eq!(ErrorCode::PermissionDenied.code(), 2001);
        assert_eq!(ErrorCode::OrderNotFound.code(), 4001);
        assert_eq!(ErrorCode::CancelWindowExpired.code(), 4004);
        assert_eq!(ErrorCode::MenuItemNotFound.code(), 6001);
        assert_eq!(ErrorCode::InvalidDateRange.code(), 7001);
        assert_eq!(ErrorCode::InternalError.code(), 9001);
    }

    #[test]
    fn test_try_from_valid() {
        assert_eq!(ErrorCode::try_from(0), Ok(ErrorCode::Success));
        assert_eq!(ErrorCode::try_from(4010), Ok(ErrorCode::FeedbackAlreadyExists));
        assert_eq!(ErrorCode::try_from(7007), Ok(ErrorCode::ScheduledOrderImmutable));
    }

    #[test]
    fn test_try_from_invalid() {
        assert_eq!(ErrorCode::try_from(4999), Err(InvalidErrorCode(4999)));
        assert_eq!(ErrorCode::try_from(65535), Err(InvalidErrorCode(65535)));
    }

    #[test]
    fn test_serialize() {
        let json = serde_json::to_string(&ErrorCode::SlotClosed).unwrap();
        assert_eq!(json, "6004");
    }

    #[test]
    fn test_deserialize() {
        let code: ErrorCode = serde_json::from_str("4004").unwrap();
        assert_eq!(code, ErrorCode::CancelWindowExpired);
        assert!(serde_json::from_str::<ErrorCode>("4242").is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(ErrorCode::Success.to_string(), "E0000");
        assert_eq!(ErrorCode::OrderNotFound.to_string(), "E4001");
    }

    #[test]
    fn test_roundtrip() {
        let codes = [
            ErrorCode::ItemsRejected,
            ErrorCode::ProportionNotFound,
            ErrorCode::StartDateInPast,
            ErrorCode::DatabaseError,
        ];
        for code in codes {
            assert_eq!(ErrorCode::try_from(u16::from(code)), Ok(code));
        }
    }
}
