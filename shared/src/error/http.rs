//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            // Success
            Self::Success => StatusCode::OK,

            // 404 Not Found
            Self::NotFound
            | Self::OrderNotFound
            | Self::MenuItemNotFound
            | Self::ProportionNotFound
            | Self::ScheduledOrderNotFound => StatusCode::NOT_FOUND,

            // 409 Conflict
            Self::AlreadyExists
            | Self::OrderAlreadySettled
            | Self::OrderAlreadyCancelled
            | Self::OrderNotCancellable
            | Self::FeedbackAlreadyExists
            | Self::OrderAlreadyDisputed
            | Self::ScheduledOrderImmutable => StatusCode::CONFLICT,

            // 401 Unauthorized
            Self::NotAuthenticated | Self::TokenExpired | Self::TokenInvalid => {
                StatusCode::UNAUTHORIZED
            }

            // 403 Forbidden
            Self::PermissionDenied | Self::AdminRequired | Self::NotOrderOwner => {
                StatusCode::FORBIDDEN
            }

            // 410 Gone (time window elapsed)
            Self::CancelWindowExpired | Self::DisputeWindowExpired => StatusCode::GONE,

            // 422 Unprocessable (item-level rejections)
            Self::ItemsRejected => StatusCode::UNPROCESSABLE_ENTITY,

            // 500 Internal Server Error
            Self::Unknown | Self::InternalError | Self::DatabaseError | Self::ConfigError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }

            // 400 Bad Request (default for validation/business errors)
            _ => StatusCode::BAD_REQUEST,
        }
    }
}
