//! 统一错误处理
//!
//! Re-exports the shared error system. Engine errors convert into
//! [`AppError`] via `From`, so handlers just use `?`.
//!
//! | 来源 | 转换 |
//! |------|------|
//! | `RepoError` | NotFound → 404, Duplicate → 409, Database → opaque 500 |
//! | `OrderError` | code carried by the variant, rejections in `details` |

pub use shared::error::{AppError, AppResult, ErrorBody, ErrorCategory, ErrorCode};
