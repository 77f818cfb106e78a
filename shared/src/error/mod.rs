//! Unified error system for parity-cloud
//!
//! - [`ErrorCode`]: standardized numeric codes for every failure kind
//! - [`ErrorCategory`]: classification of errors by code range
//! - [`AppError`]: rich error type with code, message, and details
//! - [`ActionResult`]: the uniform `{error, message}` wire shape for mutations
//!
//! # Error Code Ranges
//!
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission / entitlement errors
//! - 3xxx: Product errors
//! - 9xxx: System errors
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode};
//!
//! let err = AppError::new(ErrorCode::ProductNotFound);
//! let err = AppError::with_message(ErrorCode::ValidationFailed, "Product name is required");
//! ```

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{ActionResult, AppError, AppResult};
