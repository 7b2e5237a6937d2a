//! Unified error system for the storefront workspace
//!
//! - [`ErrorCode`]: Standardized error codes for all error types
//! - [`ErrorCategory`]: Classification of errors by domain
//! - [`AppError`]: Rich error type with codes, messages, and details
//!
//! # Error Code Ranges
//!
//! - 0xxx: General errors
//! - 6xxx: Product errors
//! - 9xxx: System errors
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode};
//!
//! let err = AppError::new(ErrorCode::ProductImportRejected);
//! let err = AppError::validation("Provider cost must be positive")
//!     .with_detail("field", "provider_cost");
//! ```
//!
//! Lookup misses inside the stores are not errors: they come back as
//! `None`/`false`. `AppError` is used at the edges (export, import, setup).

mod category;
mod codes;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{AppError, AppResult};
