//! Shared types for the storefront workspace
//!
//! Data models, derived-field math, error types and small utilities used by
//! the store layer and anything that consumes it (exporters, admin tooling).

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use error::{AppError, AppResult, ErrorCategory, ErrorCode};
