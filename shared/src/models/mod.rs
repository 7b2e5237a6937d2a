//! Data models
//!
//! Entities are persisted as JSON arrays, one durable slot per collection,
//! so field names here are an on-disk contract. Timestamps serialize as
//! RFC 3339 strings; calendar dates as `YYYY-MM-DD`.

pub mod deal;
pub mod lead;
pub mod order;
pub mod product;

// Re-exports
pub use deal::*;
pub use lead::*;
pub use order::*;
pub use product::*;
